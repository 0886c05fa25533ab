//! OS side effects behind a trait so the dispatcher stays testable.
//!
//! Every call is fire-and-forget: children are spawned with null stdio and
//! are never waited on.

use crate::core::error::LaunchError;
use crate::system::SystemInfo;
use std::process::{Command, Stdio};
use tracing::info;

pub trait Platform: Send + Sync {
    /// Run a registered command line through the user's shell.
    fn launch(&self, command_line: &str) -> Result<(), LaunchError>;

    /// Start a program by path (or name resolved through `PATH`).
    fn spawn_path(&self, path: &str) -> Result<(), LaunchError>;

    /// Hand a URL (http, https, steam, ...) to the default handler.
    fn open_url(&self, url: &str) -> Result<(), LaunchError>;

    /// Print the farewell and end the process. Only test doubles return.
    fn terminate(&self, farewell: &str);
}

pub struct SystemPlatform {
    system_info: SystemInfo,
}

impl SystemPlatform {
    pub fn new(system_info: SystemInfo) -> Self {
        Self { system_info }
    }
}

fn spawn_detached(cmd: &mut Command) -> Result<(), LaunchError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd.spawn()?;
    Ok(())
}

impl Platform for SystemPlatform {
    fn launch(&self, command_line: &str) -> Result<(), LaunchError> {
        let mut cmd = Command::new(&self.system_info.shell_path);
        cmd.arg(self.system_info.shell_type.command_flag())
            .arg(command_line);
        info!(command = command_line, shell = %self.system_info.shell_path, "launching");
        spawn_detached(&mut cmd)
    }

    fn spawn_path(&self, path: &str) -> Result<(), LaunchError> {
        info!(path, "spawning program");
        spawn_detached(&mut Command::new(path))
    }

    fn open_url(&self, url: &str) -> Result<(), LaunchError> {
        info!(url, "opening url");
        spawn_detached(&mut url_opener(url)?)
    }

    fn terminate(&self, farewell: &str) {
        println!("{}", farewell);
        std::process::exit(0);
    }
}

/// Desktop helper that hands a URL to the default handler. The URL is always
/// one argv entry and never passes through a shell, so `&`, `|` and `^` in a
/// query string stay part of the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrlHandler {
    Open,
    FileProtocolHandler,
    XdgOpen,
}

impl UrlHandler {
    fn current() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(UrlHandler::Open)
        } else if cfg!(target_os = "windows") {
            Some(UrlHandler::FileProtocolHandler)
        } else if cfg!(unix) {
            Some(UrlHandler::XdgOpen)
        } else {
            None
        }
    }

    fn command(self, url: &str) -> Command {
        let mut cmd = match self {
            UrlHandler::Open => Command::new("open"),
            UrlHandler::FileProtocolHandler => {
                let mut cmd = Command::new("rundll32");
                cmd.arg("url.dll,FileProtocolHandler");
                cmd
            }
            UrlHandler::XdgOpen => Command::new("xdg-open"),
        };
        cmd.arg(url);
        cmd
    }
}

fn url_opener(url: &str) -> Result<Command, LaunchError> {
    UrlHandler::current().map(|handler| handler.command(url)).ok_or_else(|| {
        LaunchError::Os("opening URLs is not supported on this platform".to_string())
    })
}


#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PlatformCall {
        Launch(String),
        SpawnPath(String),
        OpenUrl(String),
        Terminate(String),
    }

    /// Records every side effect instead of performing it.
    #[derive(Default)]
    pub struct RecordingPlatform {
        calls: Mutex<Vec<PlatformCall>>,
        launch_error: Option<LaunchError>,
        path_error: Option<LaunchError>,
        url_error: Option<LaunchError>,
    }

    impl RecordingPlatform {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_launch(mut self, err: LaunchError) -> Self {
            self.launch_error = Some(err);
            self
        }

        pub fn failing_paths(mut self, err: LaunchError) -> Self {
            self.path_error = Some(err);
            self
        }

        pub fn failing_urls(mut self, err: LaunchError) -> Self {
            self.url_error = Some(err);
            self
        }

        pub fn calls(&self) -> Vec<PlatformCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: PlatformCall, err: &Option<LaunchError>) -> Result<(), LaunchError> {
            self.calls.lock().unwrap().push(call);
            match err {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    impl Platform for RecordingPlatform {
        fn launch(&self, command_line: &str) -> Result<(), LaunchError> {
            self.record(PlatformCall::Launch(command_line.to_string()), &self.launch_error)
        }

        fn spawn_path(&self, path: &str) -> Result<(), LaunchError> {
            self.record(PlatformCall::SpawnPath(path.to_string()), &self.path_error)
        }

        fn open_url(&self, url: &str) -> Result<(), LaunchError> {
            self.record(PlatformCall::OpenUrl(url.to_string()), &self.url_error)
        }

        fn terminate(&self, farewell: &str) {
            self.calls
                .lock()
                .unwrap()
                .push(PlatformCall::Terminate(farewell.to_string()));
        }
    }
}

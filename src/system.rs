use std::env;
use std::path::Path;

/// Represents different shell types with their specific command arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellType {
    Cmd,        // Windows Command Prompt
    PowerShell, // Windows PowerShell or PowerShell Core
    UnixLike,   // Bash, Zsh, Sh, etc.
    Fish,       // Fish shell
}

impl ShellType {
    /// Flag that makes the shell run a single command string.
    pub fn command_flag(&self) -> &'static str {
        match self {
            ShellType::Cmd => "/C",
            ShellType::PowerShell => "-Command",
            ShellType::UnixLike | ShellType::Fish => "-c",
        }
    }
}

/// Holds information about the current system environment
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os_info: String,
    pub shell_path: String,
    pub shell_type: ShellType,
}

impl SystemInfo {
    /// Detects the current system environment and returns a `SystemInfo` struct.
    pub fn new() -> Self {
        let os_info_val = os_info::get();
        let os_info = format!(
            "{} {} {}",
            os_info_val.os_type(),
            os_info_val.version(),
            os_info_val.bitness()
        );

        let (shell_path, shell_type) = detect_shell();

        SystemInfo {
            os_info,
            shell_path,
            shell_type,
        }
    }
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self::new()
    }
}

fn detect_shell() -> (String, ShellType) {
    if cfg!(target_os = "windows") {
        // Registered launch commands are written for cmd, so prefer it over PowerShell
        if let Ok(comspec) = env::var("COMSPEC") {
            return (comspec, ShellType::Cmd);
        }
        if env::var("PSModulePath").is_ok() {
            if let Ok(posh_path) = env::var("POSH_EXECUTABLE") {
                if Path::new(&posh_path).exists() {
                    return (posh_path, ShellType::PowerShell);
                }
            }
            return ("powershell.exe".to_string(), ShellType::PowerShell);
        }
        ("cmd.exe".to_string(), ShellType::Cmd)
    } else {
        let shell_path = env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());

        let shell_name = Path::new(&shell_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("sh")
            .to_lowercase();

        if shell_name == "fish" {
            (shell_path, ShellType::Fish)
        } else {
            (shell_path, ShellType::UnixLike)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_flags_match_shell() {
        assert_eq!(ShellType::Cmd.command_flag(), "/C");
        assert_eq!(ShellType::PowerShell.command_flag(), "-Command");
        assert_eq!(ShellType::UnixLike.command_flag(), "-c");
        assert_eq!(ShellType::Fish.command_flag(), "-c");
    }
}

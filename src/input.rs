use crate::commands::dispatcher::CommandDispatcher;
use crate::commands::matcher::COMMAND_PREFIX;
use crate::core::error::AssistantError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

pub type AssistantEditor = Editor<AssistantHelper, FileHistory>;

/// Slash verbs matching the word under the cursor, with the offset to replace from.
pub fn complete_slash(line: &str, pos: usize, names: &[String]) -> Option<(usize, Vec<String>)> {
    let typed = line.get(..pos)?.strip_prefix(COMMAND_PREFIX)?;
    if typed.contains(char::is_whitespace) {
        return None;
    }
    let typed = typed.to_lowercase();
    let matches: Vec<String> = names
        .iter()
        .filter(|name| name.starts_with(&typed))
        .cloned()
        .collect();
    (!matches.is_empty()).then_some((COMMAND_PREFIX.len_utf8(), matches))
}

/// Line-editor helper: slash-verb completion plus history hints.
pub struct AssistantHelper {
    command_names: Vec<String>,
    history_hinter: HistoryHinter,
}

impl AssistantHelper {
    pub fn new(dispatcher: &CommandDispatcher) -> Self {
        Self {
            command_names: dispatcher.get_command_names(),
            history_hinter: HistoryHinter {},
        }
    }
}

impl Helper for AssistantHelper {}

impl Completer for AssistantHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let Some((start, names)) = complete_slash(line, pos, &self.command_names) else {
            return Ok((pos, Vec::new()));
        };
        let pairs = names
            .into_iter()
            .map(|name| Pair {
                display: format!("{}{}", COMMAND_PREFIX, name),
                replacement: name,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for AssistantHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.history_hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for AssistantHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }
}

impl Validator for AssistantHelper {}

pub fn create_editor(
    dispatcher: &CommandDispatcher,
    history_path: &Path,
) -> Result<AssistantEditor, AssistantError> {
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(false)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| AssistantError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(AssistantHelper::new(dispatcher)));

    if let Err(e) = editor.load_history(history_path) {
        debug!(path = %history_path.display(), error = %e, "no input history loaded");
    }

    Ok(editor)
}

/// `None` on Ctrl-C or Ctrl-D.
pub fn read_input(editor: &mut AssistantEditor) -> Result<Option<String>, AssistantError> {
    let prompt = if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        "> ".to_string()
    } else {
        style("> ").bold().cyan().to_string()
    };

    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor.add_history_entry(line.as_str())?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub fn save_history(editor: &mut AssistantEditor, history_path: &Path) -> Result<(), AssistantError> {
    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    editor
        .save_history(history_path)
        .map_err(|e| AssistantError::Input(format!("Failed to save history: {}", e)))
}

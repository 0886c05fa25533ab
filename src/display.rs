use crate::commands::CommandResult;
use crate::history::Conversation;
use console::{measure_text_width, style};
use std::io::{self, Write};

fn terminal_width() -> usize {
    console::Term::stdout().size().1 as usize
}

/// Wrap `text` so no line is wider than `max_width` terminal columns.
/// Breaks at the last space that fits, or mid-word when there is none.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();

    for line in text.lines() {
        let mut remaining = line;
        loop {
            if measure_text_width(remaining) <= max_width {
                lines.push(remaining.to_string());
                break;
            }

            let mut fit_end = 0;
            let mut last_space = None;
            let mut width = 0;
            for (pos, ch) in remaining.char_indices() {
                let ch_width = measure_text_width(ch.encode_utf8(&mut [0; 4]));
                if width + ch_width > max_width {
                    break;
                }
                width += ch_width;
                fit_end = pos + ch.len_utf8();
                if ch == ' ' {
                    last_space = Some(pos);
                }
            }

            let (head, rest) = match last_space {
                Some(space) if space > 0 => (&remaining[..space], &remaining[space + 1..]),
                // A single character wider than the box still has to go somewhere.
                _ if fit_end == 0 => {
                    let first = remaining.chars().next().map_or(0, char::len_utf8);
                    (&remaining[..first], &remaining[first..])
                }
                _ => (&remaining[..fit_end], &remaining[fit_end..]),
            };
            lines.push(head.to_string());
            remaining = rest.trim_start();
            if remaining.is_empty() {
                break;
            }
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

pub fn display_welcome(message: &str) {
    println!("{}", style(message).bold().cyan());
}

/// Outcome of a local command: green when it ran, yellow when it did not.
pub fn display_command_result(result: &CommandResult) {
    let Some(response) = result.response.as_deref() else {
        return;
    };
    if result.executed {
        println!("{} {}", style("✓").bold().green(), style(response).green());
    } else {
        println!("{} {}", style("!").bold().yellow(), style(response).yellow());
    }
}

/// Static help, boxed.
pub fn display_response(response: &str) {
    let max_width = terminal_width().saturating_sub(4).clamp(60, 120);
    let wrapped = wrap_text(response, max_width.saturating_sub(4));

    let content_width = wrapped
        .iter()
        .map(|line| measure_text_width(line))
        .max()
        .unwrap_or(0);
    let box_width = (content_width + 4).min(max_width);

    println!("{}", style(format!("┌{}┐", "─".repeat(box_width - 2))).dim().blue());
    for line in wrapped {
        let padding = box_width.saturating_sub(measure_text_width(&line) + 3);
        println!("│ {}{}│", line, " ".repeat(padding));
    }
    println!("{}", style(format!("└{}┘", "─".repeat(box_width - 2))).dim().blue());
}

/// Model replies that use markdown are rendered through termimad.
pub fn looks_like_markdown(text: &str) -> bool {
    text.contains("```") || text.contains('`') || text.contains("**") || text.contains("\n#")
        || text.starts_with('#')
}

pub fn display_markdown(text: &str) {
    let skin = termimad::MadSkin::default();
    skin.print_text(text);
}

pub fn display_model_reply(text: &str) {
    if looks_like_markdown(text) {
        display_markdown(text);
    } else {
        println!("{}", text);
    }
}

pub fn print_stream_chunk(chunk: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", chunk)?;
    stdout.flush()
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("✗").bold().red(), style(message).red());
}

pub fn display_conversations(conversations: &[&Conversation]) {
    if conversations.is_empty() {
        println!("{}", style("No stored conversations.").dim());
        return;
    }
    for conversation in conversations {
        println!(
            "{}  {}  {} {}",
            style(&conversation.id).bold().cyan(),
            style(conversation.created.format("%d.%m.%Y")).dim(),
            conversation.title,
            style(format!("({})", conversation.messages.len())).dim()
        );
    }
}

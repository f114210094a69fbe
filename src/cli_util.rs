use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Color;

use crate::BrainfuckError;

/// Show a short window around the position for context.
const WINDOW_CHARS: usize = 32;

/// Pretty-print an engine error with caret positioning.
/// If `program` is `Some("bf")`, messages are prefixed with "bf: ...".
pub fn print_engine_error(program: Option<&str>, code: &str, err: &BrainfuckError) {
    let msg = format!("{}: {err}", err.kind());
    let msg = match program {
        Some(p) => format!("{p}: {msg}"),
        None => msg,
    };

    let mut report = String::new();
    report.push_str(&paint_error(&msg));
    report.push('\n');
    if let Some(pos) = err.position() {
        report.push_str(&context_window(code, pos));
    }

    let mut stderr = io::stderr().lock();
    let _ = stderr.write_all(report.as_bytes());
    let _ = stderr.flush();
}

/// Print a one-line diagnostic to stderr.
pub fn print_message(program: &str, msg: &str) {
    eprintln!("{}", paint_error(&format!("{program}: {msg}")));
    let _ = io::stderr().flush();
}

fn paint_error(msg: &str) -> String {
    if io::stderr().is_terminal() {
        Color::Red.bold().paint(msg).to_string()
    } else {
        msg.to_string()
    }
}

/// Two lines: the code surrounding `pos` and a caret under it.
/// Works with UTF-8 by slicing on char indices.
pub fn context_window(code: &str, pos: usize) -> String {
    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);
    // Control characters would break the two-line layout; show one placeholder per char.
    let slice: String = code[start_byte..end_byte]
        .chars()
        .map(|c| if c.is_control() { '·' } else { c })
        .collect();

    let caret_offset_chars = pos.saturating_sub(start_char);
    format!("  {}\n  {}^\n", slice, " ".repeat(caret_offset_chars))
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(byte_idx, _)| byte_idx)
}

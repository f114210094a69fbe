//! Interactive limit dialogue.
//!
//! For each limit the user is asked a y/n question; on `y` a number is read,
//! re-asking until the answer is a valid non-negative integer (`[+]?\d+`).
//! Whitespace anywhere in an answer is ignored.

use std::io::{self, BufRead, Write};
use std::num::NonZeroUsize;

use crate::limits::Limits;

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("input closed while waiting for an answer")]
    Closed,
    #[error("failed to read answer: {0}")]
    Io(#[from] io::Error),
}

/// One y/n question followed by a number entry.
pub struct Question {
    pub ask: &'static str,
    pub info: &'static str,
    pub allow_zero: bool,
}

pub const STEP_LIMIT_QUESTION: Question = Question {
    ask: "Want to limit the number of actions? y/n",
    info: "Enter an integer - the number of actions",
    allow_zero: true,
};

pub const MEMORY_SIZE_QUESTION: Question = Question {
    ask: "Want to limit the memory array ? y/n",
    info: "Enter an integer - the number of elements in the memory array. Default size - 30000 bytes",
    allow_zero: false,
};

/// Ask `question`; `Ok(None)` means the user declined to set a limit.
pub fn ask_limit<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &Question,
) -> Result<Option<usize>, PromptError> {
    say(out, question.ask)?;
    let mut answer = read_answer(input)?;
    while answer != "y" && answer != "n" {
        say(out, "Please y or n")?;
        answer = read_answer(input)?;
    }

    if answer == "n" {
        return Ok(None);
    }

    say(out, question.info)?;
    loop {
        let raw = read_answer(input)?;
        match parse_count(&raw) {
            Some(0) if !question.allow_zero => say(out, "Please enter a positive number")?,
            Some(n) => return Ok(Some(n)),
            None => say(out, "Please enter a non-negative number")?,
        }
    }
}

/// Ask for every limit that `current` leaves unset.
pub fn prompt_limits<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    current: Limits,
) -> Result<Limits, PromptError> {
    let mut limits = current;
    if limits.step_limit.is_none() {
        limits.step_limit = ask_limit(input, out, &STEP_LIMIT_QUESTION)?;
    }
    if limits.memory_size.is_none() {
        limits.memory_size = ask_limit(input, out, &MEMORY_SIZE_QUESTION)?.and_then(NonZeroUsize::new);
    }
    Ok(limits)
}

/// Parse `[+]?\d+`. Values that overflow `usize` are rejected.
pub fn parse_count(s: &str) -> Option<usize> {
    let digits = s.strip_prefix('+').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn say<W: Write>(out: &mut W, line: &str) -> io::Result<()> {
    writeln!(out, "{line}")?;
    out.flush()
}

fn read_answer<R: BufRead>(input: &mut R) -> Result<String, PromptError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PromptError::Closed);
    }
    Ok(line.chars().filter(|c| !c.is_whitespace()).collect())
}

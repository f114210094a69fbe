//! A bounded Brainfuck interpreter library.
//!
//! Programs run against a fixed-length memory tape (default 30,000 cells),
//! read `,` from a fixed input string, and write `.` output to any
//! [`std::io::Write`] sink. A run ends with success or one
//! [`BrainfuckError`]:
//!
//! - invalid program (unknown character, unmatched bracket),
//! - memory bounds (cursor left of cell 0 or past the last cell),
//! - action limit exceeded (more instructions than the step limit),
//! - input exhausted (`,` after the input text is consumed).
//!
//! Quick start:
//!
//! ```
//! use bounded_bf::{execute, Limits};
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let mut out = Vec::new();
//! execute(code, "", Limits::default(), &mut out).expect("program should run");
//! assert_eq!(out, b"Hello World!\n");
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod engine;
pub mod limits;
pub mod prompt;

pub use engine::{execute, BrainfuckError, Direction, Engine, ErrorKind, RunSummary, UnmatchedBracketKind};
pub use limits::{Limits, DEFAULT_MEMORY_SIZE};

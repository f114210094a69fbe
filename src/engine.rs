//! The execution engine.
//!
//! An [`Engine`] owns everything a single run needs: the program, a
//! zero-filled tape, the fixed input text, and the three cursors (program,
//! memory, input). Every call to [`Engine::run`] starts from a fresh tape.
//!
//! Behaviors:
//! - Brackets are matched once, before execution; an unmatched `[` or `]`
//!   is reported as an invalid program and nothing runs.
//! - Moving left of cell 0 or right of the last cell is an error.
//! - `,` reads the next character of the input text (truncated to a byte);
//!   reading past its end is an error.
//! - `.` writes the current cell as a raw byte to the output sink.
//! - A configured step limit aborts the run before instruction `limit + 1`.
//! - Any character outside `><+-.,[]` is an error when execution reaches it.

use std::fmt;
use std::io::Write;

use tracing::{debug, trace};

use crate::limits::Limits;

/// Errors that can occur while interpreting Brainfuck code.
#[derive(Debug, thiserror::Error)]
pub enum BrainfuckError {
    /// Encountered a character outside the Brainfuck instruction set `><+-.,[]`.
    #[error("invalid character {ch:?} at instruction {ip}")]
    InvalidCharacter { ch: char, ip: usize },

    /// Loops were not balanced; a matching `[` or `]` was not found.
    #[error("unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBracket { ip: usize, kind: UnmatchedBracketKind },

    /// The memory cursor attempted to leave the tape.
    #[error("{direction} at instruction {ip} (ptr={ptr})")]
    MemoryBounds { ip: usize, ptr: usize, direction: Direction },

    /// The run tried to execute more instructions than the step limit allows.
    #[error("step limit of {limit} reached before the program finished")]
    ActionLimitExceeded { limit: usize },

    /// `,` was reached after the input text was fully consumed.
    #[error("no input left to read at instruction {ip}")]
    InputExhausted { ip: usize },

    /// The tape could not be allocated.
    #[error("cannot allocate a tape of {cells} cells")]
    TapeAllocation { cells: usize },

    /// Writing to the output sink failed.
    #[error("output error at instruction {ip}: {source}")]
    Output {
        ip: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse failure categories, one per kind of terminal condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidProgram,
    MemoryBounds,
    ActionLimitExceeded,
    InputExhausted,
    Allocation,
    Output,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidProgram => "Invalid program",
            ErrorKind::MemoryBounds => "Memory bounds error",
            ErrorKind::ActionLimitExceeded => "Action limit exceeded",
            ErrorKind::InputExhausted => "Input exhausted",
            ErrorKind::Allocation => "Allocation error",
            ErrorKind::Output => "Output error",
        };
        f.write_str(name)
    }
}

impl BrainfuckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BrainfuckError::InvalidCharacter { .. } | BrainfuckError::UnmatchedBracket { .. } => {
                ErrorKind::InvalidProgram
            }
            BrainfuckError::MemoryBounds { .. } => ErrorKind::MemoryBounds,
            BrainfuckError::ActionLimitExceeded { .. } => ErrorKind::ActionLimitExceeded,
            BrainfuckError::InputExhausted { .. } => ErrorKind::InputExhausted,
            BrainfuckError::TapeAllocation { .. } => ErrorKind::Allocation,
            BrainfuckError::Output { .. } => ErrorKind::Output,
        }
    }

    /// Program position the error points at, when there is one.
    pub fn position(&self) -> Option<usize> {
        match self {
            BrainfuckError::InvalidCharacter { ip, .. }
            | BrainfuckError::UnmatchedBracket { ip, .. }
            | BrainfuckError::MemoryBounds { ip, .. }
            | BrainfuckError::InputExhausted { ip }
            | BrainfuckError::Output { ip, .. } => Some(*ip),
            BrainfuckError::ActionLimitExceeded { .. } | BrainfuckError::TapeAllocation { .. } => None,
        }
    }
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

/// Direction of a rejected memory cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("jump on a negative index"),
            Direction::Right => f.write_str("out of bounds of memory array"),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of instructions executed.
    pub steps: usize,
    /// Memory cursor when the program ended.
    pub pointer: usize,
}

/// Matching bracket positions. `targets[i]` is the partner of the bracket at
/// `i`; non-bracket positions map to themselves.
struct JumpTable {
    targets: Vec<usize>,
}

impl JumpTable {
    fn build(code: &[char]) -> Result<Self, BrainfuckError> {
        let mut targets: Vec<usize> = (0..code.len()).collect();
        let mut stack: Vec<usize> = Vec::new();

        for (i, &c) in code.iter().enumerate() {
            if c == '[' {
                stack.push(i);
            } else if c == ']' {
                let Some(open_index) = stack.pop() else {
                    return Err(BrainfuckError::UnmatchedBracket {
                        ip: i,
                        kind: UnmatchedBracketKind::Close,
                    });
                };
                targets[open_index] = i;
                targets[i] = open_index;
            }
        }

        if let Some(unmatched_open) = stack.last().copied() {
            return Err(BrainfuckError::UnmatchedBracket {
                ip: unmatched_open,
                kind: UnmatchedBracketKind::Open,
            });
        }

        Ok(Self { targets })
    }

    fn partner(&self, ip: usize) -> usize {
        self.targets[ip]
    }
}

/// A Brainfuck interpreter over a bounded tape and a fixed input string.
pub struct Engine {
    code: Vec<char>,
    input: Vec<char>,
    memory: Vec<u8>,
    pointer: usize,
    input_pos: usize,
    step_limit: Option<usize>,
}

impl Engine {
    /// Create an engine for `program`, reading `,` from `input`.
    ///
    /// Fails with [`BrainfuckError::TapeAllocation`] when the configured tape
    /// cannot be allocated.
    pub fn new(program: &str, input: &str, limits: Limits) -> Result<Self, BrainfuckError> {
        let cells = limits.memory_len();
        let mut memory: Vec<u8> = Vec::new();
        memory
            .try_reserve_exact(cells)
            .map_err(|_| BrainfuckError::TapeAllocation { cells })?;
        memory.resize(cells, 0);

        Ok(Self {
            code: program.chars().collect(),
            input: input.chars().collect(),
            memory,
            pointer: 0,
            input_pos: 0,
            step_limit: limits.step_limit,
        })
    }

    /// The tape as left by the last run.
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// The memory cursor as left by the last run.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Execute the program, writing `.` output to `out`.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<RunSummary, BrainfuckError> {
        self.interpret(out, false)
    }

    /// Execute the program, but write a step-by-step table of operations to
    /// `out` instead of the program's own output. The tape and cursors
    /// advance exactly as in [`Engine::run`]; `,` still consumes input.
    pub fn run_debug<W: Write>(&mut self, out: &mut W) -> Result<RunSummary, BrainfuckError> {
        self.interpret(out, true)
    }

    fn reset(&mut self) {
        self.memory.fill(0);
        self.pointer = 0;
        self.input_pos = 0;
    }

    fn interpret<W: Write>(&mut self, out: &mut W, trace_table: bool) -> Result<RunSummary, BrainfuckError> {
        self.reset();
        let jumps = JumpTable::build(&self.code)?;
        let code_len = self.code.len();

        debug!(
            instructions = code_len,
            memory = self.memory.len(),
            step_limit = ?self.step_limit,
            "starting run"
        );

        if trace_table {
            emit_line(out, 0, format_args!("STEP | IP  | PTR | CELL | INSTR | ACTION"))?;
            emit_line(out, 0, format_args!("-----+-----+-----+------+-------+------------------------------------------------"))?;
        }

        let mut code_ptr = 0;
        let mut step: usize = 0;

        while code_ptr < code_len {
            if let Some(limit) = self.step_limit {
                if step >= limit {
                    debug!(limit, ip = code_ptr, "step limit reached");
                    return Err(BrainfuckError::ActionLimitExceeded { limit });
                }
            }

            let instr = self.code[code_ptr];
            let (ptr_before, cell_before) = (self.pointer, self.memory[self.pointer]);
            let mut action: Option<String> = if trace_table { Some(String::new()) } else { None };
            let mut next = code_ptr + 1;

            match instr {
                '>' => {
                    if self.pointer + 1 >= self.memory.len() {
                        return Err(BrainfuckError::MemoryBounds {
                            ip: code_ptr,
                            ptr: self.pointer,
                            direction: Direction::Right,
                        });
                    }
                    self.pointer += 1;
                    if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.pointer); }
                }
                '<' => {
                    if self.pointer == 0 {
                        return Err(BrainfuckError::MemoryBounds {
                            ip: code_ptr,
                            ptr: self.pointer,
                            direction: Direction::Left,
                        });
                    }
                    self.pointer -= 1;
                    if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.pointer); }
                }
                '+' => {
                    let after = cell_before.wrapping_add(1);
                    self.memory[self.pointer] = after;
                    if let Some(a) = action.as_mut() { *a = format!("Increment cell[{}] from {} to {}", ptr_before, cell_before, after); }
                }
                '-' => {
                    let after = cell_before.wrapping_sub(1);
                    self.memory[self.pointer] = after;
                    if let Some(a) = action.as_mut() { *a = format!("Decrement cell[{}] from {} to {}", ptr_before, cell_before, after); }
                }
                '.' => {
                    if let Some(a) = action.as_mut() {
                        *a = format!("Output byte {} (suppressed in debug)", cell_before);
                    } else {
                        out.write_all(&[cell_before])
                            .map_err(|source| BrainfuckError::Output { ip: code_ptr, source })?;
                    }
                }
                ',' => {
                    let Some(&ch) = self.input.get(self.input_pos) else {
                        return Err(BrainfuckError::InputExhausted { ip: code_ptr });
                    };
                    // Truncating cast: only the low byte of the code point is kept.
                    self.memory[self.pointer] = ch as u8;
                    self.input_pos += 1;
                    if let Some(a) = action.as_mut() { *a = format!("Read input {:?} -> {}", ch, self.memory[self.pointer]); }
                }
                '[' => {
                    if cell_before == 0 {
                        let j = jumps.partner(code_ptr);
                        trace!(from = code_ptr, to = j + 1, "skip loop");
                        if let Some(a) = action.as_mut() { *a = format!("Cell is 0; jump forward past matching ']' at IP {}", j); }
                        next = j + 1;
                    } else if let Some(a) = action.as_mut() {
                        *a = "Enter loop (cell != 0)".to_string();
                    }
                }
                ']' => {
                    if cell_before != 0 {
                        let j = jumps.partner(code_ptr);
                        trace!(from = code_ptr, to = j, "repeat loop");
                        if let Some(a) = action.as_mut() { *a = format!("Cell != 0; jump back to matching '[' at IP {}", j); }
                        next = j;
                    } else if let Some(a) = action.as_mut() {
                        *a = "Exit loop (cell is 0)".to_string();
                    }
                }
                _ => {
                    return Err(BrainfuckError::InvalidCharacter { ch: instr, ip: code_ptr });
                }
            }

            if let Some(action) = action {
                emit_line(
                    out,
                    code_ptr,
                    format_args!(
                        "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
                        step, code_ptr, ptr_before, cell_before, instr, action
                    ),
                )?;
            }

            step += 1;
            code_ptr = next;
        }

        debug!(steps = step, pointer = self.pointer, "run finished");
        Ok(RunSummary { steps: step, pointer: self.pointer })
    }
}

fn emit_line<W: Write>(out: &mut W, ip: usize, line: fmt::Arguments<'_>) -> Result<(), BrainfuckError> {
    writeln!(out, "{line}").map_err(|source| BrainfuckError::Output { ip, source })
}

/// Run `program` once on a fresh engine.
pub fn execute<W: Write>(
    program: &str,
    input: &str,
    limits: Limits,
    out: &mut W,
) -> Result<RunSummary, BrainfuckError> {
    Engine::new(program, input, limits)?.run(out)
}

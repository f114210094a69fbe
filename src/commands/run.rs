use std::fs;
use std::io::{self, BufRead, Write};
use std::num::NonZeroUsize;

use clap::Args;
use tracing::debug;

use crate::cli_util::{print_engine_error, print_message};
use crate::config::{env_limits, load_file_limits};
use crate::prompt::{prompt_limits, PromptError};
use crate::{BrainfuckError, Engine, Limits};

#[derive(Args, Debug, Default)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Print a step-by-step table of operations instead of the program's output
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Read Brainfuck code from PATH instead of the positional program
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<String>,

    /// Read the input text from PATH instead of the positional input
    #[arg(long = "input-file", value_name = "PATH")]
    pub input_file: Option<String>,

    /// Maximum instructions to execute (fallback BF_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<usize>,

    /// Number of memory cells (fallback BF_MEMORY_SIZE; default 30000)
    #[arg(long = "memory", value_name = "CELLS")]
    pub memory: Option<usize>,

    /// Ask for limits that are not set by flags, environment or config
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,

    /// Program text followed by input text
    #[arg(value_name = "ARGS")]
    pub positional: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

/// Failures outside the engine itself.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Engine(#[from] BrainfuckError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArguments(_) => 2,
            _ => 1,
        }
    }
}

impl From<PromptError> for CliError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::Closed => {
                CliError::InvalidArguments("stdin closed before the limits were entered".to_string())
            }
            PromptError::Io(e) => CliError::Io(e),
        }
    }
}

/// Everything one run needs, resolved from arguments, environment and config.
#[derive(Debug)]
pub struct Invocation {
    pub code: String,
    pub input: String,
    pub limits: Limits,
    pub debug: bool,
}

/// Turn parsed arguments into an [`Invocation`].
///
/// Limits resolve as flags -> `fallback` (env, then config file) -> interactive
/// prompt -> defaults. The prompt reads from `answers` and writes its questions
/// to `questions`.
pub fn resolve<R: BufRead, W: Write>(
    args: RunArgs,
    fallback: Limits,
    answers: &mut R,
    questions: &mut W,
) -> Result<Invocation, CliError> {
    let RunArgs {
        debug,
        file,
        input_file,
        max_steps,
        memory,
        interactive,
        positional,
        ..
    } = args;

    let mut positional = positional.into_iter();

    let code = match file {
        Some(path) => strip_line_ending(read_file(&path)?),
        None => positional
            .next()
            .ok_or_else(|| CliError::InvalidArguments("Program is missing".to_string()))?,
    };

    let input = match input_file {
        Some(path) => read_file(&path)?,
        None => positional
            .next()
            .ok_or_else(|| CliError::InvalidArguments("Input is missing".to_string()))?,
    };

    if positional.next().is_some() {
        return Err(CliError::InvalidArguments(
            "expected exactly a program and an input".to_string(),
        ));
    }

    let memory_size = match memory {
        Some(0) => {
            return Err(CliError::InvalidArguments("memory size must be at least 1".to_string()));
        }
        other => other.and_then(NonZeroUsize::new),
    };

    let mut limits = Limits::new(max_steps, memory_size).or(fallback);

    if interactive {
        limits = prompt_limits(answers, questions, limits)?;
    }

    Ok(Invocation { code, input, limits, debug })
}

/// Drop one trailing `\n` or `\r\n`, as editors leave at the end of a file.
fn strip_line_ending(mut code: String) -> String {
    if code.ends_with('\n') {
        code.pop();
        if code.ends_with('\r') {
            code.pop();
        }
    }
    code
}

fn read_file(path: &str) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_string(),
        source,
    })
}

/// Run `invocation`, writing program output (or the debug table) to `out`.
/// A trailing newline is added when the output is non-empty and does not
/// already end in one.
pub fn execute<W: Write>(invocation: &Invocation, out: &mut W) -> Result<(), CliError> {
    let mut engine = Engine::new(&invocation.code, &invocation.input, invocation.limits)?;
    let mut out = NewlineGuard::new(out);
    let result = if invocation.debug {
        engine.run_debug(&mut out)
    } else {
        engine.run(&mut out)
    };

    out.finish()?;
    let summary = result?;
    debug!(steps = summary.steps, pointer = summary.pointer, "program completed");
    Ok(())
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    // Install SIGINT (ctrl+c) handler to flush and exit immediately
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(130);
    }) {
        print_message(program, &format!("failed to set ctrl+c handler: {e}"));
        return 1;
    }

    let fallback = env_limits().or(load_file_limits());
    let invocation = match resolve(args, fallback, &mut io::stdin().lock(), &mut io::stderr()) {
        Ok(invocation) => invocation,
        Err(err) => {
            print_message(program, &err.to_string());
            if matches!(err, CliError::InvalidArguments(_)) {
                eprintln!("Run \"{program} --help\" for usage.");
            }
            return err.exit_code();
        }
    };

    match execute(&invocation, &mut io::stdout()) {
        Ok(()) => 0,
        Err(CliError::Engine(err)) => {
            print_engine_error(Some(program), &invocation.code, &err);
            1
        }
        Err(err) => {
            print_message(program, &err.to_string());
            err.exit_code()
        }
    }
}

/// Passes bytes through and remembers the last one written.
struct NewlineGuard<W: Write> {
    inner: W,
    last: Option<u8>,
}

impl<W: Write> NewlineGuard<W> {
    fn new(inner: W) -> Self {
        Self { inner, last: None }
    }

    fn finish(mut self) -> io::Result<()> {
        if self.last.is_some_and(|b| b != b'\n') {
            self.inner.write_all(b"\n")?;
        }
        self.inner.flush()
    }
}

impl<W: Write> Write for NewlineGuard<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if n > 0 {
            self.last = Some(buf[n - 1]);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] "<program>" "<input>"
  {0} [OPTIONS] --file <PATH> "<input>"

Options:
  --file,  -f <PATH>     Read Brainfuck code from PATH instead of positional "<program>"
  --input-file <PATH>    Read the input text from PATH instead of positional "<input>"
  --max-steps <N>        Abort after N instructions (fallback BF_MAX_STEPS; default unlimited)
  --memory <CELLS>       Memory tape length (fallback BF_MEMORY_SIZE; default 30000)
  --interactive, -i      Ask for any limit not set by flags, environment or config
  --debug, -d            Print a step-by-step table of operations instead of the output
  --help,  -h            Show this help

Notes:
- Both a program and an input are required; pass "" for empty input.
- Input (`,`) consumes the input text one character at a time; reading past its end is an error.
- Any characters outside of Brainfuck's ><+-.,[] will result in an error.
- Moving the pointer outside the memory tape is an error.
- Limits may also be set in $XDG_CONFIG_HOME/bf.toml (or the file named by BF_CONFIG):
    [limits]
    max_steps = 100000
    memory_size = 30000
- Flags may come before or after the program and input.
- Use -- before a program that starts with '-', e.g. {0} -- "-." ""

Examples:
- Echo two characters:
    {0} ",.,." "hi"
- Load Brainfuck code from a file with a step limit:
    {0} --max-steps 10000 --file ./program.bf ""
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

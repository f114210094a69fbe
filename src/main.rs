use std::env;
use std::io;

use bounded_bf::commands::run::{self, RunArgs};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bf", disable_help_flag = true)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("BF_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bf"));

    init_logging();
    let cli = Cli::parse();

    std::process::exit(run::run(&program, cli.run));
}

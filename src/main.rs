use anyhow::Result;

use arena_leaderboard::cli::Command;
use arena_leaderboard::{
    handle_build, handle_completions, handle_manifest, handle_serve, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Build(args) => handle_build(args),
        Command::Manifest(args) => handle_manifest(args),
        Command::Serve { port } => handle_serve(*port),
        Command::Completions { shell } => handle_completions(*shell),
    }
}

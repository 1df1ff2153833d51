//! Dachs compiler CLI entry point.

mod cli;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Mode};
use dachs::diagnostics::print_error;
use dachs::pipeline::{stage_lex, stage_resolve, write_ast, write_tokens};
use dachs::{Error, Logger, Source};

/// Exit status of a failed compilation.
const EXIT_FAILURE: u8 = 4;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let tags = cli.log_tags();
    if !tags.is_empty() {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }
    let logger = Logger::new(tags);

    let src = match &cli.file {
        Some(path) => Source::from_file(path),
        None => Source::from_stdin(),
    };
    let src = match src {
        Ok(src) => src,
        Err(e) => {
            eprintln!("Error reading source: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match run(cli.mode(), src, logger, io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Failure::Compile(err)) => {
            print_error(&err);
            ExitCode::from(EXIT_FAILURE)
        }
        Err(Failure::Output(e)) => {
            eprintln!("Error writing output: {e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

#[derive(Debug)]
enum Failure {
    Compile(Error),
    Output(io::Error),
}

fn run(mode: Mode, src: Arc<Source>, logger: Logger, out: impl io::Write) -> Result<(), Failure> {
    let written = match mode {
        Mode::Tokens => write_tokens(out, &stage_lex(src, logger).map_err(Failure::Compile)?),
        Mode::Ast => write_ast(out, &stage_resolve(src, logger).map_err(Failure::Compile)?),
        Mode::Check => {
            stage_resolve(src, logger).map_err(Failure::Compile)?;
            Ok(())
        }
    };
    written.map_err(Failure::Output)
}

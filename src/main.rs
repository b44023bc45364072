/*!
 * Command-line interface for gitmarkdown
 */

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gitmarkdown::config::{Args, Config};
use gitmarkdown::writer::MarkdownWriter;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "gitmarkdown", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    // Create configuration
    let config = Config::from_args(args);
    init_tracing(config.verbose);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> gitmarkdown::Result<()> {
    config.validate()?;

    let document = gitmarkdown::generate(config)?;
    MarkdownWriter::new(config.clone()).write(&document)
}

/// Log to stderr; stdout carries the document.
/// RUST_LOG directives apply on top of the INFO/DEBUG default.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_file(verbose)
                .with_line_number(verbose),
        )
        .with(filter)
        .try_init();
}

use std::process;

use clap::Parser;
use colored::Colorize;
use knucleotide::{cli::Args, config::RunConfig, reader::Input, run};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    init_tracing(&args);

    let input = Input::from_option(args.input.as_deref());
    let config = RunConfig::from_args(&args);

    if let Err(e) = run::run(&input, &config) {
        eprintln!(
            "{}\n {}",
            "Application error:".blue().bold(),
            e.to_string().blue()
        );
        process::exit(1);
    }
}

/// Logs go to stderr so stdout carries only the report. `RUST_LOG` wins over
/// the command-line verbosity.
fn init_tracing(args: &Args) {
    let default = if args.quiet {
        "off"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//! vue-setup-rs: converts Vue Options-API and class components to Composition-API form.

mod cli;
mod config;
mod orchestrator;
mod output;

use clap::Parser;
use cli::Args;
use miette::Result;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let summary = orchestrator::run(&args)?;
    if summary.failed() {
        std::process::exit(1);
    }
    Ok(())
}

/// `RUST_LOG` directives take precedence over `-v` / `-q`.
fn init_logging(args: &Args) {
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}

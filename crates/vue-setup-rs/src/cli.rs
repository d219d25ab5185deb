//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Converts Vue Options-API and class components to Composition-API `setup()` form.
#[derive(Debug, Parser)]
#[command(name = "vue-setup-rs")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files or directories to convert (defaults to the workspace)
    pub paths: Vec<Utf8PathBuf>,

    /// Working directory; relative paths and ignore globs resolve against it
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Overwrite each file with its converted form
    #[arg(long, conflicts_with = "out_dir")]
    pub write: bool,

    /// Write converted files under this directory, mirroring the workspace layout
    #[arg(long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Path to a configuration file
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Re-parse converted scripts and fail files that no longer parse
    #[arg(long)]
    pub validate: bool,

    /// Exit with error on warnings
    #[arg(long = "fail-on-warnings")]
    pub fail_on_warnings: bool,

    /// Print debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
}

/// Where converted code goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Print to stdout.
    Stdout,
    /// Replace the input file.
    InPlace,
    /// Mirror into a directory.
    Directory(Utf8PathBuf),
}

impl Args {
    /// Returns where converted code should be written.
    pub fn destination(&self) -> Destination {
        if self.write {
            Destination::InPlace
        } else if let Some(dir) = &self.out_dir {
            Destination::Directory(dir.clone())
        } else {
            Destination::Stdout
        }
    }

    /// Returns the log level selected by `-v` / `-q`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Error
        } else if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}

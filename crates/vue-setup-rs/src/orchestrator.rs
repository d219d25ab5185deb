//! Main orchestration logic.

use crate::cli::{Args, Destination, OutputFormat};
use crate::config::{ConfigError, ToolConfig};
use crate::output::{Diagnostic, FileReport, Formatter, RunSummary};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use thiserror::Error;
use vue_setup_transformer::{
    transform_script, transform_sfc, ScriptLang, TransformError, TransformOptions,
    TransformWarning,
};
use walkdir::WalkDir;

/// Patterns never walked into.
const DEFAULT_IGNORES: &[&str] = &["**/node_modules/**", "**/dist/**"];

/// Orchestration errors.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum OrchestratorError {
    /// The workspace cannot be resolved to a UTF-8 path.
    #[error("cannot resolve workspace: {0}")]
    #[diagnostic(code(vue_setup_rs::workspace))]
    Workspace(String),

    /// A path given on the command line does not exist.
    #[error("path not found: {0}")]
    #[diagnostic(code(vue_setup_rs::missing_path))]
    MissingPath(Utf8PathBuf),

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    #[diagnostic(code(vue_setup_rs::invalid_glob))]
    InvalidGlob(String),

    /// The configuration file named with `--config` is unusable.
    #[error("{0}")]
    #[diagnostic(
        code(vue_setup_rs::config),
        help("keys are camelCase: corePackage, storePackage, storePath, dropDecoratorImports, validate, ignore, extensions")
    )]
    Config(#[from] ConfigError),

    /// Failed to read file.
    #[error("failed to read {path}: {message}")]
    #[diagnostic(code(vue_setup_rs::read))]
    ReadFailed { path: Utf8PathBuf, message: String },

    /// Failed to write a converted file.
    #[error("failed to write {path}: {message}")]
    #[diagnostic(code(vue_setup_rs::write))]
    WriteFailed { path: Utf8PathBuf, message: String },
}

/// A converted file.
struct Converted {
    code: String,
    warnings: Vec<TransformWarning>,
}

/// A file selected for conversion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct InputFile {
    path: Utf8PathBuf,
    /// Location under `--out-dir`: relative to the workspace, or to the root
    /// it was found under when that lies outside the workspace.
    relative: Utf8PathBuf,
}

/// One processed file.
struct FileOutcome {
    path: Utf8PathBuf,
    relative: Utf8PathBuf,
    source: String,
    result: Result<Converted, TransformError>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: &'a [FileReport],
    summary: &'a RunSummary,
}

/// Converts every selected file and reports the results.
pub fn run(args: &Args) -> Result<RunSummary, OrchestratorError> {
    let workspace = resolve_workspace(&args.workspace)?;

    let config = match &args.config {
        Some(path) => ToolConfig::load_from(&workspace.join(path))?,
        None => ToolConfig::load(&workspace),
    };

    let ignore_set = build_ignore_set(args.ignore.iter().chain(&config.ignore))?;
    // Earlier output must not be picked up as input.
    let out_dir = match args.destination() {
        Destination::Directory(dir) => Some(workspace.join(dir)),
        _ => None,
    };
    let files = collect_files(
        &workspace,
        &args.paths,
        &config.file_extensions(),
        &ignore_set,
        out_dir.as_deref(),
    )?;
    log::info!("converting {} files under {}", files.len(), workspace);

    let options = config.transform_options(args.validate);
    let outcomes = files
        .par_iter()
        .map(|file| convert_file(file, &options))
        .collect::<Result<Vec<_>, _>>()?;

    report(args, &workspace, &outcomes)
}

fn resolve_workspace(workspace: &Utf8Path) -> Result<Utf8PathBuf, OrchestratorError> {
    if workspace.is_absolute() {
        return Ok(workspace.to_owned());
    }
    let cwd = std::env::current_dir().map_err(|e| OrchestratorError::Workspace(e.to_string()))?;
    let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| OrchestratorError::Workspace(e.to_string()))?;
    Ok(cwd.join(workspace))
}

fn build_ignore_set<'a>(
    patterns: impl Iterator<Item = &'a String>,
) -> Result<GlobSet, OrchestratorError> {
    let mut ignore_builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;
        ignore_builder.add(glob);
    }

    for pattern in DEFAULT_IGNORES {
        if let Ok(glob) = Glob::new(pattern) {
            ignore_builder.add(glob);
        }
    }

    ignore_builder
        .build()
        .map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))
}

/// Expands the command-line paths into a sorted file list. Files named
/// explicitly are always included; directories are walked for matching
/// extensions, skipping ignored paths and `exclude`.
fn collect_files(
    workspace: &Utf8Path,
    paths: &[Utf8PathBuf],
    extensions: &[&str],
    ignore_set: &GlobSet,
    exclude: Option<&Utf8Path>,
) -> Result<Vec<InputFile>, OrchestratorError> {
    let roots: Vec<Utf8PathBuf> = if paths.is_empty() {
        vec![workspace.to_owned()]
    } else {
        paths.iter().map(|path| workspace.join(path)).collect()
    };

    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            let relative = output_relative(&root, workspace, root.parent().unwrap_or(&root));
            files.push(InputFile {
                path: root,
                relative,
            });
            continue;
        }
        if !root.is_dir() {
            return Err(OrchestratorError::MissingPath(root));
        }

        let exclude = exclude.filter(|dir| !root.starts_with(dir));
        files.extend(
            WalkDir::new(&root)
                .into_iter()
                .filter_entry(|e| exclude.map_or(true, |dir| !e.path().starts_with(dir)))
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
                .filter(|p| {
                    let file_name = p.file_name().unwrap_or("");
                    extensions.iter().any(|ext| file_name.ends_with(ext))
                })
                .filter(|p| {
                    let relative = p.strip_prefix(workspace).unwrap_or(p);
                    !ignore_set.is_match(relative.as_str())
                })
                .map(|path| InputFile {
                    relative: output_relative(&path, workspace, &root),
                    path,
                }),
        );
    }

    files.sort();
    files.dedup_by(|a, b| a.path == b.path);
    Ok(files)
}

fn output_relative(path: &Utf8Path, workspace: &Utf8Path, root: &Utf8Path) -> Utf8PathBuf {
    path.strip_prefix(workspace)
        .or_else(|_| path.strip_prefix(root))
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|_| path.file_name().map(Utf8PathBuf::from).unwrap_or_default())
}

fn convert_file(file: &InputFile, options: &TransformOptions) -> Result<FileOutcome, OrchestratorError> {
    let path = file.path.as_path();
    let source = fs::read_to_string(path).map_err(|e| OrchestratorError::ReadFailed {
        path: path.to_owned(),
        message: e.to_string(),
    })?;

    let result = if path.extension() == Some("vue") {
        transform_sfc(&source, options).map(|result| Converted {
            code: result.code,
            warnings: result.warnings,
        })
    } else {
        let options = TransformOptions {
            lang: lang_for_extension(path.extension()),
            ..options.clone()
        };
        transform_script(&source, &options).map(|result| Converted {
            code: result.code,
            warnings: result.warnings,
        })
    };

    if let Err(error) = &result {
        log::debug!("{} failed: {}", path, error);
    }

    Ok(FileOutcome {
        path: path.to_owned(),
        relative: file.relative.clone(),
        source,
        result,
    })
}

fn lang_for_extension(extension: Option<&str>) -> ScriptLang {
    match extension {
        Some("ts") | Some("mts") | Some("cts") => ScriptLang::TypeScript,
        Some("tsx") => ScriptLang::Tsx,
        Some("jsx") => ScriptLang::Jsx,
        _ => ScriptLang::JavaScript,
    }
}

/// Writes converted code, prints diagnostics and the summary.
fn report(
    args: &Args,
    workspace: &Utf8Path,
    outcomes: &[FileOutcome],
) -> Result<RunSummary, OrchestratorError> {
    let formatter = Formatter::new(args.output);
    let destination = args.destination();
    let print_headers = outcomes.len() > 1;
    let mut summary = RunSummary {
        file_count: outcomes.len(),
        fail_on_warnings: args.fail_on_warnings,
        ..RunSummary::default()
    };
    let mut reports = Vec::new();

    for outcome in outcomes {
        let relative = outcome.path.strip_prefix(workspace).unwrap_or(&outcome.path);

        let (code, diagnostics) = match &outcome.result {
            Ok(converted) => {
                summary.converted_count += 1;
                summary.warning_count += converted.warnings.len();
                let diagnostics: Vec<Diagnostic> =
                    converted.warnings.iter().map(Diagnostic::from).collect();
                (Some(converted.code.as_str()), diagnostics)
            }
            Err(error) => {
                summary.error_count += 1;
                (None, vec![Diagnostic::from(error)])
            }
        };

        let mut printed = None;
        if let Some(code) = code {
            match &destination {
                Destination::Stdout => printed = Some(code),
                Destination::InPlace => write_file(&outcome.path, code)?,
                Destination::Directory(dir) => {
                    write_file(&workspace.join(dir).join(&outcome.relative), code)?;
                }
            }
        }

        match args.output {
            OutputFormat::Human => {
                if !diagnostics.is_empty() {
                    eprint!("{}", formatter.format(&diagnostics, relative, &outcome.source));
                }
                if let Some(code) = printed {
                    if print_headers {
                        println!("==> {} <==", relative);
                    }
                    print!("{}", code);
                }
            }
            OutputFormat::Json => reports.push(FileReport {
                filename: relative.to_string(),
                converted: outcome.result.is_ok(),
                code: printed.map(str::to_string),
                diagnostics: Formatter::format_json_diagnostics(
                    &diagnostics,
                    relative,
                    &outcome.source,
                ),
            }),
        }
    }

    match args.output {
        OutputFormat::Human => {
            if !args.quiet {
                eprintln!("{}", summary.format());
            }
        }
        OutputFormat::Json => {
            let report = JsonReport {
                files: &reports,
                summary: &summary,
            };
            let json = serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }

    Ok(summary)
}

fn write_file(path: &Utf8Path, code: &str) -> Result<(), OrchestratorError> {
    let write_failed = |e: std::io::Error| OrchestratorError::WriteFailed {
        path: path.to_owned(),
        message: e.to_string(),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_failed)?;
    }
    fs::write(path, code).map_err(write_failed)?;
    log::info!("wrote {}", path);
    Ok(())
}

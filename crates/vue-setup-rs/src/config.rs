//! Configuration loading.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs;
use thiserror::Error;
use vue_setup_transformer::TransformOptions;

/// Config file names looked up in the workspace root, in order.
const CONFIG_FILES: &[&str] = &["vue-setup.config.json", ".vue-setuprc.json"];

/// Errors from reading an explicitly named config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Package the reactive primitives are imported from.
    pub core_package: String,

    /// Package `storeToRefs` is imported from.
    pub store_package: String,

    /// Expression Vuex mapping helpers read the store through.
    pub store_path: String,

    /// Remove imports from class-component decorator packages.
    pub drop_decorator_imports: bool,

    /// Re-parse converted scripts.
    pub validate: bool,

    /// Extra glob patterns to ignore.
    pub ignore: Vec<String>,

    /// File extensions picked up when walking directories.
    pub extensions: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        let options = TransformOptions::default();
        Self {
            core_package: options.core_package,
            store_package: options.store_package,
            store_path: options.store_path,
            drop_decorator_imports: options.drop_decorator_imports,
            validate: options.validate_output,
            ignore: Vec::new(),
            extensions: Vec::new(),
        }
    }
}

impl ToolConfig {
    /// Loads configuration from the first config file found in `project_root`.
    ///
    /// A file that fails to parse is reported and replaced by the defaults.
    pub fn load(project_root: &Utf8Path) -> Self {
        for config_file in CONFIG_FILES {
            let config_path = project_root.join(config_file);
            if config_path.exists() {
                return match Self::load_from(&config_path) {
                    Ok(config) => {
                        log::info!("using config {}", config_path);
                        config
                    }
                    Err(e) => {
                        log::warn!("{}; using defaults", e);
                        Self::default()
                    }
                };
            }
        }

        Self::default()
    }

    /// Loads configuration from a specific file.
    pub fn load_from(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Returns the file extensions to process when walking directories.
    pub fn file_extensions(&self) -> Vec<&str> {
        if self.extensions.is_empty() {
            vec![".vue"]
        } else {
            self.extensions.iter().map(|s| s.as_str()).collect()
        }
    }

    /// Builds transform options; `validate` forces output validation on.
    pub fn transform_options(&self, validate: bool) -> TransformOptions {
        TransformOptions {
            core_package: self.core_package.clone(),
            store_package: self.store_package.clone(),
            store_path: self.store_path.clone(),
            drop_decorator_imports: self.drop_decorator_imports,
            validate_output: self.validate || validate,
            ..TransformOptions::default()
        }
    }
}

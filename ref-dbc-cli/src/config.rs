//! Configuration loading and output path derivation

use anyhow::{Context, Result};
use ref_dbc_converter::ConverterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub conversion: ConverterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory for generated files (default: next to each input)
    pub output_dir: Option<PathBuf>,
    /// Extension of generated files
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    "dbc".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            extension: default_extension(),
        }
    }
}

impl OutputConfig {
    /// Default output path for an input file
    ///
    /// The input's extension is replaced, and the file lands in the input's
    /// directory unless `output_dir` is set.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let mut file_name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
        file_name.push(".");
        file_name.push(&self.extension);

        let dir = match &self.output_dir {
            Some(dir) => dir.as_path(),
            None => input.parent().unwrap_or(Path::new("")),
        };
        dir.join(file_name)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

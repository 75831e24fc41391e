//! Analyzer configuration.
//!
//! Handles loading, validating, and merging `config.toml`. The file is sparse:
//! stock defaults are serialized to a TOML table, the user's file is merged on
//! top key-by-key, and the result is deserialized and validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [outline]
//! title = "Table of Contents"   # Heading above the outline; empty for none
//! css_class = "toc"             # Class of the outermost outline list
//! id_prefix = "h-"              # Prefix of generated heading identifiers
//! levels = [1, 2, 3, 4, 5, 6]   # Heading levels shown in the outline
//!
//! [reading]
//! words_per_minute = 200        # Reading speed for the reading-time estimate
//! excerpt_length = 160          # Characters in a generated meta description
//!
//! [processing]
//! max_processes = 4             # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the configuration file looked up in a directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Analyzer configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Outline rendering and heading identifier settings.
    pub outline: OutlineConfig,
    /// Reading-time and excerpt settings.
    pub reading: ReadingConfig,
    /// Parallel batch analysis settings.
    pub processing: ProcessingConfig,
}

impl AnalysisConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.outline.id_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "outline.id_prefix must not be empty".into(),
            ));
        }
        if self.outline.levels.is_empty() {
            return Err(ConfigError::Validation(
                "outline.levels must not be empty".into(),
            ));
        }
        if self.outline.levels.iter().any(|l| !(1..=6).contains(l)) {
            return Err(ConfigError::Validation(
                "outline.levels values must be 1-6".into(),
            ));
        }
        if self.reading.words_per_minute == 0 {
            return Err(ConfigError::Validation(
                "reading.words_per_minute must be non-zero".into(),
            ));
        }
        if self.reading.excerpt_length <= 3 {
            return Err(ConfigError::Validation(
                "reading.excerpt_length must be greater than 3".into(),
            ));
        }
        Ok(())
    }
}

/// Outline rendering and heading identifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutlineConfig {
    /// Text of the title block above the outline. Empty renders no title.
    pub title: String,
    /// Class of the outermost outline list.
    pub css_class: String,
    /// Prefix of generated heading identifiers (`h-` gives `h-1`, `h-2`, ...).
    pub id_prefix: String,
    /// Heading levels included in the rendered outline.
    pub levels: Vec<u8>,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            title: "Table of Contents".to_string(),
            css_class: "toc".to_string(),
            id_prefix: "h-".to_string(),
            levels: vec![1, 2, 3, 4, 5, 6],
        }
    }
}

/// Reading-time and excerpt settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadingConfig {
    /// Average reading speed used for the reading-time estimate.
    pub words_per_minute: usize,
    /// Length in characters of a generated meta description.
    pub excerpt_length: usize,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
            excerpt_length: 160,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel analysis workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AnalysisConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AnalysisConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AnalysisConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load `config.toml` from a directory, falling back to stock defaults when
/// the file does not exist.
pub fn load_config(dir: &Path) -> Result<AnalysisConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        tracing::debug!(dir = %dir.display(), "no config.toml, using stock defaults");
        return resolve_config(None);
    }
    load_config_file(&path)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Prose Lens Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Outline (table of contents)
# ---------------------------------------------------------------------------
[outline]
# Text of the title block rendered above the outline. Empty for no title.
title = "Table of Contents"

# Class of the outermost outline list.
css_class = "toc"

# Prefix of generated heading identifiers: "h-" gives h-1, h-2, ...
id_prefix = "h-"

# Heading levels included in the rendered outline.
levels = [1, 2, 3, 4, 5, 6]

# ---------------------------------------------------------------------------
# Reading
# ---------------------------------------------------------------------------
[reading]
# Average reading speed used for the reading-time estimate.
words_per_minute = 200

# Length in characters of a meta description generated from the post body.
excerpt_length = 160

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel analysis workers for batch runs.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.outline.title, "Table of Contents");
        assert_eq!(config.outline.css_class, "toc");
        assert_eq!(config.outline.id_prefix, "h-");
        assert_eq!(config.outline.levels, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(config.reading.words_per_minute, 200);
        assert_eq!(config.reading.excerpt_length, 160);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn parse_partial_config() {
        let config: AnalysisConfig = toml::from_str("[outline]\nlevels = [2, 3]\n").unwrap();
        assert_eq!(config.outline.levels, vec![2, 3]);
        // Defaults preserved
        assert_eq!(config.outline.id_prefix, "h-");
        assert_eq!(config.reading.words_per_minute, 200);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[reading]\nwords_per_minute = 250\n\n[outline]\ntitle = \"On this page\"\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.reading.words_per_minute, 250);
        assert_eq!(config.outline.title, "On this page");
        assert_eq!(config.reading.excerpt_length, 160);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not toml [[[").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_file_missing_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_file(&tmp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<AnalysisConfig, _> = toml::from_str("[outline]\ncolour = \"red\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let value: toml::Value = toml::from_str("[bogus]\nx = 1\n").unwrap();
        assert!(resolve_config(Some(value)).is_err());
    }

    #[test]
    fn validate_empty_prefix() {
        let mut config = AnalysisConfig::default();
        config.outline.id_prefix.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_levels_range() {
        let mut config = AnalysisConfig::default();
        config.outline.levels = vec![0, 2];
        assert!(config.validate().is_err());
        config.outline.levels = vec![7];
        assert!(config.validate().is_err());
        config.outline.levels.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_reading_values() {
        let mut config = AnalysisConfig::default();
        config.reading.words_per_minute = 0;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.reading.excerpt_length = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let value: toml::Value = toml::from_str("[reading]\nwords_per_minute = 0\n").unwrap();
        assert!(matches!(
            resolve_config(Some(value)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").and_then(|v| v.as_integer()), Some(1));
        assert_eq!(merged.get("b").and_then(|v| v.as_integer()), Some(3));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str("[x.y]\nkeep = 1\nswap = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[x.y]\nswap = 9\n").unwrap();
        let merged = merge_toml(base, overlay);
        let y = merged.get("x").and_then(|x| x.get("y")).unwrap();
        assert_eq!(y.get("keep").and_then(|v| v.as_integer()), Some(1));
        assert_eq!(y.get("swap").and_then(|v| v.as_integer()), Some(9));
    }

    #[test]
    fn effective_threads_auto_and_clamped() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
        let huge = ProcessingConfig {
            max_processes: Some(10_000),
        };
        assert_eq!(effective_threads(&huge), cores);
        let zero = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&zero), 1);
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: AnalysisConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value().unwrap();
        let table = value.as_table().unwrap();
        assert!(table.contains_key("outline"));
        assert!(table.contains_key("reading"));
        // max_processes is None, so the processing table is empty but present
        assert!(table.contains_key("processing"));
    }
}

//! Configuration file handling for the rolecolor CLI
//!
//! Manages configuration stored in `~/.config/rolecolor/config.toml` (or platform equivalent).
//!
//! ## Configuration Layers
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Hard-coded defaults
//! 2. Config file (`~/.config/rolecolor/config.toml`)
//! 3. Command-line arguments
//!
//! ## Example Config File
//!
//! ```toml
//! [scoring]
//! temperature = 1.2
//! min_sentences = 5
//!
//! [model]
//! model_id = "minishlab/potion-base-8M"
//!
//! [output]
//! default_format = "human"
//! color = true
//!
//! [[roles]]
//! id = "Explorer"
//! description = "Investigates unfamiliar problem spaces and prototypes new ideas"
//! ```
//!
//! An empty `roles` list means the built-in four-role taxonomy.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::embed::hashing::DEFAULT_HASHING_DIMS;
use crate::embed::Model2VecEmbedder;
use crate::roles::{RoleConfigError, RoleDefinition, RoleSet};
use crate::scoring::{
    AttentionConfig, ExtractionRules, ScoringConfig, DEFAULT_EVIDENCE_COUNT,
    DEFAULT_MIN_SENTENCES, DEFAULT_TEMPERATURE,
};

// =============================================================================
// Configuration Structures
// =============================================================================

// Config file format version
// Bump this when making breaking changes to the config structure
const CONFIG_VERSION: u32 = 1;
const LEGACY_CONFIG_VERSION: u32 = 0;

/// Root configuration for rolecolor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleColorConfig {
    /// Config file format version for migrations
    #[serde(default = "default_config_version")]
    pub version: u32,

    #[serde(default)]
    pub scoring: ScoringSettings,

    #[serde(default)]
    pub model: ModelSettings,

    #[serde(default)]
    pub output: OutputConfig,

    /// Custom taxonomy; empty means the built-in roles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<RoleDefinition>,
}

fn default_config_version() -> u32 {
    LEGACY_CONFIG_VERSION
}

/// Scoring tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSettings {
    /// Softmax temperature (> 0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_top_fraction")]
    pub top_fraction: f64,

    #[serde(default = "default_middle_fraction")]
    pub middle_fraction: f64,

    #[serde(default = "default_top_weight")]
    pub top_weight: f64,

    #[serde(default = "default_middle_weight")]
    pub middle_weight: f64,

    #[serde(default = "default_bottom_weight")]
    pub bottom_weight: f64,

    /// Minimum qualifying sentences before a document is scored
    #[serde(default = "default_min_sentences")]
    pub min_sentences: usize,

    /// Evidence sentences reported for the dominant role
    #[serde(default = "default_evidence_count")]
    pub evidence_count: usize,
}

/// Embedding model selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// HuggingFace model id or local path for Model2Vec
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Use the offline feature-hashing model instead of Model2Vec
    #[serde(default)]
    pub use_hashing_model: bool,

    #[serde(default = "default_hashing_dims")]
    pub hashing_dims: usize,
}

/// Output format configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format (human, json)
    #[serde(default = "default_format")]
    pub default_format: String,

    /// Use colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Print the per-sentence breakdown by default
    #[serde(default)]
    pub show_sentences: bool,
}

// Default value functions
fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_top_fraction() -> f64 {
    AttentionConfig::default().top_fraction
}

fn default_middle_fraction() -> f64 {
    AttentionConfig::default().middle_fraction
}

fn default_top_weight() -> f64 {
    AttentionConfig::default().top_weight
}

fn default_middle_weight() -> f64 {
    AttentionConfig::default().middle_weight
}

fn default_bottom_weight() -> f64 {
    AttentionConfig::default().bottom_weight
}

fn default_min_sentences() -> usize {
    DEFAULT_MIN_SENTENCES
}

fn default_evidence_count() -> usize {
    DEFAULT_EVIDENCE_COUNT
}

fn default_model_id() -> String {
    Model2VecEmbedder::DEFAULT_MODEL.to_string()
}

fn default_hashing_dims() -> usize {
    DEFAULT_HASHING_DIMS
}

fn default_format() -> String {
    "human".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RoleColorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            scoring: ScoringSettings::default(),
            model: ModelSettings::default(),
            output: OutputConfig::default(),
            roles: Vec::new(),
        }
    }
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_fraction: default_top_fraction(),
            middle_fraction: default_middle_fraction(),
            top_weight: default_top_weight(),
            middle_weight: default_middle_weight(),
            bottom_weight: default_bottom_weight(),
            min_sentences: default_min_sentences(),
            evidence_count: default_evidence_count(),
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            use_hashing_model: false,
            hashing_dims: default_hashing_dims(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            color: true,
            show_sentences: false,
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl RoleColorConfig {
    /// Scoring configuration for `RoleScorer`
    ///
    /// Not validated here; `RoleScorer::new` rejects unusable values.
    pub fn to_scoring_config(&self) -> ScoringConfig {
        let s = &self.scoring;
        ScoringConfig {
            temperature: s.temperature,
            attention: AttentionConfig {
                top_fraction: s.top_fraction,
                middle_fraction: s.middle_fraction,
                top_weight: s.top_weight,
                middle_weight: s.middle_weight,
                bottom_weight: s.bottom_weight,
            },
            min_sentences: s.min_sentences,
            evidence_count: s.evidence_count,
            extraction: ExtractionRules::default(),
        }
    }

    /// Configured taxonomy, or the built-in one when none is configured
    pub fn role_set(&self) -> Result<RoleSet, RoleConfigError> {
        if self.roles.is_empty() {
            Ok(RoleSet::default_taxonomy())
        } else {
            RoleSet::new(self.roles.clone())
        }
    }
}

// =============================================================================
// Configuration Loading and Saving
// =============================================================================

impl RoleColorConfig {
    /// Get the default configuration file path
    ///
    /// Returns platform-specific config directory:
    /// - Linux: `~/.config/rolecolor/config.toml`
    /// - macOS: `~/Library/Application Support/rolecolor/config.toml`
    /// - Windows: `%APPDATA%\rolecolor\config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rolecolor")
            .join("config.toml")
    }

    /// Load configuration from a specific path
    ///
    /// Returns default configuration if the file doesn't exist or can't be parsed.
    /// Performs automatic migration if the config version is outdated.
    pub fn load_from(path: PathBuf) -> Self {
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(mut config) => {
                    tracing::debug!("Loaded config from {:?}", path);

                    let original_version = config.version;
                    config.migrate_if_needed();

                    if config.version != original_version {
                        tracing::info!(
                            "Config migrated from version {} to {}",
                            original_version,
                            config.version
                        );
                        if let Err(e) = config.save_to(path.clone()) {
                            tracing::warn!("Failed to persist migrated config {:?}: {}", path, e);
                        }
                    }
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!("Config file not found at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Migrate config to the latest version if needed
    fn migrate_if_needed(&mut self) {
        match self.version {
            LEGACY_CONFIG_VERSION => {
                // Unversioned files predate the output format check
                if !is_known_format(&self.output.default_format) {
                    tracing::info!(
                        "Migrating config: unknown output format '{}' reset to human",
                        self.output.default_format
                    );
                    self.output.default_format = default_format();
                }
                self.version = CONFIG_VERSION;
            }
            CONFIG_VERSION => {}
            _ => {
                tracing::warn!(
                    "Config version {} is newer than supported version {}. Some settings may be ignored.",
                    self.version,
                    CONFIG_VERSION
                );
            }
        }
    }

    /// Save configuration to a specific path
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to(&self, path: PathBuf) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(&path, content)?;
        tracing::debug!("Saved config to {:?}", path);

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key path uses dot notation: `scoring.temperature`
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["scoring", "temperature"] => Some(self.scoring.temperature.to_string()),
            ["scoring", "top_fraction"] => Some(self.scoring.top_fraction.to_string()),
            ["scoring", "middle_fraction"] => Some(self.scoring.middle_fraction.to_string()),
            ["scoring", "top_weight"] => Some(self.scoring.top_weight.to_string()),
            ["scoring", "middle_weight"] => Some(self.scoring.middle_weight.to_string()),
            ["scoring", "bottom_weight"] => Some(self.scoring.bottom_weight.to_string()),
            ["scoring", "min_sentences"] => Some(self.scoring.min_sentences.to_string()),
            ["scoring", "evidence_count"] => Some(self.scoring.evidence_count.to_string()),
            ["model", "model_id"] => Some(self.model.model_id.clone()),
            ["model", "use_hashing_model"] => Some(self.model.use_hashing_model.to_string()),
            ["model", "hashing_dims"] => Some(self.model.hashing_dims.to_string()),
            ["output", "default_format"] => Some(self.output.default_format.clone()),
            ["output", "color"] => Some(self.output.color.to_string()),
            ["output", "show_sentences"] => Some(self.output.show_sentences.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key path uses dot notation: `scoring.temperature`
    /// Returns an error if the key is invalid or the value can't be parsed.
    /// Roles are only editable in the file itself.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["scoring", "temperature"] => {
                let t: f64 = parse_value(key, value, "positive number")?;
                if !t.is_finite() || t <= 0.0 {
                    return Err(invalid(key, value, "positive number"));
                }
                self.scoring.temperature = t;
            }
            ["scoring", "top_fraction"] => {
                self.scoring.top_fraction = parse_fraction(key, value)?;
            }
            ["scoring", "middle_fraction"] => {
                self.scoring.middle_fraction = parse_fraction(key, value)?;
            }
            ["scoring", "top_weight"] => {
                self.scoring.top_weight = parse_weight(key, value)?;
            }
            ["scoring", "middle_weight"] => {
                self.scoring.middle_weight = parse_weight(key, value)?;
            }
            ["scoring", "bottom_weight"] => {
                self.scoring.bottom_weight = parse_weight(key, value)?;
            }
            ["scoring", "min_sentences"] => {
                let n: usize = parse_value(key, value, "positive integer")?;
                if n == 0 {
                    return Err(invalid(key, value, "positive integer"));
                }
                self.scoring.min_sentences = n;
            }
            ["scoring", "evidence_count"] => {
                self.scoring.evidence_count = parse_value(key, value, "non-negative integer")?;
            }
            ["model", "model_id"] => {
                if value.trim().is_empty() {
                    return Err(invalid(key, value, "non-empty model id"));
                }
                self.model.model_id = value.trim().to_string();
            }
            ["model", "use_hashing_model"] => {
                self.model.use_hashing_model = parse_value(key, value, "true or false")?;
            }
            ["model", "hashing_dims"] => {
                let dims: usize = parse_value(key, value, "positive integer")?;
                if dims == 0 {
                    return Err(invalid(key, value, "positive integer"));
                }
                self.model.hashing_dims = dims;
            }
            ["output", "default_format"] => {
                let format = value.trim().to_lowercase();
                if !is_known_format(&format) {
                    return Err(invalid(key, value, "human or json"));
                }
                self.output.default_format = format;
            }
            ["output", "color"] => {
                self.output.color = parse_value(key, value, "true or false")?;
            }
            ["output", "show_sentences"] => {
                self.output.show_sentences = parse_value(key, value, "true or false")?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        Ok(())
    }

    /// List all configuration keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        const KEYS: &[&str] = &[
            "scoring.temperature",
            "scoring.top_fraction",
            "scoring.middle_fraction",
            "scoring.top_weight",
            "scoring.middle_weight",
            "scoring.bottom_weight",
            "scoring.min_sentences",
            "scoring.evidence_count",
            "model.model_id",
            "model.use_hashing_model",
            "model.hashing_dims",
            "output.default_format",
            "output.color",
            "output.show_sentences",
        ];

        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}

fn is_known_format(format: &str) -> bool {
    ["human", "json"].contains(&format)
}

fn invalid(key: &str, value: &str, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, expected: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value, expected))
}

fn parse_fraction(key: &str, value: &str) -> Result<f64, ConfigError> {
    let f: f64 = parse_value(key, value, "number between 0 and 1")?;
    if !(0.0..=1.0).contains(&f) {
        return Err(invalid(key, value, "number between 0 and 1"));
    }
    Ok(f)
}

fn parse_weight(key: &str, value: &str) -> Result<f64, ConfigError> {
    let w: f64 = parse_value(key, value, "non-negative number")?;
    if !w.is_finite() || w < 0.0 {
        return Err(invalid(key, value, "non-negative number"));
    }
    Ok(w)
}

// =============================================================================
// Errors
// =============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: '{value}' (expected {expected})")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = RoleColorConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.scoring.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.scoring.min_sentences, 5);
        assert!(!config.model.use_hashing_model);
        assert!(config.output.color);
        assert!(config.roles.is_empty());
        assert_eq!(config.to_scoring_config(), ScoringConfig::default());
    }

    #[test]
    fn test_config_path() {
        let path = RoleColorConfig::default_path();
        assert!(path.to_string_lossy().contains("rolecolor"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = RoleColorConfig::default();
        config.scoring.temperature = 2.5;
        config.model.use_hashing_model = true;
        config.output.color = false;

        config.save_to(config_path.clone()).unwrap();

        let loaded = RoleColorConfig::load_from(config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_nonexistent() {
        let config = RoleColorConfig::load_from(PathBuf::from("/nonexistent/config.toml"));
        assert_eq!(config, RoleColorConfig::default());
    }

    #[test]
    fn test_load_unparseable_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "[scoring\ntemperature = ").unwrap();

        let config = RoleColorConfig::load_from(config_path);
        assert_eq!(config, RoleColorConfig::default());
    }

    #[test]
    fn test_get() {
        let config = RoleColorConfig::default();
        assert_eq!(config.get("scoring.temperature"), Some("1.2".to_string()));
        assert_eq!(config.get("scoring.min_sentences"), Some("5".to_string()));
        assert_eq!(config.get("output.color"), Some("true".to_string()));
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set() {
        let mut config = RoleColorConfig::default();

        config.set("scoring.temperature", "3.0").unwrap();
        assert_eq!(config.scoring.temperature, 3.0);

        config.set("scoring.evidence_count", "5").unwrap();
        assert_eq!(config.scoring.evidence_count, 5);

        config.set("model.use_hashing_model", "true").unwrap();
        assert!(config.model.use_hashing_model);

        config.set("output.default_format", "JSON").unwrap();
        assert_eq!(config.output.default_format, "json");
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = RoleColorConfig::default();

        assert!(config.set("scoring.temperature", "0").is_err());
        assert!(config.set("scoring.temperature", "warm").is_err());
        assert!(config.set("scoring.top_fraction", "1.5").is_err());
        assert!(config.set("scoring.bottom_weight", "-1").is_err());
        assert!(config.set("scoring.min_sentences", "0").is_err());
        assert!(config.set("model.hashing_dims", "0").is_err());
        assert!(config.set("output.default_format", "csv").is_err());

        // Failed sets leave the old value in place
        assert_eq!(config.scoring.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_set_unknown_key() {
        let mut config = RoleColorConfig::default();
        let result = config.set("unknown.key", "value");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn test_list() {
        let config = RoleColorConfig::default();
        let items = config.list();
        assert_eq!(items.len(), 14);
        assert!(items.iter().any(|(k, v)| k == "model.model_id" && v == Model2VecEmbedder::DEFAULT_MODEL));
    }

    #[test]
    fn test_toml_serialization() {
        let config = RoleColorConfig::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[scoring]"));
        assert!(toml.contains("[model]"));
        assert!(toml.contains("[output]"));
        assert!(!toml.contains("[[roles]]"));
    }

    #[test]
    fn test_custom_roles_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("roles.toml");
        let content = r#"
version = 1

[[roles]]
id = "Explorer"
description = "Investigates unfamiliar problem spaces and prototypes new ideas"

[[roles]]
id = "Keeper"
description = "Maintains existing systems and keeps them running smoothly"
template = "{Title} who keeps things running."
"#;
        std::fs::write(&config_path, content).unwrap();

        let config = RoleColorConfig::load_from(config_path);
        let roles = config.role_set().unwrap();
        assert_eq!(roles.ids().collect::<Vec<_>>(), vec!["Explorer", "Keeper"]);
        assert!(roles.get("Keeper").unwrap().template.is_some());
    }

    #[test]
    fn test_invalid_custom_roles_reported() {
        let mut config = RoleColorConfig::default();
        config.roles = vec![RoleDefinition::new("Solo", "Only one role")];
        assert_eq!(config.role_set(), Err(RoleConfigError::TooFewRoles(1)));
    }

    #[test]
    fn test_default_roles_when_unconfigured() {
        let config = RoleColorConfig::default();
        assert_eq!(config.role_set().unwrap(), RoleSet::default_taxonomy());
    }

    #[test]
    fn test_unversioned_config_migrates_to_current_version() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("legacy.toml");
        let legacy = r#"
[output]
default_format = "ripgrep"
"#;
        std::fs::write(&config_path, legacy).unwrap();

        let loaded = RoleColorConfig::load_from(config_path.clone());
        assert_eq!(loaded.version, CONFIG_VERSION);
        assert_eq!(loaded.output.default_format, "human");

        // Migration is persisted
        let reloaded = std::fs::read_to_string(config_path).unwrap();
        assert!(reloaded.contains("version = 1"));
    }
}

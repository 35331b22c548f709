//! Configuration management for rhymegraph.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `rhymegraph.toml` file
//! 3. User config `~/.config/rhymegraph/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

mod defaults;

pub use defaults::*;

use crate::analysis::AnalysisPolicy;
use crate::crawl::Pacer;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Crawl pacing and site configuration.
    pub crawl: CrawlConfig,

    /// External lookup data files.
    pub oracles: OracleConfig,

    /// Storage configuration.
    pub storage: StorageConfig,

    /// Clustering and filtering configuration.
    pub analysis: AnalysisConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            oracles: OracleConfig::default(),
            storage: StorageConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./rhymegraph.toml` (project local)
    /// 2. `~/.config/rhymegraph/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        // Try project-local config first
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_file(DEFAULT_CONFIG_FILE);
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("rhymegraph").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Use defaults
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // Crawl overrides
        if let Ok(url) = std::env::var("RHYME_BASE_URL") {
            self.crawl.base_url = url;
        }
        if let Ok(agent) = std::env::var("RHYME_USER_AGENT") {
            self.crawl.user_agent = agent;
        }
        if let Ok(size) = std::env::var("RHYME_BATCH_SIZE") {
            if let Ok(n) = size.parse() {
                self.crawl.batch_size = n;
            }
        }

        // Oracle overrides
        if let Ok(path) = std::env::var("RHYME_CMUDICT_PATH") {
            self.oracles.cmudict_path = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("RHYME_WORDFREQ_PATH") {
            self.oracles.wordfreq_path = Some(PathBuf::from(path));
        }

        // Storage overrides
        if let Ok(dir) = std::env::var("RHYME_DATA_DIR") {
            self.storage.data_dir = dir;
        }

        // Analysis overrides
        if let Ok(zipf) = std::env::var("RHYME_MIN_ZIPF") {
            if let Ok(n) = zipf.parse() {
                self.analysis.min_zipf = n;
            }
        }
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Crawl pacing and site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Base URL of the rhyming-dictionary site.
    pub base_url: String,

    /// User-Agent header sent with every fetch.
    pub user_agent: String,

    /// Letters whose index listings seed the crawl.
    pub alphabet: String,

    /// Politeness jitter bounds between fetches (milliseconds).
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,

    /// A longer pause is injected every this many requests (0 disables it).
    pub long_pause_every: u64,

    /// Duration of the injected long pause (milliseconds).
    pub long_pause_ms: u64,

    /// Unenriched words pulled per enrichment batch.
    pub batch_size: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            alphabet: DEFAULT_ALPHABET.to_string(),
            min_delay_ms: DEFAULT_MIN_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            long_pause_every: DEFAULT_LONG_PAUSE_EVERY,
            long_pause_ms: DEFAULT_LONG_PAUSE_MS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl CrawlConfig {
    /// Build a politeness pacer from the configured delays.
    pub fn pacer(&self) -> Pacer {
        Pacer::new(
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
            self.long_pause_every,
            Duration::from_millis(self.long_pause_ms),
        )
    }
}

/// External lookup data files. Paths left unset fall back to built-in
/// behavior: spelling-estimated syllables and a constant low frequency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// CMU-format pronouncing dictionary file.
    pub cmudict_path: Option<PathBuf>,

    /// `word<TAB>zipf` frequency table file.
    pub wordfreq_path: Option<PathBuf>,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for rhymegraph data (default: ".rhymegraph").
    pub data_dir: String,

    /// Graph database directory name.
    pub db_dir: String,

    /// Export artifact file name.
    pub export_file: String,

    /// Audit log file name.
    pub audit_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            db_dir: DEFAULT_DB_DIR.to_string(),
            export_file: DEFAULT_EXPORT_FILE.to_string(),
            audit_file: DEFAULT_AUDIT_FILE.to_string(),
        }
    }
}

impl StorageConfig {
    /// Get the full path to the graph database.
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.db_dir)
    }

    /// Get the full path to the export artifact.
    pub fn export_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.export_file)
    }

    /// Get the full path to the filter audit log.
    pub fn audit_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.audit_file)
    }
}

/// Clustering and filtering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum member count for a family to surface at all.
    pub min_family_size: usize,

    /// Maximum slant words kept per family.
    pub slant_limit: usize,

    /// Trailing characters considered for the family label suffix.
    pub suffix_len: usize,

    /// Zipf frequency below which a word counts as obscure.
    pub min_zipf: f64,

    /// Minimum surviving member count after frequency filtering.
    pub min_filtered_size: usize,

    /// Syllable buckets the frequency filter applies to (4 = the `4_plus`
    /// bucket).
    pub filter_buckets: Vec<u32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_family_size: DEFAULT_MIN_FAMILY_SIZE,
            slant_limit: DEFAULT_SLANT_LIMIT,
            suffix_len: DEFAULT_SUFFIX_LEN,
            min_zipf: DEFAULT_MIN_ZIPF,
            min_filtered_size: DEFAULT_MIN_FILTERED_SIZE,
            filter_buckets: DEFAULT_FILTER_BUCKETS.to_vec(),
        }
    }
}

impl AnalysisConfig {
    /// Clustering knobs as a policy value for the analysis pass.
    pub fn policy(&self) -> AnalysisPolicy {
        AnalysisPolicy {
            min_family_size: self.min_family_size,
            slant_limit: self.slant_limit,
            suffix_len: self.suffix_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.crawl.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.crawl.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.storage.data_dir, DEFAULT_DATA_DIR);
        assert_eq!(config.analysis.min_family_size, DEFAULT_MIN_FAMILY_SIZE);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[crawl]"));
        assert!(toml_str.contains("[storage]"));
        assert!(toml_str.contains("[analysis]"));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[crawl]
base_url = "http://localhost:8080"
batch_size = 10

[storage]
data_dir = ".custom-rhymes"

[analysis]
min_zipf = 2.5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.crawl.base_url, "http://localhost:8080");
        assert_eq!(config.crawl.batch_size, 10);
        assert_eq!(config.storage.data_dir, ".custom-rhymes");
        assert_eq!(config.analysis.min_zipf, 2.5);
        // Untouched sections keep their defaults
        assert_eq!(config.crawl.alphabet, DEFAULT_ALPHABET);
    }

    #[test]
    fn test_storage_paths() {
        let storage = StorageConfig::default();
        assert_eq!(
            storage.export_path(),
            PathBuf::from(DEFAULT_DATA_DIR).join(DEFAULT_EXPORT_FILE)
        );
    }
}

//! Default values for rhymegraph configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Crawl Defaults
// ============================================================================

/// Rhyming-dictionary site the crawler walks.
pub const DEFAULT_BASE_URL: &str = "http://www.b-rhymes.com";

/// User-Agent header sent with every fetch.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; rhymegraph/0.1)";

/// Seed alphabet for the index crawl.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Lower bound of the politeness jitter between fetches (milliseconds).
pub const DEFAULT_MIN_DELAY_MS: u64 = 100;

/// Upper bound of the politeness jitter between fetches (milliseconds).
pub const DEFAULT_MAX_DELAY_MS: u64 = 300;

/// A longer pause is injected every this many requests.
pub const DEFAULT_LONG_PAUSE_EVERY: u64 = 500;

/// Duration of the injected long pause (milliseconds).
pub const DEFAULT_LONG_PAUSE_MS: u64 = 5_000;

/// Unenriched words pulled per batch by the detail enricher.
pub const DEFAULT_BATCH_SIZE: usize = 100;

// ============================================================================
// Storage Defaults
// ============================================================================

/// Base directory for rhymegraph data (default: ".rhymegraph").
pub const DEFAULT_DATA_DIR: &str = ".rhymegraph";

/// Graph database directory name inside the data dir.
pub const DEFAULT_DB_DIR: &str = "graph.db";

/// Export artifact file name.
pub const DEFAULT_EXPORT_FILE: &str = "rhyme_levels.json";

/// Audit log of words removed by the frequency filter.
pub const DEFAULT_AUDIT_FILE: &str = "filtered_words.log";

/// Config file searched for in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "rhymegraph.toml";

// ============================================================================
// Analysis Defaults
// ============================================================================

/// Families smaller than this never surface in analysis output.
pub const DEFAULT_MIN_FAMILY_SIZE: usize = 2;

/// Slant-word lists are truncated to this many entries.
pub const DEFAULT_SLANT_LIMIT: usize = 20;

/// Trailing characters considered when labeling a family.
pub const DEFAULT_SUFFIX_LEN: usize = 3;

/// Zipf frequency below which a word counts as obscure.
/// 3.0 is roughly one occurrence per million words.
pub const DEFAULT_MIN_ZIPF: f64 = 3.0;

/// Families that shrink below this size after filtering are dropped.
pub const DEFAULT_MIN_FILTERED_SIZE: usize = 2;

/// Zipf score assumed for words missing from the frequency table.
pub const DEFAULT_UNKNOWN_ZIPF: f64 = 1.0;

/// Syllable buckets the frequency filter applies to (baseline: 1-syllable
/// words only; 4 stands for the four-and-up bucket).
pub const DEFAULT_FILTER_BUCKETS: &[u32] = &[1];

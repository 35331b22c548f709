//! Rhymegraph core: builds a phonetic rhyme knowledge base from a
//! rhyming-dictionary website.
//!
//! The pipeline has three phases, each resumable because all state lives
//! in the embedded graph store:
//! 1. **Crawl** the alphabetical word index into a word table.
//! 2. **Enrich** each word once from its detail page, recording scored
//!    rhyme edges.
//! 3. **Analyze** the graph into ranked rhyme families per syllable
//!    bucket, frequency-filter them and export JSON.

pub mod analysis;
pub mod config;
pub mod crawl;
pub mod fetch;
pub mod graph;
pub mod oracle;
pub mod phonetics;
pub mod pipeline;

pub use config::Config;
pub use graph::{GraphDb, GraphError};
pub use pipeline::{Pipeline, PipelineError};

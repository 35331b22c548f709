//! Persisted word/rhyme-edge graph.
//!
//! This module owns the Word and RhymeEdge records:
//! - **Words** are unique, normalized surface forms; a word may exist with
//!   no metadata (discovered but not yet enriched), which is its normal
//!   initial state.
//! - **Edges** are directed, scored relations deduplicated on the
//!   (source, target) pair and immutable once inserted.
//! - **Family summaries** are a derived cache, rebuilt wholesale.
//!
//! # Storage
//!
//! Uses SurrealDB embedded with RocksDB persistence. Every mutation is
//! committed per unit of work, so killing the pipeline at any point is
//! safe: enrichment state lives here, not in process memory.

mod db;
mod error;
pub mod models;

pub use db::{normalize, GraphDb};
pub use error::GraphError;

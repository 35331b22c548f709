//! Word store error types.

use thiserror::Error;

/// Errors from the rhyme graph store.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(String),

    /// Attempted to store an empty surface form.
    #[error("Cannot store an empty word")]
    EmptyWord,

    /// Store not initialized.
    #[error("Rhyme graph not initialized. Run 'rhymegraph init' first.")]
    NotInitialized,
}

impl From<surrealdb::Error> for GraphError {
    fn from(err: surrealdb::Error) -> Self {
        GraphError::Database(err.to_string())
    }
}

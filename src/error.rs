use thiserror::Error;

/// Batch error, one variant per pipeline stage.
///
/// Every variant is fatal for the run it occurs in: there is no retry and no
/// partial completion.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The relational source could not be reached or the query failed.
    #[error("source error: {0}")]
    Source(String),

    /// A transform rejected a record, identified by the record id.
    #[error("processing error for record {id}: {message}")]
    Processing { id: String, message: String },

    /// The output file could not be created or written.
    #[error("sink error: {0}")]
    Sink(String),
}

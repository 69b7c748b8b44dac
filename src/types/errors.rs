use std::io;
use thiserror::Error;

/// Errors produced while persisting decoder parameters to a key/value store.
///
/// Reads never produce an error: a missing key leaves the in-memory default
/// untouched. Only writes (and store save/load round trips) can fail, and
/// they fail loudly with one of these variants. Store errors never reach
/// the decode path.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write '{path}'. \nError: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while reading '{path}'. \nError: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Store is read-only")]
    ReadOnly,
}

pub mod credential;
pub mod kv;
pub mod progress_store;

use thiserror::Error;

/// Storage failures. These never reach the user as a blocking error; the
/// adapters log them and carry on with in-memory state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("could not encode record: {0}")]
    Serialize(#[from] serde_json::Error),
}

//! Error types for map construction.

use thiserror::Error;

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a map.
///
/// Missing keys are not errors; lookups and removals report them as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input handed to the bulk constructor is not strictly ascending by key.
    #[error("keys are not strictly ascending at index {index}")]
    Unsorted { index: usize },
}

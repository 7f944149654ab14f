use std::error::Error as StdError;

/// Crate-wide result type for relay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed relay errors.
///
/// Only `DuplicateBinding` is fatal, and only during startup discovery.
/// A failed send is terminal for that one delivery: logged, dropped,
/// never retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One side of a channel binding is already bound (startup only).
    #[error("channel already bound: {identifier}")]
    DuplicateBinding { identifier: String },

    /// A destination rejected a delivery.
    #[error("send to {destination} failed: {source}")]
    SendFailure {
        destination: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn duplicate_binding(identifier: impl std::fmt::Display) -> Self {
        Self::DuplicateBinding {
            identifier: identifier.to_string(),
        }
    }

    #[must_use]
    pub fn send_failure(
        destination: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::SendFailure {
            destination: destination.into(),
            source: source.into(),
        }
    }
}

//! Shared plumbing for the loadshed crates.
//!
//! - [`LoadshedError`] and [`Result`]: top-level error handling for binaries
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! Library crates keep their own precise error enums; this type is where they meet
//! at the application boundary.
//!
//! ```rust
//! use loadshed_common::LoadshedError;
//!
//! let err = LoadshedError::Config("missing base_url".into());
//! assert_eq!(err.to_string(), "Configuration error: missing base_url");
//! ```
pub mod observability;

/// Error types used at the application boundary.
#[derive(thiserror::Error, Debug)]
pub enum LoadshedError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The loadshedding API could not be queried or returned unusable data.
    #[error("Client error: {0}")]
    Client(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenient alias for results that use [`LoadshedError`].
pub type Result<T> = std::result::Result<T, LoadshedError>;

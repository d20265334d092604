//! Error types for unveil_core

use thiserror::Error;

/// Errors reported by a [`Surface`](crate::Surface) implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The backend cannot provide this capability (e.g. no IntersectionObserver)
    #[error("Capability not supported by this surface: {0}")]
    Unsupported(&'static str),

    /// The element handle does not refer to a live element
    #[error("Unknown element")]
    UnknownElement,

    /// The handle was never issued or has already been released
    #[error("Unknown {0} handle")]
    UnknownHandle(&'static str),
}

/// Errors from the theme provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// The provider has not been mounted (or was unmounted)
    #[error("Theme provider is not mounted")]
    NotMounted,

    /// Unrecognized theme mode name
    #[error("Unknown theme mode: {0}")]
    UnknownMode(String),
}

/// Result type for surface operations
pub type Result<T> = std::result::Result<T, SurfaceError>;

//! Error types for Bakery
//!
//! Uses `thiserror` for library errors. Every variant is fatal to the
//! run that raised it; there is no automatic retry anywhere in the core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Bakery operations
pub type BakeryResult<T> = Result<T, BakeryError>;

/// Main error type for Bakery operations
#[derive(Error, Debug)]
pub enum BakeryError {
    /// A route's response status didn't match its declared expectation
    #[error("got {actual}, expected {expected} for {path}")]
    UnexpectedStatusCode {
        path: String,
        actual: u16,
        expected: u16,
    },

    /// A computed output path resolves outside the build root
    #[error("path '{path}' escapes build root '{root}'")]
    PathEscape { path: PathBuf, root: PathBuf },

    /// Deploy attempted against a build root that does not exist
    #[error("build directory not found: {path} - run build first")]
    DirectoryMissing { path: PathBuf },

    /// Remote destination could not be determined and no override was supplied
    #[error("bucket could not be resolved - pass --bucket or provide a terraform output")]
    BucketUnresolved,

    /// A 301/302 response carried no `location` header
    #[error("redirect response for {path} has no location header")]
    RedirectMissingLocation { path: String },

    /// The request handler failed for a route
    #[error("request handler failed for {path}: {message}")]
    HandlerFailed { path: String, message: String },

    /// The remote storage client failed
    #[error("storage error: {message}")]
    Storage { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

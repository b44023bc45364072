//! Global error handling for gitmarkdown
//!
//! Only unrecoverable conditions are represented here. Ignore-file and glob
//! problems are absorbed where they happen and never become errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for gitmarkdown operations
#[derive(Error, Debug)]
pub enum GitMarkdownError {
    /// Input path does not exist
    #[error("Input path '{0}' not found.")]
    PathNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Listing a directory failed mid-walk
    #[error("error reading directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Reading an entry's metadata failed
    #[error("error reading metadata for {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A converter failed on a single file
    #[error("error converting file {path}: {source}")]
    Conversion {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the output file failed
    #[error("error writing to output file {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Specialized Result type for gitmarkdown operations
pub type Result<T> = std::result::Result<T, GitMarkdownError>;

/// Creates a GitMarkdownError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::GitMarkdownError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

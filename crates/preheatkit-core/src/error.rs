//! Error types for the preheatkit core crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rewriting a G-code file.
#[derive(Error, Debug)]
pub enum PreheatError {
    /// The input path does not name an existing file.
    #[error("Input file does not exist: {0}")]
    InputNotFound(PathBuf),

    /// The input path exists but is not a regular file.
    #[error("Input path is not a file: {0}")]
    NotAFile(PathBuf),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for preheatkit operations.
pub type Result<T> = std::result::Result<T, PreheatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PreheatError::InputNotFound(PathBuf::from("/tmp/missing.gcode"));
        assert_eq!(
            err.to_string(),
            "Input file does not exist: /tmp/missing.gcode"
        );

        let err = PreheatError::NotAFile(PathBuf::from("/tmp"));
        assert_eq!(err.to_string(), "Input path is not a file: /tmp");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: PreheatError = io_err.into();
        assert!(matches!(err, PreheatError::Io(_)));
    }
}

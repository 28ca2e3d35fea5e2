//! Error types for the data preparation pipeline

use std::fmt;

/// Errors that can occur while preparing training data
#[derive(Debug, Clone)]
pub enum PrepError {
    /// Invalid input parameters or configuration
    InvalidInput(String),

    /// Raw PCM container could not be decoded (missing, empty, truncated)
    DecodingError(String),

    /// Filesystem error while reading or writing a unit
    Io(String),

    /// Noise library is missing, empty or unusable
    NoiseLibrary(String),

    /// Processing error during augmentation or extraction
    ProcessingError(String),

    /// Numerical error (non-finite values, degenerate statistics)
    NumericalError(String),
}

impl fmt::Display for PrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrepError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PrepError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            PrepError::Io(msg) => write!(f, "I/O error: {}", msg),
            PrepError::NoiseLibrary(msg) => write!(f, "Noise library error: {}", msg),
            PrepError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            PrepError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for PrepError {}

impl From<std::io::Error> for PrepError {
    fn from(err: std::io::Error) -> Self {
        PrepError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        PrepError::InvalidInput(format!("config: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = PrepError::DecodingError("empty file".to_string());
        assert_eq!(err.to_string(), "Decoding error: empty file");

        let err = PrepError::NoiseLibrary("not found".to_string());
        assert_eq!(err.to_string(), "Noise library error: not found");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PrepError = io.into();
        assert!(matches!(err, PrepError::Io(_)));
    }
}

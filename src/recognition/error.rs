//! Recognition error types

use std::path::PathBuf;
use thiserror::Error;

/// Why a recognition request produced no text
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// The image file could not be read
    #[error("failed to read image {path:?}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not an image the service accepts
    #[error("unsupported image format: {path:?} (expected JPEG, PNG, BMP or WebP)")]
    UnsupportedImage { path: PathBuf },

    /// Access token acquisition failed
    #[error("failed to acquire access token: {0}")]
    Auth(String),

    /// Transport failure while submitting the image
    #[error("recognition request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an in-band error
    #[error("service error {code}: {message}")]
    Service { code: i64, message: String },

    /// The response did not have the shape expected for its category
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The category selector matched no known category
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

impl RecognitionError {
    /// Shorthand for a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        RecognitionError::MalformedResponse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RecognitionError::Service {
            code: 110,
            message: "Access token invalid or no longer valid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "service error 110: Access token invalid or no longer valid"
        );

        let err = RecognitionError::UnknownCategory("42".to_string());
        assert_eq!(err.to_string(), "unknown category: 42");
    }

    #[test]
    fn test_image_read_keeps_source() {
        use std::error::Error as _;

        let err = RecognitionError::ImageRead {
            path: PathBuf::from("missing.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("missing.png"));
    }
}

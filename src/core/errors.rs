//! Error types for the OCR plugin.
//!
//! This module defines the errors that can occur while registering the engine,
//! initializing the recognition backend, and processing pages. Only backend
//! initialization is a hard failure; everything that happens per page or per
//! region is reported through logging and never aborts a conversion.

use thiserror::Error;

/// Errors surfaced by the plugin.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The recognition backend could not be initialized.
    ///
    /// This is the only fatal error an enabled engine can produce, and it is
    /// produced at construction time. An engine that returned this must not
    /// be used.
    #[error("{backend} capability unavailable: {reason}")]
    CapabilityUnavailable {
        /// Name of the backend that failed to initialize.
        backend: String,
        /// Human-readable reason, including the underlying cause if any.
        reason: String,
    },

    /// A registry lookup was made with a kind string no factory was
    /// registered under.
    #[error("unknown OCR engine '{kind}', registered engines: {known:?}")]
    UnknownEngine {
        /// The kind string that missed.
        kind: String,
        /// The kinds that are registered.
        known: Vec<String>,
    },

    /// The options payload handed to a factory did not match the engine's
    /// schema. Unknown fields are rejected.
    #[error("invalid options for OCR engine '{kind}'")]
    InvalidOptions {
        /// The engine kind whose schema was violated.
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// A model artifact download failed.
    #[error("model download failed: {context}")]
    Download {
        /// What was being fetched when the failure occurred.
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error occurred while loading or encoding an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl OcrError {
    /// Creates a `CapabilityUnavailable` error for the given backend.
    pub fn capability_unavailable(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CapabilityUnavailable {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `CapabilityUnavailable` error carrying the cause's message.
    pub fn capability_init(
        backend: impl Into<String>,
        context: &str,
        error: impl std::fmt::Display,
    ) -> Self {
        Self::CapabilityUnavailable {
            backend: backend.into(),
            reason: format!("{context}: {error}"),
        }
    }

    /// Creates an `OcrError` for configuration errors.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an `OcrError` for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an `OcrError` for a failed artifact download.
    pub fn download_error(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Download {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Returns true if this error means the recognition backend is unusable.
    pub fn is_capability_unavailable(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable { .. })
    }
}

impl From<image::ImageError> for OcrError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

/// Convenient result alias for plugin operations.
pub type OcrResult<T> = Result<T, OcrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_unavailable_is_distinguishable() {
        let err = OcrError::capability_unavailable("suryaocr", "models missing");
        assert!(err.is_capability_unavailable());
        assert!(err.to_string().contains("suryaocr"));
        assert!(err.to_string().contains("models missing"));

        let other = OcrError::config_error("bad");
        assert!(!other.is_capability_unavailable());
    }

    #[test]
    fn unknown_engine_names_known_kinds() {
        let err = OcrError::UnknownEngine {
            kind: "tesseract".to_string(),
            known: vec!["suryaocr".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("tesseract"));
        assert!(message.contains("suryaocr"));
    }
}

//! Error types and result utilities for sample decoding and encoding.

use thiserror::Error;

/// Convenience type alias for results that may contain an [`AudioError`].
pub type AudioResult<T> = Result<T, AudioError>;

/// Error types that can occur while reading or writing audio samples.
#[derive(Error, Debug)]
pub enum AudioError {
    /// The container violates its own format.
    ///
    /// Raised for a missing `RIFF`/`WAVE` signature, a data chunk with no
    /// preceding format chunk and similar structural damage. Fatal to
    /// decoder construction.
    #[error("Invalid audio data: {0}")]
    InvalidData(String),

    /// The container is well formed but uses an encoding this codec does not
    /// implement (notably `WAVE_FORMAT_EXTENSIBLE`).
    #[error("Unsupported data format: tag 0x{format_tag:04X} with {bits_per_sample} bits per sample")]
    Unsupported {
        /// Raw `wFormatTag` value from the format chunk.
        format_tag: u16,
        /// Declared bits per sample.
        bits_per_sample: u16,
    },

    /// The declared sample payload has been fully consumed.
    ///
    /// This is the normal completion signal of a decoder, not a failure.
    /// `read` holds the number of samples that were stored into the caller's
    /// slice before the boundary was hit; those samples are valid.
    #[error("End of stream after {read} samples")]
    EndOfStream {
        /// Samples stored before the end of the stream was reached.
        read: usize,
    },

    /// Failure propagated verbatim from the underlying byte source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A [`Config`](crate::Config) that cannot be represented.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The encoder has already been closed.
    #[error("Encoder is closed")]
    Closed,
}

impl AudioError {
    /// Create an invalid-data error.
    pub fn invalid_data(details: impl Into<String>) -> Self {
        Self::InvalidData(details.into())
    }

    /// Create an invalid-configuration error.
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }

    /// Returns true if this error is the end-of-stream signal.
    pub const fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream { .. })
    }

    /// Number of samples successfully read alongside an end-of-stream signal.
    ///
    /// Every other error reports zero: the state of the caller's slice is
    /// unspecified after a real failure.
    pub const fn samples_read(&self) -> usize {
        match self {
            Self::EndOfStream { read } => *read,
            _ => 0,
        }
    }

    /// Check if this is a fatal error that should stop any further use of the
    /// decoder or encoder that produced it.
    pub const fn is_fatal(&self) -> bool {
        !self.is_end_of_stream()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_end_of_stream_carries_count() {
        let err = AudioError::EndOfStream { read: 17 };
        assert!(err.is_end_of_stream());
        assert!(!err.is_fatal());
        assert_eq!(err.samples_read(), 17);
        assert_eq!(err.to_string(), "End of stream after 17 samples");
    }

    #[test]
    fn test_unsupported_display() {
        let err = AudioError::Unsupported {
            format_tag: 0xFFFE,
            bits_per_sample: 24,
        };
        assert_eq!(
            err.to_string(),
            "Unsupported data format: tag 0xFFFE with 24 bits per sample"
        );
        assert!(err.is_fatal());
        assert_eq!(err.samples_read(), 0);
    }

    #[test]
    fn test_from_io_error() {
        let io_error = IoError::new(ErrorKind::UnexpectedEof, "short read");
        let err: AudioError = io_error.into();
        match err {
            AudioError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::UnexpectedEof),
            _ => panic!("Should convert to Io variant"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AudioError>();
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid value: {message}")]
    InvalidValue { message: String },

    #[error(
        "leg pair {pair} references spine segment {segment}, but the spine has {segment_count} segments"
    )]
    InvalidLegSegment {
        pair: usize,
        segment: usize,
        segment_count: usize,
    },

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[cfg(feature = "json")]
    #[error("failed to parse creature JSON: {message}")]
    JsonParse { message: String },
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }
}

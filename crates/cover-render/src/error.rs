use thiserror::Error;

/// Errors from the export encoders.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("canvas has no area ({width}x{height})")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("SVG parsing failed: {0}")]
    Svg(String),

    #[error("failed to allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("{format} encoding failed: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
}

pub type ExportResult<T> = Result<T, ExportError>;

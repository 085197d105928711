use thiserror::Error;

/// Errors surfaced by the drawing surface and its persistence helpers.
///
/// Invalid geometry is never an error: sizes and coordinates are clamped
/// before any raster call. Cancelled dialogs are reported through outcome
/// enums, not through this type.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Overlay drifted from paper ({paper_width}x{paper_height}): {reason}")]
    Drift {
        paper_width: u32,
        paper_height: u32,
        reason: String,
    },
}

/// Result type for surface operations that can fail
pub type SurfaceResult<T> = Result<T, SurfaceError>;

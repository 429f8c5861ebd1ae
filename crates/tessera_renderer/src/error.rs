use thiserror::Error;

/// Errors raised while setting up or exporting a render.
///
/// Nothing in here is retryable: a render either starts with valid
/// parameters and runs to completion, or it never starts.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to spawn worker thread: {0}")]
    Thread(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Image is empty")]
    EmptyImage,
    #[error("Unsupported image format: {0} (expected JPEG or PNG)")]
    UnsupportedFormat(String),
    #[error("Image too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: usize, limit: usize },
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Preprocessing error: {0}")]
    Preprocessing(String),
    #[error("Model file not found at: {}", .0.display())]
    ModelNotFound(PathBuf),
    #[error("Unsupported model file: {0}")]
    UnsupportedModel(String),
    #[error("Model error: {0}")]
    Model(String),
    #[error("Model returned {actual} outputs, expected {expected}")]
    OutputShape { expected: usize, actual: usize },
    #[error("Model lock poisoned")]
    Poisoned,
}

impl InferenceError {
    /// Errors caused by the uploaded image rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            InferenceError::EmptyImage
                | InferenceError::UnsupportedFormat(_)
                | InferenceError::TooLarge { .. }
                | InferenceError::Decode(_)
        )
    }
}

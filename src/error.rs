//! Error types for garment color analysis

use thiserror::Error;

/// Result type alias for color analysis operations
pub type Result<T> = std::result::Result<T, ColorAnalysisError>;

#[derive(Error, Debug)]
pub enum ColorAnalysisError {
    /// The pixel grid has no area, so there is nothing to resample or cluster.
    #[error("Invalid image: {width}x{height} pixel grid has no pixels")]
    InvalidImage { width: u32, height: u32 },

    /// Encoded image bytes could not be decoded
    #[error("Unable to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// An analyzer setting is outside its usable range
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidConfig { parameter: &'static str, value: String },
}

impl ColorAnalysisError {
    pub(crate) fn invalid_config(parameter: &'static str, value: impl ToString) -> Self {
        Self::InvalidConfig {
            parameter,
            value: value.to_string(),
        }
    }
}

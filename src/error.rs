use std::path::PathBuf;

/// Errors raised by the change-detection core.
///
/// Every variant is terminal for the pair being processed. None of them is
/// retryable: the core is a deterministic transform over in-memory images.
#[derive(Debug, thiserror::Error)]
pub enum ChangeError {
    /// Before and after images do not share the same pixel dimensions.
    #[error(
        "image dimensions differ: before is {before_width}x{before_height}, \
         after is {after_width}x{after_height}"
    )]
    DimensionMismatch {
        before_width: u32,
        before_height: u32,
        after_width: u32,
        after_height: u32,
    },

    /// One side of the pair does not exist on disk.
    #[error("image not found: {}", .0.display())]
    MissingImage(PathBuf),

    /// One side of the pair exists but could not be decoded.
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The images are smaller than the similarity window.
    #[error("image {width}x{height} is smaller than the {window}x{window} similarity window")]
    ImageTooSmall { width: u32, height: u32, window: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ChangeError {
    /// True for the family of errors caused by an unusable input pair
    /// (mismatched, missing or undecodable images).
    pub fn is_input_mismatch(&self) -> bool {
        matches!(
            self,
            ChangeError::DimensionMismatch { .. }
                | ChangeError::MissingImage(_)
                | ChangeError::Decode { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ChangeError>;

use thiserror::Error;

/// Errors raised at the I/O and configuration boundary.
///
/// Cut placement itself never fails: an unreachable end row is handled by
/// the fallback planner and reported through [`CutPlan`](crate::CutPlan).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PaginateError {
    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("image has no rows to paginate")]
    EmptyImage,

    #[error("no pages to write")]
    NoPages,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image encode error: {0}")]
    ImageEncode(#[from] image::ImageError),

    #[error("pdf write error: {0}")]
    Pdf(#[from] lopdf::Error),
}

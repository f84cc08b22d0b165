//! Error type shared by shape construction, transforms, and scene loading.

use thiserror::Error;

/// Errors produced while building or transforming a scene.
///
/// Pixel coordinates that fall outside the canvas are not an error; the
/// rasterizer clips them silently.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed construction parameters for a shape.
    #[error("invalid {kind} shape: {reason}")]
    InvalidShape { kind: String, reason: String },

    /// Geometry whose containment test would be undefined, such as a
    /// zero-length polygon edge or a non-invertible circle transform.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A 3x3 matrix that does not describe an affine map.
    #[error("invalid transform: {0}")]
    InvalidTransform(String),

    /// The raster target has no pixels.
    #[error("canvas must be at least 1x1, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },

    /// A scene record could not be turned into a primitive.
    #[error("scene record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// The scene description is not valid JSON or does not match the schema.
    #[cfg(feature = "scene")]
    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_shape(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidShape {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

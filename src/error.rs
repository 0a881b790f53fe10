//! Error types for solshade

use thiserror::Error;

/// Main error type for solshade operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid profile: control point arrays differ in length ({azimuths} azimuths vs {elevations} elevations)")]
    MismatchedControlPoints { azimuths: usize, elevations: usize },

    #[error("invalid profile: at least one control point is required")]
    EmptyControlPoints,

    #[error("misaligned series: {0}")]
    MisalignedSeries(String),

    #[error("unknown profile name: {0}")]
    UnknownProfile(String),

    #[error("unknown surface type: {0}")]
    UnknownSurfaceType(String),

    #[error("tilt range must not be empty")]
    EmptyTiltRange,
}

/// Result type alias for solshade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed geometry input.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("coordinate list must hold (x, y) pairs, got {len} values")]
    OddCoordinateCount { len: usize },
    #[error("degenerate polygon: need at least 3 vertices, got {vertices}")]
    DegeneratePolygon { vertices: usize },
}

/// Percentage requested against an image with no area.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DivisionError {
    #[error("image area must be > 0 (width={width}, height={height})")]
    ZeroImageArea { width: f64, height: f64 },
}

/// Errors produced by the end-to-end coverage helpers.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CoverageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Division(#[from] DivisionError),
}

/// A [`CoverageError`] tagged with the position of the failing annotation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("annotation #{index}: {source}")]
pub struct BatchError {
    pub index: usize,
    #[source]
    pub source: CoverageError,
}

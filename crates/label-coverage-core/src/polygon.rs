//! Normalized polygon denormalization and the validated [`Polygon`] ring.

use serde::{Deserialize, Serialize};

use crate::{polygon_area, ImageExtent, PixelPoint, ValidationError};

/// Convert a flat `x0 y0 x1 y1 ...` list of normalized coordinates into
/// pixel vertices.
///
/// Output vertex `i` is input pair `i`; nothing is reordered or rounded.
/// An odd-length list is rejected before any pairing happens.
pub fn denormalize_polygon(
    coords: &[f64],
    image_width: f64,
    image_height: f64,
) -> Result<Vec<PixelPoint>, ValidationError> {
    if coords.len() % 2 != 0 {
        return Err(ValidationError::OddCoordinateCount { len: coords.len() });
    }

    Ok(coords
        .chunks_exact(2)
        .map(|xy| PixelPoint::new(xy[0] * image_width, xy[1] * image_height))
        .collect())
}

/// Closed ring of at least three pixel-space vertices, in the order given.
///
/// Serialized as the bare vertex list; deserializing re-checks the vertex
/// count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PixelPoint>", into = "Vec<PixelPoint>")]
pub struct Polygon {
    vertices: Vec<PixelPoint>,
}

impl Polygon {
    pub fn new(vertices: Vec<PixelPoint>) -> Result<Self, ValidationError> {
        if vertices.len() < 3 {
            return Err(ValidationError::DegeneratePolygon {
                vertices: vertices.len(),
            });
        }
        Ok(Self { vertices })
    }

    /// Denormalize and validate in one step.
    pub fn from_normalized(coords: &[f64], extent: ImageExtent) -> Result<Self, ValidationError> {
        let (w, h) = extent.as_f64();
        Self::new(denormalize_polygon(coords, w, h)?)
    }

    #[inline]
    pub fn vertices(&self) -> &[PixelPoint] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false` (at least three vertices); kept for symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Shoelace area in square pixels.
    pub fn area(&self) -> f64 {
        // vertex count is checked on every construction path
        polygon_area(&self.vertices).unwrap_or(0.0)
    }

    /// Axis-aligned extents `[min_x, min_y, max_x, max_y]`.
    pub fn bounds(&self) -> [f64; 4] {
        self.vertices.iter().fold(
            [
                f64::INFINITY,
                f64::INFINITY,
                f64::NEG_INFINITY,
                f64::NEG_INFINITY,
            ],
            |[x0, y0, x1, y1], p| [x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)],
        )
    }

    /// Mean of the vertices. Used as a label anchor; this is not the area
    /// centroid and is biased toward densely sampled edges.
    pub fn vertex_centroid(&self) -> PixelPoint {
        let n = self.vertices.len() as f64;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        PixelPoint::new(sx / n, sy / n)
    }

    pub fn into_vertices(self) -> Vec<PixelPoint> {
        self.vertices
    }
}

impl TryFrom<Vec<PixelPoint>> for Polygon {
    type Error = ValidationError;

    fn try_from(vertices: Vec<PixelPoint>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

impl From<Polygon> for Vec<PixelPoint> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

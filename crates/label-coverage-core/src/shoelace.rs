//! Shoelace (surveyor's) area of a closed polygon.

use crate::{PixelPoint, ValidationError};

/// Twice the signed area, pairing each vertex with its cyclic predecessor:
/// `S = sum_i (x_i * y_{i-1} - y_i * x_{i-1})`.
///
/// Predecessor pairing flips the sign relative to the usual successor form.
fn twice_signed_area(vertices: &[PixelPoint]) -> f64 {
    let Some(last) = vertices.last() else {
        return 0.0;
    };

    let mut prev = last;
    let mut sum = 0.0_f64;
    for p in vertices {
        sum += p.x * prev.y - p.y * prev.x;
        prev = p;
    }
    sum
}

/// Area of the closed polygon `vertices` (last vertex joins the first).
///
/// The result is orientation independent: clockwise and counter-clockwise
/// traversals of the same ring give the same value, as does any rotation of
/// the starting vertex.
///
/// The formula assumes a simple polygon. A self-intersecting ring is not
/// detected; its result is the algebraic sum of the signed lobes, which is
/// well defined but usually not the visible area.
///
/// Fails with [`ValidationError::DegeneratePolygon`] for fewer than three
/// vertices.
pub fn polygon_area(vertices: &[PixelPoint]) -> Result<f64, ValidationError> {
    if vertices.len() < 3 {
        return Err(ValidationError::DegeneratePolygon {
            vertices: vertices.len(),
        });
    }
    Ok(0.5 * twice_signed_area(vertices).abs())
}

/// Half the predecessor-paired sum `S`, without the absolute value.
///
/// Negative when the ring runs clockwise on screen (y down), positive when
/// it runs counter-clockwise on screen. `polygon_area` is its magnitude.
/// Returns `0.0` for fewer than three vertices.
pub fn signed_area(vertices: &[PixelPoint]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    0.5 * twice_signed_area(vertices)
}

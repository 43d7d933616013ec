use serde::{Deserialize, Serialize};

use crate::CenterBox;

/// One label line after tokenizing: class id plus its normalized values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub class_id: u32,
    pub values: Vec<f64>,
}

/// How the values of an [`AnnotationRecord`] are to be read.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnnotationShape<'a> {
    /// Exactly four values: `x_center y_center width height`.
    BoundingBox(CenterBox),
    /// Anything else, read as `x y` pairs. Not validated here; the polygon
    /// functions reject odd lengths and short rings.
    Polygon(&'a [f64]),
}

impl AnnotationRecord {
    pub fn new(class_id: u32, values: Vec<f64>) -> Self {
        Self { class_id, values }
    }

    /// A four-value record is a center-format box, never a two-vertex
    /// polygon.
    pub fn shape(&self) -> AnnotationShape<'_> {
        match CenterBox::from_slice(&self.values) {
            Some(b) => AnnotationShape::BoundingBox(b),
            None => AnnotationShape::Polygon(&self.values),
        }
    }
}

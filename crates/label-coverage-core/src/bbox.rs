//! Center-format box denormalization.

use serde::{Deserialize, Serialize};

use crate::ImageExtent;

/// Normalized center-format box (`x_center y_center width height`), the
/// layout detector training pipelines write per label line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CenterBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl CenterBox {
    pub fn new(x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            x_center,
            y_center,
            width,
            height,
        }
    }

    /// Build from exactly four normalized values, in label-file order.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match *values {
            [x_center, y_center, width, height] => {
                Some(Self::new(x_center, y_center, width, height))
            }
            _ => None,
        }
    }

    pub fn denormalize(&self, extent: ImageExtent) -> BoundingBox {
        let (w, h) = extent.as_f64();
        denormalize_bbox(w, h, self.x_center, self.y_center, self.width, self.height)
    }
}

/// Integer pixel corners.
///
/// `xmin <= xmax` and `ymin <= ymax` are expected but not enforced: a
/// non-positive normalized width or height yields an empty or inverted box,
/// which is kept as-is so callers can report it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl BoundingBox {
    /// May be negative for an inverted box.
    #[inline]
    pub fn width(&self) -> i64 {
        self.xmax - self.xmin
    }

    /// May be negative for an inverted box.
    #[inline]
    pub fn height(&self) -> i64 {
        self.ymax - self.ymin
    }

    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    /// Pixel area; `0.0` for empty or inverted boxes.
    pub fn area(&self) -> f64 {
        let w = self.width();
        let h = self.height();
        if w <= 0 || h <= 0 {
            return 0.0;
        }
        w as f64 * h as f64
    }

    #[inline]
    pub fn to_array(&self) -> [i64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

/// Convert a normalized center-format box into pixel corners.
///
/// Edges are converted with a truncating cast (toward zero), not floor or
/// round: an edge computed at `-0.5` px lands on `0`, not `-1`. No clamping
/// to the image is applied.
pub fn denormalize_bbox(
    image_width: f64,
    image_height: f64,
    x_center: f64,
    y_center: f64,
    width: f64,
    height: f64,
) -> BoundingBox {
    let x_center_px = x_center * image_width;
    let y_center_px = y_center * image_height;
    let half_width = width * image_width / 2.0;
    let half_height = height * image_height / 2.0;

    BoundingBox {
        xmin: (x_center_px - half_width) as i64,
        ymin: (y_center_px - half_height) as i64,
        xmax: (x_center_px + half_width) as i64,
        ymax: (y_center_px + half_height) as i64,
    }
}

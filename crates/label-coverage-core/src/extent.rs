use serde::{Deserialize, Serialize};

use crate::DivisionError;

/// Image size in pixels. Both sides are non-zero once constructed through
/// [`ImageExtent::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawExtent")]
pub struct ImageExtent {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct RawExtent {
    width: u32,
    height: u32,
}

impl TryFrom<RawExtent> for ImageExtent {
    type Error = DivisionError;

    fn try_from(raw: RawExtent) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

impl ImageExtent {
    /// 640x480, the usual detector input size.
    pub const VGA: ImageExtent = ImageExtent {
        width: 640,
        height: 480,
    };

    pub fn new(width: u32, height: u32) -> Result<Self, DivisionError> {
        if width == 0 || height == 0 {
            return Err(DivisionError::ZeroImageArea {
                width: width as f64,
                height: height as f64,
            });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total pixel count, computed in `f64` so large frames cannot overflow.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    /// `(width, height)` as floats, the form the geometry functions take.
    #[inline]
    pub fn as_f64(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }
}

impl std::fmt::Display for ImageExtent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

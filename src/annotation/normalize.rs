use serde::{Deserialize, Serialize};

/// Pixel dimensions of the screenshots a corpus was annotated against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageDims {
    pub width: f64,
    pub height: f64,
}

impl Default for ImageDims {
    /// RICO annotations are expressed in 1440x2560 device pixels.
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 2560.0,
        }
    }
}

/// `[left, top, right, bottom]` in pixels -> `[x, y, width, height]` relative.
///
/// Out-of-range input is passed through, so results may fall outside [0, 1].
pub fn to_relative(bounds: [f64; 4], dims: ImageDims) -> [f64; 4] {
    let [left, top, right, bottom] = bounds;
    [
        left / dims.width,
        top / dims.height,
        (right - left) / dims.width,
        (bottom - top) / dims.height,
    ]
}

/// Inverse of [`to_relative`].
pub fn to_absolute(rel: [f64; 4], dims: ImageDims) -> [f64; 4] {
    let [x, y, w, h] = rel;
    let left = x * dims.width;
    let top = y * dims.height;
    [left, top, left + w * dims.width, top + h * dims.height]
}

//! Bounding box types and the clipping normalizer.
//!
//! VOC stores boxes as XYXY corners that are not guaranteed to be ordered
//! or inside the image. COCO wants a top-left origin plus a strictly
//! positive width and height, so every source box goes through
//! [`normalize`] before it is emitted.

use std::fmt;

use serde::Serialize;

/// Raw `<bndbox>` corners as read from the XML, truncated to integers.
///
/// Ordering is not guaranteed (`xmin > xmax` is tolerated) and values may
/// be negative or exceed the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RawBox {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl RawBox {
    #[inline]
    pub fn new(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }
}

impl fmt::Display for RawBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{},{},{}]",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}

/// A clipped, axis-aligned box in COCO `[x, y, width, height]` form.
///
/// `width` and `height` are always greater than zero; the only way to build
/// one outside this module is through [`normalize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedBox {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl NormalizedBox {
    #[inline]
    pub fn x(&self) -> u32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> u32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Box area in square pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    /// Returns `[x, y, width, height]`.
    #[inline]
    pub fn to_xywh(&self) -> [u32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

/// A box that has no area left after ordering and clipping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DegenerateBox {
    /// The source coordinates.
    pub raw: RawBox,
    /// Width after clipping (zero or negative).
    pub width: i64,
    /// Height after clipping (zero or negative).
    pub height: i64,
}

impl fmt::Display for DegenerateBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} has no area after clipping (w={}, h={})",
            self.raw, self.width, self.height
        )
    }
}

/// Orders, clips and validates a raw box against the image dimensions.
///
/// The near edge is clipped into `[0, dim - 1]` and the far edge into
/// `[0, dim]`, so a box may end exactly on the image border but always
/// starts on a real pixel.
pub fn normalize(
    raw: RawBox,
    image_width: u32,
    image_height: u32,
) -> Result<NormalizedBox, DegenerateBox> {
    let (x1, x2) = ordered(raw.xmin, raw.xmax);
    let (y1, y2) = ordered(raw.ymin, raw.ymax);

    let img_w = i64::from(image_width);
    let img_h = i64::from(image_height);

    // min-then-max rather than clamp: with a zero dimension the bounds cross.
    let x1 = x1.min(img_w - 1).max(0);
    let y1 = y1.min(img_h - 1).max(0);
    let x2 = x2.min(img_w).max(0);
    let y2 = y2.min(img_h).max(0);

    let width = (x2 - x1).max(0);
    let height = (y2 - y1).max(0);

    if width <= 0 || height <= 0 {
        return Err(DegenerateBox { raw, width, height });
    }

    // All four values are within [0, u32::MAX] after clipping.
    Ok(NormalizedBox {
        x: x1 as u32,
        y: y1 as u32,
        width: width as u32,
        height: height as u32,
    })
}

#[inline]
fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

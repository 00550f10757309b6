//! Mapping between shape space and pixel space, and automatic framing.

use serde::{Deserialize, Serialize};

use crate::error::MsdfError;
use crate::math::{Point2, Vector2};
use crate::shape::Bounds;

/// Affine map from shape space to pixel space: `pixel = (shape + translate) · scale`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Pixels per shape unit, per axis.
    pub scale: Vector2,
    /// Shape-space offset applied before scaling.
    pub translate: Vector2,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            scale: Vector2::new(1.0, 1.0),
            translate: Vector2::ZERO,
        }
    }
}

impl Projection {
    pub fn new(scale: Vector2, translate: Vector2) -> Self {
        Self { scale, translate }
    }

    /// Uniform scale on both axes.
    pub fn uniform(scale: f64, translate: Vector2) -> Self {
        Self::new(Vector2::new(scale, scale), translate)
    }

    pub fn project(&self, p: Point2) -> Point2 {
        (p + self.translate) * self.scale
    }

    pub fn unproject(&self, p: Point2) -> Point2 {
        p / self.scale - self.translate
    }

    /// Shape-space coordinate sampled for pixel `(x, y)`: its center.
    pub fn unproject_pixel(&self, x: u32, y: u32) -> Point2 {
        self.unproject(Vector2::new(x as f64 + 0.5, y as f64 + 0.5))
    }

    /// Scale must be finite and positive on both axes.
    pub fn validate(&self) -> Result<(), MsdfError> {
        let ok = |s: f64| s.is_finite() && s > 0.0;
        if !ok(self.scale.x) || !ok(self.scale.y) {
            return Err(MsdfError::InvalidScale {
                x: self.scale.x,
                y: self.scale.y,
            });
        }
        Ok(())
    }
}

/// Total width of the distance band encoded between 0 and 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Range {
    /// Width in output pixels.
    Px(f64),
    /// Width in shape units.
    Units(f64),
}

impl Range {
    /// The range in shape units under a given scale.
    pub fn to_units(self, scale: f64) -> f64 {
        match self {
            Range::Px(px) => px / scale,
            Range::Units(units) => units,
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Range::Px(v) | Range::Units(v) => v,
        }
    }
}

impl Default for Range {
    fn default() -> Self {
        Range::Px(4.0)
    }
}

/// Projection plus the distance range resolved to shape units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Framing {
    pub projection: Projection,
    pub range: f64,
}

impl Bounds {
    /// Fit these bounds, padded by half the distance range on every side,
    /// into a `width × height` bitmap with uniform scale.
    ///
    /// The shape is centered along the axis with slack. Empty or degenerate
    /// bounds frame the unit square. Returns `None` when a pixel range
    /// leaves no room for the shape.
    pub fn autoframe(&self, width: u32, height: u32, range: Range) -> Option<Framing> {
        let (mut l, mut b, mut r, mut t) = if self.is_empty() {
            (0.0, 0.0, 1.0, 1.0)
        } else {
            (self.left, self.bottom, self.right, self.top)
        };

        let mut frame = Vector2::new(width as f64, height as f64);
        match range {
            Range::Units(units) => {
                l -= 0.5 * units;
                b -= 0.5 * units;
                r += 0.5 * units;
                t += 0.5 * units;
            }
            Range::Px(px) => {
                frame -= Vector2::new(px, px);
            }
        }
        if frame.x <= 0.0 || frame.y <= 0.0 {
            return None;
        }

        let dims = Vector2::new(r - l, t - b);
        let (mut translate, scale) = if dims.x * frame.y < dims.y * frame.x {
            (
                Vector2::new(0.5 * (frame.x / frame.y * dims.y - dims.x) - l, -b),
                frame.y / dims.y,
            )
        } else {
            (
                Vector2::new(-l, 0.5 * (frame.y / frame.x * dims.x - dims.y) - b),
                frame.x / dims.x,
            )
        };
        if let Range::Px(px) = range {
            translate += Vector2::new(0.5 * px / scale, 0.5 * px / scale);
        }

        Some(Framing {
            projection: Projection::uniform(scale, translate),
            range: range.to_units(scale),
        })
    }
}

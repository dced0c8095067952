//! Bounds rectangles and 2D affine transforms

/// Axis-aligned bounds
///
/// An empty rectangle has `x_min > x_max`; unioning into it adopts the other
/// rectangle unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x_min: f32::MAX,
        y_min: f32::MAX,
        x_max: f32::MIN,
        y_max: f32::MIN,
    };

    #[inline]
    pub const fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Rectangle of the given size centered on the origin
    pub fn centered(width: f32, height: f32) -> Self {
        let hw = width * 0.5;
        let hh = height * 0.5;
        Self::new(-hw, -hh, hw, hh)
    }

    /// Zero-area rectangle at a point
    #[inline]
    pub const fn point(x: f32, y: f32) -> Self {
        Self::new(x, y, x, y)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    #[inline]
    pub fn width(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.x_max - self.x_min
        }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.y_max - self.y_min
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        !self.is_empty() && x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Grow to include a point
    pub fn include(&mut self, x: f32, y: f32) {
        self.x_min = self.x_min.min(x);
        self.y_min = self.y_min.min(y);
        self.x_max = self.x_max.max(x);
        self.y_max = self.y_max.max(y);
    }

    pub fn union(&mut self, other: &Rect) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = *other;
            return;
        }
        self.include(other.x_min, other.y_min);
        self.include(other.x_max, other.y_max);
    }

    /// Bounds of this rectangle's corners after a transform
    pub fn transformed(&self, matrix: &Affine) -> Rect {
        if self.is_empty() {
            return *self;
        }
        let mut out = Rect::EMPTY;
        for (x, y) in [
            (self.x_min, self.y_min),
            (self.x_max, self.y_min),
            (self.x_min, self.y_max),
            (self.x_max, self.y_max),
        ] {
            let (tx, ty) = matrix.apply(x, y);
            out.include(tx, ty);
        }
        out
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// 2x3 affine transform
///
/// ```text
/// | a  b  tx |
/// | c  d  ty |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub rows: [[f32; 3]; 2],
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    };

    /// Build from translation, rotation in degrees, and scale
    pub fn from_parts(x: f32, y: f32, rotation: f32, x_scale: f32, y_scale: f32) -> Self {
        let (sin, cos) = rotation.to_radians().sin_cos();
        Self {
            rows: [
                [cos * x_scale, -sin * y_scale, x],
                [sin * x_scale, cos * y_scale, y],
            ],
        }
    }

    /// Flatten to the six-float exchange layout: row 0 then row 1
    #[inline]
    pub fn to_flat(&self) -> [f32; 6] {
        let [r0, r1] = self.rows;
        [r0[0], r0[1], r0[2], r1[0], r1[1], r1[2]]
    }

    #[inline]
    pub fn from_flat(flat: &[f32; 6]) -> Self {
        Self {
            rows: [[flat[0], flat[1], flat[2]], [flat[3], flat[4], flat[5]]],
        }
    }

    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [r0, r1] = self.rows;
        (r0[0] * x + r0[1] * y + r0[2], r1[0] * x + r1[1] * y + r1[2])
    }

    /// `self * other`: apply `other` first, then `self`
    pub fn concat(&self, other: &Affine) -> Affine {
        let [a0, a1] = self.rows;
        let [b0, b1] = other.rows;
        Affine {
            rows: [
                [
                    a0[0] * b0[0] + a0[1] * b1[0],
                    a0[0] * b0[1] + a0[1] * b1[1],
                    a0[0] * b0[2] + a0[1] * b1[2] + a0[2],
                ],
                [
                    a1[0] * b0[0] + a1[1] * b1[0],
                    a1[0] * b0[1] + a1[1] * b1[1],
                    a1[0] * b0[2] + a1[1] * b1[2] + a1[2],
                ],
            ],
        }
    }

    /// Inverse transform, or `None` when the matrix is singular
    pub fn invert(&self) -> Option<Affine> {
        let [[a, b, tx], [c, d, ty]] = self.rows;
        let det = a * d - b * c;
        if det.abs() <= f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(Affine {
            rows: [
                [d * inv, -b * inv, (b * ty - d * tx) * inv],
                [-c * inv, a * inv, (c * tx - a * ty) * inv],
            ],
        })
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rect() {
        let r = Rect::EMPTY;
        assert!(r.is_empty());
        assert_eq!(r.width(), 0.0);
        assert!(!r.contains(0.0, 0.0));
    }

    #[test]
    fn test_union_adopts_other_when_empty() {
        let mut r = Rect::EMPTY;
        r.union(&Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(r, Rect::new(1.0, 2.0, 3.0, 4.0));
        r.union(&Rect::new(-1.0, 0.0, 0.0, 10.0));
        assert_eq!(r, Rect::new(-1.0, 0.0, 3.0, 10.0));
    }

    #[test]
    fn test_flat_layout() {
        let m = Affine {
            rows: [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
        };
        assert_eq!(m.to_flat(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(Affine::from_flat(&m.to_flat()), m);
    }

    #[test]
    fn test_translation_concat() {
        let parent = Affine::from_parts(10.0, 20.0, 0.0, 1.0, 1.0);
        let child = Affine::from_parts(1.0, 2.0, 0.0, 2.0, 2.0);
        let world = parent.concat(&child);
        assert_eq!(world.apply(1.0, 1.0), (13.0, 24.0));
    }

    #[test]
    fn test_invert_round_trip() {
        let m = Affine::from_parts(5.0, -3.0, 0.0, 2.0, 4.0);
        let inv = m.invert().unwrap();
        let (x, y) = m.apply(1.5, 2.5);
        let (bx, by) = inv.apply(x, y);
        assert!((bx - 1.5).abs() < 1e-5);
        assert!((by - 2.5).abs() < 1e-5);
    }
}

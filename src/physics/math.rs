//! Scalar and planar geometry types shared by the physics core

/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// π as a [`Scalar`]; initial angles are configured as multiples of it
pub const PI: Scalar = core::f64::consts::PI;

/// A point in the renderer's plane, y pointing down
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: Scalar,
    pub y: Scalar,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: Scalar, y: Scalar) -> Self {
        Self { x, y }
    }

    /// Offset of a rod of `length` hanging at `angle` from the downward vertical
    #[inline]
    pub fn offset(self, length: Scalar, angle: Scalar) -> Self {
        Self {
            x: self.x + length * sin(angle),
            y: self.y + length * cos(angle),
        }
    }
}

impl From<[Scalar; 2]> for Point {
    fn from([x, y]: [Scalar; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [Scalar; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

// libm keeps the trigonometry bit-identical across targets.
#[inline]
pub fn sin(x: Scalar) -> Scalar {
    libm::sin(x)
}

#[inline]
pub fn cos(x: Scalar) -> Scalar {
    libm::cos(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_straight_down() {
        let bob = Point::new(300.0, 300.0).offset(100.0, 0.0);
        assert_eq!(bob, Point::new(300.0, 400.0));
    }

    #[test]
    fn test_offset_horizontal() {
        let bob = Point::ORIGIN.offset(2.0, PI / 2.0);
        assert!((bob.x - 2.0).abs() < 1e-12);
        assert!(bob.y.abs() < 1e-12);
    }

    #[test]
    fn test_array_conversion() {
        let point = Point::from([1.5, -2.0]);
        assert_eq!(point, Point::new(1.5, -2.0));
        assert_eq!(<[Scalar; 2]>::from(point), [1.5, -2.0]);
    }
}

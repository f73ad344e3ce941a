use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Height of the visible frame in scene units
pub const FRAME_HEIGHT: f64 = 8.0;

/// Width of the visible frame in scene units (16:9)
pub const FRAME_WIDTH: f64 = FRAME_HEIGHT * 16.0 / 9.0;

/// Default gap between objects placed next to each other
pub const DEFAULT_BUFF: f64 = 0.25;

/// Small gap used by braces and surrounding rectangles
pub const SMALL_BUFF: f64 = 0.1;

/// 2D vector in scene units, y pointing up
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

pub const ORIGIN: Vec2 = Vec2 { x: 0.0, y: 0.0 };
pub const UP: Vec2 = Vec2 { x: 0.0, y: 1.0 };
pub const DOWN: Vec2 = Vec2 { x: 0.0, y: -1.0 };
pub const LEFT: Vec2 = Vec2 { x: -1.0, y: 0.0 };
pub const RIGHT: Vec2 = Vec2 { x: 1.0, y: 0.0 };

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`
    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        self + (other - self) * t
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Width and height in scene units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundingBox {
    pub fn from_center(center: Vec2, size: Size) -> Self {
        let half = Vec2::new(size.width / 2.0, size.height / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Smallest box containing both
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grow by `buff` on every side
    pub fn padded(&self, buff: f64) -> BoundingBox {
        let pad = Vec2::new(buff, buff);
        BoundingBox {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Point on the box boundary in `direction` (components are -1, 0 or 1)
    pub fn critical_point(&self, direction: Vec2) -> Vec2 {
        let c = self.center();
        Vec2::new(
            c.x + direction.x.signum_or_zero() * self.width() / 2.0,
            c.y + direction.y.signum_or_zero() * self.height() / 2.0,
        )
    }
}

trait SignumOrZero {
    fn signum_or_zero(self) -> f64;
}

impl SignumOrZero for f64 {
    fn signum_or_zero(self) -> f64 {
        if self > 0.0 {
            1.0
        } else if self < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

/// RGBA color with components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    pub fn to_rgba8(self, opacity: f64) -> [u8; 4] {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a * opacity)]
    }

    pub fn lerp(self, other: Color, t: f64) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        WHITE
    }
}

pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0x00);
pub const BLUE: Color = Color::rgb(0x58, 0xC4, 0xDD);
pub const RED: Color = Color::rgb(0xFC, 0x62, 0x55);
pub const GREEN: Color = Color::rgb(0x83, 0xC1, 0x67);
pub const GREY: Color = Color::rgb(0x88, 0x88, 0x88);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic() {
        let v = UP * 1.5 + LEFT * 5.0;
        assert_eq!(v, Vec2::new(-5.0, 1.5));
        assert_eq!(-v, Vec2::new(5.0, -1.5));
        assert_eq!(ORIGIN.lerp(RIGHT * 2.0, 0.25), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_bounding_box_union() {
        let a = BoundingBox::from_center(ORIGIN, Size::new(2.0, 2.0));
        let b = BoundingBox::from_center(Vec2::new(3.0, 0.0), Size::new(2.0, 4.0));
        let u = a.union(&b);
        assert_eq!(u.width(), 5.0);
        assert_eq!(u.height(), 4.0);
        assert_eq!(u.center(), Vec2::new(1.5, 0.0));
    }

    #[test]
    fn test_critical_point() {
        let bb = BoundingBox::from_center(ORIGIN, Size::new(4.0, 2.0));
        assert_eq!(bb.critical_point(DOWN), Vec2::new(0.0, -1.0));
        assert_eq!(bb.critical_point(LEFT + UP), Vec2::new(-2.0, 1.0));
    }

    #[test]
    fn test_color_quantization() {
        assert_eq!(YELLOW.to_rgba8(1.0), [255, 255, 0, 255]);
        assert_eq!(WHITE.to_rgba8(0.0)[3], 0);
    }
}

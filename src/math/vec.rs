use std::ops::{Add, Mul, Neg, Sub};

/*
Both vector types are plain `#[repr(transparent)]` float arrays so geometry
built from them can be cast straight into vertex buffers with bytemuck.

Plan coordinates use `Vec2(x, y)`. The 3D world puts the plan's `y` on the
`z` axis and height on `y`, so a plan point `(x, y)` lifts to `(x, h, y)`.
*/

#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec2([f32; 2]);

impl Vec2 {
    pub const ZERO: Vec2 = Vec2([0.0, 0.0]);

    pub fn new(x: f32, y: f32) -> Self {
        Vec2([x, y])
    }

    pub fn x(&self) -> f32 {
        self.0[0]
    }

    pub fn y(&self) -> f32 {
        self.0[1]
    }

    /// Component by axis index, `0` for x and anything else for y.
    pub fn axis(&self, index: usize) -> f32 {
        if index == 0 { self.0[0] } else { self.0[1] }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x() * other.x() + self.y() * other.y()
    }

    /// Z component of the 3D cross product; positive for a left turn.
    pub fn cross(&self, other: &Self) -> f32 {
        self.x() * other.y() - self.y() * other.x()
    }

    pub fn length(&self) -> f32 {
        self.x().hypot(self.y())
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    pub fn normalize(&self) -> Self {
        let length = self.length();
        if length == 0.0 {
            return Vec2::ZERO;
        }
        Vec2([self.x() / length, self.y() / length])
    }

    /// Counter-clockwise perpendicular `(-y, x)`.
    pub fn perp(&self) -> Self {
        Vec2([-self.y(), self.x()])
    }

    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec2([
            self.x() * (1.0 - t) + other.x() * t,
            self.y() * (1.0 - t) + other.y() * t,
        ])
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Vec2([(self.x() + other.x()) / 2.0, (self.y() + other.y()) / 2.0])
    }

    /// Lifts a plan point into the world at the given height.
    pub fn at_height(&self, height: f32) -> Vec3 {
        Vec3::new(self.x(), height, self.y())
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(values: [f32; 2]) -> Self {
        Vec2(values)
    }
}

impl From<Vec2> for [f32; 2] {
    fn from(vec: Vec2) -> Self {
        vec.0
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self([self.x() + other.x(), self.y() + other.y()])
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self([self.x() - other.x(), self.y() - other.y()])
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self([self.x() * scalar, self.y() * scalar])
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self([-self.x(), -self.y()])
    }
}

#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec3([f32; 3]);

impl Vec3 {
    pub const ZERO: Vec3 = Vec3([0.0, 0.0, 0.0]);

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3([x, y, z])
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }

    pub fn cross(&self, other: &Self) -> Self {
        Vec3([
            self.y() * other.z() - self.z() * other.y(),
            self.z() * other.x() - self.x() * other.z(),
            self.x() * other.y() - self.y() * other.x(),
        ])
    }

    pub fn length(&self) -> f32 {
        (self.x().powi(2) + self.y().powi(2) + self.z().powi(2)).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let length = self.length();
        if length == 0.0 {
            return Vec3::ZERO;
        }

        Self([self.x() / length, self.y() / length, self.z() / length])
    }

    /// Drops the height, keeping the plan coordinates `(x, z)`.
    pub fn plan(&self) -> Vec2 {
        Vec2::new(self.x(), self.z())
    }
    pub fn x(&self) -> f32 {
        self.0[0]
    }
    pub fn y(&self) -> f32 {
        self.0[1]
    }
    pub fn z(&self) -> f32 {
        self.0[2]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(values: [f32; 3]) -> Self {
        Vec3(values)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(vec: Vec3) -> Self {
        vec.0
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self([
            self.x() + other.x(),
            self.y() + other.y(),
            self.z() + other.z(),
        ])
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self([
            self.x() - other.x(),
            self.y() - other.y(),
            self.z() - other.z(),
        ])
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self([self.x() * scalar, self.y() * scalar, self.z() * scalar])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that the perpendicular turns counter-clockwise.
    #[test]
    fn test_perp_is_left_of_direction() {
        let east = Vec2::new(1.0, 0.0);
        assert_eq!(east.perp(), Vec2::new(0.0, 1.0));
        assert!(east.cross(&east.perp()) > 0.0);
    }

    /// Tests that normalizing a zero vector yields zero instead of NaN.
    #[test]
    fn test_normalize_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    /// Tests lifting a plan point into world space and back.
    #[test]
    fn test_plan_lift() {
        let p = Vec2::new(3.0, -2.0);
        let world = p.at_height(1.7);
        assert_eq!(world, Vec3::new(3.0, 1.7, -2.0));
        assert_eq!(world.plan(), p);
    }
}

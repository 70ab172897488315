use crate::math::vec::{Vec2, Vec3};

/// A half-line in world space with a unit direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Signed distance to the horizontal plane `y = height`.
    ///
    /// Negative when the plane is behind the ray, infinite when the ray runs
    /// parallel to it.
    pub fn distance_to_height(&self, height: f32) -> f32 {
        (height - self.origin.y()) / self.direction.y()
    }

    /// Hit against the infinite-height wall standing on the plan segment `a`–`b`.
    ///
    /// Returns the distance and the hit point when the ray crosses the wall's
    /// plane strictly between its two edges.
    pub fn cast_wall(&self, a: Vec2, b: Vec2) -> Option<(f32, Vec3)> {
        let along = a - b;
        let normal = along.perp();
        let facing = normal.dot(&self.direction.plan());
        if facing == 0.0 {
            return None;
        }
        let distance = normal.dot(&(a - self.origin.plan())) / facing;
        let hit = self.at(distance);

        let w_a = a.dot(&along);
        let w_b = b.dot(&along);
        let w_hit = hit.plan().dot(&along);
        if w_hit > w_a.min(w_b) && w_hit < w_a.max(w_b) {
            Some((distance, hit))
        } else {
            None
        }
    }
}

use crate::math::Vec2;

/// Nominal length of the parts a wall is cut into before it is indexed.
pub const MAX_PART_LENGTH: f32 = 8.0;

/// Slack that keeps walls barely over a multiple of [`MAX_PART_LENGTH`] from
/// gaining a sliver part.
const PART_SLACK: f32 = 0.3;

/// A wall segment in plan coordinates, walked from `a` to `b`.
///
/// The gallery interior is on the left of the walking direction, so
/// [`Segment::inward_normal`] points into the room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    pub fn direction(&self) -> Vec2 {
        self.b - self.a
    }

    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    pub fn midpoint(&self) -> Vec2 {
        self.a.midpoint(&self.b)
    }

    /// Heading of the segment in the plan, `atan2(dy, dx)`.
    pub fn angle(&self) -> f32 {
        let d = self.direction();
        d.y().atan2(d.x())
    }

    /// Unit normal on the interior side.
    pub fn inward_normal(&self) -> Vec2 {
        self.direction().perp().normalize()
    }

    /// Euclidean distance from `p` to the closest point of the segment.
    pub fn distance_to(&self, p: Vec2) -> f32 {
        let ab = self.direction();
        let ap = p - self.a;
        let denom = ab.dot(&ab);
        if denom == 0.0 {
            return ap.length();
        }
        let t = (ap.dot(&ab) / denom).clamp(0.0, 1.0);
        (ap - ab * t).length()
    }

    /// Cuts the segment into `ceil(len / 8 - 0.3)` equal parts.
    ///
    /// A part may overshoot [`MAX_PART_LENGTH`] by at most `8 * 0.3` units.
    pub fn split(&self) -> Vec<Segment> {
        let count = (self.length() / MAX_PART_LENGTH - PART_SLACK).ceil();
        if count <= 0.0 {
            return vec![*self];
        }
        let count = count as usize;
        let points: Vec<Vec2> = (0..=count)
            .map(|i| self.a.lerp(&self.b, i as f32 / count as f32))
            .collect();
        points.windows(2).map(|w| Segment::new(w[0], w[1])).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests distances to the interior and beyond either end.
    #[test]
    fn test_distance_to() {
        let s = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
        assert_eq!(s.distance_to(Vec2::new(2.0, 3.0)), 3.0);
        assert_eq!(s.distance_to(Vec2::new(-3.0, 4.0)), 5.0);
        assert_eq!(s.distance_to(Vec2::new(7.0, 0.0)), 3.0);
    }

    /// Tests that the inward normal lies to the left of the direction.
    #[test]
    fn test_inward_normal() {
        let s = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, -5.0));
        assert_eq!(s.inward_normal(), Vec2::new(1.0, 0.0));
    }

    /// Tests the part counts around the length cap.
    #[test]
    fn test_split_counts() {
        let along = |len: f32| Segment::new(Vec2::ZERO, Vec2::new(len, 0.0)).split();
        assert_eq!(along(0.5).len(), 1);
        assert_eq!(along(7.5).len(), 1);
        assert_eq!(along(10.0).len(), 1);
        assert_eq!(along(10.5).len(), 2);
        assert_eq!(along(15.5).len(), 2);
        assert_eq!(along(23.5).len(), 3);
        for part in along(23.5) {
            assert!(part.length() <= MAX_PART_LENGTH);
        }
    }

    /// Tests that parts chain end to end and keep the original endpoints.
    #[test]
    fn test_split_chains() {
        let s = Segment::new(Vec2::new(0.25, 0.25), Vec2::new(0.25, 23.75));
        let parts = s.split();
        assert_eq!(parts[0].a, s.a);
        assert_eq!(parts[parts.len() - 1].b, s.b);
        for w in parts.windows(2) {
            assert_eq!(w[0].b, w[1].a);
        }
    }
}

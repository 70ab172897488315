//! Wall collision against the spatial grid.
//!
//! # Overview
//!
//! Walls are zero-thickness segments in the plan. A point is kept clear of a
//! wall by pushing it along the wall's inward normal until it sits at the
//! required distance. Only the segments registered in the grid cell of the
//! tested point take part, so the cost per query is bounded by the cell
//! population rather than the map size.
//!
//! Two resolvers share that push:
//!
//! * [`resolve_walls`] runs every frame with the small body clearance and
//!   processes walls in grid order.
//! * [`clear_of_walls`] runs once per teleport with the larger viewing
//!   clearance and processes the closest walls first, so a landing point in a
//!   narrow corridor settles against the near wall before the far one.

use crate::map::{GridIndex, Segment};
use crate::math::Vec2;

/// Pushes `p` out to `clearance` from `wall` if it is closer.
///
/// Returns the adjusted point and whether it moved.
fn push_from(wall: &Segment, p: Vec2, clearance: f32) -> (Vec2, bool) {
    let distance = wall.distance_to(p);
    if distance >= clearance {
        return (p, false);
    }
    let normal = wall.inward_normal();
    if normal == Vec2::ZERO {
        return (p, false);
    }
    (p + normal * (clearance - distance), true)
}

/// Resolves a movement candidate against the walls of its grid cell.
///
/// Each wall closer than `clearance` pushes the candidate along its inward
/// normal; later walls see the already adjusted point. Points outside the
/// grid have no walls and come back unchanged.
pub fn resolve_walls(grid: &GridIndex, candidate: Vec2, clearance: f32) -> Vec2 {
    grid.segments_at(candidate)
        .iter()
        .fold(candidate, |p, wall| push_from(wall, p, clearance).0)
}

/// Moves a teleport landing point at least `clearance` away from nearby walls.
pub fn clear_of_walls(grid: &GridIndex, point: Vec2, clearance: f32) -> Vec2 {
    let mut near: Vec<(f32, &Segment)> = grid
        .segments_at(point)
        .iter()
        .map(|wall| (wall.distance_to(point), wall))
        .filter(|(distance, _)| *distance < clearance)
        .collect();
    near.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut p = point;
    for (_, wall) in near {
        let (next, moved) = push_from(wall, p, clearance);
        if moved {
            log::trace!("Landing pushed off wall {:?} to {:?}", wall, next);
        }
        p = next;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 14×14 room inside the first cell, walked with the interior on the
    /// left so that the inward normals point into the room.
    fn room() -> GridIndex {
        let corners = [
            Vec2::new(1.0, 1.0),
            Vec2::new(15.0, 1.0),
            Vec2::new(15.0, 15.0),
            Vec2::new(1.0, 15.0),
            Vec2::new(1.0, 1.0),
        ];
        let walls: Vec<Segment> = corners
            .windows(2)
            .map(|w| Segment::new(w[0], w[1]))
            .collect();
        GridIndex::build(&walls, 1, 16.0)
    }

    /// Tests that the room's normals face inward.
    #[test]
    fn test_room_normals() {
        let wall = Segment::new(Vec2::new(1.0, 15.0), Vec2::new(1.0, 1.0));
        assert_eq!(wall.inward_normal(), Vec2::new(1.0, 0.0));
    }

    /// Tests that a candidate inside the clearance is pushed back out.
    #[test]
    fn test_resolve_pushes_out() {
        let grid = room();
        let p = resolve_walls(&grid, Vec2::new(1.2, 4.0), 0.5);
        assert!((p.x() - 1.5).abs() < 1e-5, "{p:?}");
        assert_eq!(p.y(), 4.0);
    }

    /// Tests that a candidate in a corner is pushed off both walls.
    #[test]
    fn test_resolve_corner() {
        let grid = room();
        let p = resolve_walls(&grid, Vec2::new(1.1, 1.1), 0.5);
        assert!(p.x() >= 1.5 - 1e-5 && p.y() >= 1.5 - 1e-5, "{p:?}");
    }

    /// Tests that free space and points off the grid are left alone.
    #[test]
    fn test_resolve_free_space() {
        let grid = room();
        let free = Vec2::new(4.0, 4.0);
        assert_eq!(resolve_walls(&grid, free, 0.5), free);
        let outside = Vec2::new(-5.0, 40.0);
        assert_eq!(resolve_walls(&grid, outside, 0.5), outside);
    }

    /// Tests that landing points end up at the viewing clearance, nearest
    /// wall first.
    #[test]
    fn test_clear_of_walls() {
        let grid = room();
        let p = clear_of_walls(&grid, Vec2::new(2.0, 8.0), 3.0);
        assert!((p.x() - 4.0).abs() < 1e-5, "{p:?}");
        let p = clear_of_walls(&grid, Vec2::new(14.5, 14.0), 3.0);
        assert!((p.x() - 12.0).abs() < 1e-5, "{p:?}");
        assert!((p.y() - 12.0).abs() < 1e-5, "{p:?}");
    }
}

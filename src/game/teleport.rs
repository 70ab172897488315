//! Picking a teleport destination from a view ray.
//!
//! The ray is tested against the walls registered along its horizontal
//! projection, the floor plane and a ceiling plane. A wall hit in front of
//! both planes wins; a wall hit near a placement slot snaps onto the slot's
//! midpoint so that clicking a painting lands in front of it. Without a wall
//! hit the floor point is used.

use crate::config::NavigationConfig;
use crate::map::{GridIndex, Segment};
use crate::math::{Ray, Vec2};

/// What the teleport ray landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleportKind {
    Wall,
    /// A wall hit close enough to a slot to snap onto it.
    Painting,
    Floor,
}

/// A teleport destination before wall clearance is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportHit {
    pub kind: TeleportKind,
    pub point: Vec2,
    /// Distance along the ray.
    pub distance: f32,
}

/// Walls near the ray's horizontal path, without duplicates.
fn walls_along<'a>(grid: &'a GridIndex, ray: &Ray, config: &NavigationConfig) -> Vec<&'a Segment> {
    let origin = ray.origin.plan();
    let heading = ray.direction.plan().normalize();

    let mut walls: Vec<&Segment> = Vec::new();
    let probes = std::iter::once(origin)
        .chain((1..=config.ray_steps).map(|i| origin + heading * (config.ray_step * i as f32)));
    for probe in probes {
        for wall in grid.segments_at(probe) {
            if !walls.contains(&wall) {
                walls.push(wall);
            }
        }
    }
    walls
}

/// Finds where `ray` would take the player, if anywhere.
pub fn find_landing(grid: &GridIndex, ray: &Ray, config: &NavigationConfig) -> Option<TeleportHit> {
    let floor = ray.distance_to_height(0.0);
    let ceiling = ray.distance_to_height(config.ceiling_plane);
    let cap = floor.max(ceiling);

    let wall_hit = walls_along(grid, ray, config)
        .into_iter()
        .filter_map(|wall| ray.cast_wall(wall.a, wall.b))
        .filter(|(distance, _)| {
            *distance > 0.0 && *distance < cap && *distance < config.teleport_range
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));

    if let Some((distance, hit)) = wall_hit {
        let point = hit.plan();
        let slot = grid
            .parts_at(point)
            .iter()
            .map(|part| part.midpoint())
            .find(|mid| mid.distance(&point) < config.painting_snap);
        return Some(match slot {
            Some(mid) => TeleportHit {
                kind: TeleportKind::Painting,
                point: mid,
                distance,
            },
            None => TeleportHit {
                kind: TeleportKind::Wall,
                point,
                distance,
            },
        });
    }

    if floor > 0.0 && floor < config.teleport_range {
        return Some(TeleportHit {
            kind: TeleportKind::Floor,
            point: ray.at(floor).plan(),
            distance: floor,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    /// A 24×8 corridor walked with the interior on the left; the west wall
    /// is short enough to stay a single part.
    fn corridor() -> GridIndex {
        corridor_to(25.0)
    }

    fn corridor_to(east: f32) -> GridIndex {
        let corners = [
            Vec2::new(1.0, 1.0),
            Vec2::new(east, 1.0),
            Vec2::new(east, 7.0),
            Vec2::new(1.0, 7.0),
            Vec2::new(1.0, 1.0),
        ];
        let walls: Vec<Segment> = corners
            .windows(2)
            .map(|w| Segment::new(w[0], w[1]))
            .collect();
        GridIndex::build(&walls, 2, 16.0)
    }

    fn ray(origin: Vec2, heading: Vec2, pitch: f32) -> Ray {
        let h = heading.normalize() * pitch.cos();
        Ray::new(origin.at_height(1.7), Vec3::new(h.x(), pitch.sin(), h.y()))
    }

    /// Tests that a level ray at a slot midpoint snaps onto it.
    #[test]
    fn test_snaps_to_painting() {
        let grid = corridor();
        let config = NavigationConfig::default();
        let hit = find_landing(&grid, &ray(Vec2::new(6.0, 4.2), Vec2::new(-1.0, 0.0), 0.0), &config)
            .unwrap();
        assert_eq!(hit.kind, TeleportKind::Painting);
        assert_eq!(hit.point, Vec2::new(1.0, 4.0));
        assert!((hit.distance - 5.0).abs() < 1e-5);
    }

    /// Tests a wall hit away from any slot midpoint.
    #[test]
    fn test_wall_hit() {
        let grid = corridor();
        let config = NavigationConfig::default();
        let hit = find_landing(&grid, &ray(Vec2::new(3.0, 4.0), Vec2::new(0.0, 1.0), 0.0), &config)
            .unwrap();
        assert_eq!(hit.kind, TeleportKind::Wall);
        assert!((hit.point.x() - 3.0).abs() < 1e-5);
        assert!((hit.point.y() - 7.0).abs() < 1e-5);
    }

    /// Tests that a steep downward ray lands on the floor before the wall.
    #[test]
    fn test_floor_hit() {
        let grid = corridor();
        let config = NavigationConfig::default();
        let pitch = -(1.7f32).atan2(3.0);
        let hit = find_landing(&grid, &ray(Vec2::new(6.0, 4.0), Vec2::new(1.0, 0.0), pitch), &config)
            .unwrap();
        assert_eq!(hit.kind, TeleportKind::Floor);
        assert!((hit.point.x() - 9.0).abs() < 1e-4, "{hit:?}");
        assert!((hit.point.y() - 4.0).abs() < 1e-4, "{hit:?}");
    }

    /// Tests that a wall hit above the ceiling plane is ignored.
    #[test]
    fn test_ceiling_caps_wall_hits() {
        let grid = corridor();
        let config = NavigationConfig::default();
        let hit = find_landing(&grid, &ray(Vec2::new(20.0, 4.0), Vec2::new(-1.0, 0.0), 0.7), &config);
        assert_eq!(hit, None);
    }

    /// Tests that rays leaving the map or pointing at the sky find nothing.
    #[test]
    fn test_no_hit_outside() {
        let grid = corridor();
        let config = NavigationConfig::default();
        let hit = find_landing(&grid, &ray(Vec2::new(40.0, 40.0), Vec2::new(1.0, 0.0), 0.2), &config);
        assert_eq!(hit, None);
    }

    /// Tests that the far wall of a long corridor is a hit within range and
    /// ignored once it lies beyond it.
    #[test]
    fn test_wall_beyond_range() {
        let grid = corridor_to(49.0);
        let config = NavigationConfig::default();

        let near = find_landing(&grid, &ray(Vec2::new(10.0, 4.0), Vec2::new(1.0, 0.0), 0.0), &config)
            .unwrap();
        assert_eq!(near.kind, TeleportKind::Painting);
        assert_eq!(near.point, Vec2::new(49.0, 4.0));
        assert!((near.distance - 39.0).abs() < 1e-4, "{near:?}");

        let far = find_landing(&grid, &ray(Vec2::new(8.0, 4.0), Vec2::new(1.0, 0.0), 0.0), &config);
        assert_eq!(far, None);
    }

    /// Tests that a shallow ray whose floor point lies past the range finds
    /// nothing, while a slightly steeper one lands on the floor.
    #[test]
    fn test_floor_beyond_range() {
        let grid = corridor_to(49.0);
        let config = NavigationConfig::default();
        let origin = Vec2::new(8.0, 4.0);
        let east = Vec2::new(1.0, 0.0);

        let shallow = -(1.7f32).atan2(40.5);
        assert_eq!(find_landing(&grid, &ray(origin, east, shallow), &config), None);

        let shallower = -(1.7f32).atan2(45.0);
        assert_eq!(find_landing(&grid, &ray(origin, east, shallower), &config), None);

        let steeper = -(1.7f32).atan2(39.0);
        let hit = find_landing(&grid, &ray(origin, east, steeper), &config).unwrap();
        assert_eq!(hit.kind, TeleportKind::Floor);
        assert!((hit.point.x() - 47.0).abs() < 1e-2, "{hit:?}");
        assert!(hit.distance < config.teleport_range);
    }
}

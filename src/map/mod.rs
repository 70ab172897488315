//! The assembled gallery map.
//!
//! [`MapModel::generate`] runs the whole pipeline once: Hilbert border, wall
//! segments, spatial grid, placement slots and renderer geometry. The result
//! is immutable and shared by reference between navigation and placement.
//!
//! # Coordinate System
//!
//! The plan lives in `[0, size]²` with `size = cell_size * 2^order`. A plan
//! point `(x, y)` is the world point `(x, height, y)`; floor at `y = 0`,
//! ceiling at the wall height.

pub mod geometry;
pub mod grid;
pub mod segment;

pub use geometry::{MapGeometry, Vertex};
pub use grid::GridIndex;
pub use segment::Segment;

use crate::config::MapConfig;
use crate::error::Result;
use crate::maze::hilbert;
use crate::math::Vec2;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Where the player enters the gallery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec2,
    /// Yaw in radians, `0` looking toward `-y` in the plan.
    pub yaw: f32,
}

#[derive(Debug, Clone)]
pub struct MapModel {
    config: MapConfig,
    size: f32,
    border: Vec<Vec2>,
    segments: Vec<Segment>,
    grid: GridIndex,
    geometry: MapGeometry,
    spawn: SpawnPoint,
}

impl MapModel {
    /// Generates a map, seeding wall removal from `config.seed` or the OS.
    pub fn generate(config: &MapConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::generate_with_rng(config, &mut rng)
    }

    /// Generates a map drawing wall removals from `rng`.
    pub fn generate_with_rng<R: Rng>(config: &MapConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let size = config.cell_size * 2f32.powi(config.order as i32);

        let border: Vec<Vec2> =
            hilbert::border_path(config.order + 1, config.wall_width, config.removal, rng)?
                .into_iter()
                .map(|p| p * size)
                .collect();
        let segments: Vec<Segment> = border
            .windows(2)
            .map(|w| Segment::new(w[0], w[1]))
            .collect();

        let grid = GridIndex::build(&segments, config.order, config.cell_size);
        let geometry = MapGeometry::build(&segments, size, config.wall_height);
        let spawn = spawn_point(&grid, &segments, config.spawn_distance);

        log::info!(
            "Generated order {} gallery: {} walls, {} placement slots, {} vertices",
            config.order,
            segments.len(),
            grid.placements().len(),
            geometry.vertex_count()
        );

        Ok(Self {
            config: config.clone(),
            size,
            border,
            segments,
            grid,
            geometry,
            spawn,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Side length of the square plan in world units.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// The closed wall outline; the first and last points coincide.
    pub fn border(&self) -> &[Vec2] {
        &self.border
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    pub fn geometry(&self) -> &MapGeometry {
        &self.geometry
    }

    pub fn placements(&self) -> &[Segment] {
        self.grid.placements()
    }

    pub fn spawn(&self) -> SpawnPoint {
        self.spawn
    }

    /// Plan bounds as `(min, max)`.
    pub fn extent(&self) -> (Vec2, Vec2) {
        (Vec2::ZERO, Vec2::new(self.size, self.size))
    }

    /// Maps a plan point into the unit square, e.g. for a minimap overlay.
    pub fn to_unit(&self, p: Vec2) -> Vec2 {
        p * (1.0 / self.size)
    }
}

/// Stands the player in front of the first slot, looking at it.
fn spawn_point(grid: &GridIndex, segments: &[Segment], distance: f32) -> SpawnPoint {
    let Some(wall) = grid.placements().first().or(segments.first()) else {
        return SpawnPoint {
            position: Vec2::new(grid.cell_size() / 2.0, grid.cell_size() / 2.0),
            yaw: 0.0,
        };
    };
    let normal = wall.inward_normal();
    SpawnPoint {
        position: wall.midpoint() + normal * distance,
        yaw: normal.x().atan2(normal.y()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_map(removal: f32, seed: u64) -> MapModel {
        let config = MapConfig {
            order: 3,
            removal,
            seed: Some(seed),
            ..MapConfig::default()
        };
        MapModel::generate(&config).unwrap()
    }

    /// Tests the canonical wall count of an untouched order-3 maze.
    #[test]
    fn test_canonical_wall_count() {
        let map = small_map(0.0, 1);
        assert_eq!(map.segments().len(), 105);
        assert_eq!(map.size(), 64.0);
        assert_eq!(map.geometry().vertex_count(), (105 + 2) * 4);
    }

    /// Tests that every wall is found at both endpoints and its midpoint.
    #[test]
    fn test_grid_round_trip() {
        for (removal, seed) in [(0.0, 1), (0.5, 2), (0.9, 3)] {
            let map = small_map(removal, seed);
            for segment in map.segments() {
                for p in [segment.a, segment.b, segment.midpoint()] {
                    assert!(
                        map.grid().segments_at(p).contains(segment),
                        "{segment:?} missing at {p:?}"
                    );
                }
            }
        }
    }

    /// Tests that slots are long enough and unique.
    #[test]
    fn test_placement_slots_valid() {
        for seed in 0..4 {
            let map = small_map(0.5, seed);
            let slots = map.placements();
            assert!(!slots.is_empty());
            for (k, slot) in slots.iter().enumerate() {
                assert!(slot.length() > 1.0);
                assert!(!slots[k + 1..].contains(slot));
            }
        }
    }

    /// Tests that the placement list keeps every qualifying part.
    #[test]
    fn test_placements_cover_all_parts() {
        let map = small_map(0.5, 9);
        let expected = map
            .segments()
            .iter()
            .flat_map(|s| s.split())
            .filter(|p| p.length() > 1.0)
            .count();
        assert_eq!(map.placements().len(), expected);
    }

    /// Tests the spawn pose on the untouched order-3 maze.
    #[test]
    fn test_spawn_faces_first_slot() {
        let map = small_map(0.0, 1);
        let spawn = map.spawn();
        assert!((spawn.position.x() - 6.0).abs() < 1e-4, "{spawn:?}");
        assert!((spawn.position.y() - 4.125).abs() < 1e-4, "{spawn:?}");
        assert!((spawn.yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(map.grid().area_index(spawn.position), Some(0));
    }

    /// Tests that the same seed reproduces the same walls.
    #[test]
    fn test_seed_reproducible() {
        let a = small_map(0.5, 42);
        let b = small_map(0.5, 42);
        assert_eq!(a.segments(), b.segments());
        assert_eq!(a.placements(), b.placements());
    }

    /// Tests that the unit projection spans the plan.
    #[test]
    fn test_to_unit() {
        let map = small_map(0.0, 1);
        let (min, max) = map.extent();
        assert_eq!(map.to_unit(min), Vec2::ZERO);
        assert_eq!(map.to_unit(max), Vec2::new(1.0, 1.0));
    }
}

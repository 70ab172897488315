//! Uniform grid over the gallery plan.
//!
//! Walls and their parts are bucketed by the cells touched by their endpoints
//! and midpoint, which makes proximity queries a single lookup. The grid also
//! owns the placement slots: the parts long enough to carry a frame, reordered
//! so that list neighbours tend to be spatial neighbours.

use crate::map::segment::Segment;
use crate::math::Vec2;

/// Parts at most this long cannot hold a frame.
pub const MIN_SLOT_LENGTH: f32 = 1.0;

#[derive(Debug, Clone, Default)]
struct GridCell {
    segments: Vec<Segment>,
    parts: Vec<Segment>,
}

fn push_unique(list: &mut Vec<Segment>, segment: Segment) {
    if !list.contains(&segment) {
        list.push(segment);
    }
}

/// Spatial index over walls, parts and placement slots.
#[derive(Debug, Clone)]
pub struct GridIndex {
    cell_size: f32,
    cells_per_side: usize,
    cells: Vec<GridCell>,
    placements: Vec<Segment>,
    /// Center of the cell each placement sits in, parallel to `placements`.
    areas: Vec<Vec2>,
}

impl GridIndex {
    /// Indexes `segments` on a `2^order` square grid of `cell_size` cells.
    pub fn build(segments: &[Segment], order: u32, cell_size: f32) -> Self {
        let cells_per_side = 1usize << order;
        let mut grid = Self {
            cell_size,
            cells_per_side,
            cells: vec![GridCell::default(); cells_per_side * cells_per_side],
            placements: Vec::new(),
            areas: Vec::new(),
        };

        let mut slots = Vec::new();
        for segment in segments {
            for p in [segment.a, segment.b, segment.midpoint()] {
                if let Some(cell) = grid.cell_mut(p) {
                    push_unique(&mut cell.segments, *segment);
                }
            }
            for part in segment.split() {
                for p in [part.a, part.b, part.midpoint()] {
                    if let Some(cell) = grid.cell_mut(p) {
                        push_unique(&mut cell.segments, *segment);
                        push_unique(&mut cell.parts, part);
                    }
                }
                if part.length() > MIN_SLOT_LENGTH {
                    slots.push(part);
                }
            }
        }

        grid.placements = locality_merge(&slots, cell_size);
        grid.areas = grid
            .placements
            .iter()
            .map(|slot| {
                let mid = slot.midpoint();
                Vec2::new(
                    ((mid.x() / cell_size).floor() + 0.5) * cell_size,
                    ((mid.y() / cell_size).floor() + 0.5) * cell_size,
                )
            })
            .collect();
        grid
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cells_per_side(&self) -> usize {
        self.cells_per_side
    }

    /// Flat cell index of `p`, or `None` outside the grid.
    pub fn cell_index(&self, p: Vec2) -> Option<usize> {
        let col = (p.x() / self.cell_size).floor();
        let row = (p.y() / self.cell_size).floor();
        let side = self.cells_per_side as f32;
        if !(col >= 0.0 && col < side && row >= 0.0 && row < side) {
            return None;
        }
        Some(row as usize * self.cells_per_side + col as usize)
    }

    fn cell_mut(&mut self, p: Vec2) -> Option<&mut GridCell> {
        let index = self.cell_index(p)?;
        self.cells.get_mut(index)
    }

    /// Walls registered in the cell containing `p`; empty outside the grid.
    pub fn segments_at(&self, p: Vec2) -> &[Segment] {
        self.cell_index(p)
            .and_then(|index| self.cells.get(index))
            .map(|cell| cell.segments.as_slice())
            .unwrap_or_default()
    }

    /// Parts registered in the cell containing `p`; empty outside the grid.
    pub fn parts_at(&self, p: Vec2) -> &[Segment] {
        self.cell_index(p)
            .and_then(|index| self.cells.get(index))
            .map(|cell| cell.parts.as_slice())
            .unwrap_or_default()
    }

    /// Placement slots in locality order.
    pub fn placements(&self) -> &[Segment] {
        &self.placements
    }

    /// Placement-list index of the slot nearest to `p`.
    ///
    /// A slot matches first if its cell center is within half a cell of `p`
    /// on both axes, then if it is within one cell in Manhattan distance.
    /// Among several matches the first in list order wins, even when a wall
    /// separates it from `p`. `None` means `p` is away from every slot.
    pub fn area_index(&self, p: Vec2) -> Option<usize> {
        let r = self.cell_size;
        self.areas
            .iter()
            .position(|a| (a.x() - p.x()).abs() < r / 2.0 && (a.y() - p.y()).abs() < r / 2.0)
            .or_else(|| {
                self.areas
                    .iter()
                    .position(|a| (a.x() - p.x()).abs() + (a.y() - p.y()).abs() < r)
            })
    }
}

/// Slice of `places` clamped to its bounds; empty when the bounds cross.
fn run(places: &[Segment], from: isize, to: isize) -> &[Segment] {
    let len = places.len() as isize;
    let from = from.clamp(0, len);
    let to = to.clamp(from, len);
    &places[from as usize..to as usize]
}

/// Interleaves two runs in proportion to their lengths.
///
/// `left` is consumed front to back and `right` back to front, so both runs
/// are emitted walking toward the point where the cursors met.
fn riffle(out: &mut Vec<Segment>, left: &[Segment], right: &[Segment]) {
    let ratio = left.len() as f64 / right.len() as f64;
    let mut a = 0;
    let mut b = right.len();
    while a < left.len() && b > 0 {
        if (left.len() - a) as f64 / b as f64 > ratio {
            out.push(left[a]);
            a += 1;
        } else {
            b -= 1;
            out.push(right[b]);
        }
    }
    out.extend_from_slice(&left[a..]);
    out.extend(right[..b].iter().rev());
}

/// Reorders placement slots so list neighbours tend to be close in space.
///
/// Two cursors walk inward from both ends of the list, keyed by the
/// `2 * cell_size` block their midpoints fall in. The border loop runs out
/// along one side of a corridor and back along the other, so the cursors keep
/// meeting in shared blocks; each time they do, the runs walked since the last
/// meeting are riffled together. The output is a permutation of the input.
pub fn locality_merge(places: &[Segment], cell_size: f32) -> Vec<Segment> {
    let block = |s: &Segment| {
        let mid = s.midpoint();
        (
            (mid.x() / (2.0 * cell_size)).floor() as i64,
            (mid.y() / (2.0 * cell_size)).floor() as i64,
        )
    };

    let mut out = Vec::with_capacity(places.len());
    let mut i: isize = 0;
    let mut j: isize = places.len() as isize - 1;
    let mut left_seen: Vec<(i64, i64)> = Vec::new();
    let mut right_seen: Vec<(i64, i64)> = Vec::new();
    let mut pending: isize = 0;

    while i < j {
        let left = block(&places[i as usize]);
        let right = block(&places[j as usize]);
        let met = if left == right {
            riffle(
                &mut out,
                run(places, i - pending, i + 1),
                run(places, j, j + pending + 1),
            );
            true
        } else if let Some(k) = right_seen.iter().position(|b| *b == left) {
            let k = k as isize;
            riffle(
                &mut out,
                run(places, i - pending, i + 1),
                run(places, j + pending - k, j + pending + 1),
            );
            j += pending - k;
            true
        } else if let Some(k) = left_seen.iter().position(|b| *b == right) {
            let k = k as isize;
            riffle(
                &mut out,
                run(places, i - pending, i - pending + k + 1),
                run(places, j, j + pending + 1),
            );
            i -= pending - k;
            true
        } else {
            left_seen.push(left);
            right_seen.push(right);
            pending += 1;
            false
        };
        if met {
            left_seen.clear();
            right_seen.clear();
            pending = 0;
        }
        i += 1;
        j -= 1;
    }
    out.extend_from_slice(run(places, i - pending, j + pending + 1));
    out
}

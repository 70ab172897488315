//! Hilbert curve construction and maze border derivation.
//!
//! The gallery's walls are the outline of a thickened Hilbert curve. The curve
//! is built recursively, every joint is classified by its turn sign, and the
//! path is walked once forward and once mirrored so that the outline closes on
//! itself. Some walls are then knocked down at random to open up rooms.
//!
//! # Examples
//!
//! ```rust
//! use hilbert_gallery::maze::hilbert::{border_path, hilbert_curve};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! assert_eq!(hilbert_curve(2).len(), 16);
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let border = border_path(3, 0.25, 0.0, &mut rng).unwrap();
//! assert_eq!(border.first(), border.last());
//! ```

use crate::error::{GalleryError, Result};
use crate::math::{Vec2, sign};
use rand::Rng;

/// A path vertex together with its neighbours and turn sign.
///
/// `turn` is `+1` for a left turn, `-1` for a right turn and `0` when the path
/// runs straight. Collapsing a joint lowers the sign on both sides of it, so a
/// value may drift below `-1` after repeated collapses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub prev: Vec2,
    pub at: Vec2,
    pub next: Vec2,
    pub turn: i32,
}

impl Joint {
    fn new(prev: Vec2, at: Vec2, next: Vec2) -> Self {
        let incoming = at - prev;
        let outgoing = next - at;
        Self {
            prev,
            at,
            next,
            turn: sign(incoming.cross(&outgoing)),
        }
    }

    /// The same joint walked in the opposite direction.
    fn reversed(&self) -> Self {
        Self {
            prev: self.next,
            at: self.at,
            next: self.prev,
            turn: -self.turn,
        }
    }
}

/// Result of border derivation before it is emitted as points.
#[derive(Debug, Clone)]
pub struct Border {
    pub joints: Vec<Joint>,
    /// Walls knocked down against the removal budget.
    pub removed: usize,
    /// Walls tidied up afterwards because they left a spike.
    pub tidied: usize,
}

/// Maps `points` into one quadrant of the next order.
///
/// `swap` picks which coordinate becomes x, `sign` mirrors before the
/// translation `(tx, ty)`, and everything is halved.
fn quadrant(points: &[Vec2], swap: usize, tx: f32, ty: f32, sign: f32) -> Vec<Vec2> {
    points
        .iter()
        .map(|v| {
            Vec2::new(
                (sign * v.axis(swap) + tx) / 2.0,
                (sign * v.axis(1 - swap) + ty) / 2.0,
            )
        })
        .collect()
}

/// Generates the Hilbert curve of the given order inside the unit square.
///
/// Order `n` has `4^n` points. An order of zero is treated as one.
pub fn hilbert_curve(order: u32) -> Vec<Vec2> {
    if order <= 1 {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ];
        return quadrant(&square, 0, 0.5, 0.5, 1.0);
    }

    let half = hilbert_curve(order - 1);
    let mut curve = Vec::with_capacity(half.len() * 4);
    curve.extend(quadrant(&half, 1, 0.0, 0.0, 1.0));
    curve.extend(quadrant(&half, 0, 0.0, 1.0, 1.0));
    curve.extend(quadrant(&half, 0, 1.0, 1.0, 1.0));
    curve.extend(quadrant(&half, 1, 2.0, 1.0, -1.0));
    curve
}

fn is_concave_pair(joints: &[Joint], at: usize) -> bool {
    joints[at + 1].turn == -1 && joints[at + 2].turn == -1
}

/// Removes the two concave joints after `at`, joining `at` to `at + 3`.
fn collapse(joints: &mut Vec<Joint>, at: usize) {
    joints[at].turn -= 1;
    joints[at + 3].turn -= 1;
    joints[at].next = joints[at + 3].at;
    joints[at + 3].prev = joints[at].at;
    joints.drain(at + 1..at + 3);
}

/// Classifies the curve and mirrors it into a closed loop of joints.
fn closed_joints(order: u32) -> Vec<Joint> {
    let mut points = hilbert_curve(order);
    let head = points[3];
    let tail = points[points.len() - 4];
    points.insert(0, head);
    points.push(tail);

    let mut forward: Vec<Joint> = points
        .windows(3)
        .map(|w| Joint::new(w[0], w[1], w[2]))
        .collect();
    let mut mirrored: Vec<Joint> = forward.iter().rev().map(Joint::reversed).collect();

    if order % 2 == 1 {
        forward.truncate(forward.len().saturating_sub(3));
    } else {
        mirrored.drain(..3.min(mirrored.len()));
    }
    forward.extend(mirrored);
    forward
}

/// Derives the joints of the maze border for a curve of `order`.
///
/// `removal` is the fraction of `4^order` walls to knock down. Candidates are
/// drawn from `rng`, so a seeded generator reproduces the same maze.
pub fn derive_border<R: Rng>(order: u32, removal: f32, rng: &mut R) -> Result<Border> {
    let mut joints = closed_joints(order);
    if joints.len() < 4 {
        return Err(GalleryError::generation(format!(
            "order {order} border has only {} joints",
            joints.len()
        )));
    }

    let budget = (removal as f64 * 4f64.powi(order as i32)).round() as usize;
    let mut removed = 0;
    while removed < budget {
        let span = joints.len().saturating_sub(3);
        if span == 0 {
            break;
        }
        let start = rng.gen_range(0..span);
        let Some(at) = (0..span)
            .map(|k| (start + k) % span)
            .find(|&at| is_concave_pair(&joints, at))
        else {
            log::debug!(
                "no concave joint left after {removed} of {budget} removals, skipping the rest"
            );
            break;
        };
        collapse(&mut joints, at);
        removed += 1;
    }

    let mut tidied = 0;
    loop {
        let mut changed = false;
        let mut i = 0;
        while i + 3 < joints.len() {
            if (joints[i].turn == 1 || joints[i + 3].turn == 1) && is_concave_pair(&joints, i) {
                collapse(&mut joints, i);
                tidied += 1;
                changed = true;
            }
            i += 1;
        }
        if !changed {
            break;
        }
    }

    Ok(Border {
        joints,
        removed,
        tidied,
    })
}

/// Offsets every joint to the wall line and closes the loop.
///
/// `wall_width` is the wall thickness relative to a corridor; a joint is
/// pushed out along its two edges by `0.5 - wall_width / 4` of their length.
pub fn emit_path(border: &Border, order: u32, wall_width: f32) -> Result<Vec<Vec2>> {
    let offset = 0.5 - wall_width / 4.0;
    let mut path: Vec<Vec2> = border
        .joints
        .iter()
        .filter(|joint| joint.turn != 0)
        .map(|joint| {
            let incoming = (joint.at - joint.prev) * offset;
            let outgoing = (joint.next - joint.at) * offset;
            joint.at + (incoming - outgoing) * joint.turn as f32
        })
        .collect();

    let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
        return Err(GalleryError::generation("border emitted no points"));
    };
    if order % 2 == 1 {
        path[0] = last;
    } else if let Some(end) = path.last_mut() {
        *end = first;
    }

    if path.len() < 4 {
        return Err(GalleryError::generation(format!(
            "border collapsed to {} points",
            path.len()
        )));
    }
    Ok(path)
}

/// Builds the closed maze outline in the unit square.
///
/// This is [`derive_border`] followed by [`emit_path`].
pub fn border_path<R: Rng>(
    order: u32,
    wall_width: f32,
    removal: f32,
    rng: &mut R,
) -> Result<Vec<Vec2>> {
    let border = derive_border(order, removal, rng)?;
    log::debug!(
        "order {order} border: {} joints, {} removed, {} tidied",
        border.joints.len(),
        border.removed,
        border.tidied
    );
    emit_path(&border, order, wall_width)
}

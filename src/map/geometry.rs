//! Renderer-facing geometry for walls, floor and ceiling.
//!
//! Buffers are kept as flat attribute arrays (positions, normals, triangle
//! indices) in world units. [`MapGeometry::vertices`] interleaves them into
//! [`Vertex`] records that can be cast to bytes for a vertex buffer.

use crate::map::segment::Segment;
use crate::math::Vec3;

/// Interleaved vertex as uploaded to the GPU.
///
/// Each vertex contains:
/// - `position`: 3D position in world space.
/// - `normal`: unit normal facing into the gallery.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Debug, Clone, Default)]
pub struct MapGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

impl MapGeometry {
    /// Builds one quad per wall plus a ceiling and a floor covering `size`².
    pub fn build(segments: &[Segment], size: f32, wall_height: f32) -> Self {
        let mut geometry = Self::default();
        for segment in segments {
            let n = segment.inward_normal();
            geometry.push_quad(
                [
                    segment.a.at_height(0.0),
                    segment.a.at_height(wall_height),
                    segment.b.at_height(0.0),
                    segment.b.at_height(wall_height),
                ],
                Vec3::new(n.x(), 0.0, n.y()),
            );
        }

        let h = wall_height;
        geometry.push_quad(
            [
                Vec3::new(0.0, h, 0.0),
                Vec3::new(0.0, h, size),
                Vec3::new(size, h, 0.0),
                Vec3::new(size, h, size),
            ],
            Vec3::new(0.0, -1.0, 0.0),
        );
        geometry.push_quad(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(size, 0.0, 0.0),
                Vec3::new(0.0, 0.0, size),
                Vec3::new(size, 0.0, size),
            ],
            Vec3::new(0.0, 1.0, 0.0),
        );
        geometry
    }

    /// Appends a quad given as two bottom/top corner pairs.
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.positions.len() as u32;
        for corner in corners {
            self.positions.push(corner.into());
            self.normals.push(normal.into());
        }
        self.triangles.push([base, base + 2, base + 1]);
        self.triangles.push([base + 1, base + 2, base + 3]);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(&position, &normal)| Vertex { position, normal })
            .collect()
    }

    /// Triangle indices flattened for an index buffer.
    pub fn indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.triangles)
    }
}

//! Engine-agnostic terrain mesh buffers.
//!
//! [`TerrainMesh`] is the output of every builder in this crate. It holds
//! plain vertex and index buffers and converts into a Bevy [`Mesh`] on demand,
//! so callers that only need OBJ output never touch the render world.

use bevy::asset::RenderAssetUsages;
use bevy::math::{Vec2, Vec3};
use bevy::mesh::{Indices, Mesh, PrimitiveTopology};

/// Triangle mesh produced from a height field.
///
/// Invariants: `uvs.len() == positions.len()`, `normals` is either empty or
/// the same length, `colors` (when present) matches the vertex count, and
/// every index is a valid vertex offset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Option<Vec<[f32; 4]>>,
    pub indices: Vec<u32>,
    pub normals: Vec<Vec3>,
}

impl TerrainMesh {
    /// Creates a mesh without colours or normals.
    pub fn new(positions: Vec<Vec3>, uvs: Vec<Vec2>, indices: Vec<u32>) -> Self {
        debug_assert_eq!(positions.len(), uvs.len());
        Self {
            positions,
            uvs,
            colors: None,
            indices,
            normals: Vec::new(),
        }
    }

    /// Number of vertices in the position buffer.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles in the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Gives every triangle its own copy of its three vertices.
    ///
    /// Positions, UVs and colours are duplicated in triangle order and the
    /// index buffer becomes `0..3 * triangle_count`. Normals are cleared and
    /// must be recalculated.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range for the position, UV or colour
    /// buffers.
    pub fn flatten(&mut self) {
        let n = self.indices.len();
        let mut positions = Vec::with_capacity(n);
        let mut uvs = Vec::with_capacity(n);
        let mut colors = self.colors.as_ref().map(|_| Vec::with_capacity(n));

        for &i in &self.indices {
            let i = i as usize;
            positions.push(self.positions[i]);
            uvs.push(self.uvs[i]);
            if let (Some(out), Some(src)) = (colors.as_mut(), self.colors.as_ref()) {
                out.push(src[i]);
            }
        }

        self.positions = positions;
        self.uvs = uvs;
        self.colors = colors;
        self.indices = (0..n as u32).collect();
        self.normals.clear();
    }

    /// Reverses the whole index buffer, flipping the winding of every
    /// triangle (and the order triangles appear in).
    pub fn reverse_indices(&mut self) {
        self.indices.reverse();
    }

    /// Recomputes per-vertex normals by area-weighted face normal averaging.
    ///
    /// Each triangle's unnormalised `cross(p1 - p0, p2 - p0)` is accumulated
    /// at its three vertices, so zero-area triangles contribute nothing. A
    /// vertex with no contribution gets `+Y`.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range for the position buffer.
    pub fn recalculate_normals(&mut self) {
        self.normals = area_weighted_normals(&self.positions, &self.indices);
    }

    /// Axis-aligned bounds of all vertex positions, or `None` for no vertices.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }
}

/// Area-weighted smooth normals for an indexed triangle list.
pub(crate) fn area_weighted_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let p0 = positions[i0];
        let face_normal = (positions[i1] - p0).cross(positions[i2] - p0);
        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    normals
        .into_iter()
        .map(|n| {
            let len = n.length();
            if len > f32::EPSILON { n / len } else { Vec3::Y }
        })
        .collect()
}

impl From<&TerrainMesh> for Mesh {
    /// Builds a `TriangleList` mesh with POSITION, NORMAL, UV_0, optional
    /// COLOR and `u32` indices. Normals are computed if the source has none.
    fn from(terrain: &TerrainMesh) -> Self {
        let normals = if terrain.normals.len() == terrain.positions.len() {
            terrain.normals.clone()
        } else {
            area_weighted_normals(&terrain.positions, &terrain.indices)
        };

        let positions: Vec<[f32; 3]> = terrain.positions.iter().map(|p| p.to_array()).collect();
        let normals: Vec<[f32; 3]> = normals.iter().map(|n| n.to_array()).collect();
        let uvs: Vec<[f32; 2]> = terrain.uvs.iter().map(|uv| uv.to_array()).collect();

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        if let Some(colors) = &terrain.colors {
            mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors.clone());
        }
        mesh.insert_indices(Indices::U32(terrain.indices.clone()));
        mesh
    }
}

impl From<TerrainMesh> for Mesh {
    fn from(terrain: TerrainMesh) -> Self {
        Mesh::from(&terrain)
    }
}

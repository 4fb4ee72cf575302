//! LOD mesh generation from [`HeightField`] data.
//!
//! Converts a height field into a [`TerrainMesh`] with:
//! - nearest-sample downsampling at `2^stride_level`
//! - world-space extent preserved at every LOD
//! - sharp (per-triangle vertices) or smooth (shared vertices) topology
//! - optional vertex colours sampled from a blurred baked texture
//! - area-weighted per-vertex normals

use bevy::log::{debug, info};

use crate::color::{ColorBuffer, ColorSource};
use crate::error::Result;
use crate::heightfield::HeightField;
use crate::mesh::TerrainMesh;
use crate::settings::{EdgeMode, LodParameters};

/// Builds one LOD of a terrain mesh from a [`HeightField`].
///
/// Grid vertex `(x, y)` of the reduced grid lands at
/// `position + mesh_scale * (y, height(x, y), x)`; grid rows run along world X
/// and columns along world Z. Each grid cell emits two triangles:
///
/// ```text
///   a = (x, y)     c = (x + 1, y)
///   b = (x, y + 1) d = (x + 1, y + 1)
///
///   Triangle 1: a, b, c
///   Triangle 2: b, d, c
/// ```
///
/// Smooth meshes reverse the complete index buffer afterwards, which turns
/// both triangles to face +Y. Sharp meshes keep the original order and are
/// flattened so each triangle owns its vertices.
///
/// # Example
///
/// ```ignore
/// use bevy::math::Vec3;
/// use bevy_terrain_export::{HeightField, LodParameters, TerrainMeshBuilder};
///
/// let field = HeightField::flat(65, 65, Vec3::new(64.0, 10.0, 64.0))?;
/// let mesh = TerrainMeshBuilder::new()
///     .with_lod(LodParameters::at_stride(1))
///     .build(&field)?;
/// assert_eq!(mesh.vertex_count(), 33 * 33);
/// ```
#[derive(Default)]
pub struct TerrainMeshBuilder<'a> {
    lod: LodParameters,
    color_source: Option<&'a dyn ColorSource>,
}

impl<'a> TerrainMeshBuilder<'a> {
    /// Creates a builder for a full-resolution smooth mesh without colours.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the LOD parameters to build with.
    pub fn with_lod(mut self, lod: LodParameters) -> Self {
        self.lod = lod;
        self
    }

    /// Supplies the baked colour capture used when the LOD asks for vertex
    /// colours. A source with a zero-sized mip is ignored.
    pub fn with_color_source(mut self, source: &'a dyn ColorSource) -> Self {
        self.color_source = Some(source);
        self
    }

    /// The LOD parameters this builder will use.
    pub fn lod(&self) -> &LodParameters {
        &self.lod
    }

    /// Builds the mesh for the configured LOD.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ExportError::InvalidInput`] if the stride level is out
    /// of range. Grids too small to hold a cell produce an empty mesh instead.
    pub fn build(&self, field: &HeightField) -> Result<TerrainMesh> {
        let sampler = field.sampler(self.lod.stride_level)?;
        let (w, h) = (sampler.width(), sampler.height());

        let mut positions = Vec::with_capacity(sampler.vertex_count());
        let mut uvs = Vec::with_capacity(sampler.vertex_count());
        for y in 0..h {
            for x in 0..w {
                positions.push(sampler.vertex_position(x, y));
                uvs.push(sampler.vertex_uv(x, y));
            }
        }

        let mut indices = Vec::with_capacity(sampler.cell_count() * 6);
        for y in 0..h.saturating_sub(1) {
            for x in 0..w.saturating_sub(1) {
                let a = sampler.vertex_index(x, y);
                let b = sampler.vertex_index(x, y + 1);
                let c = sampler.vertex_index(x + 1, y);
                let d = sampler.vertex_index(x + 1, y + 1);

                indices.extend_from_slice(&[a, b, c]);
                indices.extend_from_slice(&[b, d, c]);
            }
        }

        let mut mesh = TerrainMesh::new(positions, uvs, indices);
        match self.lod.edge_mode {
            EdgeMode::Sharp => mesh.flatten(),
            EdgeMode::Smooth => mesh.reverse_indices(),
        }

        if self.lod.bake_vertex_colors {
            self.bake_vertex_colors(&mut mesh)?;
        }

        mesh.recalculate_normals();

        debug!(
            "built {:?} terrain LOD at stride {}: {}×{} grid, {} vertices, {} triangles",
            self.lod.edge_mode,
            sampler.stride(),
            w,
            h,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        Ok(mesh)
    }

    fn bake_vertex_colors(&self, mesh: &mut TerrainMesh) -> Result<()> {
        let Some(source) = self
            .color_source
            .filter(|s| s.mip_width() > 0 && s.mip_height() > 0)
        else {
            debug!("no baked colour texture available, skipping vertex colours");
            return Ok(());
        };

        let texture =
            ColorBuffer::from_source(source)?.smoothed(self.lod.vertex_color_smoothing_passes);
        mesh.colors = Some(mesh.uvs.iter().map(|uv| texture.sample_uv(*uv)).collect());
        Ok(())
    }
}

/// Builds one mesh per entry of `lods`, in order.
///
/// The first failing level aborts the chain and its error is returned; no
/// partial chain is handed back.
pub fn build_lod_chain(
    field: &HeightField,
    lods: &[LodParameters],
    color_source: Option<&dyn ColorSource>,
) -> Result<Vec<TerrainMesh>> {
    let mut meshes = Vec::with_capacity(lods.len());
    for (index, lod) in lods.iter().enumerate() {
        let mut builder = TerrainMeshBuilder::new().with_lod(lod.clone());
        if let Some(source) = color_source {
            builder = builder.with_color_source(source);
        }
        let mesh = builder.build(field)?;
        debug!("{}: {} triangles", lod.asset_name(index), mesh.triangle_count());
        meshes.push(mesh);
    }

    info!(
        "built {} terrain LODs from a {}×{} height field",
        meshes.len(),
        field.width(),
        field.height()
    );
    Ok(meshes)
}

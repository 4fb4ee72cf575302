//! Mask-driven splitting of a terrain into interior and exterior meshes.

use bevy::log::debug;
use bevy::math::Vec2;

use crate::error::{ExportError, Result};
use crate::heightfield::{HeightField, HeightSampler};
use crate::mask::Mask;
use crate::mesh::TerrainMesh;
use crate::settings::{ExportSettings, Winding};

/// The two disjoint meshes produced by [`MaskedMeshCarver::carve`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarvedMeshes {
    /// Cells where the (possibly inverted) mask predicate holds.
    pub interior: TerrainMesh,
    /// Every other cell.
    pub exterior: TerrainMesh,
    interior_cells: usize,
    exterior_cells: usize,
}

impl CarvedMeshes {
    /// Cells routed to the interior mesh.
    pub fn interior_cells(&self) -> usize {
        self.interior_cells
    }

    /// Cells routed to the exterior mesh.
    pub fn exterior_cells(&self) -> usize {
        self.exterior_cells
    }

    /// Total cells classified; always the full reduced grid.
    pub fn cell_count(&self) -> usize {
        self.interior_cells + self.exterior_cells
    }
}

/// Splits a height field into interior and exterior meshes using a [`Mask`].
///
/// Each reduced grid cell is classified by the mask texel under its centre.
/// Each output mesh gets its own compact vertex buffer containing only the
/// grid vertices its cells touch, in first-use order. Winding is chosen
/// explicitly and does not depend on [`crate::EdgeMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskedMeshCarver {
    stride_level: u32,
    winding: Winding,
}

impl MaskedMeshCarver {
    /// Creates a full-resolution carver with counter-clockwise winding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the carve stride and winding from export settings.
    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self {
            stride_level: settings.carve_stride_level,
            winding: settings.carve_winding,
        }
    }

    /// Sets the LOD stride level of the carved grid.
    pub fn with_stride_level(mut self, stride_level: u32) -> Self {
        self.stride_level = stride_level;
        self
    }

    /// Sets the winding of emitted triangles.
    pub fn with_winding(mut self, winding: Winding) -> Self {
        self.winding = winding;
        self
    }

    /// Per-cell membership (`true` = interior), row-major over the reduced
    /// cell grid.
    pub fn classify(&self, field: &HeightField, mask: &Mask) -> Result<Vec<bool>> {
        let sampler = field.sampler(self.stride_level)?;
        Ok(classify_cells(&sampler, mask))
    }

    /// Carves `field` into interior and exterior meshes.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::MissingHeightData`] when `field` is `None`, and
    /// [`ExportError::InvalidInput`] for an out-of-range stride level.
    pub fn carve(&self, field: Option<&HeightField>, mask: &Mask) -> Result<CarvedMeshes> {
        let field = field.ok_or(ExportError::MissingHeightData)?;
        let sampler = field.sampler(self.stride_level)?;
        let membership = classify_cells(&sampler, mask);

        let mut interior = SubMesh::new(&sampler);
        let mut exterior = SubMesh::new(&sampler);
        let cells_x = sampler.width().saturating_sub(1);

        for (cell, &inside) in membership.iter().enumerate() {
            let (x, y) = (cell % cells_x, cell / cells_x);
            let target = if inside { &mut interior } else { &mut exterior };
            target.push_cell(x, y, self.winding);
        }

        let interior_cells = interior.cells;
        let exterior_cells = exterior.cells;
        debug!(
            "carved terrain at stride {}: {} interior cells, {} exterior cells",
            sampler.stride(),
            interior_cells,
            exterior_cells
        );

        Ok(CarvedMeshes {
            interior: interior.finish(),
            exterior: exterior.finish(),
            interior_cells,
            exterior_cells,
        })
    }
}

fn classify_cells(sampler: &HeightSampler<'_>, mask: &Mask) -> Vec<bool> {
    let cells_x = sampler.width().saturating_sub(1);
    let cells_y = sampler.height().saturating_sub(1);
    let field = sampler.field();
    let stride = sampler.stride() as f32;
    let span_x = field.width().saturating_sub(1).max(1) as f32;
    let span_y = field.height().saturating_sub(1).max(1) as f32;

    let mut membership = Vec::with_capacity(cells_x * cells_y);
    for y in 0..cells_y {
        for x in 0..cells_x {
            let centre = Vec2::new(
                (x as f32 + 0.5) * stride / span_x,
                (y as f32 + 0.5) * stride / span_y,
            );
            membership.push(mask.contains_uv(centre));
        }
    }
    membership
}

struct SubMesh<'s, 'a> {
    sampler: &'s HeightSampler<'a>,
    remap: Vec<Option<u32>>,
    mesh: TerrainMesh,
    cells: usize,
}

impl<'s, 'a> SubMesh<'s, 'a> {
    fn new(sampler: &'s HeightSampler<'a>) -> Self {
        Self {
            sampler,
            remap: vec![None; sampler.vertex_count()],
            mesh: TerrainMesh::default(),
            cells: 0,
        }
    }

    fn vertex(&mut self, x: usize, y: usize) -> u32 {
        let grid_index = self.sampler.vertex_index(x, y) as usize;
        if let Some(local) = self.remap[grid_index] {
            return local;
        }
        let local = self.mesh.positions.len() as u32;
        self.mesh.positions.push(self.sampler.vertex_position(x, y));
        self.mesh.uvs.push(self.sampler.vertex_uv(x, y));
        self.remap[grid_index] = Some(local);
        local
    }

    fn push_cell(&mut self, x: usize, y: usize, winding: Winding) {
        let a = self.vertex(x, y);
        let b = self.vertex(x, y + 1);
        let c = self.vertex(x + 1, y);
        let d = self.vertex(x + 1, y + 1);

        let triangles = match winding {
            Winding::Clockwise => [a, b, c, b, d, c],
            Winding::CounterClockwise => [a, c, b, b, c, d],
        };
        self.mesh.indices.extend_from_slice(&triangles);
        self.cells += 1;
    }

    fn finish(mut self) -> TerrainMesh {
        self.mesh.recalculate_normals();
        self.mesh
    }
}

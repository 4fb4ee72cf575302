//! Avian3D physics collider generation from [`HeightField`] data.
//!
//! Provides [`build_heightfield_collider`] which converts a height field, at
//! any LOD stride, into an Avian3D `Collider::heightfield`. Colliders are
//! usually built a level or two coarser than the render mesh.

use avian3d::prelude::Collider;
use bevy::math::Vec3;

use crate::error::{ExportError, Result};
use crate::heightfield::HeightField;

/// Builds an Avian3D `Collider::heightfield` from a [`HeightField`] sampled at
/// `stride_level`.
///
/// Heights are converted to world units (`sample * size.y`). The collider is
/// centred on its local origin and spans the same world extent as a
/// [`crate::TerrainMeshBuilder`] mesh at that stride; offset the entity by half
/// that extent plus the field position to line the two up.
///
/// # Errors
///
/// Returns [`crate::ExportError::InvalidInput`] for an out-of-range stride,
/// or when the reduced grid has fewer than two rows or columns. Avian needs at
/// least a 2×2 grid of heights.
///
/// # Example
///
/// ```ignore
/// use bevy::math::Vec3;
/// use bevy_terrain_export::{HeightField, build_heightfield_collider};
///
/// let field = HeightField::flat(129, 129, Vec3::new(128.0, 20.0, 128.0))?;
/// let collider = build_heightfield_collider(&field, 2)?;
/// // commands.spawn((collider, ...));
/// ```
pub fn build_heightfield_collider(field: &HeightField, stride_level: u32) -> Result<Collider> {
    let sampler = field.sampler(stride_level)?;
    if sampler.width() < 2 || sampler.height() < 2 {
        return Err(ExportError::invalid(format!(
            "heightfield collider needs at least 2×2 heights, stride {} leaves {}×{}",
            sampler.stride(),
            sampler.width(),
            sampler.height()
        )));
    }
    let scale = sampler.mesh_scale();

    // Avian's heightfield is `heights[row][col]` with rows along world X and
    // columns along world Z. Mesh vertices put grid `y` on X and grid `x` on
    // Z, so rows are indexed by `y` here.
    let heights: Vec<Vec<f32>> = (0..sampler.height())
        .map(|y| {
            (0..sampler.width())
                .map(|x| sampler.height_at(x, y) * scale.y)
                .collect()
        })
        .collect();

    let extent = Vec3::new(
        scale.x * (sampler.height() - 1) as f32,
        1.0,
        scale.z * (sampler.width() - 1) as f32,
    );

    Ok(Collider::heightfield(heights, extent))
}

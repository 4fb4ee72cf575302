//! Terrain height field to LOD mesh conversion for Bevy.
//!
//! Turns a [`HeightField`] snapshot into [`TerrainMesh`] buffers that can be
//! converted to a Bevy [`Mesh`](bevy::mesh::Mesh), written as Wavefront OBJ, or
//! split into interior and exterior parts by a [`Mask`].
//!
//! # Features
//!
//! - **LOD meshes**: nearest-sample downsampling at `2^stride_level`, with the
//!   world extent preserved, via [`TerrainMeshBuilder`] and [`build_lod_chain`].
//! - **Edge modes**: [`EdgeMode::Sharp`] gives every triangle its own vertices
//!   for faceted shading; [`EdgeMode::Smooth`] shares vertices.
//! - **Vertex colours**: sampled from a box-blurred baked texture through the
//!   [`ColorSource`] trait; a Bevy `Image` converts via [`ColorBuffer::from_image`].
//! - **Masked carving**: [`MaskedMeshCarver`] splits the grid into two disjoint
//!   meshes by a grayscale [`Mask`].
//! - **OBJ output**: [`obj::write_obj`] and [`obj::write_quad_obj`].
//! - **Settings**: [`ExportSettings`] persisted as RON.
//! - **Physics colliders** (optional, `physics` feature): an Avian3D
//!   `Collider::heightfield` at any stride via [`collider`].
//!
//! # Feature Flags
//!
//! - `physics`: Enables [`collider`] and [`collider::build_heightfield_collider`].
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_terrain_export::{EdgeMode, HeightField, LodParameters, TerrainMeshBuilder};
//!
//! fn setup(
//!     mut commands: Commands,
//!     mut meshes: ResMut<Assets<Mesh>>,
//!     mut materials: ResMut<Assets<StandardMaterial>>,
//! ) {
//!     let field = HeightField::from_fn(129, 129, Vec3::new(128.0, 16.0, 128.0), |x, y| {
//!         ((x + y) as f32 * 0.05).sin() * 0.5 + 0.5
//!     })
//!     .expect("valid height field");
//!
//!     let terrain = TerrainMeshBuilder::new()
//!         .with_lod(LodParameters::at_stride(1).with_edge_mode(EdgeMode::Sharp))
//!         .build(&field)
//!         .expect("valid LOD");
//!
//!     commands.spawn((
//!         Mesh3d(meshes.add(Mesh::from(&terrain))),
//!         MeshMaterial3d(materials.add(StandardMaterial::default())),
//!     ));
//! }
//! ```

pub mod carver;
pub mod color;
pub mod error;
pub mod heightfield;
pub mod mask;
pub mod mesh;
pub mod mesher;
pub mod obj;
pub mod settings;

#[cfg(feature = "physics")]
pub mod collider;

pub use carver::{CarvedMeshes, MaskedMeshCarver};
pub use color::{ColorBuffer, ColorSource};
pub use error::{ExportError, Result};
pub use heightfield::{HeightField, HeightSampler, MAX_STRIDE_LEVEL, reduced_dimension};
pub use mask::Mask;
pub use mesh::TerrainMesh;
pub use mesher::{TerrainMeshBuilder, build_lod_chain};
pub use settings::{EdgeMode, ExportSettings, LodParameters, Winding};

#[cfg(feature = "physics")]
pub use collider::build_heightfield_collider;

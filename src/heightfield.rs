//! Height field snapshots and stride-based LOD sampling.
//!
//! A [`HeightField`] is an immutable grid of normalised elevation samples
//! together with the world-space extent it covers. A [`HeightSampler`] views
//! that grid at a reduced resolution of `2^stride_level` samples per step,
//! picking the nearest sample rather than interpolating so that exported
//! geometry lines up exactly with the source grid.

use bevy::math::{Vec2, Vec3};

use crate::error::{ExportError, Result};

/// Largest accepted `stride_level`; `2^30` is already far beyond any real grid.
pub const MAX_STRIDE_LEVEL: u32 = 30;

/// Immutable snapshot of a terrain height grid.
///
/// Samples are stored row-major (`samples[y * width + x]`) and are expected to
/// be normalised elevations; the world-space height of a sample is
/// `sample * size.y`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    samples: Vec<f32>,
    size: Vec3,
    position: Vec3,
}

impl HeightField {
    /// Creates a height field from row-major samples.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidInput`] if either dimension is zero, the
    /// sample count is not `width * height`, or `size` is not finite.
    pub fn new(width: usize, height: usize, samples: Vec<f32>, size: Vec3) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ExportError::invalid(format!(
                "height field dimensions must be positive (got {width}×{height})"
            )));
        }
        if samples.len() != width * height {
            return Err(ExportError::invalid(format!(
                "expected {} height samples for a {width}×{height} grid, got {}",
                width * height,
                samples.len()
            )));
        }
        if !size.is_finite() {
            return Err(ExportError::invalid(format!(
                "height field size must be finite (got {size})"
            )));
        }

        Ok(Self {
            width,
            height,
            samples,
            size,
            position: Vec3::ZERO,
        })
    }

    /// Creates a height field with every sample set to zero.
    pub fn flat(width: usize, height: usize, size: Vec3) -> Result<Self> {
        Self::new(width, height, vec![0.0; width * height], size)
    }

    /// Creates a height field by evaluating `f(x, y)` for every grid sample.
    pub fn from_fn(
        width: usize,
        height: usize,
        size: Vec3,
        mut f: impl FnMut(usize, usize) -> f32,
    ) -> Result<Self> {
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self::new(width, height, samples, size)
    }

    /// Sets the world-space offset added to every emitted vertex.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Samples per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// World-space extent of the whole grid (x, max elevation, z).
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// World-space offset applied to every vertex.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Raw samples, row-major.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Returns the raw sample at `(x, y)`, clamping both indices into the grid.
    #[inline]
    pub fn raw(&self, x: usize, y: usize) -> f32 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.samples[y * self.width + x]
    }

    /// Largest raw sample in the grid.
    pub fn max_sample(&self) -> f32 {
        self.samples.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Returns a sampler viewing this field at the given LOD stride level.
    pub fn sampler(&self, stride_level: u32) -> Result<HeightSampler<'_>> {
        HeightSampler::new(self, stride_level)
    }
}

/// Size of one grid axis after downsampling by `stride` samples per step.
///
/// Trailing samples that do not fill a whole stride are dropped.
#[inline]
pub fn reduced_dimension(dimension: usize, stride: usize) -> usize {
    (dimension - 1) / stride + 1
}

/// Nearest-sample view of a [`HeightField`] at a reduced LOD resolution.
#[derive(Debug, Clone, Copy)]
pub struct HeightSampler<'a> {
    field: &'a HeightField,
    stride: usize,
    width: usize,
    height: usize,
}

impl<'a> HeightSampler<'a> {
    /// Creates a sampler with `stride = 2^stride_level`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidInput`] if `stride_level` exceeds
    /// [`MAX_STRIDE_LEVEL`].
    pub fn new(field: &'a HeightField, stride_level: u32) -> Result<Self> {
        if stride_level > MAX_STRIDE_LEVEL {
            return Err(ExportError::invalid(format!(
                "stride level {stride_level} exceeds the maximum of {MAX_STRIDE_LEVEL}"
            )));
        }
        let stride = 1usize << stride_level;
        Ok(Self {
            field,
            stride,
            width: reduced_dimension(field.width, stride),
            height: reduced_dimension(field.height, stride),
        })
    }

    /// The full-resolution field being sampled.
    pub fn field(&self) -> &'a HeightField {
        self.field
    }

    /// Grid samples skipped per reduced step (`tRes`).
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Reduced grid width `w'`.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Reduced grid height `h'`.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of reduced grid vertices.
    pub fn vertex_count(&self) -> usize {
        self.width * self.height
    }

    /// Number of quad cells spanned by the reduced grid.
    pub fn cell_count(&self) -> usize {
        self.width.saturating_sub(1) * self.height.saturating_sub(1)
    }

    /// Raw sample under reduced grid coordinate `(x, y)`.
    #[inline]
    pub fn height_at(&self, x: usize, y: usize) -> f32 {
        self.field.raw(x * self.stride, y * self.stride)
    }

    /// World-space scale of one reduced step on each axis.
    ///
    /// Keeps the mesh at the field's full world extent regardless of stride.
    pub fn mesh_scale(&self) -> Vec3 {
        let size = self.field.size;
        let stride = self.stride as f32;
        Vec3::new(
            size.x / axis_divisor(self.field.width) * stride,
            size.y,
            size.z / axis_divisor(self.field.height) * stride,
        )
    }

    /// UV scale of one full-resolution grid step.
    pub fn uv_scale(&self) -> Vec2 {
        Vec2::new(
            1.0 / axis_divisor(self.field.width),
            1.0 / axis_divisor(self.field.height),
        )
    }

    /// World-space vertex position for reduced grid coordinate `(x, y)`.
    ///
    /// Grid `y` runs along world X and grid `x` along world Z.
    #[inline]
    pub fn vertex_position(&self, x: usize, y: usize) -> Vec3 {
        self.mesh_scale() * Vec3::new(y as f32, self.height_at(x, y), x as f32)
            + self.field.position
    }

    /// Texture coordinate for reduced grid coordinate `(x, y)`.
    #[inline]
    pub fn vertex_uv(&self, x: usize, y: usize) -> Vec2 {
        self.uv_scale() * Vec2::new((y * self.stride) as f32, (x * self.stride) as f32)
    }

    /// Index of reduced grid vertex `(x, y)` in a row-major vertex buffer.
    #[inline]
    pub fn vertex_index(&self, x: usize, y: usize) -> u32 {
        (y * self.width + x) as u32
    }
}

fn axis_divisor(dimension: usize) -> f32 {
    dimension.saturating_sub(1).max(1) as f32
}

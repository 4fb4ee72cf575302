//! Grayscale masks used to split terrain into interior and exterior parts.

use bevy::image::Image;
use bevy::math::Vec2;

use crate::error::{ExportError, Result};

/// Default weight at or above which a mask texel counts as inside.
pub const DEFAULT_MASK_THRESHOLD: f32 = 0.5;

/// A grayscale weight grid laid over the terrain.
///
/// Texels cover the terrain uniformly: texel `(x, y)` spans
/// `[x / width, (x + 1) / width) × [y / height, (y + 1) / height)` in
/// normalised terrain space, with `x` following the height field's `x` axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    width: usize,
    height: usize,
    values: Vec<f32>,
    invert: bool,
    threshold: f32,
}

impl Mask {
    /// Creates a mask from row-major weights.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidInput`] for zero dimensions or a value
    /// count that is not `width * height`.
    pub fn new(width: usize, height: usize, values: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ExportError::invalid(format!(
                "mask dimensions must be positive (got {width}×{height})"
            )));
        }
        if values.len() != width * height {
            return Err(ExportError::invalid(format!(
                "expected {} mask values for a {width}×{height} mask, got {}",
                width * height,
                values.len()
            )));
        }
        Ok(Self {
            width,
            height,
            values,
            invert: false,
            threshold: DEFAULT_MASK_THRESHOLD,
        })
    }

    /// Creates a mask by evaluating `f(x, y)` for every texel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> f32,
    ) -> Result<Self> {
        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y));
            }
        }
        Self::new(width, height, values)
    }

    /// Builds a mask from the linear luminance of a Bevy [`Image`].
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidInput`] for an empty image or a texture
    /// format that cannot be read back on the CPU.
    pub fn from_image(image: &Image, invert: bool) -> Result<Self> {
        let size = image.texture_descriptor.size;
        let mut values = Vec::with_capacity((size.width * size.height) as usize);
        for y in 0..size.height {
            for x in 0..size.width {
                let color = image
                    .get_color_at(x, y)
                    .map_err(|err| ExportError::invalid(format!("unreadable mask image: {err}")))?
                    .to_linear();
                values.push(0.2126 * color.red + 0.7152 * color.green + 0.0722 * color.blue);
            }
        }
        Ok(Self::new(size.width as usize, size.height as usize, values)?.with_invert(invert))
    }

    /// Flips the inside/outside predicate.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Sets the weight at or above which a texel counts as inside.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Texels per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of texel rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the inside/outside predicate is flipped.
    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Inside threshold for texel weights.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Weight of the texel covering normalised position `uv`.
    pub fn sample_uv(&self, uv: Vec2) -> f32 {
        let x = covering_texel(uv.x, self.width);
        let y = covering_texel(uv.y, self.height);
        self.values[y * self.width + x]
    }

    /// Whether normalised position `uv` is inside the mask, honouring `invert`.
    pub fn contains_uv(&self, uv: Vec2) -> bool {
        (self.sample_uv(uv) >= self.threshold) != self.invert
    }

    /// Nearest-texel resample to a new resolution. Flags are preserved.
    pub fn resampled(&self, width: usize, height: usize) -> Result<Self> {
        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let uv = Vec2::new(
                    (x as f32 + 0.5) / width as f32,
                    (y as f32 + 0.5) / height as f32,
                );
                values.push(self.sample_uv(uv));
            }
        }
        Ok(Self::new(width, height, values)?
            .with_invert(self.invert)
            .with_threshold(self.threshold))
    }
}

#[inline]
fn covering_texel(coord: f32, extent: usize) -> usize {
    let t = (coord.clamp(0.0, 1.0) * extent as f32).floor() as usize;
    t.min(extent - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covering_texel_maps_edges_inside() {
        assert_eq!(covering_texel(0.0, 4), 0);
        assert_eq!(covering_texel(0.3, 4), 1);
        assert_eq!(covering_texel(1.0, 4), 3);
    }

    #[test]
    fn invert_flips_membership() {
        let mask = Mask::new(1, 1, vec![1.0]).unwrap();
        assert!(mask.contains_uv(Vec2::splat(0.5)));
        assert!(!mask.with_invert(true).contains_uv(Vec2::splat(0.5)));
    }
}

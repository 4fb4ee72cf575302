//! Baked colour sources and the box-blur used before vertex-colour sampling.

use bevy::image::Image;
use bevy::log::warn;
use bevy::math::Vec2;

use crate::error::{ExportError, Result};

/// A 2D colour accessor with a declared mip size, such as a baked texture.
///
/// A source whose [`mip_width`](ColorSource::mip_width) or
/// [`mip_height`](ColorSource::mip_height) is zero is treated as missing and
/// vertex-colour baking is skipped.
pub trait ColorSource {
    /// Texel columns in the sampled mip level.
    fn mip_width(&self) -> usize;

    /// Texel rows in the sampled mip level.
    fn mip_height(&self) -> usize;

    /// Linear RGBA texel at `(x, y)`. Callers keep coordinates in range.
    fn texel(&self, x: usize, y: usize) -> [f32; 4];
}

/// Owned RGBA texel grid, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBuffer {
    width: usize,
    height: usize,
    texels: Vec<[f32; 4]>,
}

impl ColorBuffer {
    /// Wraps existing row-major texels.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidInput`] for zero dimensions or a texel
    /// count that is not `width * height`.
    pub fn new(width: usize, height: usize, texels: Vec<[f32; 4]>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ExportError::invalid(format!(
                "colour buffer dimensions must be positive (got {width}×{height})"
            )));
        }
        if texels.len() != width * height {
            return Err(ExportError::invalid(format!(
                "expected {} texels for a {width}×{height} colour buffer, got {}",
                width * height,
                texels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// A buffer filled with one colour.
    pub fn filled(width: usize, height: usize, color: [f32; 4]) -> Result<Self> {
        Self::new(width, height, vec![color; width * height])
    }

    /// Builds a buffer by evaluating `f(x, y)` for every texel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> [f32; 4],
    ) -> Result<Self> {
        let mut texels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y));
            }
        }
        Self::new(width, height, texels)
    }

    /// Copies any [`ColorSource`] into an owned buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidInput`] if the source reports a zero
    /// mip width or height.
    pub fn from_source(source: &dyn ColorSource) -> Result<Self> {
        Self::from_fn(source.mip_width(), source.mip_height(), |x, y| {
            source.texel(x, y)
        })
    }

    /// Reads a Bevy [`Image`] into linear RGBA texels.
    ///
    /// Returns `None` for a zero-sized image or a texture format Bevy cannot
    /// read back on the CPU.
    pub fn from_image(image: &Image) -> Option<Self> {
        let size = image.texture_descriptor.size;
        if size.width == 0 || size.height == 0 {
            return None;
        }

        let mut texels = Vec::with_capacity((size.width * size.height) as usize);
        for y in 0..size.height {
            for x in 0..size.width {
                match image.get_color_at(x, y) {
                    Ok(color) => {
                        let c = color.to_linear();
                        texels.push([c.red, c.green, c.blue, c.alpha]);
                    }
                    Err(err) => {
                        warn!("baked colour texture is not readable: {err}");
                        return None;
                    }
                }
            }
        }

        Self::new(size.width as usize, size.height as usize, texels).ok()
    }

    /// Texel columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Texel rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major texel data.
    pub fn texels(&self) -> &[[f32; 4]] {
        &self.texels
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> [f32; 4] {
        self.texels[y * self.width + x]
    }

    /// Nearest texel under `uv`, with `uv` in `[0, 1]` spanning the buffer.
    pub fn sample_uv(&self, uv: Vec2) -> [f32; 4] {
        let x = nearest_texel(uv.x, self.width);
        let y = nearest_texel(uv.y, self.height);
        self.at(x, y)
    }

    /// Applies `passes` rounds of the four-neighbour box blur.
    ///
    /// Each pass replaces every texel with the mean of its left, right, up and
    /// down neighbours; neighbours outside the buffer clamp to the edge.
    /// Zero passes returns an identical buffer.
    pub fn smoothed(&self, passes: u32) -> Self {
        let mut current = self.clone();
        let mut next = current.texels.clone();

        for _ in 0..passes {
            let (w, h) = (current.width, current.height);
            for y in 0..h {
                let up = y.saturating_sub(1);
                let down = (y + 1).min(h - 1);
                for x in 0..w {
                    let left = x.saturating_sub(1);
                    let right = (x + 1).min(w - 1);
                    let neighbours = [
                        current.at(left, y),
                        current.at(right, y),
                        current.at(x, up),
                        current.at(x, down),
                    ];
                    let mut sum = [0.0f32; 4];
                    for n in neighbours {
                        for c in 0..4 {
                            sum[c] += n[c];
                        }
                    }
                    next[y * w + x] = sum.map(|s| s * 0.25);
                }
            }
            std::mem::swap(&mut current.texels, &mut next);
        }

        current
    }

    /// Sum of absolute differences between horizontally and vertically
    /// adjacent texels, over all channels.
    pub fn total_variation(&self) -> f32 {
        let mut total = 0.0;
        for y in 0..self.height {
            for x in 0..self.width {
                let here = self.at(x, y);
                if x + 1 < self.width {
                    total += channel_distance(here, self.at(x + 1, y));
                }
                if y + 1 < self.height {
                    total += channel_distance(here, self.at(x, y + 1));
                }
            }
        }
        total
    }
}

impl ColorSource for ColorBuffer {
    fn mip_width(&self) -> usize {
        self.width
    }

    fn mip_height(&self) -> usize {
        self.height
    }

    fn texel(&self, x: usize, y: usize) -> [f32; 4] {
        self.at(x, y)
    }
}

#[inline]
fn nearest_texel(coord: f32, extent: usize) -> usize {
    let max = extent.saturating_sub(1);
    let t = (coord.clamp(0.0, 1.0) * max as f32).round() as usize;
    t.min(max)
}

fn channel_distance(a: [f32; 4], b: [f32; 4]) -> f32 {
    (0..4).map(|c| (a[c] - b[c]).abs()).sum()
}

//! LOD parameters and export settings with RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// Vertex topology policy for a built mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeMode {
    /// Every triangle owns its three vertices, giving faceted normals.
    Sharp,
    /// Vertices are shared between neighbouring triangles and normals averaged.
    #[default]
    Smooth,
}

/// Triangle winding as seen from above (looking down the -Y axis).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winding {
    /// Clockwise seen from +Y, so triangles face down.
    Clockwise,
    /// Counter-clockwise seen from +Y, so triangles face up.
    #[default]
    CounterClockwise,
}

/// Parameters for building one level of detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodParameters {
    /// Log2 of the grid sampling step (`0` = full resolution).
    pub stride_level: u32,
    /// Sharp or smooth vertex topology.
    pub edge_mode: EdgeMode,
    /// Sample a baked colour capture into per-vertex colours.
    pub bake_vertex_colors: bool,
    /// Box-blur passes applied to the colour capture before sampling.
    pub vertex_color_smoothing_passes: u32,
    /// Name prefix for the exported asset. Has no effect on geometry.
    pub name_prefix: String,
}

impl Default for LodParameters {
    fn default() -> Self {
        Self {
            stride_level: 0,
            edge_mode: EdgeMode::Smooth,
            bake_vertex_colors: false,
            vertex_color_smoothing_passes: 0,
            name_prefix: "Terrain".to_string(),
        }
    }
}

impl LodParameters {
    /// Full-resolution smooth parameters at the given stride level.
    pub fn at_stride(stride_level: u32) -> Self {
        Self {
            stride_level,
            ..Self::default()
        }
    }

    /// Sets sharp or smooth topology.
    pub fn with_edge_mode(mut self, edge_mode: EdgeMode) -> Self {
        self.edge_mode = edge_mode;
        self
    }

    /// Enables vertex-colour baking with `passes` smoothing passes.
    pub fn with_vertex_colors(mut self, passes: u32) -> Self {
        self.bake_vertex_colors = true;
        self.vertex_color_smoothing_passes = passes;
        self
    }

    /// Asset name for this level, e.g. `Terrain_LOD1`.
    pub fn asset_name(&self, lod_index: usize) -> String {
        format!("{}_LOD{lod_index}", self.name_prefix)
    }
}

/// A complete export configuration: the LOD chain plus masked-carving options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Levels built by [`crate::build_lod_chain`], finest first.
    pub lods: Vec<LodParameters>,
    /// Stride level used by the masked carver.
    pub carve_stride_level: u32,
    /// Winding of carved polygon output.
    pub carve_winding: Winding,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            lods: vec![
                LodParameters::at_stride(0),
                LodParameters::at_stride(1),
                LodParameters::at_stride(2).with_edge_mode(EdgeMode::Sharp),
            ],
            carve_stride_level: 0,
            carve_winding: Winding::CounterClockwise,
        }
    }
}

impl ExportSettings {
    /// Parses settings from RON. Missing fields fall back to defaults.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(ExportError::SettingsParse)
    }

    /// Serializes settings to pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::new().struct_names(false);
        ron::ser::to_string_pretty(self, pretty).map_err(ExportError::SettingsSerialize)
    }

    /// Loads settings from a RON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Writes settings to a RON file, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_ron_string()?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

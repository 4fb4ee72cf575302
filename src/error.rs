//! Error types for terrain export.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can occur while building, carving, or writing terrain meshes.
///
/// Geometry construction itself never fails part-way: every check happens
/// before any buffer is allocated, so an error always means nothing was built.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Malformed height field, mask, or LOD parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The masked carver was asked to carve a terrain without height data.
    #[error("terrain has no height data to carve")]
    MissingHeightData,

    /// Writing mesh output or reading/writing a settings file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse RON export settings.
    #[error("failed to parse export settings: {0}")]
    SettingsParse(#[source] ron::error::SpannedError),

    /// Failed to serialize export settings to RON.
    #[error("failed to serialize export settings: {0}")]
    SettingsSerialize(#[source] ron::Error),
}

impl ExportError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

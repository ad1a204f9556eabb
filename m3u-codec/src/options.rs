use serde::Deserialize;

/// How a playlist is read
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadOptions {
    /// Turn relative paths into absolute ones, using the directory of the playlist file as base.
    /// Defaults to `false`.
    pub resolve_relative_paths: bool,
}

/// How references are written back
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveOptions {
    /// Write relative paths as absolute ones, using the directory of the output file as base.
    /// Defaults to `false`.
    pub use_absolute_paths: bool,
    /// Write local files as plain paths instead of `file://` urls.
    /// Defaults to `true`.
    pub use_local_file_path: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            use_absolute_paths: false,
            use_local_file_path: true,
        }
    }
}

use std::{ffi::OsStr, fs::File, path::Path};

use anyhow::Result;
use m3u_codec::{LoadOptions, SaveOptions};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub load: LoadOptions,
    pub save: SaveOptions,
    /// Extensions accepted when a file is dropped, without the dot
    pub extensions: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            save: SaveOptions::default(),
            extensions: vec!["m3u".into(), "m3u8".into()],
        }
    }
}

impl EditorConfig {
    pub fn is_playlist_file(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<EditorConfig> {
    let file = File::open(path.as_ref())?;
    let config: EditorConfig = serde_yaml::from_reader(file)?;
    Ok(config)
}

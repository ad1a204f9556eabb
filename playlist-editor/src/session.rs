use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use log::info;
use m3u_codec::{
    ExportReport,
    format::{M3uEntry, M3uPlaylist, Reference},
};

use crate::{EditorConfig, error_with_log, errors::EditorError};

/// What a list view shows for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub title: String,
    /// `MM:SS`
    pub duration: String,
    pub location: String,
}

impl From<&M3uEntry> for EntryRow {
    fn from(value: &M3uEntry) -> Self {
        Self {
            title: value.title.to_string(),
            duration: value.display_duration(),
            location: value.reference.to_local_string(),
        }
    }
}

/// The fields of the edit form, prefilled from an entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryEdit {
    pub title: String,
    pub seconds: f64,
    pub location: String,
}

impl From<&M3uEntry> for EntryEdit {
    fn from(value: &M3uEntry) -> Self {
        Self {
            title: value.title.to_string(),
            seconds: value.duration.as_secs_f64(),
            location: value.reference.to_local_string(),
        }
    }
}

/// Negative and NaN become zero, values too large for the file saturate to whole seconds
fn clamp_duration(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }

    match Duration::try_from_secs_f64(seconds) {
        Ok(duration) if duration.as_secs() < u64::MAX => duration,
        _ => Duration::from_secs(u64::MAX),
    }
}

/// State behind the editor window: the open playlist and where it lives
pub struct EditorSession {
    config: EditorConfig,
    playlist: Option<M3uPlaylist>,
    path: Option<PathBuf>,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            playlist: None,
            path: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn playlist(&self) -> Option<&M3uPlaylist> {
        self.playlist.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace the open playlist with the one at `path`.
    /// On failure nothing stays open and the error is returned for display.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        let path = path.as_ref();
        self.playlist = None;
        self.path = None;

        let playlist = M3uPlaylist::from_file(path, &self.config.load)
            .map_err(error_with_log!(format!("Open {}", path.display())))?;

        info!("Opened {} with {} entries", path.display(), playlist.len());
        self.playlist = Some(playlist);
        self.path = Some(path.to_path_buf());

        Ok(())
    }

    /// Whether a drop of `paths` would be accepted, exactly one playlist file
    pub fn accepts_drop(&self, paths: &[PathBuf]) -> bool {
        matches!(paths, [path] if self.config.is_playlist_file(path))
    }

    pub fn open_dropped(&mut self, paths: &[PathBuf]) -> Result<(), EditorError> {
        match paths {
            [path] if self.config.is_playlist_file(path) => self.open(path),
            _ => Err(EditorError::UnsupportedDrop),
        }
    }

    pub fn rows(&self) -> Vec<EntryRow> {
        self.playlist
            .iter()
            .flat_map(|x| x.iter())
            .map(EntryRow::from)
            .collect()
    }

    pub fn edit_form(&self, index: usize) -> Result<EntryEdit, EditorError> {
        let playlist = self.playlist.as_ref().ok_or(EditorError::NoPlaylist)?;
        playlist
            .get(index)
            .map(EntryEdit::from)
            .ok_or(EditorError::IndexOutOfRange(index))
    }

    /// Replace the entry at `index` with the edited fields, returning its new row
    pub fn edit(&mut self, index: usize, edit: EntryEdit) -> Result<EntryRow, EditorError> {
        let playlist = self.playlist.as_mut().ok_or(EditorError::NoPlaylist)?;
        if index >= playlist.len() {
            return Err(EditorError::IndexOutOfRange(index));
        }
        if edit.title.contains(['\r', '\n']) {
            return Err(EditorError::InvalidTitle);
        }

        let reference = Reference::parse(&edit.location).map_err(error_with_log!("Edit entry"))?;
        let entry = M3uEntry::new(clamp_duration(edit.seconds), edit.title, reference);
        let row = EntryRow::from(&entry);
        playlist.replace(index, entry);

        Ok(row)
    }

    /// Save to `path`, which becomes the file of this session
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        let path = path.as_ref();
        let playlist = self.playlist.as_ref().ok_or(EditorError::NoPlaylist)?;

        playlist
            .save(path, &self.config.save)
            .map_err(error_with_log!(format!("Save {}", path.display())))?;

        info!("Saved {}", path.display());
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn save(&mut self) -> Result<(), EditorError> {
        let path = self.path.clone().ok_or(EditorError::NoPath)?;
        self.save_as(path)
    }

    pub fn export_each(&self, dir: impl AsRef<Path>) -> Result<ExportReport, EditorError> {
        let dir = dir.as_ref();
        let playlist = self.playlist.as_ref().ok_or(EditorError::NoPlaylist)?;

        let report = playlist
            .export_each(dir, &self.config.save)
            .map_err(error_with_log!(format!("Export to {}", dir.display())))?;

        info!(
            "Exported {} entries to {}, skipped {}",
            report.written.len(),
            dir.display(),
            report.skipped.len()
        );
        Ok(report)
    }
}

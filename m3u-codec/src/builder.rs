use std::{
    borrow::Cow,
    fmt::Display,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use log::debug;

use crate::{
    SaveOptions,
    format::{M3uEntry, M3uPlaylist, Reference, directives},
    parser::playlist_dir,
};

/// The reference line of an entry.
///
/// Absolute local paths are written as paths when `use_local_file_path` is set,
/// relative paths are resolved against `base_dir` when `use_absolute_paths` is set,
/// everything else keeps its generic form.
pub(crate) fn reference_line(
    reference: &Reference,
    base_dir: Option<&Path>,
    options: &SaveOptions,
) -> String {
    match (reference, base_dir) {
        (Reference::Path(path), _) if path.is_absolute() && options.use_local_file_path => {
            reference.to_local_string()
        }
        (Reference::Path(path), Some(base_dir))
            if path.is_relative() && options.use_absolute_paths =>
        {
            let resolved = reference.resolve(base_dir);
            if options.use_local_file_path {
                resolved.to_local_string()
            } else {
                resolved.to_generic_string()
            }
        }
        _ => reference.to_generic_string(),
    }
}

/// Line breaks would split the `#EXTINF` record, they become spaces
pub(crate) fn single_line(title: &str) -> Cow<'_, str> {
    if title.contains(['\r', '\n']) {
        Cow::Owned(title.replace(['\r', '\n'], " "))
    } else {
        Cow::Borrowed(title)
    }
}

pub(crate) fn write_header(writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "{}", directives::EXTM3U)
}

pub(crate) fn write_entry(
    writer: &mut impl Write,
    entry: &M3uEntry,
    base_dir: Option<&Path>,
    options: &SaveOptions,
) -> io::Result<()> {
    // #EXTINF:duration,title
    writeln!(
        writer,
        "{}{},{}",
        directives::EXTINF_PREFIX,
        entry.duration_seconds(),
        single_line(&entry.title)
    )?;
    writeln!(writer, "{}", reference_line(&entry.reference, base_dir, options))
}

impl M3uPlaylist {
    /// Write the playlist to `writer`, `base_dir` is used for [`SaveOptions::use_absolute_paths`]
    pub fn write_to(
        &self,
        writer: &mut impl Write,
        base_dir: Option<&Path>,
        options: &SaveOptions,
    ) -> io::Result<()> {
        write_header(writer)?;
        for it in self.iter() {
            write_entry(writer, it, base_dir, options)?;
        }

        Ok(())
    }

    /// Write the playlist to `path`, replacing the file if it exists
    pub fn save(&self, path: impl AsRef<Path>, options: &SaveOptions) -> io::Result<()> {
        let path = path.as_ref();
        let base_dir = playlist_dir(path)?;

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer, Some(base_dir.as_path()), options)?;
        writer.flush()?;

        debug!("Saved {} entries to {}", self.len(), path.display());
        Ok(())
    }
}

impl Display for M3uPlaylist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // header
        writeln!(f, "{}", directives::EXTM3U)?;

        // entries
        for it in self.iter() {
            it.fmt(f)?;
        }

        Ok(())
    }
}

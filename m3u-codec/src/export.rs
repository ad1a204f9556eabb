use std::{
    fmt::Display,
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use log::info;
use regex::Regex;

use crate::{
    SaveOptions,
    builder::{write_entry, write_header},
    format::M3uPlaylist,
};

pub const EXPORT_EXTENSION: &str = "m3u8";

/// Longest stem that still fits a 255 byte file name once `.m3u8` is appended
const MAX_STEM_BYTES: usize = 255 - EXPORT_EXTENSION.len() - 1;

lazy_static! {
    static ref ILLEGAL_CHARS: Regex = Regex::new(r#"[/\\:,*?"<>|]"#).expect("Regular expression error");
}

const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Wide brackets that trip up players and file managers
fn ascii_bracket(c: char) -> char {
    match c {
        '【' | '〔' | '［' | '〘' | '〚' => '[',
        '】' | '〕' | '］' | '〙' | '〛' => ']',
        '（' => '(',
        '）' => ')',
        '｛' => '{',
        '｝' => '}',
        _ => c,
    }
}

/// Turn a title into a file name stem: characters illegal in file names are removed,
/// wide brackets become ascii ones.
///
/// ```
/// use m3u_codec::sanitize_title;
///
/// assert_eq!(sanitize_title("Song【Remix】"), "Song[Remix]");
/// assert_eq!(sanitize_title("A/B"), "AB");
/// ```
pub fn sanitize_title(title: &str) -> String {
    ILLEGAL_CHARS
        .replace_all(title, "")
        .chars()
        .map(ascii_bracket)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Whether `name` can be created on every common filesystem, `name` being the stem
/// the `.m3u8` extension is appended to
pub fn is_portable_file_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." || name.len() > MAX_STEM_BYTES {
        return false;
    }

    if name.chars().any(|x| x.is_control()) || name.ends_with(['.', ' ']) {
        return false;
    }

    let stem = name.split('.').next().unwrap_or(name).trim_end();
    !RESERVED_NAMES
        .iter()
        .any(|x| x.eq_ignore_ascii_case(stem))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skipped {
    /// The title gives no usable file name
    InvalidName(String),
    /// A file with this name is already there
    Exists(PathBuf),
}

impl Display for Skipped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "\"{}\" is not a valid file name", name),
            Self::Exists(path) => write!(f, "{} already exists", path.display()),
        }
    }
}

enum Created {
    Written,
    Exists,
    Rejected,
}

/// Create `path` only if it does not exist yet and fill it with `write`.
/// A file left half written by a failing `write` is removed again.
fn create_exclusive(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> io::Result<Created> {
    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(Created::Exists),
        // names the filesystem refuses, too long or with characters it does not take
        Err(e) if e.kind() == io::ErrorKind::InvalidInput || is_name_too_long(&e) => {
            return Ok(Created::Rejected);
        }
        Err(e) => return Err(e),
    };

    let mut writer = BufWriter::new(file);
    let result = write(&mut writer).and_then(|_| writer.flush());
    drop(writer);

    match result {
        Ok(()) => Ok(Created::Written),
        Err(e) => {
            let _ = fs::remove_file(path);
            Err(e)
        }
    }
}

#[cfg(unix)]
fn is_name_too_long(e: &io::Error) -> bool {
    // ENAMETOOLONG
    let code = if cfg!(any(target_os = "linux", target_os = "android")) {
        36
    } else {
        63
    };
    e.raw_os_error() == Some(code)
}

#[cfg(windows)]
fn is_name_too_long(e: &io::Error) -> bool {
    // ERROR_INVALID_NAME, ERROR_FILENAME_EXCED_RANGE
    e.raw_os_error() == Some(123) || e.raw_os_error() == Some(206)
}

#[cfg(not(any(unix, windows)))]
fn is_name_too_long(_: &io::Error) -> bool {
    false
}

#[derive(Debug, Default)]
pub struct ExportReport {
    /// Files created, in playlist order
    pub written: Vec<PathBuf>,
    /// Index of the entry and why it was left out
    pub skipped: Vec<(usize, Skipped)>,
}

impl M3uPlaylist {
    /// Write every entry to its own `<title>.m3u8` inside `dir`.
    ///
    /// Entries whose title gives no valid file name, or whose file already exists, are
    /// skipped and listed in the report. Existing files are never overwritten.
    pub fn export_each(
        &self,
        dir: impl AsRef<Path>,
        options: &SaveOptions,
    ) -> Result<ExportReport, io::Error> {
        let dir = std::path::absolute(dir.as_ref())?;
        let mut report = ExportReport::default();

        for (index, entry) in self.iter().enumerate() {
            let name = sanitize_title(&entry.title);
            if !is_portable_file_name(&name) {
                let reason = Skipped::InvalidName(name);
                info!("Skip entry {}: {}", index, reason);
                report.skipped.push((index, reason));
                continue;
            }

            let path = dir.join(format!("{}.{}", name, EXPORT_EXTENSION));
            let created = create_exclusive(&path, |writer| {
                write_header(writer)?;
                write_entry(writer, entry, Some(dir.as_path()), options)
            })?;

            let reason = match created {
                Created::Written => None,
                Created::Exists => Some(Skipped::Exists(path.clone())),
                Created::Rejected => Some(Skipped::InvalidName(name)),
            };
            if let Some(reason) = reason {
                info!("Skip entry {}: {}", index, reason);
                report.skipped.push((index, reason));
                continue;
            }

            report.written.push(path);
        }

        Ok(report)
    }
}

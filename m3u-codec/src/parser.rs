use std::{
    error::Error,
    fmt::Display,
    fs::File,
    io::{self, BufRead, BufReader},
    num::ParseIntError,
    path::{Path, PathBuf},
    time::Duration,
};

use log::debug;
use smol_str::SmolStr;

use crate::{
    LoadOptions,
    format::{InvalidReference, M3uEntry, M3uPlaylist, Reference, directives},
};

#[derive(Debug)]
pub enum ParseError {
    MissingHeader,
    UnexpectedEntry {
        line: usize,
    },
    InvalidTrackInfo {
        line: usize,
    },
    InvalidTrackDuration {
        line: usize,
        source: ParseIntError,
    },
    InvalidEntryPath {
        line: usize,
        source: InvalidReference,
    },
    IoError(io::Error),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::MissingHeader => write!(f, "M3U header is missing"),
            Self::UnexpectedEntry { line } => write!(f, "Unexpected entry at line {}", line),
            Self::InvalidTrackInfo { line } => {
                write!(f, "Invalid track information at line {}", line)
            }
            Self::InvalidTrackDuration { line, .. } => {
                write!(f, "Invalid track duration at line {}", line)
            }
            Self::InvalidEntryPath { line, source } => {
                write!(f, "Invalid entry path at line {}: {}", line, source)
            }
            Self::IoError(e) => e.fmt(f),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTrackDuration { source, .. } => Some(source),
            Self::InvalidEntryPath { source, .. } => Some(source),
            Self::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(value: io::Error) -> Self {
        Self::IoError(value)
    }
}

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// `#EXTINF` seen, waiting for its reference line
struct PendingEntry {
    duration: Duration,
    title: SmolStr,
}

pub struct Parser<'a, T: BufRead> {
    reader: T,
    buffer: Vec<u8>,
    line_count: usize,
    base_dir: Option<&'a Path>,
    options: &'a LoadOptions,
    pending: Option<PendingEntry>,
}

impl<'a, T: BufRead> Parser<'a, T> {
    /// `base_dir` is the directory relative references are resolved against,
    /// nothing is resolved without it
    pub fn new(reader: T, base_dir: Option<&'a Path>, options: &'a LoadOptions) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            line_count: 0,
            base_dir,
            options,
            pending: None,
        }
    }

    /// Next line without its line ending. Bytes that are not utf-8 (latin-1 playlists)
    /// become replacement characters instead of failing the whole file.
    fn next_line(&mut self) -> Result<Option<String>, io::Error> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }

        let mut line = self.buffer.as_slice();
        line = line.strip_suffix(b"\n").unwrap_or(line);
        line = line.strip_suffix(b"\r").unwrap_or(line);
        if self.line_count == 0 {
            line = line.strip_prefix(UTF8_BOM).unwrap_or(line);
        }

        Ok(Some(String::from_utf8_lossy(line).into_owned()))
    }

    fn parse_track_info(&mut self, value: &str) -> Result<(), ParseError> {
        let line = self.line_count + 1;
        if self.pending.is_some() {
            return Err(ParseError::UnexpectedEntry { line });
        }

        // only the first comma splits, titles may contain more
        let (duration, title) = value
            .split_once(',')
            .ok_or(ParseError::InvalidTrackInfo { line })?;

        let seconds = duration
            .trim()
            .parse::<u64>()
            .map_err(|source| ParseError::InvalidTrackDuration { line, source })?;

        self.pending = Some(PendingEntry {
            duration: Duration::from_secs(seconds),
            title: title.into(),
        });

        Ok(())
    }

    fn parse_reference(&self, value: &str) -> Result<Reference, ParseError> {
        let reference = Reference::parse(value).map_err(|source| ParseError::InvalidEntryPath {
            line: self.line_count + 1,
            source,
        })?;

        match self.base_dir {
            Some(base_dir) if self.options.resolve_relative_paths => {
                Ok(reference.resolve(base_dir))
            }
            _ => Ok(reference),
        }
    }

    /// Append every complete entry to `playlist`. Entries parsed before an error stay there.
    pub fn parse(&mut self, playlist: &mut M3uPlaylist) -> Result<(), ParseError> {
        while let Some(line) = self.next_line()? {
            if self.line_count == 0 && line != directives::EXTM3U {
                return Err(ParseError::MissingHeader);
            }

            if let Some(value) = line.strip_prefix(directives::EXTINF_PREFIX) {
                self.parse_track_info(value)?;
            } else if self.pending.is_some()
                && !line.starts_with(directives::COMMENT)
                && !line.trim().is_empty()
            {
                let reference = self.parse_reference(&line)?;
                if let Some(pending) = self.pending.take() {
                    playlist.add(M3uEntry::new(pending.duration, pending.title, reference));
                }
            }

            self.line_count += 1;
        }

        if let Some(pending) = self.pending.take() {
            debug!(
                "Dropping \"{}\": no reference line before end of file",
                pending.title
            );
        }

        Ok(())
    }
}

impl M3uPlaylist {
    /// Clear this playlist and fill it from the file at `path`.
    ///
    /// The playlist is filled while parsing; after an error it holds whatever was read
    /// before the faulty line and should be discarded.
    pub fn load(&mut self, path: impl AsRef<Path>, options: &LoadOptions) -> Result<(), ParseError> {
        let path = path.as_ref();
        self.clear();

        let reader = BufReader::new(File::open(path)?);
        let base_dir = playlist_dir(path)?;

        Parser::new(reader, Some(base_dir.as_path()), options).parse(self)?;
        debug!("Loaded {} entries from {}", self.len(), path.display());

        Ok(())
    }

    pub fn from_file(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, ParseError> {
        let mut playlist = Self::new();
        playlist.load(path, options)?;
        Ok(playlist)
    }

    pub fn from_reader(
        reader: impl BufRead,
        base_dir: Option<&Path>,
        options: &LoadOptions,
    ) -> Result<Self, ParseError> {
        let mut playlist = Self::new();
        Parser::new(reader, base_dir, options).parse(&mut playlist)?;
        Ok(playlist)
    }
}

/// Directory a playlist file lives in, used as base for relative references
pub(crate) fn playlist_dir(path: &Path) -> io::Result<PathBuf> {
    Ok(std::path::absolute(path)?
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use std::{fs, io::Cursor, path::Path, time::Duration};

    use crate::{
        LoadOptions, ParseError,
        format::{M3uPlaylist, Reference},
    };

    fn parse(data: &str) -> Result<M3uPlaylist, ParseError> {
        M3uPlaylist::from_reader(Cursor::new(data), None, &LoadOptions::default())
    }

    #[test]
    fn test_parse_list() {
        let data = r#"#EXTM3U
#EXTINF:120,Artist, Song Title
music/song.mp3

# a comment
#EXTINF:0,
http://example.com/stream.mp3
#EXTINF:7,Last
/srv/music/last.flac
"#;
        let playlist = parse(data).unwrap();

        assert_eq!(playlist.len(), 3);
        assert_eq!(playlist[0].duration, Duration::from_secs(120));
        assert_eq!(playlist[0].title, "Artist, Song Title");
        assert_eq!(playlist[0].reference, Reference::parse("music/song.mp3").unwrap());
        assert_eq!(playlist[1].title, "");
        assert!(!playlist[1].reference.is_local());
        assert_eq!(playlist[2].reference.to_string(), "/srv/music/last.flac");
    }

    #[test]
    fn test_crlf_and_bom() {
        let data = "\u{feff}#EXTM3U\r\n#EXTINF:5,Title\r\nsong.mp3\r\n";
        let playlist = parse(data).unwrap();

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist[0].title, "Title");
        assert_eq!(playlist[0].reference.to_string(), "song.mp3");
    }

    #[test]
    fn test_latin1_bytes() {
        let data: &[u8] = b"#EXTM3U\n#EXTINF:1,Caf\xe9\ncaf\xe9.mp3\n";
        let playlist =
            M3uPlaylist::from_reader(Cursor::new(data), None, &LoadOptions::default()).unwrap();

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist[0].title, "Caf\u{fffd}");
        assert_eq!(playlist[0].reference.to_string(), "caf\u{fffd}.mp3");
    }

    #[test]
    fn test_missing_header() {
        let result = parse("#EXTM4U\n#EXTINF:1,A\na.mp3\n");
        assert!(matches!(result, Err(ParseError::MissingHeader)));

        let result = parse("\n#EXTM3U\n");
        assert!(matches!(result, Err(ParseError::MissingHeader)));

        // header attributes are not supported
        let result = parse("#EXTM3U x-tvg-url=\"test\"\n");
        assert!(matches!(result, Err(ParseError::MissingHeader)));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("#EXTM3U").unwrap().is_empty());
    }

    #[test]
    fn test_unexpected_entry() {
        let result = parse("#EXTM3U\n#EXTINF:1,A\n#EXTINF:2,B\nb.mp3\n");
        assert!(matches!(result, Err(ParseError::UnexpectedEntry { line: 3 })));
    }

    #[test]
    fn test_invalid_track_info() {
        let result = parse("#EXTM3U\n#EXTINF:120\na.mp3\n");
        assert!(matches!(result, Err(ParseError::InvalidTrackInfo { line: 2 })));
    }

    #[test]
    fn test_invalid_track_duration() {
        for info in ["#EXTINF:abc,Title", "#EXTINF:-1,Title", "#EXTINF:1.5,Title", "#EXTINF:,Title"] {
            let result = parse(&format!("#EXTM3U\n{}\na.mp3\n", info));
            assert!(
                matches!(result, Err(ParseError::InvalidTrackDuration { line: 2, .. })),
                "{}",
                info
            );
        }

        let playlist = parse("#EXTM3U\n#EXTINF: 42 ,Padded\na.mp3\n").unwrap();
        assert_eq!(playlist[0].duration, Duration::from_secs(42));
    }

    #[test]
    fn test_invalid_entry_path() {
        let result = parse("#EXTM3U\n#EXTINF:1,A\nhttp://exa mple.com/a.mp3\n");
        assert!(matches!(result, Err(ParseError::InvalidEntryPath { line: 3, .. })));
    }

    #[test]
    fn test_ignored_lines() {
        let data = "#EXTM3U\norphan.mp3\n#EXTINF:1,A\n\n#EXTVLCOPT:foo\n   \na.mp3\n";
        let playlist = parse(data).unwrap();

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist[0].reference.to_string(), "a.mp3");
    }

    #[test]
    fn test_trailing_pending_entry() {
        let data = "#EXTM3U\n#EXTINF:1,A\na.mp3\n#EXTINF:2,B\n";
        let playlist = parse(data).unwrap();

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist[0].title, "A");
    }

    #[test]
    fn test_resolve_relative_paths() {
        let data = "#EXTM3U\n#EXTINF:1,A\n../a.mp3\n#EXTINF:2,B\nhttp://example.com/b.mp3\n";
        let options = LoadOptions {
            resolve_relative_paths: true,
        };
        let playlist =
            M3uPlaylist::from_reader(Cursor::new(data), Some(Path::new("/srv/music/lists")), &options)
                .unwrap();

        assert_eq!(
            playlist[0].reference,
            Reference::parse("/srv/music/a.mp3").unwrap()
        );
        assert_eq!(playlist[1].reference.to_string(), "http://example.com/b.mp3");

        // without the option the path is kept as written
        let playlist = M3uPlaylist::from_reader(
            Cursor::new(data),
            Some(Path::new("/srv/music/lists")),
            &LoadOptions::default(),
        )
        .unwrap();
        assert!(playlist[0].reference.is_relative());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.m3u8");
        fs::write(&path, "#EXTM3U\n#EXTINF:3,A\nsub/a.mp3\n").unwrap();

        let options = LoadOptions {
            resolve_relative_paths: true,
        };
        let first = M3uPlaylist::from_file(&path, &options).unwrap();
        let second = M3uPlaylist::from_file(&path, &options).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first[0].reference,
            Reference::Path(std::path::absolute(dir.path()).unwrap().join("sub/a.mp3"))
        );
    }

    #[test]
    fn test_load_clears_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.m3u");
        let bad = dir.path().join("bad.m3u");
        fs::write(&good, "#EXTM3U\n#EXTINF:1,A\na.mp3\n#EXTINF:2,B\nb.mp3\n").unwrap();
        fs::write(&bad, "#EXTM3U\n#EXTINF:1,C\nc.mp3\n#EXTINF:x,D\nd.mp3\n").unwrap();

        let mut playlist = M3uPlaylist::new();
        playlist.load(&good, &LoadOptions::default()).unwrap();
        assert_eq!(playlist.len(), 2);

        let result = playlist.load(&bad, &LoadOptions::default());
        assert!(matches!(result, Err(ParseError::InvalidTrackDuration { line: 4, .. })));
        // partially filled
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist[0].title, "C");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = M3uPlaylist::from_file(dir.path().join("nope.m3u"), &LoadOptions::default());
        assert!(matches!(result, Err(ParseError::IoError(_))));
    }
}

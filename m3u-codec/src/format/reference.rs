use std::{
    error::Error,
    fmt::Display,
    path::{Component, Path, PathBuf},
    str::FromStr,
};

use url::Url;

/// Location of the media an entry points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// A local file path, absolute or relative to the playlist
    Path(PathBuf),
    /// Anything addressed by a URL with a host, e.g. `http://example.com/a.mp3`
    Url(Url),
}

#[derive(Debug)]
pub struct InvalidReference {
    pub text: String,
    pub reason: Option<url::ParseError>,
}

impl InvalidReference {
    fn new(text: impl Into<String>, reason: Option<url::ParseError>) -> Self {
        Self {
            text: text.into(),
            reason,
        }
    }
}

impl Display for InvalidReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" is neither a path nor a url", self.text)
    }
}

impl Error for InvalidReference {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.reason.as_ref().map(|x| x as &(dyn Error + 'static))
    }
}

impl Reference {
    /// Only the line ending is dropped, spaces around the text belong to the name
    pub fn parse(text: impl AsRef<str>) -> Result<Self, InvalidReference> {
        let text = text.as_ref().trim_end_matches(['\r', '\n']);
        if text.trim().is_empty() || text.contains('\0') {
            return Err(InvalidReference::new(text, None));
        }

        match Url::parse(text) {
            // single letter schemes are drive letters, `C:\music\a.mp3`
            Ok(url) if url.scheme().len() > 1 => {
                if url.scheme() == "file" {
                    url.to_file_path()
                        .map(Self::Path)
                        .map_err(|_| InvalidReference::new(text, None))
                } else if url.has_host() {
                    Ok(Self::Url(url))
                } else {
                    Ok(Self::Path(PathBuf::from(text)))
                }
            }
            Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(Self::Path(PathBuf::from(text)))
            }
            Err(e) if text.contains("://") => Err(InvalidReference::new(text, Some(e))),
            Err(_) => Ok(Self::Path(PathBuf::from(text))),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    pub fn is_relative(&self) -> bool {
        match self {
            Self::Path(path) => path.is_relative(),
            Self::Url(_) => false,
        }
    }

    /// Resolve a relative path against `base_dir`, other references are returned as they are
    pub fn resolve(&self, base_dir: impl AsRef<Path>) -> Self {
        match self {
            Self::Path(path) if path.is_relative() => {
                Self::Path(normalize_path(&base_dir.as_ref().join(path)))
            }
            _ => self.clone(),
        }
    }

    pub fn to_local_string(&self) -> String {
        match self {
            Self::Path(path) => path.to_string_lossy().into_owned(),
            Self::Url(url) => url.to_string(),
        }
    }

    /// Absolute paths become `file://` urls, relative paths stay as written
    pub fn to_generic_string(&self) -> String {
        match self {
            Self::Path(path) if path.is_absolute() => Url::from_file_path(path)
                .map(|x| x.to_string())
                .unwrap_or_else(|_| path.to_string_lossy().into_owned()),
            _ => self.to_local_string(),
        }
    }
}

impl FromStr for Reference {
    type Err = InvalidReference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_local_string())
    }
}

/// Fold `.` and `..` without touching the filesystem
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => result.push(".."),
            },
            other => result.push(other.as_os_str()),
        }
    }

    result
}

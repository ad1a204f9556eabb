use std::{error::Error, fmt::Display, io};

use m3u_codec::{ParseError, format::InvalidReference};

#[derive(Debug)]
pub enum EditorError {
    /// Nothing is open, or the last open failed
    NoPlaylist,
    /// The playlist was never saved or opened from a file
    NoPath,
    IndexOutOfRange(usize),
    /// Titles are a single line of the playlist file
    InvalidTitle,
    UnsupportedDrop,
    InvalidLocation(InvalidReference),
    ParseError(ParseError),
    IoError(io::Error),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPlaylist => write!(f, "No playlist is open"),
            Self::NoPath => write!(f, "The playlist has no file yet"),
            Self::IndexOutOfRange(index) => write!(f, "No entry at position {}", index),
            Self::InvalidTitle => write!(f, "A title cannot contain line breaks"),
            Self::UnsupportedDrop => write!(f, "Drop a single playlist file"),
            Self::InvalidLocation(e) => e.fmt(f),
            Self::ParseError(e) => e.fmt(f),
            Self::IoError(e) => e.fmt(f),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLocation(e) => Some(e),
            Self::ParseError(e) => Some(e),
            Self::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for EditorError {
    fn from(value: ParseError) -> Self {
        Self::ParseError(value)
    }
}

impl From<io::Error> for EditorError {
    fn from(value: io::Error) -> Self {
        Self::IoError(value)
    }
}

impl From<InvalidReference> for EditorError {
    fn from(value: InvalidReference) -> Self {
        Self::InvalidLocation(value)
    }
}

/// Log an error and convert it into an [`EditorError`], for `map_err`
#[macro_export]
macro_rules! error_with_log {
    () => {
        |e| {
            use log::error;

            error!("{}", e);
            $crate::errors::EditorError::from(e)
        }
    };

    ($position:expr) => {
        |e| {
            use log::error;

            error!("{}: {}", $position, e);
            $crate::errors::EditorError::from(e)
        }
    };
}

pub use error_with_log;

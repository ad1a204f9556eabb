//! # m3u-codec
//! A library for reading, writing and exporting extended m3u playlists
//!
//! # Example
//! ```rust
//! use m3u_codec::{LoadOptions, format::M3uPlaylist};
//! use std::io::Cursor;
//!
//! // 1. Parse
//! let data = "#EXTM3U\n#EXTINF:120,Artist, Song Title\nmusic/song.mp3\n";
//! let playlist = M3uPlaylist::from_reader(Cursor::new(data), None, &LoadOptions::default()).unwrap();
//! assert_eq!(playlist[0].title, "Artist, Song Title");
//!
//! // 2. Generate
//! println!("{}", playlist);
//! ```

mod builder;
mod export;
pub mod format;
mod options;
mod parser;
pub use export::*;
pub use options::*;
pub use parser::*;

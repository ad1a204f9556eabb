mod entry;
mod playlist;
mod reference;
pub use entry::*;
pub use playlist::*;
pub use reference::*;

pub mod directives {
    pub const EXTM3U: &str = "#EXTM3U";
    /// `#EXTINF:`, the prefix of a track information line
    pub const EXTINF_PREFIX: &str = "#EXTINF:";
    pub const COMMENT: char = '#';
}

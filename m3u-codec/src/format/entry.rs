use std::{fmt::Display, time::Duration};

use smol_str::SmolStr;

use crate::{
    SaveOptions,
    builder::{reference_line, single_line},
    format::{Reference, directives},
};

/// One record of a playlist, the `#EXTINF` line and the reference line after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct M3uEntry {
    pub duration: Duration,
    pub title: SmolStr,
    pub reference: Reference,
}

impl M3uEntry {
    pub fn new(duration: Duration, title: impl Into<SmolStr>, reference: Reference) -> Self {
        Self {
            duration,
            title: title.into(),
            reference,
        }
    }

    /// Total seconds as written after `#EXTINF:`, `120` or `1.5`.
    /// Whole seconds are printed exactly, f64 would round above 2^53.
    pub fn duration_seconds(&self) -> String {
        if self.duration.subsec_nanos() == 0 {
            self.duration.as_secs().to_string()
        } else {
            self.duration.as_secs_f64().to_string()
        }
    }

    /// `MM:SS` for list views
    pub fn display_duration(&self) -> String {
        let seconds = self.duration.as_secs();
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }
}

impl Display for M3uEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // #EXTINF:duration,title
        writeln!(
            f,
            "{}{},{}",
            directives::EXTINF_PREFIX,
            self.duration_seconds(),
            single_line(&self.title)
        )?;
        writeln!(
            f,
            "{}",
            reference_line(&self.reference, None, &SaveOptions::default())
        )
    }
}

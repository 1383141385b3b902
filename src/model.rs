//! Plain data shared by the queue, the session and the UI.

use std::fmt;

/// One validated URL waiting in the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    url: String,
}

impl QueueEntry {
    pub(crate) fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The validated URL text
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for QueueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Display projection of a queue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueRow<'a> {
    /// 1-based position in the queue
    pub position: usize,
    /// URL shown in the row
    pub url: &'a str,
}

/// Go button and progress indicator.
///
/// Nothing drives these yet; they are kept so the layout and the value range
/// are fixed before a download path exists.
#[derive(Debug, Clone, Default)]
pub struct DownloadControls {
    progress: u8,
}

impl DownloadControls {
    pub const PROGRESS_MAX: u8 = 100;

    /// Progress in percent, always within 0..=100
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Progress as a 0.0..=1.0 fraction for progress bar widgets
    pub fn progress_fraction(&self) -> f32 {
        f32::from(self.progress) / f32::from(Self::PROGRESS_MAX)
    }

    // Nothing outside tests moves the bar until a download path exists.
    #[cfg(test)]
    pub(crate) fn set_progress(&mut self, percent: u32) {
        self.progress = percent.min(u32::from(Self::PROGRESS_MAX)) as u8;
    }
}

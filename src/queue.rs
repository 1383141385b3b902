use crate::model::{QueueEntry, QueueRow};

/// Ordered list of accepted URLs.
///
/// Entries are only ever appended. There is no size limit and duplicates are
/// kept.
#[derive(Debug, Default)]
pub struct IntakeQueue {
    entries: Vec<QueueEntry>,
}

impl IntakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `url`. Empty input is refused and leaves the queue untouched.
    pub fn enqueue(&mut self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }
        self.entries.push(QueueEntry::new(url));
        tracing::info!(url, len = self.entries.len(), "queued");
        true
    }

    /// Current contents in insertion order, ready to draw.
    pub fn render(&self) -> Vec<QueueRow<'_>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| QueueRow {
                position: i + 1,
                url: entry.url(),
            })
            .collect()
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

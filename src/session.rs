use crate::mode::ModeSelector;
use crate::model::DownloadControls;
use crate::queue::IntakeQueue;

/// Everything the window shows, owned in one place.
///
/// Built once at startup and handed to the intake workflow by reference.
#[derive(Debug, Default)]
pub struct Session {
    pub queue: IntakeQueue,
    pub mode: ModeSelector,
    pub controls: DownloadControls,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

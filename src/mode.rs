/// What the user wants out of the queued URLs.
///
/// The selection is kept for later use; nothing in the intake path reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Audio,
    Video,
    Both,
}

impl Mode {
    /// Variants in display order
    pub const ALL: [Mode; 3] = [Mode::Audio, Mode::Video, Mode::Both];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Audio => "Audio",
            Mode::Video => "Video",
            Mode::Both => "Both",
        }
    }
}

/// Exclusive choice among the [`Mode`] variants.
#[derive(Debug, Clone, Default)]
pub struct ModeSelector {
    selected: Mode,
}

impl ModeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Mode {
        self.selected
    }

    pub fn is_selected(&self, mode: Mode) -> bool {
        self.selected == mode
    }

    /// Selects `mode`, deselecting whichever was active.
    pub fn select(&mut self, mode: Mode) {
        if self.selected != mode {
            tracing::debug!(from = ?self.selected, to = ?mode, "mode changed");
            self.selected = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_count(selector: &ModeSelector) -> usize {
        Mode::ALL.iter().filter(|m| selector.is_selected(**m)).count()
    }

    #[test]
    fn defaults_to_audio() {
        let selector = ModeSelector::new();
        assert_eq!(selector.selected(), Mode::Audio);
        assert_eq!(active_count(&selector), 1);
    }

    #[test]
    fn selecting_video_then_both_leaves_only_both_active() {
        let mut selector = ModeSelector::new();
        selector.select(Mode::Video);
        assert_eq!(active_count(&selector), 1);
        selector.select(Mode::Both);

        assert!(selector.is_selected(Mode::Both));
        assert!(!selector.is_selected(Mode::Audio));
        assert!(!selector.is_selected(Mode::Video));
        assert_eq!(active_count(&selector), 1);
    }

    #[test]
    fn labels_follow_display_order() {
        let labels: Vec<_> = Mode::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(labels, ["Audio", "Video", "Both"]);
    }
}

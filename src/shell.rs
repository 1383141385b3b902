//! Window/tray visibility: minimizing hides the window behind the tray icon,
//! activating the tray brings it back.

use tracing::debug;

use crate::tray::TrayMenuAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    /// The window was minimized by the user
    Minimized,
    /// Left click on the tray icon
    TrayActivated,
    Menu(TrayMenuAction),
}

/// What the window layer has to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Nothing,
    Hide,
    /// Show, un-minimize and focus the window
    Restore,
    Quit,
}

pub trait TrayHandle {
    fn set_visible(&mut self, visible: bool);

    /// Whether there is an icon the user can click to get the window back
    fn is_available(&self) -> bool {
        true
    }
}

impl<T: TrayHandle + ?Sized> TrayHandle for Box<T> {
    fn set_visible(&mut self, visible: bool) {
        (**self).set_visible(visible);
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Stand-in when no tray icon could be created.
#[derive(Debug, Default)]
pub struct NoTray;

impl TrayHandle for NoTray {
    fn set_visible(&mut self, _visible: bool) {}

    fn is_available(&self) -> bool {
        false
    }
}

pub struct Shell<T> {
    tray: T,
    window_visible: bool,
    tray_visible: bool,
}

impl<T: TrayHandle> Shell<T> {
    /// Starts with the window shown and the tray icon hidden.
    pub fn new(mut tray: T) -> Self {
        tray.set_visible(false);
        Self {
            tray,
            window_visible: true,
            tray_visible: false,
        }
    }

    pub fn window_visible(&self) -> bool {
        self.window_visible
    }

    pub fn tray_visible(&self) -> bool {
        self.tray_visible
    }

    pub fn handle(&mut self, event: ShellEvent) -> ShellCommand {
        debug!(?event, "shell event");
        match event {
            ShellEvent::Minimized => {
                // Without a tray the plain OS minimize is the only way back.
                if !self.window_visible || !self.tray.is_available() {
                    return ShellCommand::Nothing;
                }
                self.window_visible = false;
                self.set_tray_visible(true);
                ShellCommand::Hide
            }
            ShellEvent::TrayActivated | ShellEvent::Menu(TrayMenuAction::Show) => {
                self.window_visible = true;
                self.set_tray_visible(false);
                ShellCommand::Restore
            }
            ShellEvent::Menu(TrayMenuAction::Quit) => ShellCommand::Quit,
        }
    }

    fn set_tray_visible(&mut self, visible: bool) {
        if self.tray_visible != visible {
            self.tray.set_visible(visible);
            self.tray_visible = visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct FakeTray {
        calls: Rc<RefCell<Vec<bool>>>,
    }

    impl TrayHandle for FakeTray {
        fn set_visible(&mut self, visible: bool) {
            self.calls.borrow_mut().push(visible);
        }
    }

    #[test]
    fn starts_visible_with_tray_hidden() {
        let tray = FakeTray::default();
        let shell = Shell::new(tray.clone());
        assert!(shell.window_visible());
        assert!(!shell.tray_visible());
        assert_eq!(*tray.calls.borrow(), [false]);
    }

    #[test]
    fn minimize_then_activate_round_trips() {
        let tray = FakeTray::default();
        let mut shell = Shell::new(tray.clone());

        assert_eq!(shell.handle(ShellEvent::Minimized), ShellCommand::Hide);
        assert!(!shell.window_visible());
        assert!(shell.tray_visible());

        assert_eq!(shell.handle(ShellEvent::TrayActivated), ShellCommand::Restore);
        assert!(shell.window_visible());
        assert!(!shell.tray_visible());

        assert_eq!(*tray.calls.borrow(), [false, true, false]);
    }

    #[test]
    fn show_menu_restores_like_activation() {
        let mut shell = Shell::new(FakeTray::default());
        shell.handle(ShellEvent::Minimized);
        assert_eq!(
            shell.handle(ShellEvent::Menu(TrayMenuAction::Show)),
            ShellCommand::Restore
        );
        assert!(shell.window_visible());
        assert!(!shell.tray_visible());
    }

    #[test]
    fn quit_menu_requests_quit() {
        let mut shell = Shell::new(FakeTray::default());
        shell.handle(ShellEvent::Minimized);
        assert_eq!(
            shell.handle(ShellEvent::Menu(TrayMenuAction::Quit)),
            ShellCommand::Quit
        );
    }

    #[test]
    fn repeated_minimize_is_ignored() {
        let mut shell = Shell::new(FakeTray::default());
        assert_eq!(shell.handle(ShellEvent::Minimized), ShellCommand::Hide);
        assert_eq!(shell.handle(ShellEvent::Minimized), ShellCommand::Nothing);
    }

    #[test]
    fn without_tray_the_window_is_never_hidden() {
        let mut shell = Shell::new(NoTray);
        assert_eq!(shell.handle(ShellEvent::Minimized), ShellCommand::Nothing);
        assert!(shell.window_visible());
        assert!(!shell.tray_visible());
    }
}

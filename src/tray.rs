use std::sync::mpsc::Receiver;

use eframe::egui;

use crate::assets::RgbaIcon;
use crate::shell::{NoTray, ShellEvent, TrayHandle};

pub const TRAY_MENU_SHOW: &str = "tray_show";
pub const TRAY_MENU_QUIT: &str = "tray_quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMenuAction {
    Show,
    Quit,
}

pub fn action_from_menu_id(menu_id: &str) -> Option<TrayMenuAction> {
    match menu_id {
        TRAY_MENU_SHOW => Some(TrayMenuAction::Show),
        TRAY_MENU_QUIT => Some(TrayMenuAction::Quit),
        _ => None,
    }
}

/// Creates the tray icon (hidden) and the channel its clicks arrive on.
///
/// Falls back to [`NoTray`] when the icon cannot be created or the crate was
/// built without the `system-tray` feature.
pub fn install(
    tooltip: &str,
    icon: Option<&RgbaIcon>,
    ctx: &egui::Context,
) -> (Box<dyn TrayHandle>, Option<Receiver<ShellEvent>>) {
    #[cfg(feature = "system-tray")]
    {
        let (tx, rx) = std::sync::mpsc::channel();
        match system::SystemTray::create(tooltip, icon) {
            Ok(tray) => {
                system::forward_events(tx, ctx.clone());
                tracing::info!("system tray ready");
                return (Box::new(tray), Some(rx));
            }
            Err(error) => tracing::warn!(%error, "system tray unavailable"),
        }
    }
    #[cfg(not(feature = "system-tray"))]
    {
        let _ = (tooltip, icon, ctx);
        tracing::info!("built without system tray support; minimize stays a plain minimize");
    }

    (Box::new(NoTray), None)
}

#[cfg(feature = "system-tray")]
mod system {
    use std::sync::mpsc::Sender;

    use eframe::egui;
    use tray_icon::menu::{Menu, MenuEvent, MenuItem};
    use tray_icon::{Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent};

    use super::{action_from_menu_id, TRAY_MENU_QUIT, TRAY_MENU_SHOW};
    use crate::app;
    use crate::assets::RgbaIcon;
    use crate::shell::{ShellEvent, TrayHandle};

    fn build(tooltip: &str, icon: Option<&RgbaIcon>) -> Result<TrayIcon, String> {
        let show_item = MenuItem::with_id(TRAY_MENU_SHOW, "Show", true, None);
        let quit_item = MenuItem::with_id(TRAY_MENU_QUIT, "Quit", true, None);
        let menu = Menu::with_items(&[&show_item, &quit_item])
            .map_err(|error| format!("Failed to build tray menu: {error}"))?;

        let mut builder = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip(tooltip)
            .with_menu_on_left_click(false);
        if let Some(icon) = icon {
            let icon = Icon::from_rgba(icon.rgba.clone(), icon.width, icon.height)
                .map_err(|error| format!("Failed to convert tray icon: {error}"))?;
            builder = builder.with_icon(icon);
        }

        let tray = builder
            .build()
            .map_err(|error| format!("Failed to create tray icon: {error}"))?;
        tray.set_visible(false)
            .map_err(|error| format!("Failed to hide tray icon: {error}"))?;
        Ok(tray)
    }

    pub(super) fn shell_event_for_menu(menu_id: &str) -> Option<ShellEvent> {
        action_from_menu_id(menu_id).map(ShellEvent::Menu)
    }

    /// Only a completed left click activates the icon.
    pub(super) fn shell_event_for_click(
        button: MouseButton,
        button_state: MouseButtonState,
    ) -> Option<ShellEvent> {
        (button == MouseButton::Left && button_state == MouseButtonState::Up)
            .then_some(ShellEvent::TrayActivated)
    }

    pub(super) fn dispatch(tx: &Sender<ShellEvent>, ctx: &egui::Context, event: ShellEvent) {
        let _ = tx.send(event);
        app::wake_from_tray(ctx, event);
    }

    /// Routes tray clicks and menu picks to the UI thread and wakes it up.
    pub fn forward_events(tx: Sender<ShellEvent>, ctx: egui::Context) {
        let menu_tx = tx.clone();
        let menu_ctx = ctx.clone();
        MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
            if let Some(shell_event) = shell_event_for_menu(event.id().as_ref()) {
                dispatch(&menu_tx, &menu_ctx, shell_event);
            }
        }));

        TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
            if let TrayIconEvent::Click {
                button,
                button_state,
                ..
            } = event
            {
                if let Some(shell_event) = shell_event_for_click(button, button_state) {
                    dispatch(&tx, &ctx, shell_event);
                }
            }
        }));
    }

    // GTK objects are thread-bound, so on Linux the icon lives on its own
    // thread running the GTK loop and only visibility changes cross over.
    #[cfg(target_os = "linux")]
    pub struct SystemTray {
        visibility: Sender<bool>,
    }

    #[cfg(target_os = "linux")]
    impl SystemTray {
        pub fn create(tooltip: &str, icon: Option<&RgbaIcon>) -> Result<Self, String> {
            use std::sync::mpsc::{self, TryRecvError};
            use std::time::Duration;

            let (visibility_tx, visibility_rx) = mpsc::channel::<bool>();
            let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
            let tooltip = tooltip.to_string();
            let icon = icon.cloned();

            std::thread::Builder::new()
                .name("tray".into())
                .spawn(move || {
                    if let Err(error) = gtk::init() {
                        let _ = ready_tx.send(Err(format!("Failed to initialize GTK: {error}")));
                        return;
                    }
                    let tray = match build(&tooltip, icon.as_ref()) {
                        Ok(tray) => tray,
                        Err(error) => {
                            let _ = ready_tx.send(Err(error));
                            return;
                        }
                    };
                    let _ = ready_tx.send(Ok(()));

                    gtk::glib::timeout_add_local(Duration::from_millis(100), move || loop {
                        match visibility_rx.try_recv() {
                            Ok(visible) => {
                                if let Err(error) = tray.set_visible(visible) {
                                    tracing::warn!(%error, "failed to change tray visibility");
                                }
                            }
                            Err(TryRecvError::Empty) => return gtk::glib::ControlFlow::Continue,
                            Err(TryRecvError::Disconnected) => {
                                gtk::main_quit();
                                return gtk::glib::ControlFlow::Break;
                            }
                        }
                    });
                    gtk::main();
                })
                .map_err(|error| format!("Failed to spawn tray thread: {error}"))?;

            ready_rx
                .recv()
                .map_err(|_| "tray thread exited during setup".to_string())??;
            Ok(Self {
                visibility: visibility_tx,
            })
        }
    }

    #[cfg(target_os = "linux")]
    impl TrayHandle for SystemTray {
        fn set_visible(&mut self, visible: bool) {
            if self.visibility.send(visible).is_err() {
                tracing::warn!("tray thread is gone");
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    pub struct SystemTray {
        icon: TrayIcon,
    }

    #[cfg(not(target_os = "linux"))]
    impl SystemTray {
        /// Must run on the thread that owns the event loop.
        pub fn create(tooltip: &str, icon: Option<&RgbaIcon>) -> Result<Self, String> {
            build(tooltip, icon).map(|icon| Self { icon })
        }
    }

    #[cfg(not(target_os = "linux"))]
    impl TrayHandle for SystemTray {
        fn set_visible(&mut self, visible: bool) {
            if let Err(error) = self.icon.set_visible(visible) {
                tracing::warn!(%error, "failed to change tray visibility");
            }
        }
    }
}

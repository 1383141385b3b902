//! egui window: draws the session and feeds widget and tray events into the
//! intake workflow and the shell.

use std::sync::mpsc::Receiver;
use std::time::Duration;

use eframe::egui::{self, RichText, TextStyle, ViewportCommand, Visuals};
use eframe::{App, Frame};
use tracing::debug;

use crate::assets::RgbaIcon;
use crate::config::{Settings, WindowSettings};
use crate::intake::IntakeWorkflow;
use crate::mode::Mode;
use crate::session::Session;
use crate::shell::{Shell, ShellCommand, ShellEvent, TrayHandle};
use crate::tray::{self, TrayMenuAction};
use crate::validator::WebUrlPolicy;

/// Width reserved next to the URL field for the Add button
const ADD_BUTTON_WIDTH: f32 = 80.0;

pub struct DownloaderApp {
    session: Session,
    intake: IntakeWorkflow<WebUrlPolicy>,
    shell: Shell<Box<dyn TrayHandle>>,
    /// Clicks and menu picks coming from the tray icon
    tray_events: Option<Receiver<ShellEvent>>,
    header_size: f32,
    was_minimized: bool,
}

impl DownloaderApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: &Settings, icon: Option<&RgbaIcon>) -> Self {
        cc.egui_ctx.set_visuals(Visuals::dark());
        apply_fonts(&cc.egui_ctx, &settings.window);

        let (tray, tray_events) = tray::install(&settings.window.title, icon, &cc.egui_ctx);
        Self::with_parts(settings, tray, tray_events)
    }

    fn with_parts(
        settings: &Settings,
        tray: Box<dyn TrayHandle>,
        tray_events: Option<Receiver<ShellEvent>>,
    ) -> Self {
        Self {
            session: Session::new(),
            intake: IntakeWorkflow::new(WebUrlPolicy::from_settings(&settings.validation)),
            shell: Shell::new(tray),
            tray_events,
            header_size: settings.window.header_font_size,
            was_minimized: false,
        }
    }

    fn process_shell_events(&mut self, ctx: &egui::Context) {
        let mut events: Vec<ShellEvent> = self
            .tray_events
            .as_ref()
            .map(|rx| rx.try_iter().collect())
            .unwrap_or_default();

        let minimized = ctx.input(|i| i.viewport().minimized).unwrap_or(false);
        if minimized && !self.was_minimized {
            events.push(ShellEvent::Minimized);
        }
        self.was_minimized = minimized;

        for event in events {
            for command in viewport_commands(self.shell.handle(event)) {
                ctx.send_viewport_cmd(command);
            }
        }

        // Tray events also reach the window through `wake_from_tray`; this
        // covers backends that still redraw hidden windows.
        if !self.shell.window_visible() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }

    fn header(&self, text: &str) -> RichText {
        RichText::new(text).strong().size(self.header_size)
    }

    fn draw(&mut self, ctx: &egui::Context) {
        self.process_shell_events(ctx);

        // Go button & progress bar; not connected to anything yet
        egui::TopBottomPanel::bottom("download_controls").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button("Go").clicked() {
                    debug!("Go pressed; no download path is connected");
                }
                ui.add(
                    egui::ProgressBar::new(self.session.controls.progress_fraction())
                        .show_percentage(),
                );
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(self.header("Mode"));
            ui.horizontal(|ui| {
                let mut mode = self.session.mode.selected();
                for option in Mode::ALL {
                    ui.radio_value(&mut mode, option, option.label());
                }
                self.session.mode.select(mode);
            });

            ui.label(self.header("URL"));
            let mut submitted = false;
            ui.horizontal(|ui| {
                let width = (ui.available_width() - ADD_BUTTON_WIDTH).max(0.0);
                let field = ui.add(
                    egui::TextEdit::singleline(self.intake.input_mut()).desired_width(width),
                );
                let entered = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if entered {
                    field.request_focus();
                }
                if ui.button("Add").clicked() || entered {
                    submitted = true;
                }
            });
            if submitted {
                self.intake.submit(&mut self.session.queue);
            }
            if let Some(warning) = self.intake.warning() {
                ui.colored_label(ui.visuals().warn_fg_color, warning.to_string());
            }

            ui.label(self.header("Queue"));
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    for row in self.session.queue.render() {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(row.url);
                        });
                    }
                });
        });
    }
}

impl App for DownloaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.draw(ctx);
    }
}

/// Applies a tray event to the window straight from the tray callback.
///
/// The event still goes through the channel so [`Shell`] stays in sync on
/// the next frame; restoring twice is harmless. Backends that stop running
/// frames for hidden windows only get these commands once the OS delivers a
/// redraw, which is what the repaint request asks for.
pub fn wake_from_tray(ctx: &egui::Context, event: ShellEvent) {
    let command = match event {
        ShellEvent::TrayActivated | ShellEvent::Menu(TrayMenuAction::Show) => ShellCommand::Restore,
        ShellEvent::Menu(TrayMenuAction::Quit) => ShellCommand::Quit,
        ShellEvent::Minimized => ShellCommand::Nothing,
    };
    for cmd in viewport_commands(command) {
        ctx.send_viewport_cmd(cmd);
    }
    ctx.request_repaint();
}

/// Window operations that carry out a shell command.
fn viewport_commands(command: ShellCommand) -> Vec<ViewportCommand> {
    match command {
        ShellCommand::Nothing => Vec::new(),
        ShellCommand::Hide => vec![ViewportCommand::Visible(false)],
        ShellCommand::Restore => vec![
            ViewportCommand::Visible(true),
            ViewportCommand::Minimized(false),
            ViewportCommand::Focus,
        ],
        ShellCommand::Quit => vec![ViewportCommand::Close],
    }
}

fn apply_fonts(ctx: &egui::Context, window: &WindowSettings) {
    let mut style = (*ctx.style()).clone();
    for (text_style, font) in style.text_styles.iter_mut() {
        match text_style {
            TextStyle::Heading => font.size = window.header_font_size,
            TextStyle::Body | TextStyle::Button | TextStyle::Monospace => {
                font.size = window.font_size
            }
            _ => {}
        }
    }
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::NoTray;
    use std::sync::mpsc;

    #[derive(Default)]
    struct AlwaysTray;

    impl TrayHandle for AlwaysTray {
        fn set_visible(&mut self, _visible: bool) {}
    }

    fn frame(app: &mut DownloaderApp, ctx: &egui::Context) -> egui::FullOutput {
        ctx.run(egui::RawInput::default(), |ctx| app.draw(ctx))
    }

    fn minimized_frame(app: &mut DownloaderApp, ctx: &egui::Context) -> egui::FullOutput {
        let mut input = egui::RawInput::default();
        input
            .viewports
            .entry(egui::ViewportId::ROOT)
            .or_default()
            .minimized = Some(true);
        ctx.run(input, |ctx| app.draw(ctx))
    }

    fn root_commands(output: &egui::FullOutput) -> Vec<ViewportCommand> {
        output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .map(|viewport| viewport.commands.clone())
            .unwrap_or_default()
    }

    #[test]
    fn restore_shows_unminimizes_and_focuses() {
        let commands = viewport_commands(ShellCommand::Restore);
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], ViewportCommand::Visible(true)));
        assert!(matches!(commands[1], ViewportCommand::Minimized(false)));
        assert!(matches!(commands[2], ViewportCommand::Focus));
        assert!(viewport_commands(ShellCommand::Nothing).is_empty());
        assert!(matches!(
            viewport_commands(ShellCommand::Quit).as_slice(),
            [ViewportCommand::Close]
        ));
    }

    #[test]
    fn draws_a_frame_with_queued_entries() {
        let mut app = DownloaderApp::with_parts(&Settings::default(), Box::new(NoTray), None);
        app.session.queue.enqueue("https://example.com/a");
        app.session.queue.enqueue("https://example.com/b");

        let ctx = egui::Context::default();
        let _ = frame(&mut app, &ctx);

        assert_eq!(app.session.queue.len(), 2);
        assert_eq!(app.session.mode.selected(), Mode::Audio);
    }

    #[test]
    fn tray_events_drive_the_shell() {
        let (tx, rx) = mpsc::channel();
        let mut app =
            DownloaderApp::with_parts(&Settings::default(), Box::new(AlwaysTray), Some(rx));
        let ctx = egui::Context::default();

        assert_eq!(app.shell.handle(ShellEvent::Minimized), ShellCommand::Hide);
        assert!(!app.shell.window_visible());

        tx.send(ShellEvent::Menu(TrayMenuAction::Show)).unwrap();
        let _ = frame(&mut app, &ctx);

        assert!(app.shell.window_visible());
        assert!(!app.shell.tray_visible());
    }

    #[test]
    fn minimizing_hides_the_window_once() {
        let mut app = DownloaderApp::with_parts(&Settings::default(), Box::new(AlwaysTray), None);
        let ctx = egui::Context::default();

        let output = minimized_frame(&mut app, &ctx);
        assert!(!app.shell.window_visible());
        assert!(app.shell.tray_visible());
        assert!(root_commands(&output)
            .iter()
            .any(|cmd| matches!(cmd, ViewportCommand::Visible(false))));

        // Still minimized on the next frame: no second hide.
        let output = minimized_frame(&mut app, &ctx);
        assert!(!root_commands(&output)
            .iter()
            .any(|cmd| matches!(cmd, ViewportCommand::Visible(false))));
    }

    #[test]
    fn minimizing_without_tray_keeps_the_window() {
        let mut app = DownloaderApp::with_parts(&Settings::default(), Box::new(NoTray), None);
        let ctx = egui::Context::default();

        let output = minimized_frame(&mut app, &ctx);
        assert!(app.shell.window_visible());
        assert!(!root_commands(&output)
            .iter()
            .any(|cmd| matches!(cmd, ViewportCommand::Visible(false))));
    }

    #[test]
    fn tray_callback_restores_without_waiting_for_the_shell() {
        let ctx = egui::Context::default();

        let output = ctx.run(egui::RawInput::default(), |ctx| {
            wake_from_tray(ctx, ShellEvent::TrayActivated)
        });
        let commands = root_commands(&output);
        assert!(commands.iter().any(|cmd| matches!(cmd, ViewportCommand::Visible(true))));
        assert!(commands.iter().any(|cmd| matches!(cmd, ViewportCommand::Focus)));

        let output = ctx.run(egui::RawInput::default(), |ctx| {
            wake_from_tray(ctx, ShellEvent::Menu(TrayMenuAction::Quit))
        });
        assert!(root_commands(&output)
            .iter()
            .any(|cmd| matches!(cmd, ViewportCommand::Close)));
    }
}

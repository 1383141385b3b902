//! Desktop front-end for queueing URLs to download.
//!
//! The intake path (validator, queue, workflow) and the window/tray state
//! machine are plain Rust; [`app`] is the only module that touches egui.

// egui window and widget wiring
pub mod app;
// Embedded icon
pub mod assets;
// Settings file
pub mod config;
// Submit → validate → enqueue state machine
pub mod intake;
// Audio / video / both selection
pub mod mode;
// Queue entries, rows and the inert download controls
pub mod model;
pub mod queue;
pub mod session;
// Window/tray visibility state machine
pub mod shell;
pub mod tray;
// Launch-time self-update through pip and git
pub mod updater;
pub mod validator;

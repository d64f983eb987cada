//! gitscope viewport: mounts a commit graph on a render engine and turns
//! pointer input into hover labels, pinch zoom and fit-to-view.
//!
//! [`Controller`] is engine-agnostic. [`TerminalEngine`] draws on a
//! ratatui canvas; [`recording::RecordingEngine`] records calls for tests.

pub mod app;
pub mod controller;
pub mod engine;
pub mod event;
pub mod recording;
pub mod surface;
pub mod theme;
pub mod ui;
pub mod viewport;

pub use app::{App, SnapshotSource};
pub use controller::{Controller, LABEL_EXCERPT_CHARS, Pinch, ViewSettings, hover_excerpt};
pub use engine::{
    EventKind, NodePatch, RenderEngine, RenderError, RenderSurface, SurfaceEvent, TouchPoint,
};
pub use surface::{CanvasSurface, NavButton, TerminalEngine};

use std::io;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::CrosstermBackend};

/// Restore the terminal to its original state.
///
/// Errors are ignored so this can run from a panic hook.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Run the interactive viewer until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or the first load
/// from `source` fails.
pub fn run(source: Box<dyn SnapshotSource>, settings: ViewSettings) -> Result<()> {
    // Restore the terminal before the default panic handler prints.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        original_hook(info);
    }));

    // Load before touching the terminal so a bad source errors cleanly.
    let mut app = App::new(source, settings)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Tear the mount down while the terminal is still ours.
    drop(app);
    restore_terminal();
    terminal.show_cursor()?;

    result
}

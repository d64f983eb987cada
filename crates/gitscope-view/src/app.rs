use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers, MouseEvent};
use gitscope_graph::Snapshot;
use ratatui::{Terminal, prelude::CrosstermBackend};

use super::controller::{Controller, ViewSettings};
use super::event::{self, AppEvent};
use super::surface::TerminalEngine;
use super::ui;

const IDLE_POLL: Duration = Duration::from_millis(100);
const ANIMATION_POLL: Duration = Duration::from_millis(16);

/// Where the viewer gets its repository data.
pub trait SnapshotSource {
    /// Short human-readable origin, e.g. a file path.
    fn describe(&self) -> String;

    /// Load the current snapshot. `Ok(None)` means "no data yet".
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read at all.
    fn load(&self) -> Result<Option<Snapshot>>;
}

/// Main application state
pub struct App {
    controller: Controller<TerminalEngine>,
    source: Box<dyn SnapshotSource>,
    pub should_quit: bool,
    pub show_help: bool,
    /// Last reload problem, shown in the status bar.
    pub status: Option<String>,
}

impl App {
    /// Create the app and perform the first load.
    ///
    /// # Errors
    ///
    /// Returns an error if the first load fails.
    pub fn new(source: Box<dyn SnapshotSource>, settings: ViewSettings) -> Result<Self> {
        let engine = TerminalEngine::new(settings.double_click, settings.zoom_step);
        let snapshot = source.load()?;
        let mut app = Self {
            controller: Controller::new(engine, settings),
            source,
            should_quit: false,
            show_help: false,
            status: None,
        };
        app.controller.sync(snapshot.map(Arc::new));
        Ok(app)
    }

    pub const fn controller(&self) -> &Controller<TerminalEngine> {
        &self.controller
    }

    pub const fn controller_mut(&mut self) -> &mut Controller<TerminalEngine> {
        &mut self.controller
    }

    /// Title line: repository headline if known, else the source.
    pub fn title(&self) -> String {
        self.controller
            .snapshot()
            .and_then(|s| s.info())
            .map_or_else(|| self.source.describe(), gitscope_graph::RepositoryInfo::headline)
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let animating = self
                .controller
                .surface()
                .is_some_and(super::surface::CanvasSurface::is_animating);
            let timeout = if animating { ANIMATION_POLL } else { IDLE_POLL };

            match event::next_event(timeout)? {
                AppEvent::Key(key) => self.handle_key(key.code, key.modifiers),
                AppEvent::Mouse(mouse) => self.handle_mouse(mouse, Instant::now()),
                AppEvent::Resize { .. } | AppEvent::Tick => {}
            }

            if let Some(surface) = self.controller.surface_mut() {
                surface.tick(Instant::now());
            }
        }
        Ok(())
    }

    /// Re-read the source and remount. Failures are kept for the status bar
    /// and leave the current graph in place.
    pub fn reload(&mut self) {
        match self.source.load() {
            Ok(snapshot) => {
                self.status = None;
                self.controller.sync(snapshot.map(Arc::new));
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload failed");
                self.status = Some(format!("reload failed: {e}"));
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        // If help is shown, any key closes it
        if self.show_help {
            self.show_help = false;
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') => self.reload(),
            other => {
                if let Some(surface) = self.controller.surface_mut() {
                    surface.handle_key(other);
                }
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if self.show_help {
            return;
        }
        let Some(surface) = self.controller.surface_mut() else {
            return;
        };
        for event in surface.handle_mouse(mouse, now) {
            self.controller.dispatch(event);
        }
    }
}

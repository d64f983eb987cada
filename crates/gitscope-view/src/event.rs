use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
    Tick,
}

fn normalize_event(event: Event) -> AppEvent {
    match event {
        // Windows reports both press and release; only presses drive the UI.
        Event::Key(key) if key.kind != KeyEventKind::Release => AppEvent::Key(key),
        Event::Mouse(mouse) => AppEvent::Mouse(mouse),
        Event::Resize(width, height) => AppEvent::Resize { width, height },
        _ => AppEvent::Tick,
    }
}

pub fn next_event(timeout: Duration) -> Result<AppEvent> {
    if !event::poll(timeout)? {
        return Ok(AppEvent::Tick);
    }

    Ok(normalize_event(event::read()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers, MouseButton, MouseEventKind};

    #[test]
    fn normalize_key_event() {
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(normalize_event(Event::Key(key)), AppEvent::Key(key));
    }

    #[test]
    fn key_release_becomes_tick() {
        let key = KeyEvent {
            code: KeyCode::Char('f'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(normalize_event(Event::Key(key)), AppEvent::Tick);
    }

    #[test]
    fn normalize_mouse_event() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(normalize_event(Event::Mouse(mouse)), AppEvent::Mouse(mouse));
    }

    #[test]
    fn normalize_resize_event() {
        assert_eq!(
            normalize_event(Event::Resize(120, 40)),
            AppEvent::Resize {
                width: 120,
                height: 40
            }
        );
    }

    #[test]
    fn normalize_focus_and_paste_to_tick() {
        assert_eq!(normalize_event(Event::FocusGained), AppEvent::Tick);
        assert_eq!(normalize_event(Event::Paste("x".to_owned())), AppEvent::Tick);
    }
}

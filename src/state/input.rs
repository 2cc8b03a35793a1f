//! Input Module - Event conversion and polling
//!
//! Bridges crossterm's event system with the keyboard and pointer modules, so
//! widgets can be driven from a terminal event loop.
//!
//! # API
//!
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `convert_mouse_event` - Convert crossterm MouseEvent, hit-testing the cell
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `route_event` - Dispatch event to appropriate handler
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::state::input::{poll_event, route_event};
//! use std::time::Duration;
//!
//! loop {
//!     if let Ok(Some(event)) = poll_event(Duration::from_millis(16), |x, y| hit_test(x, y)) {
//!         route_event(event);
//!     }
//!     timers::advance(Duration::from_millis(16));
//! }
//! ```

use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers, MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use super::keyboard::{self, KeyState, KeyboardEvent, Modifiers};
use super::pointer::{self, PointerEvent, PointerKind};

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified event type for the widgets
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Keyboard event (key press, release, etc.)
    Key(KeyboardEvent),
    /// Click on an element
    Pointer(PointerEvent),
    /// Pointer moved over an element (or off every element)
    Hover(Option<usize>),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let mut modifiers = convert_modifiers(event.modifiers);

    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => {
            modifiers.shift = true;
            "Tab".to_string()
        }
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers,
        state,
        target: None,
    }
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::SUPER),
    }
}

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert a crossterm mouse event.
///
/// `hit_test` maps a terminal cell to the element drawn there. A left-button
/// release over an element is a click; movement is a hover. Everything else
/// converts to `InputEvent::None`.
pub fn convert_mouse_event<H>(event: CrosstermMouseEvent, hit_test: H) -> InputEvent
where
    H: Fn(u16, u16) -> Option<usize>,
{
    let target = hit_test(event.column, event.row);

    match event.kind {
        MouseEventKind::Up(CrosstermMouseButton::Left) => match target {
            Some(target) => {
                let mut click = PointerEvent::new(
                    PointerKind::Click,
                    target,
                    f32::from(event.column),
                    f32::from(event.row),
                );
                click.modifiers = convert_modifiers(event.modifiers);
                InputEvent::Pointer(click)
            }
            None => InputEvent::None,
        },
        MouseEventKind::Moved => InputEvent::Hover(target),
        _ => InputEvent::None,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event<H>(timeout: Duration, hit_test: H) -> std::io::Result<Option<InputEvent>>
where
    H: Fn(u16, u16) -> Option<usize>,
{
    if poll(timeout)? {
        Ok(Some(read_event(hit_test)?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event<H>(hit_test: H) -> std::io::Result<InputEvent>
where
    H: Fn(u16, u16) -> Option<usize>,
{
    Ok(match read()? {
        CrosstermEvent::Key(key) => InputEvent::Key(convert_key_event(key)),
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse, hit_test),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    })
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Route an event to the appropriate handler.
/// Returns true if any handler consumed the event.
pub fn route_event(event: InputEvent) -> bool {
    match event {
        InputEvent::Key(key) => keyboard::dispatch(key),
        InputEvent::Pointer(event) => pointer::dispatch(event),
        InputEvent::Hover(target) => {
            pointer::hover(target);
            false
        }
        InputEvent::Resize(w, h) => {
            tracing::debug!(width = w, height = h, "terminal resized");
            false
        }
        InputEvent::None => false,
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind) -> CrosstermMouseEvent {
        CrosstermMouseEvent {
            kind,
            column: 12,
            row: 3,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[test]
    fn test_convert_key_names() {
        let cases = [
            (KeyCode::Enter, "Enter"),
            (KeyCode::Char(' '), " "),
            (KeyCode::Esc, "Escape"),
            (KeyCode::Left, "ArrowLeft"),
            (KeyCode::Right, "ArrowRight"),
            (KeyCode::Up, "ArrowUp"),
            (KeyCode::Down, "ArrowDown"),
            (KeyCode::Home, "Home"),
            (KeyCode::End, "End"),
        ];

        for (code, expected) in cases {
            let event = convert_key_event(key(code, KeyModifiers::empty()));
            assert_eq!(event.key, expected);
            assert_eq!(event.state, KeyState::Press);
            assert_eq!(event.target, None);
        }
    }

    #[test]
    fn test_back_tab_is_shift_tab() {
        let event = convert_key_event(key(KeyCode::BackTab, KeyModifiers::empty()));
        assert!(event.is_shift_tab());

        let event = convert_key_event(key(KeyCode::Tab, KeyModifiers::CONTROL));
        assert_eq!(event.key, "Tab");
        assert!(event.modifiers.ctrl);
        assert!(!event.modifiers.shift);
    }

    #[test]
    fn test_release_state() {
        let event = convert_key_event(CrosstermKeyEvent {
            kind: KeyEventKind::Release,
            ..key(KeyCode::Char('a'), KeyModifiers::empty())
        });
        assert_eq!(event.state, KeyState::Release);
    }

    #[test]
    fn test_convert_mouse_click_hits_element() {
        let event = convert_mouse_event(mouse(MouseEventKind::Up(CrosstermMouseButton::Left)), |x, y| {
            (x == 12 && y == 3).then_some(7)
        });

        let InputEvent::Pointer(click) = event else {
            panic!("expected pointer event, got {event:?}");
        };
        assert_eq!(click.kind, PointerKind::Click);
        assert_eq!(click.target, 7);
        assert_eq!(click.x, 12.0);
    }

    #[test]
    fn test_convert_mouse_misses() {
        let up = mouse(MouseEventKind::Up(CrosstermMouseButton::Left));
        assert_eq!(convert_mouse_event(up, |_, _| None), InputEvent::None);

        let down = mouse(MouseEventKind::Down(CrosstermMouseButton::Left));
        assert_eq!(convert_mouse_event(down, |_, _| Some(1)), InputEvent::None);

        let moved = mouse(MouseEventKind::Moved);
        assert_eq!(convert_mouse_event(moved, |_, _| Some(4)), InputEvent::Hover(Some(4)));
    }

    #[test]
    fn test_route_resize_not_consumed() {
        assert!(!route_event(InputEvent::Resize(80, 24)));
        assert!(!route_event(InputEvent::None));
    }
}

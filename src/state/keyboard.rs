//! Keyboard Module - Key/paste event state and handler registry.
//!
//! Bridges crossterm's event stream to the widget's slot handlers. Handlers
//! are registered per focus handle and only run while that handle holds
//! focus. Paste payloads (bracketed paste) take a separate dispatch path so
//! the widget can pre-filter them before the shared edit algorithm.
//!
//! # API
//!
//! - `on_focused(handle, fn)` - key handler while `handle` has focus
//! - `on_paste(handle, fn)` - paste handler while `handle` has focus
//! - `dispatch_focused` / `dispatch_paste` - routed by the host loop
//! - `convert_key_event` - crossterm KeyEvent -> KeyboardEvent
//! - `route_event` - feed one crossterm event through the registry

use std::cell::RefCell;
use std::collections::HashMap;

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
};
use spark_signals::{signal, Signal};

use super::focus;

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g. "5", "Backspace", "ArrowLeft")
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// True for a single printable character with no chording modifiers.
    pub fn is_plain_char(&self) -> bool {
        self.key.chars().count() == 1 && !self.modifiers.ctrl && !self.modifiers.alt && !self.modifiers.meta
    }
}

/// Handler for keyboard events. Return true to consume the event.
pub type KeyHandler = Box<dyn Fn(&KeyboardEvent) -> bool>;

/// Handler for paste payloads. Return true to consume the payload.
pub type PasteHandler = Box<dyn Fn(&str) -> bool>;

// =============================================================================
// STATE
// =============================================================================

thread_local! {
    static LAST_EVENT: Signal<Option<KeyboardEvent>> = signal(None);
}

/// Get the last keyboard event
pub fn last_event() -> Option<KeyboardEvent> {
    LAST_EVENT.with(|s| s.get())
}

/// Get the last key pressed
pub fn last_key() -> String {
    last_event().map(|e| e.key).unwrap_or_default()
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    focused_handlers: HashMap<usize, Vec<(usize, KeyHandler)>>,
    paste_handlers: HashMap<usize, Vec<(usize, PasteHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            focused_handlers: HashMap::new(),
            paste_handlers: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Dispatch a key event to the handlers of the focused handle.
/// Returns true if any handler consumed the event.
pub fn dispatch_focused(focused: i32, event: &KeyboardEvent) -> bool {
    LAST_EVENT.with(|s| s.set(Some(event.clone())));

    if focused < 0 || event.state != KeyState::Press {
        return false;
    }

    REGISTRY.with(|reg| {
        let reg = reg.borrow();
        if let Some(handlers) = reg.focused_handlers.get(&(focused as usize)) {
            for (_, handler) in handlers {
                if handler(event) {
                    return true;
                }
            }
        }
        false
    })
}

/// Dispatch a paste payload to the handlers of the focused handle.
pub fn dispatch_paste(focused: i32, payload: &str) -> bool {
    if focused < 0 {
        return false;
    }

    REGISTRY.with(|reg| {
        let reg = reg.borrow();
        if let Some(handlers) = reg.paste_handlers.get(&(focused as usize)) {
            for (_, handler) in handlers {
                if handler(payload) {
                    return true;
                }
            }
        }
        false
    })
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to key events while `handle` has focus.
/// Return true from the handler to consume the event.
/// Returns cleanup function.
pub fn on_focused<F>(handle: usize, handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.focused_handlers
            .entry(handle)
            .or_default()
            .push((id, Box::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(handlers) = reg.focused_handlers.get_mut(&handle) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
                if handlers.is_empty() {
                    reg.focused_handlers.remove(&handle);
                }
            }
        });
    }
}

/// Subscribe to paste payloads while `handle` has focus.
/// Returns cleanup function.
pub fn on_paste<F>(handle: usize, handler: F) -> impl FnOnce()
where
    F: Fn(&str) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.paste_handlers
            .entry(handle)
            .or_default()
            .push((id, Box::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(handlers) = reg.paste_handlers.get_mut(&handle) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
                if handlers.is_empty() {
                    reg.paste_handlers.remove(&handle);
                }
            }
        });
    }
}

/// Clean up all handlers for a focus handle.
/// Called when the widget unmounts to prevent leaks.
pub fn cleanup_handle(handle: usize) {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.focused_handlers.remove(&handle);
        reg.paste_handlers.remove(&handle);
    });
}

/// Reset keyboard state (for testing)
pub fn reset_keyboard_state() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.focused_handlers.clear();
        reg.paste_handlers.clear();
        reg.next_id = 0;
    });
    LAST_EVENT.with(|s| s.set(None));
}

// =============================================================================
// CROSSTERM CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers: convert_modifiers(event.modifiers),
        state,
    }
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: false, // Not exposed by crossterm
    }
}

/// Route one crossterm event to the focused handle's handlers.
/// Returns true if a handler consumed it.
pub fn route_event(event: CrosstermEvent) -> bool {
    match event {
        CrosstermEvent::Key(key) => {
            dispatch_focused(focus::get_focused_handle(), &convert_key_event(key))
        }
        CrosstermEvent::Paste(payload) => dispatch_paste(focus::get_focused_handle(), &payload),
        _ => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================

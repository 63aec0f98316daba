//! Clipboard Module - Paste buffer for the Ctrl+V path.
//!
//! Internal buffer fallback with no external dependencies. Bracketed paste
//! from the terminal bypasses this module entirely (the payload arrives in
//! the event itself); this buffer backs the explicit Ctrl+V path and tests.

use std::cell::RefCell;

thread_local! {
    static CLIPBOARD_BUFFER: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Copy text to the clipboard buffer.
/// Empty strings are ignored (buffer not modified).
pub fn copy(text: &str) {
    if text.is_empty() {
        return;
    }

    CLIPBOARD_BUFFER.with(|buf| {
        *buf.borrow_mut() = Some(text.to_string());
    });
}

/// Paste text from the clipboard buffer.
///
/// Returns the most recently copied text, or None if empty. Non-destructive.
pub fn paste() -> Option<String> {
    CLIPBOARD_BUFFER.with(|buf| buf.borrow().clone())
}

/// Clear the clipboard buffer.
pub fn clear() {
    CLIPBOARD_BUFFER.with(|buf| {
        *buf.borrow_mut() = None;
    });
}

/// Check if the buffer has content.
pub fn has_content() -> bool {
    CLIPBOARD_BUFFER.with(|buf| buf.borrow().is_some())
}

//! State Module - Runtime state systems behind the widget
//!
//! - **Focus** - focused-handle signal, slot handle registry, callbacks
//! - **Keyboard** - event types, crossterm conversion, focused dispatch
//! - **Clipboard** - paste buffer for the Ctrl+V path
//! - **Scroll** - global viewport offset (shared with the host)
//! - **Frame** - keyed next-frame callback queue

pub mod clipboard;
pub mod focus;
pub mod frame;
pub mod keyboard;
pub mod scroll;

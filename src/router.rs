//! Keyboard Router - Navigation and deletion semantics for the focused slot.
//!
//! Pure decision core: given a key event, the focused slot and the current
//! slot cells, decide what should happen. The widget performs the decided
//! action (value emission, stabilized focus transfer); this module never
//! touches focus or scroll itself.
//!
//! Deletion is deliberately asymmetric:
//! - Backspace on a non-empty slot clears it in place, focus stays
//! - Backspace on an empty slot `k > 0` clears slot `k - 1` AND moves focus
//!   there - a compound delete-and-move in one keypress
//!
//! `+ - e .` and ArrowUp/ArrowDown are artifacts of spin-box renderers and
//! are suppressed outright: they must never alter value or focus.

use crate::state::keyboard::KeyboardEvent;
use crate::types::SlotCell;

// =============================================================================
// Key Action
// =============================================================================

/// What the widget should do with a key event on slot `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Clear slot `slot` in place; emit the reassembled value; focus stays.
    ClearSlot { slot: usize },
    /// Clear slot `slot` and move focus to it (Backspace on an empty slot).
    ClearAndFocus { slot: usize },
    /// Move focus to `slot`; no value change.
    FocusSlot { slot: usize },
    /// Consume the event without any effect.
    Suppress,
    /// Not ours: digit entry and everything else take the input-event path.
    PassThrough,
}

/// Keys that some renderers accept in numeric fields but that are
/// meaningless here.
const SUPPRESSED_KEYS: &[&str] = &["+", "-", "e", ".", "ArrowUp", "ArrowDown"];

// =============================================================================
// Route
// =============================================================================

/// Decide the action for a key event scoped to focused slot `k`.
pub fn route(event: &KeyboardEvent, k: usize, cells: &[SlotCell]) -> KeyAction {
    match event.key.as_str() {
        "Backspace" => {
            let filled = cells.get(k).copied().flatten().is_some();
            if filled {
                KeyAction::ClearSlot { slot: k }
            } else if k > 0 {
                KeyAction::ClearAndFocus { slot: k - 1 }
            } else {
                KeyAction::Suppress
            }
        }
        "ArrowLeft" => {
            if k > 0 {
                KeyAction::FocusSlot { slot: k - 1 }
            } else {
                KeyAction::Suppress
            }
        }
        "ArrowRight" => {
            if k + 1 < cells.len() {
                KeyAction::FocusSlot { slot: k + 1 }
            } else {
                KeyAction::Suppress
            }
        }
        key if SUPPRESSED_KEYS.contains(&key) => KeyAction::Suppress,
        _ => KeyAction::PassThrough,
    }
}

// =============================================================================
// Tests
// =============================================================================

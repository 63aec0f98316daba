//! Pin input - Fixed-length one-digit-per-slot password entry.
//!
//! Renders a six-slot code field where each slot holds one digit and the
//! assembled string lives in a single two-way bound signal. Typing fills
//! the focused slot and advances, paste distributes digits across slots,
//! Backspace clears in place or walks left, and every accepted edit fires
//! on_change with the assembled value before any focus transfer.
//!
//! Focus transfers go through the scroll stabilizer so embedded hosts
//! cannot yank the viewport, and the assembled value is mirrored into the
//! form registry under the field name.

use std::rc::Rc;

use spark_signals::Signal;

use crate::edit;
use crate::platform::{Capabilities, EnvProbe, PlatformProbe};
use crate::primitives::mirror;
use crate::primitives::types::{Cleanup, PinInputProps, PropValue};
use crate::projection::{self, DisplayMode};
use crate::router::{self, KeyAction};
use crate::stabilizer;
use crate::state::focus::{self, FocusCallbacks};
use crate::state::frame;
use crate::state::keyboard;
use crate::types::{DisplayCell, SlotCell, DEFAULT_MASK_CHAR, PIN_LENGTH};

// =============================================================================
// Component Handle
// =============================================================================

/// Live pin input instance. Dropping it without `unmount` leaks the
/// registrations; call `unmount` when the widget leaves the screen.
pub struct PinInput {
    name: String,
    value: Signal<String>,
    mode: DisplayMode,
    error_message: Option<PropValue<String>>,
    handles: Rc<Vec<usize>>,
    cleanup: Option<Cleanup>,
}

impl PinInput {
    /// Display cells for the current value, one per slot.
    pub fn display(&self) -> Vec<DisplayCell> {
        let cells = projection::project(&self.value.get(), PIN_LENGTH);
        projection::display(&cells, self.mode)
    }

    /// Index of the focused slot, if focus is inside the widget.
    pub fn focused_slot(&self) -> Option<usize> {
        let focused = focus::get_focused_handle();
        if focused < 0 {
            return None;
        }
        self.handles.iter().position(|&h| h == focused as usize)
    }

    /// Focus handle of the given slot (for host-driven focus moves).
    pub fn slot_handle(&self, slot: usize) -> Option<usize> {
        self.handles.get(slot).copied()
    }

    /// Field name the widget is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current assembled value.
    pub fn value(&self) -> String {
        self.value.get()
    }

    /// Validation error to surface, if a non-empty one was provided.
    pub fn error_message(&self) -> Option<String> {
        self.error_message
            .as_ref()
            .map(|prop| prop.get())
            .filter(|msg| !msg.is_empty())
    }

    /// Unmount the widget and release all registrations.
    pub fn unmount(mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

// =============================================================================
// Component Function
// =============================================================================

/// Mount a pin input.
pub fn pin_input(props: PinInputProps) -> PinInput {
    // 1. PLATFORM CAPABILITIES - computed once, fixed for the mount
    let probe: Rc<dyn PlatformProbe> = props.probe.unwrap_or_else(|| Rc::new(EnvProbe));
    let caps = Capabilities::for_mount(probe.as_ref(), props.show_digits);
    let mode = display_mode(caps, props.show_digits, props.mask_char);

    let name = props.name;
    let value = props.value;
    let on_change = props.on_change;
    let on_blur = props.on_blur;

    let mut cleanups: Vec<Cleanup> = Vec::new();

    // 2. FOCUS HANDLES - one per slot, owned by the widget
    let handles: Rc<Vec<usize>> = Rc::new(
        (0..PIN_LENGTH)
            .map(|_| focus::register(FocusCallbacks::default()))
            .collect(),
    );

    // 3. WIDGET BLUR - fires only when focus leaves the whole slot group.
    // The check is deferred one frame so slot-to-slot transfers (blur then
    // focus on a sibling) never count as leaving.
    let blur_key = format!("pin-blur-{}", name);
    for &handle in handles.iter() {
        let handles = handles.clone();
        let name = name.clone();
        let blur_key = blur_key.clone();
        let on_blur = on_blur.clone();
        let remove = focus::observe(
            handle,
            FocusCallbacks {
                on_focus: None,
                on_blur: Some(Box::new(move || {
                    let handles = handles.clone();
                    let name = name.clone();
                    let on_blur = on_blur.clone();
                    frame::schedule(&blur_key, move || {
                        let focused = focus::get_focused_handle();
                        let inside =
                            focused >= 0 && handles.contains(&(focused as usize));
                        if !inside {
                            mirror::mark_touched(&name);
                            if let Some(cb) = &on_blur {
                                cb();
                            }
                        }
                    });
                })),
            },
        );
        cleanups.push(Box::new(remove));
    }

    // 4. EDIT COMMIT - value write and on_change, always before any focus
    // transfer
    let commit: Rc<dyn Fn(&str)> = {
        let value = value.clone();
        let on_change = on_change.clone();
        Rc::new(move |next: &str| {
            value.set(next.to_string());
            if let Some(cb) = &on_change {
                cb(next);
            }
        })
    };

    // 5. KEYBOARD - one handler per slot
    for (k, &handle) in handles.iter().enumerate() {
        let value = value.clone();
        let commit = commit.clone();
        let handles = handles.clone();
        let remove = keyboard::on_focused(handle, move |event| {
            let cells = projection::project(&value.get(), PIN_LENGTH);

            // Clipboard paste lands on the focused slot.
            if event.key == "v" && event.modifiers.ctrl {
                if let Some(text) = crate::state::clipboard::paste() {
                    apply_digits(&text, k, &cells, &commit, &handles, caps);
                }
                return true;
            }

            match router::route(event, k, &cells) {
                KeyAction::ClearSlot { slot } => {
                    let mut next = cells.clone();
                    next[slot] = None;
                    commit(&projection::join(&next));
                    true
                }
                KeyAction::ClearAndFocus { slot } => {
                    let mut next = cells.clone();
                    next[slot] = None;
                    commit(&projection::join(&next));
                    stabilizer::stabilized_focus(handles[slot], caps);
                    true
                }
                KeyAction::FocusSlot { slot } => {
                    stabilizer::stabilized_focus(handles[slot], caps);
                    true
                }
                KeyAction::Suppress => true,
                KeyAction::PassThrough => {
                    if event.is_plain_char() {
                        // Digits splice in; any other character is
                        // swallowed to keep the field numeric-only.
                        if let Some(outcome) = edit::apply(&event.key, k, &cells) {
                            commit(&outcome.value);
                            stabilizer::stabilized_focus(handles[outcome.next_focus], caps);
                        }
                        true
                    } else {
                        false
                    }
                }
            }
        });
        cleanups.push(Box::new(remove));
    }

    // 6. BRACKETED PASTE - terminal paste events, same distribution path
    for (k, &handle) in handles.iter().enumerate() {
        let value = value.clone();
        let commit = commit.clone();
        let handles = handles.clone();
        let remove = keyboard::on_paste(handle, move |payload| {
            let cells = projection::project(&value.get(), PIN_LENGTH);
            apply_digits(payload, k, &cells, &commit, &handles, caps);
            true
        });
        cleanups.push(Box::new(remove));
    }

    // 7. FORM MIRROR - the assembled value under the field name
    {
        let value = value.clone();
        let remove = mirror::register_field(name.clone(), true, Rc::new(move || value.get()));
        cleanups.push(Box::new(remove));
    }

    // 8. FOCUS GUARD - viewport restore on transfers the widget did not make
    cleanups.push(Box::new(stabilizer::install_focus_guard(&handles, caps)));

    // 9. AUTO FOCUS - first slot, only when starting empty
    if props.auto_focus && value.get().is_empty() {
        stabilizer::stabilized_focus(handles[0], caps);
    }

    // 10. CLEANUP
    let cleanup: Cleanup = {
        let handles = handles.clone();
        let blur_key = blur_key.clone();
        Box::new(move || {
            for cleanup in cleanups {
                cleanup();
            }
            frame::cancel(&blur_key);
            for &handle in handles.iter() {
                keyboard::cleanup_handle(handle);
                focus::unregister(handle);
            }
        })
    };

    PinInput {
        name,
        value,
        mode,
        error_message: props.error_message,
        handles,
        cleanup: Some(cleanup),
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn display_mode(caps: Capabilities, show_digits: bool, mask_char: Option<char>) -> DisplayMode {
    if show_digits {
        DisplayMode::Digits
    } else if caps.use_styled_mask {
        DisplayMode::StyledMask
    } else {
        DisplayMode::Obscured {
            mask_char: mask_char.unwrap_or(DEFAULT_MASK_CHAR),
        }
    }
}

/// Filter a payload down to its digits and splice them in at `target`.
/// Payloads without digits are ignored.
fn apply_digits(
    payload: &str,
    target: usize,
    cells: &[SlotCell],
    commit: &Rc<dyn Fn(&str)>,
    handles: &Rc<Vec<usize>>,
    caps: Capabilities,
) {
    let digits = edit::extract_digits(payload);
    if let Some(outcome) = edit::apply(&digits, target, cells) {
        commit(&outcome.value);
        stabilizer::stabilized_focus(handles[outcome.next_focus], caps);
    }
}

// =============================================================================
// Tests
// =============================================================================

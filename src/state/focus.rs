//! Focus System - Slot focus state and handle registry.
//!
//! Every focusable slot registers here and receives an opaque handle. The
//! currently focused handle is a signal (-1 when nothing is focused), and
//! focus/blur callbacks fire at the transition point, blur before focus.
//!
//! Focus transfers can request that the host not auto-scroll the focused
//! field into view. Hosts that honor the request skip their scroll-into-view
//! behavior; hosts that do not are handled one level up by the stabilizer,
//! which brackets every transfer with a scroll snapshot/restore pair.
//!
//! # Example
//!
//! ```ignore
//! use pinfield::state::focus;
//!
//! let handle = focus::register(focus::FocusCallbacks::default());
//! focus::focus(handle);
//! assert!(focus::is_focused(handle));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use spark_signals::{signal, Signal};

// =============================================================================
// FOCUSED HANDLE SIGNAL
// =============================================================================

thread_local! {
    static FOCUSED_HANDLE: Signal<i32> = signal(-1);
}

/// Get the currently focused handle (-1 if none)
pub fn get_focused_handle() -> i32 {
    FOCUSED_HANDLE.with(|s| s.get())
}

/// Check if any handle is focused
pub fn has_focus() -> bool {
    get_focused_handle() >= 0
}

/// Check if a specific handle is focused
pub fn is_focused(handle: usize) -> bool {
    get_focused_handle() == handle as i32
}

// =============================================================================
// FOCUS OPTIONS
// =============================================================================

/// Options for a focus transfer.
#[derive(Clone, Copy, Debug, Default)]
pub struct FocusOptions {
    /// Ask the host not to auto-scroll the newly focused field into view.
    /// Advisory: hosts may ignore it, which is why the stabilizer also
    /// restores the scroll offset after every transfer.
    pub prevent_scroll: bool,
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Callbacks fired when focus changes.
#[derive(Default)]
pub struct FocusCallbacks {
    pub on_focus: Option<Box<dyn Fn()>>,
    pub on_blur: Option<Box<dyn Fn()>>,
}

struct FocusRegistry {
    callbacks: HashMap<usize, Vec<FocusCallbacks>>,
    registered: Vec<usize>,
    next_handle: usize,
}

impl FocusRegistry {
    fn new() -> Self {
        Self {
            callbacks: HashMap::new(),
            registered: Vec::new(),
            next_handle: 0,
        }
    }
}

thread_local! {
    static REGISTRY: RefCell<FocusRegistry> = RefCell::new(FocusRegistry::new());
}

/// Register a focusable slot. Returns its opaque handle.
pub fn register(callbacks: FocusCallbacks) -> usize {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let handle = reg.next_handle;
        reg.next_handle += 1;
        reg.registered.push(handle);
        reg.callbacks.entry(handle).or_default().push(callbacks);
        handle
    })
}

/// Attach additional callbacks to an existing handle (e.g. a focus guard on
/// top of the widget's own callbacks). Returns a cleanup function.
pub fn observe(handle: usize, callbacks: FocusCallbacks) -> impl FnOnce() {
    let slot_id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let list = reg.callbacks.entry(handle).or_default();
        list.push(callbacks);
        list.len() - 1
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(list) = reg.callbacks.get_mut(&handle) {
                if let Some(slot) = list.get_mut(slot_id) {
                    slot.on_focus = None;
                    slot.on_blur = None;
                }
            }
        });
    }
}

/// Unregister a handle. Blurs it first if it holds focus.
pub fn unregister(handle: usize) {
    if is_focused(handle) {
        blur();
    }
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.registered.retain(|&h| h != handle);
        reg.callbacks.remove(&handle);
    });
}

fn is_registered(handle: usize) -> bool {
    REGISTRY.with(|reg| reg.borrow().registered.contains(&handle))
}

// =============================================================================
// FOCUS TRANSFER
// =============================================================================

/// Set focus and fire callbacks at the source: blur on the old handle
/// first, then focus on the new one.
fn set_focus_with_callbacks(new_handle: i32) {
    let old_handle = get_focused_handle();

    if old_handle == new_handle {
        return;
    }

    // Fire on_blur for all callbacks on the old handle
    if old_handle >= 0 {
        REGISTRY.with(|reg| {
            let reg = reg.borrow();
            if let Some(list) = reg.callbacks.get(&(old_handle as usize)) {
                for cb in list {
                    if let Some(ref on_blur) = cb.on_blur {
                        on_blur();
                    }
                }
            }
        });
    }

    FOCUSED_HANDLE.with(|s| s.set(new_handle));

    // Fire on_focus for all callbacks on the new handle
    if new_handle >= 0 {
        REGISTRY.with(|reg| {
            let reg = reg.borrow();
            if let Some(list) = reg.callbacks.get(&(new_handle as usize)) {
                for cb in list {
                    if let Some(ref on_focus) = cb.on_focus {
                        on_focus();
                    }
                }
            }
        });
    }
}

/// Focus a handle. Returns false if the handle is not registered.
pub fn focus(handle: usize) -> bool {
    focus_with_options(handle, FocusOptions::default())
}

/// Focus a handle with explicit options.
///
/// `prevent_scroll` is recorded for the host loop to read when it reacts to
/// the focus change; the transfer itself is identical either way.
pub fn focus_with_options(handle: usize, options: FocusOptions) -> bool {
    if !is_registered(handle) {
        return false;
    }
    LAST_OPTIONS.with(|s| s.set(options.prevent_scroll));
    set_focus_with_callbacks(handle as i32);
    true
}

/// Clear focus (no handle focused)
pub fn blur() {
    if get_focused_handle() >= 0 {
        set_focus_with_callbacks(-1);
    }
}

thread_local! {
    static LAST_OPTIONS: Signal<bool> = signal(false);
}

/// Whether the most recent focus transfer asked the host not to auto-scroll.
pub fn last_transfer_prevented_scroll() -> bool {
    LAST_OPTIONS.with(|s| s.get())
}

// =============================================================================
// RESET (for testing)
// =============================================================================

/// Reset all focus state (for testing)
pub fn reset_focus_state() {
    set_focus_with_callbacks(-1);
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.callbacks.clear();
        reg.registered.clear();
        reg.next_handle = 0;
    });
    LAST_OPTIONS.with(|s| s.set(false));
}

// =============================================================================
// TESTS
// =============================================================================

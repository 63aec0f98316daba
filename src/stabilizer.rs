//! Scroll/Focus Stabilizer - Viewport-preserving focus transfers.
//!
//! On the embedded host every focus transfer triggers an unwanted viewport
//! auto-scroll that the focus options cannot fully suppress. The stabilizer
//! wraps each transfer in a snapshot/restore pair: capture the viewport
//! offset, move focus with scrolling suppressed, restore the offset
//! immediately, then restore it once more on the next frame to undo any
//! deferred adjustment the host applies after the transfer returns.
//!
//! A separate guard covers focus changes the widget did not initiate
//! (pointer, host-driven): it observes focus entry on each slot and
//! schedules the same next-frame restore. Restores are keyed per widget so
//! rapid transfers coalesce to the latest snapshot.
//!
//! On plain hosts every entry point degrades to an ordinary focus call.

use crate::platform::Capabilities;
use crate::state::focus::{self, FocusCallbacks, FocusOptions};
use crate::state::frame;
use crate::state::scroll;

// =============================================================================
// Stabilized focus
// =============================================================================

/// Move focus to `handle`, preserving the viewport offset when the platform
/// needs it. Returns whether the handle accepted focus.
pub fn stabilized_focus(handle: usize, caps: Capabilities) -> bool {
    if !caps.needs_scroll_stabilization {
        return focus::focus(handle);
    }

    let snapshot = scroll::viewport_offset();
    let moved = focus::focus_with_options(handle, FocusOptions { prevent_scroll: true });

    // Undo any synchronous scroll, then again after the host's deferred
    // adjustment has run.
    scroll::set_viewport_offset(snapshot.0, snapshot.1);
    frame::schedule(&restore_key(handle), move || {
        scroll::set_viewport_offset(snapshot.0, snapshot.1);
    });

    moved
}

fn restore_key(handle: usize) -> String {
    format!("scroll-restore-{}", handle)
}

// =============================================================================
// Focus-entry guard
// =============================================================================

/// Watch the given slot handles for focus entry and schedule a viewport
/// restore whenever one gains focus, regardless of who moved it. Returns a
/// cleanup that detaches all observers; call it on unmount. Inert when the
/// platform does not need stabilization.
pub fn install_focus_guard(handles: &[usize], caps: Capabilities) -> impl FnOnce() + use<> {
    let mut cleanups: Vec<Box<dyn FnOnce()>> = Vec::new();

    if caps.needs_scroll_stabilization {
        for &handle in handles {
            let snapshot_key = restore_key(handle);
            let remove = focus::observe(
                handle,
                FocusCallbacks {
                    on_focus: Some(Box::new(move || {
                        let snapshot = scroll::viewport_offset();
                        frame::schedule(&snapshot_key, move || {
                            scroll::set_viewport_offset(snapshot.0, snapshot.1);
                        });
                    })),
                    on_blur: None,
                },
            );
            cleanups.push(Box::new(remove));
        }
    }

    move || {
        for cleanup in cleanups {
            cleanup();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

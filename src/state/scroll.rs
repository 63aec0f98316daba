//! Scroll State Module - Global viewport scroll offset.
//!
//! The viewport offset is a shared resource: the host scrolls it (including
//! the unwanted scroll-into-view some platforms perform on focus), and the
//! stabilizer snapshots and restores it around its own focus transfers.
//! This module does not coordinate concurrent external scrollers; it only
//! holds the current offset as a reactive signal.

use spark_signals::{signal, Signal};

thread_local! {
    static VIEWPORT_OFFSET: Signal<(u16, u16)> = signal((0, 0));
}

/// Current global viewport scroll offset (x, y).
pub fn viewport_offset() -> (u16, u16) {
    VIEWPORT_OFFSET.with(|s| s.get())
}

/// Set the global viewport scroll offset.
pub fn set_viewport_offset(x: u16, y: u16) {
    VIEWPORT_OFFSET.with(|s| s.set((x, y)));
}

/// Scroll by a delta, saturating at zero.
pub fn scroll_by(delta_x: i32, delta_y: i32) {
    let (x, y) = viewport_offset();
    let new_x = (x as i32 + delta_x).max(0) as u16;
    let new_y = (y as i32 + delta_y).max(0) as u16;
    set_viewport_offset(new_x, new_y);
}

/// Reset scroll state (for testing)
pub fn reset_scroll_state() {
    set_viewport_offset(0, 0);
}

//! Frame Callback Queue - Deferred work that runs before the next paint.
//!
//! Fire-and-forget scheduling with no ordering guarantee relative to later
//! user input beyond "runs before the next paint". Callbacks are keyed:
//! scheduling under an existing key replaces the pending callback, so
//! multiple schedules within one frame are last-write-wins. Intermediate
//! states are never user-visible within a single frame.
//!
//! The host loop drains the queue once per tick, just before rendering.
//! Tests drain it directly with [`run_frame_callbacks`].

use std::cell::RefCell;

type FrameCallback = Box<dyn FnOnce()>;

thread_local! {
    // Vec of (key, callback): preserves schedule order across distinct keys.
    static FRAME_QUEUE: RefCell<Vec<(String, FrameCallback)>> = RefCell::new(Vec::new());
}

/// Schedule a callback for the next frame.
///
/// If a callback with the same key is already pending, it is replaced and
/// the new callback takes its place at the end of the queue.
pub fn schedule(key: &str, callback: impl FnOnce() + 'static) {
    FRAME_QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        queue.retain(|(k, _)| k != key);
        queue.push((key.to_string(), Box::new(callback)));
    });
}

/// Cancel a pending callback by key. Pending work for other keys is kept.
pub fn cancel(key: &str) {
    FRAME_QUEUE.with(|queue| {
        queue.borrow_mut().retain(|(k, _)| k != key);
    });
}

/// Drain and run all pending callbacks. Called by the host loop once per
/// tick, before paint. Callbacks scheduled while draining run next frame.
pub fn run_frame_callbacks() {
    let pending = FRAME_QUEUE.with(|queue| std::mem::take(&mut *queue.borrow_mut()));
    for (_, callback) in pending {
        callback();
    }
}

/// Number of pending callbacks.
pub fn pending_count() -> usize {
    FRAME_QUEUE.with(|queue| queue.borrow().len())
}

/// Reset frame state (for testing)
pub fn reset_frame_state() {
    FRAME_QUEUE.with(|queue| queue.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() {
        reset_frame_state();
    }

    #[test]
    fn test_schedule_and_run() {
        setup();

        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();

        schedule("a", move || ran_clone.set(true));
        assert_eq!(pending_count(), 1);

        run_frame_callbacks();
        assert!(ran.get());
        assert_eq!(pending_count(), 0);
    }

    #[test]
    fn test_same_key_last_write_wins() {
        setup();

        let seen = Rc::new(Cell::new(0));

        let seen_a = seen.clone();
        schedule("restore", move || seen_a.set(1));
        let seen_b = seen.clone();
        schedule("restore", move || seen_b.set(2));

        assert_eq!(pending_count(), 1);
        run_frame_callbacks();
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_distinct_keys_run_in_order() {
        setup();

        let log = Rc::new(RefCell::new(Vec::new()));

        let log_a = log.clone();
        schedule("a", move || log_a.borrow_mut().push("a"));
        let log_b = log.clone();
        schedule("b", move || log_b.borrow_mut().push("b"));

        run_frame_callbacks();
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_cancel() {
        setup();

        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();
        schedule("a", move || ran_clone.set(true));

        cancel("a");
        run_frame_callbacks();
        assert!(!ran.get());
    }

    #[test]
    fn test_schedule_during_drain_runs_next_frame() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_outer = count.clone();

        schedule("a", move || {
            count_outer.set(count_outer.get() + 1);
            let count_inner = count_outer.clone();
            schedule("a", move || count_inner.set(count_inner.get() + 1));
        });

        run_frame_callbacks();
        assert_eq!(count.get(), 1);
        assert_eq!(pending_count(), 1);

        run_frame_callbacks();
        assert_eq!(count.get(), 2);
    }
}

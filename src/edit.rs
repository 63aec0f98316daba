//! Edit Dispatcher - Splicing typed or pasted digits into the slot array.
//!
//! One algorithm serves both the typed-character path and the paste path:
//!
//! 1. reject wholesale if the payload is empty or holds any non-digit
//! 2. trim to the capacity left of the target slot (excess dropped silently)
//! 3. splice the trimmed characters over `[target, target + trimmed_len)`
//! 4. reassemble the value from all cells
//! 5. next focus is `min(target + trimmed_len, len - 1)`
//!
//! The paste path pre-filters its payload with [`extract_digits`] before
//! step 1, so a mixed clipboard like "12a34" pastes as "1234" while a typed
//! payload with any non-digit is rejected whole.

use crate::projection::join;
use crate::types::SlotCell;

// =============================================================================
// Digit Filtering
// =============================================================================

/// Validation is "all characters numeric", not "contains a digit".
fn is_numeric(payload: &str) -> bool {
    !payload.is_empty() && payload.chars().all(|c| c.is_ascii_digit())
}

/// Keep only digit characters, in order. Paste payloads go through this
/// before [`apply`]; typed payloads do not.
pub fn extract_digits(payload: &str) -> String {
    payload.chars().filter(char::is_ascii_digit).collect()
}

// =============================================================================
// Edit Outcome
// =============================================================================

/// Result of a successful edit: the new canonical value and the slot that
/// should receive focus next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub value: String,
    pub next_focus: usize,
}

// =============================================================================
// Apply
// =============================================================================

/// Splice `raw_input` into the slot array at `target`.
///
/// Returns `None` for a rejected payload (empty, or any non-digit): the
/// caller must treat that as a complete no-op, with no change callback and
/// no focus move.
pub fn apply(raw_input: &str, target: usize, cells: &[SlotCell]) -> Option<EditOutcome> {
    if !is_numeric(raw_input) {
        return None;
    }
    if target >= cells.len() {
        return None;
    }

    let capacity = cells.len() - target;
    let trimmed: Vec<char> = raw_input.chars().take(capacity).collect();

    let mut next = cells.to_vec();
    for (offset, ch) in trimmed.iter().enumerate() {
        next[target + offset] = Some(*ch);
    }

    Some(EditOutcome {
        value: join(&next),
        next_focus: (target + trimmed.len()).min(cells.len() - 1),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::project;

    #[test]
    fn test_single_digit_into_partial_value() {
        // Slots ["1","2","","","",""], typing "5" at slot 2.
        let slots = project("12", 6);
        let outcome = apply("5", 2, &slots).unwrap();
        assert_eq!(outcome.value, "125");
        assert_eq!(outcome.next_focus, 3);
    }

    #[test]
    fn test_paste_overflow_trimmed_silently() {
        // Pasting 9 digits at slot 0 of an empty 6-slot widget.
        let slots = project("", 6);
        let outcome = apply("987654321", 0, &slots).unwrap();
        assert_eq!(outcome.value, "987654");
        assert_eq!(outcome.next_focus, 5);
    }

    #[test]
    fn test_paste_mid_widget_respects_capacity() {
        let slots = project("12", 6);
        let outcome = apply("99999", 4, &slots).unwrap();
        // Capacity at slot 4 is 2; cells 0..4 are preserved.
        assert_eq!(outcome.value, "1299");
        assert_eq!(outcome.next_focus, 5);
    }

    #[test]
    fn test_splice_preserves_cells_outside_range() {
        let slots = project("123456", 6);
        let outcome = apply("00", 2, &slots).unwrap();
        assert_eq!(outcome.value, "120056");
        assert_eq!(outcome.next_focus, 4);
    }

    #[test]
    fn test_overwrite_last_slot_clamps_focus() {
        let slots = project("123456", 6);
        let outcome = apply("9", 5, &slots).unwrap();
        assert_eq!(outcome.value, "123459");
        assert_eq!(outcome.next_focus, 5);
    }

    #[test]
    fn test_non_digit_payload_rejected_wholesale() {
        let slots = project("12", 6);
        assert!(apply("abc", 2, &slots).is_none());
        // Even one non-digit rejects the whole payload.
        assert!(apply("1a", 2, &slots).is_none());
        assert!(apply("1.5", 2, &slots).is_none());
    }

    #[test]
    fn test_empty_payload_rejected() {
        let slots = project("", 6);
        assert!(apply("", 0, &slots).is_none());
    }

    #[test]
    fn test_out_of_range_target_rejected() {
        let slots = project("", 6);
        assert!(apply("1", 6, &slots).is_none());
    }

    #[test]
    fn test_fill_leaves_gap_before_target() {
        // Typing at slot 3 of an empty widget leaves slots 0..3 empty;
        // the joined value only contains the filled cell.
        let slots = project("", 6);
        let outcome = apply("7", 3, &slots).unwrap();
        assert_eq!(outcome.value, "7");
        assert_eq!(outcome.next_focus, 4);
    }

    #[test]
    fn test_extract_digits_strips_in_order() {
        assert_eq!(extract_digits("a9b8"), "98");
        assert_eq!(extract_digits("12a34"), "1234");
        assert_eq!(extract_digits("+-e."), "");
        assert_eq!(extract_digits("000"), "000");
    }

    #[test]
    fn test_paste_prefilter_then_apply() {
        let slots = project("", 6);
        let digits = extract_digits("a9b8");
        let outcome = apply(&digits, 0, &slots).unwrap();
        assert_eq!(outcome.value, "98");
        assert_eq!(outcome.next_focus, 2);
    }

    #[test]
    fn test_paste_with_zero_digits_is_noop() {
        let slots = project("12", 6);
        let digits = extract_digits("hello");
        assert!(apply(&digits, 0, &slots).is_none());
    }
}

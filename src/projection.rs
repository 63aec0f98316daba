//! Value Projector - Pure derivation of slot cells from the canonical value.
//!
//! The widget keeps NO copy of the password. Every render re-derives the
//! slot array from the owner's current value:
//!
//! - longer than N: take the first N characters
//! - shorter than N: pad on the right with empty cells
//!
//! Re-deriving on every read is what guarantees the slots can never drift
//! from the canonical value. The display projection (mask modes) lives here
//! too because it is the same kind of pure derivation, one step later.

use crate::types::{Attr, DisplayCell, SlotCell, DEFAULT_MASK_CHAR};

// =============================================================================
// Slot Projection
// =============================================================================

/// Project the canonical value onto exactly `len` slot cells.
///
/// The result always has length `len`, for every input.
pub fn project(value: &str, len: usize) -> Vec<SlotCell> {
    let mut cells: Vec<SlotCell> = value.chars().take(len).map(Some).collect();
    cells.resize(len, None);
    cells
}

/// Reassemble the canonical value from slot cells.
///
/// Empty cells contribute nothing: the joined value's length equals the
/// count of filled cells, not the slot count.
pub fn join(cells: &[SlotCell]) -> String {
    cells.iter().flatten().collect()
}

// =============================================================================
// Display Projection
// =============================================================================

/// How filled slots are presented on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Plain digits (digits explicitly requested to be shown).
    Digits,
    /// The terminal's obscured-value presentation: a mask glyph per filled
    /// slot, with the real glyph hidden from the frame.
    Obscured { mask_char: char },
    /// Plain glyphs visually disguised by styling only. Used where the
    /// native obscured mode interferes with the host's autofill/zoom
    /// heuristics.
    StyledMask,
}

impl DisplayMode {
    pub fn obscured() -> Self {
        DisplayMode::Obscured { mask_char: DEFAULT_MASK_CHAR }
    }
}

/// Derive the on-screen cells for the given slots and presentation mode.
///
/// Presentation never feeds back into editing: the canonical value and the
/// edit algorithms are unaware of the mode.
pub fn display(cells: &[SlotCell], mode: DisplayMode) -> Vec<DisplayCell> {
    cells
        .iter()
        .map(|cell| match (cell, mode) {
            (None, _) => DisplayCell::blank(),
            (Some(ch), DisplayMode::Digits) => DisplayCell::new(*ch, Attr::NONE),
            (Some(_), DisplayMode::Obscured { mask_char }) => {
                DisplayCell::new(mask_char, Attr::HIDDEN)
            }
            (Some(ch), DisplayMode::StyledMask) => DisplayCell::new(*ch, Attr::INVERSE),
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(s: &str, len: usize) -> Vec<SlotCell> {
        project(s, len)
    }

    #[test]
    fn test_project_shorter_pads_right() {
        assert_eq!(
            project("12", 6),
            vec![Some('1'), Some('2'), None, None, None, None]
        );
    }

    #[test]
    fn test_project_longer_truncates() {
        assert_eq!(
            project("1234567", 6),
            vec![Some('1'), Some('2'), Some('3'), Some('4'), Some('5'), Some('6')]
        );
    }

    #[test]
    fn test_project_exact_length() {
        assert_eq!(
            project("123456", 6),
            vec![Some('1'), Some('2'), Some('3'), Some('4'), Some('5'), Some('6')]
        );
    }

    #[test]
    fn test_project_empty() {
        assert_eq!(project("", 6), vec![None; 6]);
    }

    #[test]
    fn test_project_always_exact_length() {
        for v in ["", "1", "123", "123456", "123456789012"] {
            assert_eq!(project(v, 6).len(), 6);
        }
    }

    #[test]
    fn test_project_is_idempotent() {
        let first = project("314", 6);
        let rejoined = join(&first);
        assert_eq!(project(&rejoined, 6), first);
    }

    #[test]
    fn test_join_skips_empty_cells() {
        let mut slots = cells("12", 6);
        slots[4] = Some('9');
        assert_eq!(join(&slots), "129");
    }

    #[test]
    fn test_join_empty() {
        assert_eq!(join(&vec![None; 6]), "");
    }

    #[test]
    fn test_display_digits() {
        let out = display(&cells("12", 3), DisplayMode::Digits);
        assert_eq!(out[0], DisplayCell::new('1', Attr::NONE));
        assert_eq!(out[1], DisplayCell::new('2', Attr::NONE));
        assert_eq!(out[2], DisplayCell::blank());
    }

    #[test]
    fn test_display_obscured_masks_filled_cells() {
        let out = display(&cells("12", 3), DisplayMode::obscured());
        assert_eq!(out[0], DisplayCell::new('•', Attr::HIDDEN));
        assert_eq!(out[1], DisplayCell::new('•', Attr::HIDDEN));
        assert_eq!(out[2], DisplayCell::blank());
    }

    #[test]
    fn test_display_obscured_custom_mask_char() {
        let out = display(&cells("7", 2), DisplayMode::Obscured { mask_char: '*' });
        assert_eq!(out[0].glyph, '*');
        assert_eq!(out[1], DisplayCell::blank());
    }

    #[test]
    fn test_display_styled_mask_keeps_glyph() {
        let out = display(&cells("42", 3), DisplayMode::StyledMask);
        assert_eq!(out[0], DisplayCell::new('4', Attr::INVERSE));
        assert_eq!(out[1], DisplayCell::new('2', Attr::INVERSE));
        assert_eq!(out[2], DisplayCell::blank());
    }
}

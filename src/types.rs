//! Core types shared across the widget.
//!
//! The widget renders each slot as a single terminal cell: one glyph plus
//! an attribute bitfield. Presentation modes (plain digits, native obscured,
//! styled mask) only change how a cell is displayed, never how the canonical
//! value is edited.

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::INVERSE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const UNDERLINE = 1 << 2;
        const INVERSE = 1 << 3;
        const HIDDEN = 1 << 4;
    }
}

// =============================================================================
// Slot Cell
// =============================================================================

/// One cell of the slot array: a digit, or empty.
///
/// The slot array is always derived from the canonical value; a cell is
/// never mutated in place outside the pure edit/projection functions.
pub type SlotCell = Option<char>;

/// The fixed number of slots for the PIN use case.
pub const PIN_LENGTH: usize = 6;

/// Default glyph used by the obscured presentation.
pub const DEFAULT_MASK_CHAR: char = '•';

// =============================================================================
// Display Cell
// =============================================================================

/// What one slot looks like on screen: a glyph and its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCell {
    pub glyph: char,
    pub attrs: Attr,
}

impl DisplayCell {
    pub fn new(glyph: char, attrs: Attr) -> Self {
        Self { glyph, attrs }
    }

    /// An empty (unfilled) cell.
    pub fn blank() -> Self {
        Self { glyph: ' ', attrs: Attr::NONE }
    }
}

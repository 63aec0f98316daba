//! # pinfield
//!
//! Fixed-length PIN-style password input for reactive terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! The assembled value lives in one `Signal<String>`; everything else is
//! derived from it on demand:
//! ```text
//! Signal<String> → project → slot cells → edit/route → commit → focus transfer
//! ```
//!
//! Slots are focus handles in the shared focus registry, keyboard and paste
//! events are routed to the focused handle, and focus transfers on quirky
//! embedded hosts are wrapped by the scroll stabilizer.
//!
//! ## Modules
//!
//! - [`types`] - Core types (slot cells, display cells, attributes)
//! - [`projection`] - Value/slot projection and display presentation
//! - [`edit`] - Numeric edit semantics (splice, trim, paste filtering)
//! - [`router`] - Keyboard routing table for the focused slot
//! - [`platform`] - Host capability probing
//! - [`stabilizer`] - Viewport-preserving focus transfers
//! - [`state`] - Module-level focus, keyboard, clipboard, scroll, frame state
//! - [`primitives`] - The pin input component and the form mirror

pub mod edit;
pub mod platform;
pub mod primitives;
pub mod projection;
pub mod router;
pub mod stabilizer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use edit::{apply, extract_digits, EditOutcome};

pub use platform::{Capabilities, EnvProbe, InertProbe, PlatformProbe, ProbeHandle, StaticProbe};

pub use primitives::{
    pin_input, BlurCallback, ChangeCallback, Cleanup, PinInput, PinInputProps, PropValue,
};

pub use projection::{display, join, project, DisplayMode};

pub use router::{route, KeyAction};

pub use stabilizer::{install_focus_guard, stabilized_focus};

pub use state::{
    // Focus
    focus::{
        blur, focus, focus_with_options, get_focused_handle, has_focus, is_focused,
        reset_focus_state, FocusCallbacks, FocusOptions,
    },
    // Keyboard
    keyboard::{
        convert_key_event, dispatch_focused, dispatch_paste, last_event, last_key, on_focused,
        on_paste, reset_keyboard_state, route_event, KeyState, KeyboardEvent, Modifiers,
    },
};

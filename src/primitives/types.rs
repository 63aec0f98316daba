//! Primitive types - Props and cleanup.
//!
//! These types define the interface for the input primitives.
//! Props support static values, signals, and getters for reactivity.

use std::rc::Rc;

use spark_signals::Signal;

use crate::platform::ProbeHandle;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by components.
///
/// Call this to unmount the component and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Value change callback (Rc for shared ownership in closures).
///
/// Using Rc<dyn Fn> instead of Box<dyn Fn> allows cloning callbacks
/// into closures without ownership issues. Receives the assembled value
/// after every accepted edit.
pub type ChangeCallback = Rc<dyn Fn(&str)>;

/// Blur callback (called when the widget loses focus entirely).
pub type BlurCallback = Rc<dyn Fn()>;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// This enables reactive props while maintaining type safety.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

impl From<&str> for PropValue<String> {
    fn from(value: &str) -> Self {
        PropValue::Static(value.to_string())
    }
}

// =============================================================================
// Pin Input Props
// =============================================================================

/// Props for the pin input component.
pub struct PinInputProps {
    // =========================================================================
    // Identity
    // =========================================================================

    /// Field name used for form registration.
    pub name: String,

    // =========================================================================
    // Value (Required)
    // =========================================================================

    /// Current assembled value (two-way bound signal).
    pub value: Signal<String>,

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Show typed digits in clear text instead of masking them.
    pub show_digits: bool,

    /// Mask character for obscured slots (default: '•').
    pub mask_char: Option<char>,

    /// Validation error to surface alongside the widget.
    pub error_message: Option<PropValue<String>>,

    // =========================================================================
    // Behavior
    // =========================================================================

    /// Focus the first slot on mount when the value is empty.
    pub auto_focus: bool,

    /// Platform probe override (default: environment probe).
    pub probe: Option<ProbeHandle>,

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Called with the assembled value after every accepted edit.
    pub on_change: Option<ChangeCallback>,

    /// Called when focus leaves the widget entirely.
    pub on_blur: Option<BlurCallback>,
}

impl PinInputProps {
    /// Create new PinInputProps with the given value signal.
    ///
    /// This is the recommended way to create PinInputProps since value
    /// is required.
    pub fn new(name: impl Into<String>, value: Signal<String>) -> Self {
        Self {
            name: name.into(),
            value,
            show_digits: false,
            mask_char: None,
            error_message: None,
            auto_focus: false,
            probe: None,
            on_change: None,
            on_blur: None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

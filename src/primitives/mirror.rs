//! Mirror field - Form registration for composite inputs.
//!
//! The pin input renders as several slots, but the surrounding form needs
//! one named field carrying the assembled value. The mirror field provides
//! that: a non-rendered registration that exposes the value through a
//! getter, so form submission and required-field validation read the
//! assembled string without knowing how the widget stores it.
//!
//! Registry is module-level (single-threaded UI), keyed by field name.
//! Re-registering a name replaces the previous entry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Getter producing the current assembled value of a field.
pub type ValueGetter = Rc<dyn Fn() -> String>;

struct FieldEntry {
    getter: ValueGetter,
    required: bool,
    touched: bool,
}

thread_local! {
    static FIELDS: RefCell<HashMap<String, FieldEntry>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Registration
// =============================================================================

/// Register a named form field backed by a value getter.
///
/// Returns a cleanup that removes the registration; call it on unmount.
pub fn register_field(
    name: impl Into<String>,
    required: bool,
    getter: ValueGetter,
) -> impl FnOnce() {
    let name = name.into();
    FIELDS.with(|fields| {
        fields.borrow_mut().insert(
            name.clone(),
            FieldEntry {
                getter,
                required,
                touched: false,
            },
        );
    });

    move || {
        FIELDS.with(|fields| {
            fields.borrow_mut().remove(&name);
        });
    }
}

/// Mark a field as touched (focus left it at least once). Validation
/// messages are usually suppressed until then.
pub fn mark_touched(name: &str) {
    FIELDS.with(|fields| {
        if let Some(entry) = fields.borrow_mut().get_mut(name) {
            entry.touched = true;
        }
    });
}

// =============================================================================
// Reads
// =============================================================================

/// Current value of a registered field, or None if the name is unknown.
pub fn field_value(name: &str) -> Option<String> {
    FIELDS.with(|fields| fields.borrow().get(name).map(|entry| (entry.getter)()))
}

/// Whether focus has left the field at least once.
pub fn is_touched(name: &str) -> bool {
    FIELDS.with(|fields| {
        fields
            .borrow()
            .get(name)
            .map(|entry| entry.touched)
            .unwrap_or(false)
    })
}

/// Snapshot of all registered fields for form submission.
pub fn collect_values() -> HashMap<String, String> {
    FIELDS.with(|fields| {
        fields
            .borrow()
            .iter()
            .map(|(name, entry)| (name.clone(), (entry.getter)()))
            .collect()
    })
}

/// Names of required fields whose value is currently empty.
pub fn missing_required() -> Vec<String> {
    FIELDS.with(|fields| {
        let mut missing: Vec<String> = fields
            .borrow()
            .iter()
            .filter(|(_, entry)| entry.required && (entry.getter)().is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        missing.sort();
        missing
    })
}

/// Reset all form state (mainly for tests).
pub fn reset_form_state() {
    FIELDS.with(|fields| fields.borrow_mut().clear());
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use spark_signals::signal;

    #[test]
    fn test_register_and_read() {
        reset_form_state();
        let value = signal("123456".to_string());
        let v = value.clone();
        let cleanup = register_field("password", true, Rc::new(move || v.get()));

        assert_eq!(field_value("password"), Some("123456".to_string()));
        assert_eq!(field_value("unknown"), None);
        cleanup();
        assert_eq!(field_value("password"), None);
    }

    #[test]
    fn test_getter_tracks_signal() {
        reset_form_state();
        let value = signal("12".to_string());
        let v = value.clone();
        let _cleanup = register_field("password", true, Rc::new(move || v.get()));

        value.set("125".to_string());
        assert_eq!(field_value("password"), Some("125".to_string()));
    }

    #[test]
    fn test_missing_required() {
        reset_form_state();
        let _a = register_field("password", true, Rc::new(|| String::new()));
        let _b = register_field("identifier", true, Rc::new(|| "user".to_string()));
        let _c = register_field("optional", false, Rc::new(|| String::new()));

        assert_eq!(missing_required(), vec!["password".to_string()]);
    }

    #[test]
    fn test_touched_tracking() {
        reset_form_state();
        let _cleanup = register_field("password", true, Rc::new(|| String::new()));

        assert!(!is_touched("password"));
        mark_touched("password");
        assert!(is_touched("password"));
        // Unknown names never report touched.
        mark_touched("unknown");
        assert!(!is_touched("unknown"));
    }

    #[test]
    fn test_reregistration_replaces_entry() {
        reset_form_state();
        let _a = register_field("password", true, Rc::new(|| "old".to_string()));
        let _b = register_field("password", true, Rc::new(|| "new".to_string()));

        assert_eq!(field_value("password"), Some("new".to_string()));
    }

    #[test]
    fn test_collect_values() {
        reset_form_state();
        let _a = register_field("password", true, Rc::new(|| "123456".to_string()));
        let _b = register_field("identifier", false, Rc::new(|| "user".to_string()));

        let values = collect_values();
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("password"), Some(&"123456".to_string()));
    }
}

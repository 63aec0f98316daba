//! Input primitives - Component building blocks.
//!
//! This module provides the widget layer:
//! - [`pin_input`] - Fixed-length one-digit-per-slot password entry
//! - [`mirror`] - Form-field registration for composite inputs
//!
//! # Architecture
//!
//! Components are functions taking a props struct and returning a live
//! handle. Each component:
//! 1. Computes platform capabilities once for the mount
//! 2. Registers focus handles and event handlers in the state modules
//! 3. Keeps the value in a two-way bound signal
//! 4. Carries a cleanup that releases every registration on unmount
//!
//! # Reactivity
//!
//! Props can be:
//! - Static values: `error_message: Some("invalid code".into())`
//! - Signals: `error_message: Some(error_signal.into())` (stays connected!)
//! - Getters: `PropValue::Getter(Rc::new(|| compute_error()))`

pub mod mirror;
mod pin_input;
mod types;

pub use pin_input::{pin_input, PinInput};
pub use types::*;

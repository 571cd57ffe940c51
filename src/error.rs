//! Error types for operator control.
//!
//! Only wiring and configuration mistakes are errors. Bad joystick values are
//! clamped and hardware faults are logged and replaced by safe defaults, so a
//! running control loop never has to unwind because of a single bad cycle.

use thiserror::Error;

use crate::peripherals::controller::ButtonBinding;

/// Errors reported by the operator control primitives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// A button binding was queried or updated before it was registered.
    #[error("button binding {0} is not registered")]
    UnregisteredBinding(ButtonBinding),

    /// The toggle registry has no room left for another binding.
    #[error("cannot register {binding}: toggle registry is full ({capacity} bindings)")]
    TooManyBindings {
        binding:  ButtonBinding,
        capacity: usize,
    },

    /// A configuration value is outside its legal range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ControlError>;

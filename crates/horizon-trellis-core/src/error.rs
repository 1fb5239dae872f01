//! Error types for Horizon Trellis core systems.

use std::fmt;

use crate::object::ObjectError;
use crate::property::PropertyError;

/// The main error type for core operations.
#[derive(Debug)]
pub enum TrellisCoreError {
    /// Timer-related error.
    Timer(TimerError),
    /// Object-related error.
    Object(ObjectError),
    /// Property-related error.
    Property(PropertyError),
    /// Signal-related error.
    Signal(SignalError),
}

impl fmt::Display for TrellisCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer(err) => write!(f, "Timer error: {err}"),
            Self::Object(err) => write!(f, "Object error: {err}"),
            Self::Property(err) => write!(f, "Property error: {err}"),
            Self::Signal(err) => write!(f, "Signal error: {err}"),
        }
    }
}

impl std::error::Error for TrellisCoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timer(err) => Some(err),
            Self::Object(err) => Some(err),
            Self::Property(err) => Some(err),
            Self::Signal(err) => Some(err),
        }
    }
}

/// Timer-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The timer ID is invalid or the timer has already been removed.
    InvalidTimerId,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimerId => write!(f, "Invalid or expired timer ID"),
        }
    }
}

impl std::error::Error for TimerError {}

impl From<TimerError> for TrellisCoreError {
    fn from(err: TimerError) -> Self {
        Self::Timer(err)
    }
}

impl From<ObjectError> for TrellisCoreError {
    fn from(err: ObjectError) -> Self {
        Self::Object(err)
    }
}

impl From<PropertyError> for TrellisCoreError {
    fn from(err: PropertyError) -> Self {
        Self::Property(err)
    }
}

impl From<SignalError> for TrellisCoreError {
    fn from(err: SignalError) -> Self {
        Self::Signal(err)
    }
}

/// Signal-specific errors.
///
/// These are usage errors: connecting to a signal that the widget does not
/// have, or connecting a handler whose argument does not match the value the
/// signal carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The signal name is empty or not provided by the widget.
    UnknownSignal {
        /// The name that was requested.
        name: String,
    },
    /// The handler expects a value of a different type than the signal emits.
    ArgumentMismatch {
        /// The signal that was connected to.
        signal: &'static str,
        /// The value type the signal emits, if any.
        expected: Option<&'static str>,
        /// The value type the handler asked for.
        got: &'static str,
    },
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSignal { name } if name.trim().is_empty() => {
                write!(f, "Signal name must not be empty")
            }
            Self::UnknownSignal { name } => write!(f, "No signal named '{name}'"),
            Self::ArgumentMismatch {
                signal,
                expected: Some(expected),
                got,
            } => write!(
                f,
                "Signal '{signal}' emits {expected} but the handler takes {got}"
            ),
            Self::ArgumentMismatch {
                signal,
                expected: None,
                got,
            } => write!(
                f,
                "Signal '{signal}' carries no value but the handler takes {got}"
            ),
        }
    }
}

impl std::error::Error for SignalError {}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, TrellisCoreError>;

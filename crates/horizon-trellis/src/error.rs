//! Error types for the widget crate.

use horizon_trellis_core::{ObjectError, ObjectId, PropertyError, SignalError, TimerError};
use thiserror::Error;

use crate::clipboard::ClipboardError;
use crate::layout::LayoutError;

/// Errors raised by invalid use of the widget tree.
///
/// Routine negative outcomes (a hit test that misses, disconnecting an id
/// twice, removing an unknown item) are reported through `bool`/`Option`
/// instead.
#[derive(Error, Debug)]
pub enum TrellisError {
    /// A widget handle is stale, or parentage would form a cycle.
    #[error("object error: {0}")]
    Object(#[from] ObjectError),

    /// Unknown signal name or handler argument mismatch.
    #[error("signal error: {0}")]
    Signal(#[from] SignalError),

    /// Unknown property name or property type mismatch.
    #[error("property error: {0}")]
    Property(#[from] PropertyError),

    /// Invalid timer handle.
    #[error("timer error: {0}")]
    Timer(#[from] TimerError),

    /// A layout string could not be parsed.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Clipboard access failed.
    #[error("clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Children can only be added to containers.
    #[error("widget {id:?} is not a container")]
    NotAContainer {
        /// The widget that was used as a parent.
        id: ObjectId,
    },

    /// The widget exists but is of a different type than requested.
    #[error("widget {id:?} is not a {expected}")]
    WrongWidgetType {
        /// The widget that was looked up.
        id: ObjectId,
        /// Name of the requested type.
        expected: &'static str,
    },

    /// The root container can't be removed or reparented.
    #[error("the root container can't be removed or reparented")]
    RootWidget,

    /// A saved widget names a kind this crate doesn't know.
    #[error("unknown widget kind '{0}'")]
    UnknownWidgetKind(String),
}

/// Result type for widget tree operations.
pub type Result<T> = std::result::Result<T, TrellisError>;

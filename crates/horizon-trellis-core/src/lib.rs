//! Core systems for Horizon Trellis.
//!
//! This crate provides the foundational, widget-agnostic pieces of the
//! Horizon Trellis toolkit:
//!
//! - **Object Arena**: generational handles, parent-child ownership, naming
//! - **Signals**: named per-object signals with arity-based handler dispatch
//! - **Signal Manager**: connections by object name, attached lazily
//! - **Timers**: one-shot and repeating callbacks on a logical clock
//! - **Properties**: typed property bags for persistence
//!
//! Everything here is single threaded and synchronous. State is owned by an
//! explicit context (the `Gui` in `horizon-trellis`), never by statics, so
//! independent instances and tests do not interfere.
//!
//! # Timer Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_trellis_core::TimerRegistry;
//!
//! let mut timers = TimerRegistry::new();
//! let id = timers.create(|| println!("tick"), Duration::from_millis(500), false);
//! assert_eq!(timers.next_scheduled_time(), None);
//!
//! timers.set_enabled(id, true).unwrap();
//! assert_eq!(timers.next_scheduled_time(), Some(Duration::from_millis(500)));
//! ```

pub mod error;
pub mod logging;
pub mod object;
pub mod property;
pub mod signal;
pub mod signal_manager;
pub mod timer;

pub use error::{Result, SignalError, TimerError, TrellisCoreError};
pub use logging::TreeDebug;
pub use object::{ObjectError, ObjectId, ObjectResult, ObjectTree};
pub use property::{PropertyError, PropertyMap, PropertyValue};
pub use signal::{
    ConnectionId, ConnectionIds, Handler, IntoHandler, NullaryShape, SignalSpec, SignalTable,
    SourceShape, ValueShape, ValueSourceShape,
};
pub use signal_manager::{PendingConnection, SignalManager};
pub use timer::{TimerCallback, TimerId, TimerKind, TimerRegistry};

//! Named signals with arity-based handler dispatch.
//!
//! Every widget exposes a fixed catalogue of named signals ("Pressed",
//! "ValueChanged", ...). A [`SignalTable`] stores the handlers connected to
//! one emitter, and each handler receives only the arguments it declared:
//!
//! - `FnMut()` - nothing
//! - `FnMut(T)` - the emitted value
//! - `FnMut(ObjectId, &str)` - the emitter and the signal name
//! - `FnMut(T, ObjectId, &str)` - all of the above
//!
//! The shape is picked at compile time through the [`IntoHandler`] marker
//! parameter, so a single signal can mix all four kinds of handlers. Handler
//! argument types are checked against the signal's declared value type when
//! connecting; a mismatch is a usage error, not a silent no-op.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use horizon_trellis_core::{ConnectionIds, ObjectId, SignalSpec, SignalTable};
//!
//! const SPECS: &[SignalSpec] = &[SignalSpec::with_value::<f32>("ValueChanged")];
//!
//! let mut ids = ConnectionIds::new();
//! let mut table = SignalTable::new();
//! let seen = Rc::new(Cell::new(0.0));
//!
//! let seen_clone = seen.clone();
//! table
//!     .connect(&mut ids, SPECS, "ValueChanged", move |v: f32| seen_clone.set(v))
//!     .unwrap();
//! table.emit(ObjectId::default(), "ValueChanged", Some(&4.5f32));
//! assert_eq!(seen.get(), 4.5);
//! ```

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::SignalError;
use crate::logging::targets;
use crate::object::ObjectId;

/// Unique identifier of a connection.
///
/// Ids increase monotonically and are never reused, across all widgets and
/// the [`SignalManager`](crate::SignalManager) of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// The raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of [`ConnectionId`]s shared by every table of one tree.
#[derive(Debug, Default)]
pub struct ConnectionIds {
    last: u64,
}

impl ConnectionIds {
    /// Create an allocator; the first id handed out is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> ConnectionId {
        self.last += 1;
        ConnectionId(self.last)
    }
}

/// Declaration of one signal a widget can emit.
#[derive(Debug, Clone, Copy)]
pub struct SignalSpec {
    /// The signal name used with `connect`.
    pub name: &'static str,
    value: Option<fn() -> (TypeId, &'static str)>,
}

fn value_info<T: 'static>() -> (TypeId, &'static str) {
    (TypeId::of::<T>(), type_name::<T>())
}

impl SignalSpec {
    /// A signal that carries no value.
    pub const fn unit(name: &'static str) -> Self {
        Self { name, value: None }
    }

    /// A signal that carries a value of type `T`.
    pub const fn with_value<T: 'static>(name: &'static str) -> Self {
        Self {
            name,
            value: Some(value_info::<T>),
        }
    }

    /// The type name of the carried value, if any.
    pub fn value_type_name(&self) -> Option<&'static str> {
        self.value.map(|info| info().1)
    }

    fn accepts(&self, handler: &Handler) -> Result<(), SignalError> {
        let Some((wanted, got)) = handler.value_type() else {
            return Ok(());
        };
        match self.value.map(|info| info().0) {
            Some(emitted) if emitted == wanted => Ok(()),
            _ => Err(SignalError::ArgumentMismatch {
                signal: self.name,
                expected: self.value_type_name(),
                got,
            }),
        }
    }
}

type NullaryFn = dyn FnMut();
type ValueFn = dyn FnMut(&dyn Any);
type SourceFn = dyn FnMut(ObjectId, &str);
type ValueSourceFn = dyn FnMut(&dyn Any, ObjectId, &str);

/// A type-erased handler in one of the supported shapes.
///
/// Cloning shares the underlying closure, which lets one handler be attached
/// to several signals or widgets.
#[derive(Clone)]
pub enum Handler {
    /// Takes no arguments.
    Nullary(Rc<RefCell<NullaryFn>>),
    /// Takes the emitted value.
    WithValue {
        /// The value type the closure expects.
        value_type: TypeId,
        /// Name of `value_type`, for error messages.
        type_name: &'static str,
        /// The erased closure.
        call: Rc<RefCell<ValueFn>>,
    },
    /// Takes the emitting object and the signal name.
    WithSource(Rc<RefCell<SourceFn>>),
    /// Takes the emitted value, the emitting object and the signal name.
    WithValueAndSource {
        /// The value type the closure expects.
        value_type: TypeId,
        /// Name of `value_type`, for error messages.
        type_name: &'static str,
        /// The erased closure.
        call: Rc<RefCell<ValueSourceFn>>,
    },
}

impl Handler {
    fn value_type(&self) -> Option<(TypeId, &'static str)> {
        match self {
            Self::WithValue {
                value_type,
                type_name,
                ..
            }
            | Self::WithValueAndSource {
                value_type,
                type_name,
                ..
            } => Some((*value_type, type_name)),
            Self::Nullary(_) | Self::WithSource(_) => None,
        }
    }

    /// Invoke the handler with whatever subset of arguments it declared.
    pub fn invoke(&self, source: ObjectId, signal: &str, value: Option<&dyn Any>) {
        // A handler that is already running further up the stack is skipped
        // instead of re-entered.
        let skipped = match self {
            Self::Nullary(call) => call.try_borrow_mut().map(|mut f| (&mut *f)()).is_err(),
            Self::WithValue { call, .. } => match value {
                Some(value) => call.try_borrow_mut().map(|mut f| (&mut *f)(value)).is_err(),
                None => false,
            },
            Self::WithSource(call) => call
                .try_borrow_mut()
                .map(|mut f| (&mut *f)(source, signal))
                .is_err(),
            Self::WithValueAndSource { call, .. } => match value {
                Some(value) => call
                    .try_borrow_mut()
                    .map(|mut f| (&mut *f)(value, source, signal))
                    .is_err(),
                None => false,
            },
        };
        if skipped {
            tracing::trace!(target: targets::SIGNAL, signal, "skipped re-entrant handler");
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nullary(_) => f.write_str("Handler::Nullary"),
            Self::WithValue { type_name, .. } => write!(f, "Handler::WithValue<{type_name}>"),
            Self::WithSource(_) => f.write_str("Handler::WithSource"),
            Self::WithValueAndSource { type_name, .. } => {
                write!(f, "Handler::WithValueAndSource<{type_name}>")
            }
        }
    }
}

// =============================================================================
// Handler shapes
// =============================================================================

/// Marker for `FnMut()` handlers.
pub struct NullaryShape;
/// Marker for `FnMut(T)` handlers.
pub struct ValueShape<T>(PhantomData<T>);
/// Marker for `FnMut(ObjectId, &str)` handlers.
pub struct SourceShape;
/// Marker for `FnMut(T, ObjectId, &str)` handlers.
pub struct ValueSourceShape<T>(PhantomData<T>);

/// Conversion from a closure into a [`Handler`].
///
/// The `Shape` parameter is inferred from the closure's signature; callers
/// never name it.
pub trait IntoHandler<Shape> {
    /// Erase the closure.
    fn into_handler(self) -> Handler;
}

impl IntoHandler<()> for Handler {
    fn into_handler(self) -> Handler {
        self
    }
}

impl<F> IntoHandler<NullaryShape> for F
where
    F: FnMut() + 'static,
{
    fn into_handler(self) -> Handler {
        Handler::Nullary(Rc::new(RefCell::new(self)))
    }
}

impl<F, T> IntoHandler<ValueShape<T>> for F
where
    F: FnMut(T) + 'static,
    T: Clone + 'static,
{
    fn into_handler(mut self) -> Handler {
        Handler::WithValue {
            value_type: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            call: Rc::new(RefCell::new(move |value: &dyn Any| {
                if let Some(value) = value.downcast_ref::<T>() {
                    self(value.clone());
                }
            })),
        }
    }
}

impl<F> IntoHandler<SourceShape> for F
where
    F: FnMut(ObjectId, &str) + 'static,
{
    fn into_handler(self) -> Handler {
        Handler::WithSource(Rc::new(RefCell::new(self)))
    }
}

impl<F, T> IntoHandler<ValueSourceShape<T>> for F
where
    F: FnMut(T, ObjectId, &str) + 'static,
    T: Clone + 'static,
{
    fn into_handler(mut self) -> Handler {
        Handler::WithValueAndSource {
            value_type: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            call: Rc::new(RefCell::new(
                move |value: &dyn Any, source: ObjectId, signal: &str| {
                    if let Some(value) = value.downcast_ref::<T>() {
                        self(value.clone(), source, signal);
                    }
                },
            )),
        }
    }
}

// =============================================================================
// SignalTable
// =============================================================================

/// A single connection.
#[derive(Debug, Clone)]
struct Connection {
    id: ConnectionId,
    signal: &'static str,
    handler: Handler,
}

/// The connections of one emitter, in connection order.
#[derive(Debug, Default)]
pub struct SignalTable {
    connections: Vec<Connection>,
    blocked: bool,
}

impl SignalTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a (possibly space separated) list of signal names.
    fn resolve<'s>(specs: &'s [SignalSpec], names: &str) -> Result<Vec<&'s SignalSpec>, SignalError> {
        let resolved: Vec<_> = names
            .split_whitespace()
            .map(|name| {
                specs
                    .iter()
                    .find(|spec| spec.name.eq_ignore_ascii_case(name))
                    .ok_or_else(|| SignalError::UnknownSignal {
                        name: name.to_string(),
                    })
            })
            .collect::<Result<_, _>>()?;
        if resolved.is_empty() {
            return Err(SignalError::UnknownSignal {
                name: names.to_string(),
            });
        }
        Ok(resolved)
    }

    /// Connect a handler to one or more signals.
    ///
    /// `names` may list several signals separated by whitespace; the id of
    /// the last connection is returned. Nothing is connected if any name is
    /// unknown or the handler does not fit one of the signals.
    pub fn connect<S>(
        &mut self,
        ids: &mut ConnectionIds,
        specs: &[SignalSpec],
        names: &str,
        handler: impl IntoHandler<S>,
    ) -> Result<ConnectionId, SignalError> {
        let handler = handler.into_handler();
        let resolved = Self::resolve(specs, names)?;
        for spec in &resolved {
            spec.accepts(&handler)?;
        }

        let mut last = None;
        for spec in resolved {
            let id = ids.next_id();
            self.connections.push(Connection {
                id,
                signal: spec.name,
                handler: handler.clone(),
            });
            tracing::trace!(target: targets::SIGNAL, %id, signal = spec.name, "connected");
            last = Some(id);
        }
        // resolve() never returns an empty list.
        last.ok_or_else(|| SignalError::UnknownSignal {
            name: names.to_string(),
        })
    }

    /// Remove a connection. Returns whether it existed.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id != id);
        let removed = self.connections.len() != before;
        if removed {
            tracing::trace!(target: targets::SIGNAL, %id, "disconnected");
        }
        removed
    }

    /// Remove every connection of one signal, or of all signals.
    pub fn disconnect_all(&mut self, signal: Option<&str>) {
        match signal {
            Some(name) => self
                .connections
                .retain(|c| !c.signal.eq_ignore_ascii_case(name)),
            None => self.connections.clear(),
        }
    }

    /// Whether a connection id lives in this table.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.iter().any(|c| c.id == id)
    }

    /// Number of connections, optionally restricted to one signal.
    pub fn connection_count(&self, signal: Option<&str>) -> usize {
        match signal {
            Some(name) => self
                .connections
                .iter()
                .filter(|c| c.signal.eq_ignore_ascii_case(name))
                .count(),
            None => self.connections.len(),
        }
    }

    /// Block or unblock emission.
    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    /// Whether emission is blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Invoke every handler connected to `signal`, in connection order.
    ///
    /// Returns whether any handler was connected.
    pub fn emit(&self, source: ObjectId, signal: &str, value: Option<&dyn Any>) -> bool {
        if self.blocked {
            return false;
        }

        // Handlers can't reach the table, but cloning keeps the loop honest
        // should a handler drop the last reference to a sibling closure.
        let handlers: Vec<Handler> = self
            .connections
            .iter()
            .filter(|c| c.signal == signal)
            .map(|c| c.handler.clone())
            .collect();
        if handlers.is_empty() {
            return false;
        }

        tracing::trace!(
            target: targets::SIGNAL,
            signal,
            handler_count = handlers.len(),
            "emitting signal"
        );
        for handler in &handlers {
            handler.invoke(source, signal, value);
        }
        true
    }
}

static_assertions::assert_impl_all!(ConnectionId: Copy, Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const SPECS: &[SignalSpec] = &[
        SignalSpec::unit("Focused"),
        SignalSpec::unit("Unfocused"),
        SignalSpec::with_value::<f32>("ValueChanged"),
        SignalSpec::with_value::<(f32, f32)>("RangeChanged"),
    ];

    fn setup() -> (ConnectionIds, SignalTable, ObjectId) {
        (ConnectionIds::new(), SignalTable::new(), ObjectId::default())
    }

    #[test]
    fn test_ids_increase_monotonically() {
        let (mut ids, mut table, _) = setup();
        let first = table.connect(&mut ids, SPECS, "Focused", || {}).unwrap();
        let second = table.connect(&mut ids, SPECS, "Unfocused", || {}).unwrap();
        assert!(second > first);
        let multi = table
            .connect(&mut ids, SPECS, "Focused Unfocused", || {})
            .unwrap();
        assert_eq!(multi.as_u64(), second.as_u64() + 2);
    }

    #[test]
    fn test_disconnect_succeeds_once() {
        let (mut ids, mut table, _) = setup();
        let id = table.connect(&mut ids, SPECS, "Focused", || {}).unwrap();
        assert!(table.disconnect(id));
        assert!(!table.disconnect(id));
    }

    #[test]
    fn test_unknown_and_empty_names() {
        let (mut ids, mut table, _) = setup();
        assert!(matches!(
            table.connect(&mut ids, SPECS, "", || {}),
            Err(SignalError::UnknownSignal { .. })
        ));
        assert!(matches!(
            table.connect(&mut ids, SPECS, "Focused Bogus", || {}),
            Err(SignalError::UnknownSignal { .. })
        ));
        // Nothing was connected by the failed multi-name call.
        assert_eq!(table.connection_count(None), 0);
    }

    #[test]
    fn test_argument_mismatch() {
        let (mut ids, mut table, _) = setup();
        assert!(matches!(
            table.connect(&mut ids, SPECS, "ValueChanged", |_: bool| {}),
            Err(SignalError::ArgumentMismatch { .. })
        ));
        assert!(matches!(
            table.connect(&mut ids, SPECS, "Focused", |_: f32| {}),
            Err(SignalError::ArgumentMismatch { expected: None, .. })
        ));
        assert!(table.connect(&mut ids, SPECS, "ValueChanged", |_: f32| {}).is_ok());
    }

    #[test]
    fn test_mixed_arities_fire_once_each() {
        let (mut ids, mut table, source) = setup();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let c = calls.clone();
        table
            .connect(&mut ids, SPECS, "ValueChanged", move || c.borrow_mut().push("nullary".to_string()))
            .unwrap();
        let c = calls.clone();
        table
            .connect(&mut ids, SPECS, "ValueChanged", move |v: f32| {
                c.borrow_mut().push(format!("value {v}"))
            })
            .unwrap();
        let c = calls.clone();
        table
            .connect(&mut ids, SPECS, "ValueChanged", move |w: ObjectId, name: &str| {
                assert_eq!(w, source);
                c.borrow_mut().push(format!("source {name}"))
            })
            .unwrap();
        let c = calls.clone();
        table
            .connect(
                &mut ids,
                SPECS,
                "ValueChanged",
                move |v: f32, _: ObjectId, name: &str| c.borrow_mut().push(format!("{name} {v}")),
            )
            .unwrap();

        assert!(table.emit(source, "ValueChanged", Some(&2.5f32)));
        assert_eq!(
            *calls.borrow(),
            vec![
                "nullary".to_string(),
                "value 2.5".to_string(),
                "source ValueChanged".to_string(),
                "ValueChanged 2.5".to_string(),
            ]
        );
    }

    #[test]
    fn test_tuple_values() {
        let (mut ids, mut table, source) = setup();
        let range = Rc::new(Cell::new((0.0, 0.0)));
        let r = range.clone();
        table
            .connect(&mut ids, SPECS, "RangeChanged", move |v: (f32, f32)| r.set(v))
            .unwrap();
        table.emit(source, "RangeChanged", Some(&(1.0f32, 3.0f32)));
        assert_eq!(range.get(), (1.0, 3.0));
    }

    #[test]
    fn test_blocked_and_disconnect_all() {
        let (mut ids, mut table, source) = setup();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        table
            .connect(&mut ids, SPECS, "Focused Unfocused", move || c.set(c.get() + 1))
            .unwrap();

        table.set_blocked(true);
        assert!(!table.emit(source, "Focused", None));
        table.set_blocked(false);
        table.emit(source, "Focused", None);
        assert_eq!(count.get(), 1);

        table.disconnect_all(Some("Focused"));
        table.emit(source, "Focused", None);
        table.emit(source, "Unfocused", None);
        assert_eq!(count.get(), 2);

        table.disconnect_all(None);
        assert_eq!(table.connection_count(None), 0);
    }

    #[test]
    fn test_shared_handler_clone() {
        let (mut ids, mut table, source) = setup();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let handler = (move || c.set(c.get() + 1)).into_handler();
        table.connect(&mut ids, SPECS, "Focused", handler.clone()).unwrap();
        table.connect(&mut ids, SPECS, "Unfocused", handler).unwrap();
        table.emit(source, "Focused", None);
        table.emit(source, "Unfocused", None);
        assert_eq!(count.get(), 2);
    }
}

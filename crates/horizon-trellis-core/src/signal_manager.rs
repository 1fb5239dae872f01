//! Name-based deferred signal connections.
//!
//! The [`SignalManager`] lets code connect to `(widget name, signal name)`
//! pairs without holding a handle to the widget. The owning tree attaches each
//! managed connection to every live object carrying the name, and again
//! whenever such an object appears later (added to a container or renamed).
//!
//! The manager only does the bookkeeping; the tree performs the actual
//! [`SignalTable`](crate::SignalTable) connections and reports them back
//! through [`SignalManager::record_attachment`].

use crate::logging::targets;
use crate::object::ObjectId;
use crate::signal::{ConnectionId, ConnectionIds, Handler, IntoHandler};

/// A managed connection and the per-object connections created for it.
#[derive(Debug)]
struct ManagedConnection {
    id: ConnectionId,
    widget_name: String,
    signal_name: String,
    handler: Handler,
    attached: Vec<(ObjectId, ConnectionId)>,
}

/// A pending connection the tree should attach to a newly named object.
#[derive(Debug, Clone)]
pub struct PendingConnection {
    /// The manager-level id.
    pub id: ConnectionId,
    /// The signal to connect to on the object.
    pub signal_name: String,
    /// The shared handler.
    pub handler: Handler,
}

/// Registry of connections keyed by widget name.
#[derive(Debug, Default)]
pub struct SignalManager {
    connections: Vec<ManagedConnection>,
}

impl SignalManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a connection to `signal_name` of every object named `widget_name`.
    ///
    /// The id comes from the same allocator as direct connections.
    pub fn connect<S>(
        &mut self,
        ids: &mut ConnectionIds,
        widget_name: &str,
        signal_name: &str,
        handler: impl IntoHandler<S>,
    ) -> ConnectionId {
        let id = ids.next_id();
        self.connections.push(ManagedConnection {
            id,
            widget_name: widget_name.to_string(),
            signal_name: signal_name.to_string(),
            handler: handler.into_handler(),
            attached: Vec::new(),
        });
        tracing::debug!(target: targets::SIGNAL, %id, widget_name, signal_name, "managed connection added");
        id
    }

    /// Connections that should be attached to an object named `widget_name`
    /// and are not attached to `object` yet.
    pub fn pending_for(&self, object: ObjectId, widget_name: &str) -> Vec<PendingConnection> {
        if widget_name.is_empty() {
            return Vec::new();
        }
        self.connections
            .iter()
            .filter(|c| c.widget_name == widget_name)
            .filter(|c| !c.attached.iter().any(|&(o, _)| o == object))
            .map(|c| PendingConnection {
                id: c.id,
                signal_name: c.signal_name.clone(),
                handler: c.handler.clone(),
            })
            .collect()
    }

    /// Remember that managed connection `id` was attached to `object` as
    /// `connection`.
    pub fn record_attachment(&mut self, id: ConnectionId, object: ObjectId, connection: ConnectionId) {
        if let Some(managed) = self.connections.iter_mut().find(|c| c.id == id) {
            managed.attached.push((object, connection));
        }
    }

    /// Forget every attachment to `object` (it was destroyed or renamed).
    ///
    /// Returns the per-object connections that were attached.
    pub fn detach_object(&mut self, object: ObjectId) -> Vec<ConnectionId> {
        let mut detached = Vec::new();
        for managed in &mut self.connections {
            managed.attached.retain(|&(o, conn)| {
                if o == object {
                    detached.push(conn);
                    false
                } else {
                    true
                }
            });
        }
        detached
    }

    /// Remove a managed connection.
    ///
    /// Returns the per-object connections the tree must disconnect, or `None`
    /// if the id is unknown (already disconnected).
    pub fn disconnect(&mut self, id: ConnectionId) -> Option<Vec<(ObjectId, ConnectionId)>> {
        let index = self.connections.iter().position(|c| c.id == id)?;
        let managed = self.connections.remove(index);
        tracing::debug!(target: targets::SIGNAL, %id, "managed connection removed");
        Some(managed.attached)
    }

    /// Remove every managed connection, returning all attachments.
    pub fn disconnect_all(&mut self) -> Vec<(ObjectId, ConnectionId)> {
        self.connections
            .drain(..)
            .flat_map(|c| c.attached)
            .collect()
    }

    /// Number of managed connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether no managed connections exist.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectTree;

    fn objects() -> (ObjectId, ObjectId) {
        let mut tree = ObjectTree::new();
        let a = tree.insert(None, "a", ()).unwrap();
        let b = tree.insert(None, "b", ()).unwrap();
        (a, b)
    }

    #[test]
    fn test_shares_id_space() {
        let mut ids = ConnectionIds::new();
        let mut manager = SignalManager::new();
        let direct = ids.next_id();
        let managed = manager.connect(&mut ids, "Button1", "Pressed", || {});
        assert_eq!(managed.as_u64(), direct.as_u64() + 1);
    }

    #[test]
    fn test_pending_and_attachment() {
        let mut ids = ConnectionIds::new();
        let mut manager = SignalManager::new();
        let (a, b) = objects();
        let id = manager.connect(&mut ids, "Button1", "Pressed", || {});

        assert!(manager.pending_for(a, "Other").is_empty());
        let pending = manager.pending_for(a, "Button1");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].signal_name, "Pressed");

        let conn = ids.next_id();
        manager.record_attachment(id, a, conn);
        assert!(manager.pending_for(a, "Button1").is_empty());
        assert_eq!(manager.pending_for(b, "Button1").len(), 1);

        assert_eq!(manager.detach_object(a), vec![conn]);
        assert_eq!(manager.pending_for(a, "Button1").len(), 1);
    }

    #[test]
    fn test_disconnect_once() {
        let mut ids = ConnectionIds::new();
        let mut manager = SignalManager::new();
        let (a, _) = objects();
        let id = manager.connect(&mut ids, "Button1", "Pressed", || {});
        let conn = ids.next_id();
        manager.record_attachment(id, a, conn);

        assert_eq!(manager.disconnect(id), Some(vec![(a, conn)]));
        assert_eq!(manager.disconnect(id), None);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_disconnect_all() {
        let mut ids = ConnectionIds::new();
        let mut manager = SignalManager::new();
        let (a, b) = objects();
        let first = manager.connect(&mut ids, "x", "Pressed", || {});
        let second = manager.connect(&mut ids, "y", "Pressed", || {});
        let c1 = ids.next_id();
        let c2 = ids.next_id();
        manager.record_attachment(first, a, c1);
        manager.record_attachment(second, b, c2);
        assert_eq!(manager.disconnect_all(), vec![(a, c1), (b, c2)]);
        assert_eq!(manager.len(), 0);
    }
}

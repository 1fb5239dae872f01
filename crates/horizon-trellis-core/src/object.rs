//! Object arena for Horizon Trellis.
//!
//! Provides the ownership tree every widget lives in:
//! - Generational identifiers via arena-based storage
//! - Parent-child relationships with cascading destruction
//! - Sibling order (index 0 is the back, the last child is the front)
//! - Object naming and lookup
//!
//! # Key Types
//!
//! - [`ObjectId`] - Stable handle; stale handles are detected, never dereferenced
//! - [`ObjectTree`] - The arena, generic over the payload stored per object
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::ObjectTree;
//!
//! let mut tree = ObjectTree::new();
//! let root = tree.insert(None, "root", 0u32).unwrap();
//! let child = tree.insert(Some(root), "child", 1u32).unwrap();
//!
//! assert_eq!(tree.parent(child).unwrap(), Some(root));
//! tree.destroy(root).unwrap();
//! assert!(!tree.contains(child));
//! ```

use std::fmt;

use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for an object in an [`ObjectTree`].
    ///
    /// `ObjectId`s remain valid while the tree is rearranged and become
    /// invalid when the object is destroyed. A destroyed id is never handed
    /// out again for a different object, so holding one is always safe.
    pub struct ObjectId;
}

impl ObjectId {
    /// Convert the ObjectId to a raw u64 value.
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create an ObjectId from a raw u64 value.
    ///
    /// This does not check if the ObjectId exists in any tree.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Errors that can occur during object operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// The object ID is invalid or has been destroyed.
    InvalidObjectId,
    /// Attempted to set an object as its own parent/ancestor.
    CircularParentage,
    /// The two objects do not share a parent.
    NotSiblings,
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidObjectId => write!(f, "Invalid or destroyed object ID"),
            Self::CircularParentage => {
                write!(f, "Cannot set an object as its own parent or ancestor")
            }
            Self::NotSiblings => write!(f, "Objects do not share a parent"),
        }
    }
}

impl std::error::Error for ObjectError {}

/// Result type for object operations.
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;

/// Per-object bookkeeping stored in the arena.
struct ObjectData<T> {
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    name: String,
    payload: T,
}

/// Arena holding a forest of named objects.
///
/// Children lists are ordered back to front: hit testing walks them in
/// reverse, drawing walks them forward.
pub struct ObjectTree<T> {
    objects: SlotMap<ObjectId, ObjectData<T>>,
}

impl<T> ObjectTree<T> {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
        }
    }

    /// Insert a new object, appended in front of its future siblings.
    pub fn insert(
        &mut self,
        parent: Option<ObjectId>,
        name: impl Into<String>,
        payload: T,
    ) -> ObjectResult<ObjectId> {
        if let Some(parent_id) = parent {
            if !self.objects.contains_key(parent_id) {
                return Err(ObjectError::InvalidObjectId);
            }
        }

        let id = self.objects.insert(ObjectData {
            parent,
            children: Vec::new(),
            name: name.into(),
            payload,
        });
        if let Some(parent_data) = parent.and_then(|p| self.objects.get_mut(p)) {
            parent_data.children.push(id);
        }
        tracing::trace!(target: targets::OBJECT, ?id, ?parent, "inserted object");
        Ok(id)
    }

    /// Insert an object without a parent. Unlike [`insert`](Self::insert)
    /// this can't fail.
    pub fn insert_root(&mut self, name: impl Into<String>, payload: T) -> ObjectId {
        let id = self.objects.insert(ObjectData {
            parent: None,
            children: Vec::new(),
            name: name.into(),
            payload,
        });
        tracing::trace!(target: targets::OBJECT, ?id, "inserted root object");
        id
    }

    /// Remove an object and all its descendants.
    ///
    /// Returns the removed ids, descendants first and `id` last.
    #[tracing::instrument(skip(self), target = "horizon_trellis_core::object", level = "trace")]
    pub fn destroy(&mut self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut removed = self.depth_first_postorder(id)?;
        removed.push(id);

        if let Some(parent_id) = self.objects.get(id).and_then(|d| d.parent) {
            if let Some(parent_data) = self.objects.get_mut(parent_id) {
                parent_data.children.retain(|&child| child != id);
            }
        }
        for &object in &removed {
            self.objects.remove(object);
        }
        tracing::trace!(target: targets::OBJECT, ?id, count = removed.len(), "destroyed object tree");
        Ok(removed)
    }

    /// Check if an object exists in the tree.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the tree holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Shared access to an object's payload.
    pub fn get(&self, id: ObjectId) -> Option<&T> {
        self.objects.get(id).map(|d| &d.payload)
    }

    /// Exclusive access to an object's payload.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        self.objects.get_mut(id).map(|d| &mut d.payload)
    }

    /// Iterate over all live objects in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &T)> + '_ {
        self.objects.iter().map(|(id, d)| (id, &d.payload))
    }

    /// Move an object under a new parent (or make it a root).
    ///
    /// The object is placed in front of its new siblings.
    pub fn set_parent(&mut self, id: ObjectId, new_parent: Option<ObjectId>) -> ObjectResult<()> {
        if !self.objects.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }
        if let Some(parent_id) = new_parent {
            if !self.objects.contains_key(parent_id) {
                return Err(ObjectError::InvalidObjectId);
            }
            if self.is_ancestor_of(id, parent_id) {
                return Err(ObjectError::CircularParentage);
            }
        }

        let old_parent = self.objects.get(id).and_then(|d| d.parent);
        if let Some(parent_data) = old_parent.and_then(|p| self.objects.get_mut(p)) {
            parent_data.children.retain(|&child| child != id);
        }
        if let Some(data) = self.objects.get_mut(id) {
            data.parent = new_parent;
        }
        if let Some(parent_data) = new_parent.and_then(|p| self.objects.get_mut(p)) {
            parent_data.children.push(id);
        }
        Ok(())
    }

    /// Check if `potential_ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_of(&self, potential_ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.objects.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// Get the parent of an object.
    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.objects
            .get(id)
            .map(|d| d.parent)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the children of an object, back to front.
    pub fn children(&self, id: ObjectId) -> ObjectResult<&[ObjectId]> {
        self.objects
            .get(id)
            .map(|d| d.children.as_slice())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the name of an object.
    pub fn name(&self, id: ObjectId) -> ObjectResult<&str> {
        self.objects
            .get(id)
            .map(|d| d.name.as_str())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Rename an object.
    pub fn set_name(&mut self, id: ObjectId, name: impl Into<String>) -> ObjectResult<()> {
        let data = self.objects.get_mut(id).ok_or(ObjectError::InvalidObjectId)?;
        data.name = name.into();
        Ok(())
    }

    /// Find a direct child by name.
    pub fn find_child_by_name(&self, id: ObjectId, name: &str) -> ObjectResult<Option<ObjectId>> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        Ok(data
            .children
            .iter()
            .copied()
            .find(|&child| self.objects.get(child).is_some_and(|c| c.name == name)))
    }

    /// Find a named object below `id`, direct children first, then each
    /// child's subtree in order.
    pub fn find_descendant_by_name(
        &self,
        id: ObjectId,
        name: &str,
    ) -> ObjectResult<Option<ObjectId>> {
        if let Some(found) = self.find_child_by_name(id, name)? {
            return Ok(Some(found));
        }
        for &child in self.children(id)? {
            if let Some(found) = self.find_descendant_by_name(child, name)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// All live objects carrying `name`, in arena order.
    pub fn find_all_by_name(&self, name: &str) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, d)| d.name == name)
            .map(|(id, _)| id)
            .collect()
    }

    // =========================================================================
    // Sibling order
    // =========================================================================

    /// Position of the object among its siblings.
    ///
    /// Index 0 is the back/bottom, higher indices are front/top.
    pub fn sibling_index(&self, id: ObjectId) -> ObjectResult<Option<usize>> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        let Some(parent_id) = data.parent else {
            return Ok(None);
        };
        let parent_data = self
            .objects
            .get(parent_id)
            .ok_or(ObjectError::InvalidObjectId)?;
        Ok(parent_data.children.iter().position(|&child| child == id))
    }

    /// Move an object to `index` among its siblings, clamped to the valid range.
    pub fn set_sibling_index(&mut self, id: ObjectId, index: usize) -> ObjectResult<()> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        if let Some(parent_id) = data.parent {
            let parent_data = self
                .objects
                .get_mut(parent_id)
                .ok_or(ObjectError::InvalidObjectId)?;
            parent_data.children.retain(|&child| child != id);
            let index = index.min(parent_data.children.len());
            parent_data.children.insert(index, id);
        }
        Ok(())
    }

    /// Raise an object to the front (highest z-order among siblings).
    pub fn raise(&mut self, id: ObjectId) -> ObjectResult<()> {
        self.set_sibling_index(id, usize::MAX)
    }

    /// Lower an object to the back (lowest z-order among siblings).
    pub fn lower(&mut self, id: ObjectId) -> ObjectResult<()> {
        self.set_sibling_index(id, 0)
    }

    /// Stack an object directly behind a sibling.
    pub fn stack_under(&mut self, id: ObjectId, sibling: ObjectId) -> ObjectResult<()> {
        let parent = self.shared_parent(id, sibling)?;
        let parent_data = self
            .objects
            .get_mut(parent)
            .ok_or(ObjectError::InvalidObjectId)?;
        parent_data.children.retain(|&child| child != id);
        if let Some(sibling_pos) = parent_data.children.iter().position(|&c| c == sibling) {
            parent_data.children.insert(sibling_pos, id);
        }
        Ok(())
    }

    /// Stack an object directly in front of a sibling.
    pub fn stack_above(&mut self, id: ObjectId, sibling: ObjectId) -> ObjectResult<()> {
        let parent = self.shared_parent(id, sibling)?;
        let parent_data = self
            .objects
            .get_mut(parent)
            .ok_or(ObjectError::InvalidObjectId)?;
        parent_data.children.retain(|&child| child != id);
        if let Some(sibling_pos) = parent_data.children.iter().position(|&c| c == sibling) {
            parent_data.children.insert(sibling_pos + 1, id);
        }
        Ok(())
    }

    fn shared_parent(&self, id: ObjectId, sibling: ObjectId) -> ObjectResult<ObjectId> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        let sibling_data = self
            .objects
            .get(sibling)
            .ok_or(ObjectError::InvalidObjectId)?;
        match (data.parent, sibling_data.parent) {
            (Some(a), Some(b)) if a == b && id != sibling => Ok(a),
            _ => Err(ObjectError::NotSiblings),
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Ancestors from the direct parent up to the root.
    pub fn ancestors(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut result = Vec::new();
        let mut current = self.parent(id)?;
        while let Some(parent) = current {
            result.push(parent);
            current = self.objects.get(parent).and_then(|d| d.parent);
        }
        Ok(result)
    }

    /// Descendants in depth-first pre-order (parents before children).
    ///
    /// `id` itself is not included.
    pub fn depth_first_preorder(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut result = Vec::new();
        self.preorder_recursive(id, &mut result)?;
        Ok(result)
    }

    fn preorder_recursive(&self, id: ObjectId, result: &mut Vec<ObjectId>) -> ObjectResult<()> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        for &child_id in &data.children {
            result.push(child_id);
            self.preorder_recursive(child_id, result)?;
        }
        Ok(())
    }

    /// Descendants in depth-first post-order (children before parents).
    ///
    /// `id` itself is not included.
    pub fn depth_first_postorder(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut result = Vec::new();
        self.postorder_recursive(id, &mut result)?;
        Ok(result)
    }

    fn postorder_recursive(&self, id: ObjectId, result: &mut Vec<ObjectId>) -> ObjectResult<()> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        for &child_id in &data.children {
            self.postorder_recursive(child_id, result)?;
            result.push(child_id);
        }
        Ok(())
    }
}

impl<T> Default for ObjectTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(ObjectId: Copy, Send, Sync);

//! The widget tree.
//!
//! [`WidgetTree`] owns every widget node in a generational arena. Each node
//! holds the shared [`WidgetCore`], a [`SignalTable`], the boxed [`Widget`]
//! behavior and, for containers, the routing state (focused child, hovered
//! child, children holding a mouse button).
//!
//! All structural and geometric changes go through the tree so that layouts
//! of children are re-evaluated, signals fire and routing state never points
//! at a removed widget.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::tree::WidgetTree;
//! use horizon_trellis::widgets::{Button, Panel};
//! use horizon_trellis::{Layout2d, Vector2f};
//!
//! let mut tree = WidgetTree::new(Vector2f::new(800.0, 600.0));
//! let panel = tree.add(tree.root(), Panel::new(), "Panel").unwrap();
//! tree.set_size(panel, Layout2d::percent(50.0, 100.0)).unwrap();
//!
//! let button = tree.add(panel, Button::new("OK"), "OkButton").unwrap();
//! tree.set_position(button, Layout2d::parse("parent.width - width", "10").unwrap()).unwrap();
//!
//! assert_eq!(tree.core(panel).unwrap().size(), Vector2f::new(400.0, 600.0));
//! assert_eq!(tree.core(button).unwrap().position(), Vector2f::new(300.0, 10.0));
//! ```

mod draw;
mod focus;
mod persistence;
mod routing;

use std::any::Any;
use std::time::Duration;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{
    ConnectionId, ConnectionIds, IntoHandler, ObjectError, ObjectId, ObjectTree, SignalManager,
    SignalSpec, SignalTable, TreeDebug,
};

pub use persistence::SavedWidget;

use crate::animation::AnimationEngine;
use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::error::{Result, TrellisError};
use crate::geometry::Vector2f;
use crate::layout::{Layout2d, LayoutContext};
use crate::text::{MonospaceMeasure, TextMeasure};
use crate::widget::{signals, TreeRequest, Widget, WidgetCore, WidgetCtx, WidgetKind};
use crate::widgets::{RadioButton, Root};

/// Collaborators and settings widget hooks can reach through [`WidgetCtx`].
pub(crate) struct Services {
    pub(crate) clipboard: Box<dyn Clipboard>,
    pub(crate) measure: Box<dyn TextMeasure>,
    pub(crate) clock: Duration,
    pub(crate) double_click_time: Duration,
    pub(crate) caret_blink_interval: Duration,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            clipboard: Box::new(MemoryClipboard::new()),
            measure: Box::new(MonospaceMeasure::default()),
            clock: Duration::ZERO,
            double_click_time: Duration::from_millis(500),
            caret_blink_interval: Duration::from_millis(500),
        }
    }
}

/// Routing state of a container node.
#[derive(Debug, Clone, Default)]
pub(crate) struct ContainerState {
    pub(crate) focused_child: Option<ObjectId>,
    pub(crate) below_mouse: Option<ObjectId>,
    pub(crate) left_down: Option<ObjectId>,
    pub(crate) right_down: Option<ObjectId>,
}

impl ContainerState {
    fn forget(&mut self, child: ObjectId) {
        for slot in [
            &mut self.focused_child,
            &mut self.below_mouse,
            &mut self.left_down,
            &mut self.right_down,
        ] {
            if *slot == Some(child) {
                *slot = None;
            }
        }
    }
}

pub(crate) struct WidgetNode {
    pub(crate) kind: WidgetKind,
    pub(crate) core: WidgetCore,
    pub(crate) container: Option<ContainerState>,
    // Taken out while one of its hooks runs.
    pub(crate) behavior: Option<Box<dyn Widget>>,
    pub(crate) signals: SignalTable,
    pub(crate) specs: &'static [SignalSpec],
}

/// The arena of widgets below one root container.
pub struct WidgetTree {
    objects: ObjectTree<WidgetNode>,
    root: ObjectId,
    window_size: Vector2f,
    ids: ConnectionIds,
    manager: SignalManager,
    pub(crate) services: Services,
    pub(crate) animations: AnimationEngine,
}

impl WidgetTree {
    /// Create a tree whose root container covers `window_size`.
    pub fn new(window_size: Vector2f) -> Self {
        let root_widget = Root::new();
        let mut core = WidgetCore::new(window_size);
        core.size_layout = Layout2d::percent(100.0, 100.0);
        // The root is always on the focus path.
        core.focused = true;
        let node = WidgetNode {
            kind: root_widget.kind(),
            core,
            container: Some(ContainerState::default()),
            specs: root_widget.signals(),
            signals: SignalTable::new(),
            behavior: Some(Box::new(root_widget)),
        };
        let mut objects = ObjectTree::new();
        let root = objects.insert_root("", node);
        Self {
            objects,
            root,
            window_size,
            ids: ConnectionIds::new(),
            manager: SignalManager::new(),
            services: Services::default(),
            animations: AnimationEngine::default(),
        }
    }

    /// The root container.
    pub fn root(&self) -> ObjectId {
        self.root
    }

    /// Number of widgets, the root included.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether only the root exists.
    pub fn is_empty(&self) -> bool {
        self.objects.len() <= 1
    }

    /// Whether `id` refers to a live widget.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains(id)
    }

    pub(crate) fn node(&self, id: ObjectId) -> Result<&WidgetNode> {
        self.objects.get(id).ok_or(TrellisError::Object(ObjectError::InvalidObjectId))
    }

    pub(crate) fn node_mut(&mut self, id: ObjectId) -> Result<&mut WidgetNode> {
        self.objects
            .get_mut(id)
            .ok_or(TrellisError::Object(ObjectError::InvalidObjectId))
    }

    /// The common state of a widget.
    pub fn core(&self, id: ObjectId) -> Result<&WidgetCore> {
        Ok(&self.node(id)?.core)
    }

    /// The kind of a widget.
    pub fn kind(&self, id: ObjectId) -> Result<WidgetKind> {
        Ok(self.node(id)?.kind)
    }

    /// The name a widget was added with.
    pub fn name(&self, id: ObjectId) -> Result<&str> {
        Ok(self.objects.name(id)?)
    }

    /// The parent container, `None` for the root.
    pub fn parent(&self, id: ObjectId) -> Result<Option<ObjectId>> {
        Ok(self.objects.parent(id)?)
    }

    /// Children back to front.
    pub fn children(&self, id: ObjectId) -> Result<&[ObjectId]> {
        Ok(self.objects.children(id)?)
    }

    pub(crate) fn children_vec(&self, id: ObjectId) -> Vec<ObjectId> {
        self.objects
            .children(id)
            .map(<[ObjectId]>::to_vec)
            .unwrap_or_default()
    }

    pub(crate) fn is_container(&self, id: ObjectId) -> bool {
        self.objects.get(id).is_some_and(|node| node.container.is_some())
    }

    pub(crate) fn container_state(&self, id: ObjectId) -> Option<&ContainerState> {
        self.objects.get(id).and_then(|node| node.container.as_ref())
    }

    pub(crate) fn container_state_mut(&mut self, id: ObjectId) -> Option<&mut ContainerState> {
        self.objects.get_mut(id).and_then(|node| node.container.as_mut())
    }

    pub(crate) fn behavior(&self, id: ObjectId) -> Option<&dyn Widget> {
        self.objects.get(id).and_then(|node| node.behavior.as_deref())
    }

    /// Run a closure on the widget behavior with a context for its hooks,
    /// then apply the tree requests it queued.
    pub(crate) fn with_behavior<R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(&mut dyn Widget, &mut WidgetCtx<'_>) -> R,
    ) -> Option<R> {
        let parent_size = self.parent_inner_size(id);
        let node = self.objects.get_mut(id)?;
        let mut behavior = node.behavior.take()?;
        let mut requests = Vec::new();
        let result = {
            let mut ctx = WidgetCtx {
                id,
                core: &node.core,
                signals: &node.signals,
                services: &mut self.services,
                parent_size,
                requests: &mut requests,
            };
            f(behavior.as_mut(), &mut ctx)
        };
        node.behavior = Some(behavior);
        self.apply_requests(id, requests);
        Some(result)
    }

    /// Borrow a widget as its concrete type.
    pub fn widget<W: Widget>(&self, id: ObjectId) -> Result<&W> {
        let node = self.node(id)?;
        node.behavior
            .as_deref()
            .and_then(|behavior| (behavior as &dyn Any).downcast_ref::<W>())
            .ok_or(TrellisError::WrongWidgetType {
                id,
                expected: std::any::type_name::<W>(),
            })
    }

    /// Modify a widget as its concrete type.
    ///
    /// The closure gets a [`WidgetCtx`] so that setters can emit the
    /// widget's signals.
    ///
    /// ```
    /// use horizon_trellis::tree::WidgetTree;
    /// use horizon_trellis::widgets::Slider;
    /// use horizon_trellis::Vector2f;
    ///
    /// let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
    /// let slider = tree.add(tree.root(), Slider::new(), "Volume").unwrap();
    /// tree.update(slider, |s: &mut Slider, ctx| s.set_value(7.0, ctx)).unwrap();
    /// assert_eq!(tree.widget::<Slider>(slider).unwrap().value(), 7.0);
    /// ```
    pub fn update<W: Widget, R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(&mut W, &mut WidgetCtx<'_>) -> R,
    ) -> Result<R> {
        self.node(id)?;
        self.with_behavior(id, |behavior, ctx| {
            (behavior as &mut dyn Any).downcast_mut::<W>().map(|widget| f(widget, ctx))
        })
        .flatten()
        .ok_or(TrellisError::WrongWidgetType {
            id,
            expected: std::any::type_name::<W>(),
        })
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Add a widget to a container.
    pub fn add(&mut self, parent: ObjectId, widget: impl Widget, name: &str) -> Result<ObjectId> {
        self.add_boxed(parent, Box::new(widget), name)
    }

    /// Add an already boxed widget to a container.
    pub fn add_boxed(&mut self, parent: ObjectId, widget: Box<dyn Widget>, name: &str) -> Result<ObjectId> {
        let parent_node = self.node(parent)?;
        if parent_node.container.is_none() {
            return Err(TrellisError::NotAContainer { id: parent });
        }
        let mut core = WidgetCore::new(widget.default_size());
        core.inherited_opacity = parent_node.core.effective_opacity();

        let node = WidgetNode {
            kind: widget.kind(),
            core,
            container: widget.is_container().then(ContainerState::default),
            specs: widget.signals(),
            signals: SignalTable::new(),
            behavior: Some(widget),
        };
        let id = self.objects.insert(Some(parent), name, node)?;
        tracing::debug!(target: targets::CONTAINER, ?id, ?parent, name, "widget added");

        self.relayout(id);
        self.attach_managed(id);
        self.notify_content_changed(parent);
        Ok(id)
    }

    /// Remove a widget and its subtree.
    ///
    /// Animations of the removed widgets are cancelled and managed signal
    /// connections detached. Returns false for the root or a stale handle.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        if id == self.root || !self.objects.contains(id) {
            return false;
        }
        if self.core(id).is_ok_and(WidgetCore::is_focused) {
            self.unfocus_widget(id);
        }
        let parent = self.objects.parent(id).ok().flatten();
        if let Some(state) = parent.and_then(|p| self.container_state_mut(p)) {
            state.forget(id);
        }
        let Ok(removed) = self.objects.destroy(id) else {
            return false;
        };
        for &object in &removed {
            self.manager.detach_object(object);
            self.animations.cancel_widget(object);
        }
        tracing::debug!(target: targets::CONTAINER, ?id, count = removed.len(), "widget removed");
        if let Some(parent) = parent {
            self.notify_content_changed(parent);
        }
        true
    }

    /// Remove every child of a container.
    pub fn remove_all_widgets(&mut self, parent: ObjectId) -> Result<()> {
        for child in self.children(parent)?.to_vec() {
            self.remove(child);
        }
        Ok(())
    }

    /// Find a widget by name below `parent`: direct children first, then the
    /// whole subtree depth first.
    pub fn get(&self, parent: ObjectId, name: &str) -> Option<ObjectId> {
        match self.objects.find_child_by_name(parent, name) {
            Ok(Some(id)) => Some(id),
            _ => self.objects.find_descendant_by_name(parent, name).ok().flatten(),
        }
    }

    /// Find a widget by name anywhere in the tree.
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.get(self.root, name)
    }

    /// Rename a widget. Managed connections follow the new name.
    pub fn set_name(&mut self, id: ObjectId, name: &str) -> Result<()> {
        self.objects.set_name(id, name)?;
        for connection in self.manager.detach_object(id) {
            if let Some(node) = self.objects.get_mut(id) {
                node.signals.disconnect(connection);
            }
        }
        self.attach_managed(id);
        Ok(())
    }

    /// Outline of the tree for debugging, one widget per line.
    pub fn debug_tree(&self) -> String {
        TreeDebug::new(&self.objects, self.root, |_, name, node: &WidgetNode| {
            let core = &node.core;
            format!(
                "{} '{}' at ({}, {}) size ({}, {}){}{}",
                node.kind,
                name,
                core.position.x,
                core.position.y,
                core.size.x,
                core.size.y,
                if core.visible { "" } else { " hidden" },
                if core.focused { " focused" } else { "" },
            )
        })
        .format_tree()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Size of the window the root covers.
    pub fn window_size(&self) -> Vector2f {
        self.window_size
    }

    /// Resize the window; every layout depending on it is re-evaluated.
    pub fn set_window_size(&mut self, size: Vector2f) {
        self.window_size = size;
        self.relayout(self.root);
    }

    /// Set the position layout of a widget.
    pub fn set_position(&mut self, id: ObjectId, position: impl Into<Layout2d>) -> Result<()> {
        self.node_mut(id)?.core.position_layout = position.into();
        self.relayout(id);
        Ok(())
    }

    /// Set the size layout of a widget.
    pub fn set_size(&mut self, id: ObjectId, size: impl Into<Layout2d>) -> Result<()> {
        self.node_mut(id)?.core.size_layout = size.into();
        self.relayout(id);
        Ok(())
    }

    /// Position in root coordinates.
    pub fn absolute_position(&self, id: ObjectId) -> Result<Vector2f> {
        let mut position = self.core(id)?.position;
        for ancestor in self.objects.ancestors(id)? {
            position += self.core(ancestor)?.position + self.child_offset(ancestor);
        }
        Ok(position)
    }

    pub(crate) fn child_offset(&self, id: ObjectId) -> Vector2f {
        self.behavior(id).map_or(Vector2f::ZERO, |b| b.child_offset())
    }

    /// The area children are laid out in.
    pub fn inner_size(&self, id: ObjectId) -> Result<Vector2f> {
        let size = self.core(id)?.size;
        Ok(self.behavior(id).map_or(size, |b| b.inner_size(size)))
    }

    pub(crate) fn parent_inner_size(&self, id: ObjectId) -> Option<Vector2f> {
        match self.objects.parent(id) {
            Ok(Some(parent)) => self.inner_size(parent).ok(),
            Ok(None) => Some(self.window_size),
            Err(_) => None,
        }
    }

    /// Position and size the layouts resolve to right now, ignoring values
    /// written by running animations.
    pub(crate) fn resting_geometry(&self, id: ObjectId) -> Option<(Vector2f, Vector2f)> {
        let parent_size = self.parent_inner_size(id)?;
        let core = &self.objects.get(id)?.core;
        let size = core.size_layout.evaluate(&LayoutContext::new(parent_size));
        let position = core
            .position_layout
            .evaluate(&LayoutContext::with_own_size(parent_size, size));
        Some((position, size))
    }

    /// Re-evaluate a widget's layouts, cascading into its children when its
    /// size changes.
    pub(crate) fn relayout(&mut self, id: ObjectId) {
        let Some((position, size)) = self.resting_geometry(id) else {
            return;
        };
        self.set_resolved_geometry(id, Some(position), Some(size));
    }

    /// Write resolved geometry directly, leaving the layouts untouched.
    pub(crate) fn set_resolved_geometry(
        &mut self,
        id: ObjectId,
        position: Option<Vector2f>,
        size: Option<Vector2f>,
    ) {
        let Some(node) = self.objects.get_mut(id) else {
            return;
        };
        let size_changed = size.filter(|&s| s != node.core.size);
        let position_changed = position.filter(|&p| p != node.core.position);
        if let Some(size) = size_changed {
            node.core.size = size;
        }
        if let Some(position) = position_changed {
            node.core.position = position;
        }

        if let Some(size) = size_changed {
            tracing::trace!(target: targets::LAYOUT, ?id, width = size.x, height = size.y, "size resolved");
            self.emit(id, signals::SIZE_CHANGED, Some(&size));
            self.with_behavior(id, |widget, ctx| widget.size_changed(size, ctx));
            for child in self.children_vec(id) {
                self.relayout(child);
            }
        }
        if let Some(position) = position_changed {
            self.emit(id, signals::POSITION_CHANGED, Some(&position));
        }
        if size_changed.is_some() || position_changed.is_some() {
            if let Ok(Some(parent)) = self.objects.parent(id) {
                self.notify_content_changed(parent);
            }
        }
    }

    /// Bottom-right corner of the union of the visible children.
    pub fn content_size(&self, id: ObjectId) -> Result<Vector2f> {
        let mut extent = Vector2f::ZERO;
        for &child in self.children(id)? {
            let core = self.core(child)?;
            if core.visible {
                extent = extent.max(core.rect().bottom_right());
            }
        }
        Ok(extent)
    }

    fn notify_content_changed(&mut self, id: ObjectId) {
        let Ok(content) = self.content_size(id) else {
            return;
        };
        self.with_behavior(id, |widget, ctx| widget.content_changed(content, ctx));
    }

    // =========================================================================
    // Visibility, enabled state, opacity
    // =========================================================================

    /// Show or hide a widget. Hiding unfocuses it.
    pub fn set_visible(&mut self, id: ObjectId, visible: bool) -> Result<()> {
        let core = &mut self.node_mut(id)?.core;
        if core.visible == visible {
            return Ok(());
        }
        core.visible = visible;
        if !visible {
            core.mouse_down = false;
            core.right_mouse_down = false;
            self.unfocus_widget(id);
        }
        if let Some(parent) = self.parent(id)? {
            self.notify_content_changed(parent);
        }
        Ok(())
    }

    /// Enable or disable a widget. Disabling unfocuses it and drops its
    /// hover and mouse-down state.
    pub fn set_enabled(&mut self, id: ObjectId, enabled: bool) -> Result<()> {
        let core = &mut self.node_mut(id)?.core;
        core.enabled = enabled;
        if !enabled {
            core.clear_mouse_state();
            self.unfocus_widget(id);
        }
        Ok(())
    }

    /// Allow or forbid focusing a widget.
    pub fn set_focusable(&mut self, id: ObjectId, focusable: bool) -> Result<()> {
        self.node_mut(id)?.core.focusable = focusable;
        if !focusable {
            self.unfocus_widget(id);
        }
        Ok(())
    }

    /// Set a widget's own opacity, clamped to `[0, 1]`. Descendants inherit
    /// the change.
    pub fn set_opacity(&mut self, id: ObjectId, opacity: f32) -> Result<()> {
        self.node_mut(id)?.core.opacity = opacity.clamp(0.0, 1.0);
        self.propagate_opacity(id);
        Ok(())
    }

    pub(crate) fn set_inherited_opacity(&mut self, id: ObjectId, opacity: f32) {
        if let Some(node) = self.objects.get_mut(id) {
            node.core.inherited_opacity = opacity.clamp(0.0, 1.0);
            self.propagate_opacity(id);
        }
    }

    fn propagate_opacity(&mut self, id: ObjectId) {
        let Some(effective) = self.objects.get(id).map(|node| node.core.effective_opacity()) else {
            return;
        };
        for child in self.children_vec(id) {
            self.set_inherited_opacity(child, effective);
        }
    }

    /// The inherited opacity a widget settles on when no fade runs.
    pub(crate) fn resting_inherited_opacity(&self, id: ObjectId) -> f32 {
        match self.objects.parent(id) {
            Ok(Some(parent)) => self.core(parent).map_or(1.0, WidgetCore::effective_opacity),
            _ => 1.0,
        }
    }

    // =========================================================================
    // Z-order
    // =========================================================================

    /// Draw the widget above its siblings and give it hit-test priority.
    pub fn move_to_front(&mut self, id: ObjectId) -> Result<()> {
        Ok(self.objects.raise(id)?)
    }

    /// Draw the widget below its siblings.
    pub fn move_to_back(&mut self, id: ObjectId) -> Result<()> {
        Ok(self.objects.lower(id)?)
    }

    /// Swap the widget with the sibling in front of it. Returns the new index.
    pub fn move_widget_forward(&mut self, id: ObjectId) -> Result<usize> {
        let index = self.widget_index(id)?.unwrap_or(0);
        self.objects.set_sibling_index(id, index + 1)?;
        Ok(self.widget_index(id)?.unwrap_or(0))
    }

    /// Swap the widget with the sibling behind it. Returns the new index.
    pub fn move_widget_backward(&mut self, id: ObjectId) -> Result<usize> {
        let index = self.widget_index(id)?.unwrap_or(0);
        self.objects.set_sibling_index(id, index.saturating_sub(1))?;
        Ok(self.widget_index(id)?.unwrap_or(0))
    }

    /// Move the widget to `index` among its siblings. Returns false when the
    /// index is out of range.
    pub fn set_widget_index(&mut self, id: ObjectId, index: usize) -> Result<bool> {
        let Some(parent) = self.parent(id)? else {
            return Ok(false);
        };
        if index >= self.children(parent)?.len() {
            return Ok(false);
        }
        self.objects.set_sibling_index(id, index)?;
        Ok(true)
    }

    /// Index among the siblings, 0 being the back. `None` for the root.
    pub fn widget_index(&self, id: ObjectId) -> Result<Option<usize>> {
        Ok(self.objects.sibling_index(id)?)
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Connect a handler to one or more (space separated) signals of a widget.
    ///
    /// ```
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use horizon_trellis::tree::WidgetTree;
    /// use horizon_trellis::widgets::Button;
    /// use horizon_trellis::Vector2f;
    ///
    /// let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
    /// let button = tree.add(tree.root(), Button::new("OK"), "Ok").unwrap();
    ///
    /// let pressed = Rc::new(Cell::new(0));
    /// let counter = pressed.clone();
    /// tree.connect(button, "Pressed", move |text: String| {
    ///     assert_eq!(text, "OK");
    ///     counter.set(counter.get() + 1);
    /// })
    /// .unwrap();
    ///
    /// assert!(tree.connect(button, "Checked", || {}).is_err());
    /// ```
    pub fn connect<S>(
        &mut self,
        id: ObjectId,
        signal: &str,
        handler: impl IntoHandler<S>,
    ) -> Result<ConnectionId> {
        let node = self
            .objects
            .get_mut(id)
            .ok_or(TrellisError::Object(ObjectError::InvalidObjectId))?;
        Ok(node.signals.connect(&mut self.ids, node.specs, signal, handler)?)
    }

    /// Remove one connection. Returns true exactly once per connection.
    pub fn disconnect(&mut self, id: ObjectId, connection: ConnectionId) -> bool {
        self.objects
            .get_mut(id)
            .is_some_and(|node| node.signals.disconnect(connection))
    }

    /// Remove every connection of one signal, or of all signals.
    pub fn disconnect_all(&mut self, id: ObjectId, signal: Option<&str>) -> Result<()> {
        self.node_mut(id)?.signals.disconnect_all(signal);
        Ok(())
    }

    /// Suppress or resume all signal emission of a widget.
    pub fn set_signals_blocked(&mut self, id: ObjectId, blocked: bool) -> Result<()> {
        self.node_mut(id)?.signals.set_blocked(blocked);
        Ok(())
    }

    /// Number of handlers connected to a signal of a widget.
    pub fn connection_count(&self, id: ObjectId, signal: Option<&str>) -> Result<usize> {
        Ok(self.node(id)?.signals.connection_count(signal))
    }

    pub(crate) fn emit(&self, id: ObjectId, signal: &str, value: Option<&dyn Any>) {
        if let Some(node) = self.objects.get(id) {
            node.signals.emit(id, signal, value);
        }
    }

    /// Connect a handler to `signal_name` of every widget named
    /// `widget_name`, including widgets added or renamed later.
    pub fn connect_by_name<S>(
        &mut self,
        widget_name: &str,
        signal_name: &str,
        handler: impl IntoHandler<S>,
    ) -> ConnectionId {
        let id = self.manager.connect(&mut self.ids, widget_name, signal_name, handler);
        for object in self.objects.find_all_by_name(widget_name) {
            self.attach_managed(object);
        }
        id
    }

    /// Remove a name-based connection from every widget it was attached to.
    pub fn disconnect_by_name(&mut self, connection: ConnectionId) -> bool {
        let Some(attached) = self.manager.disconnect(connection) else {
            return false;
        };
        for (object, conn) in attached {
            self.disconnect(object, conn);
        }
        true
    }

    /// Remove every name-based connection.
    pub fn disconnect_all_by_name(&mut self) {
        for (object, conn) in self.manager.disconnect_all() {
            self.disconnect(object, conn);
        }
    }

    /// Number of name-based connections.
    pub fn managed_connection_count(&self) -> usize {
        self.manager.len()
    }

    fn attach_managed(&mut self, id: ObjectId) {
        let Ok(name) = self.objects.name(id) else {
            return;
        };
        for pending in self.manager.pending_for(id, name) {
            let Some(node) = self.objects.get_mut(id) else {
                return;
            };
            match node
                .signals
                .connect(&mut self.ids, node.specs, &pending.signal_name, pending.handler)
            {
                Ok(connection) => self.manager.record_attachment(pending.id, id, connection),
                Err(err) => {
                    tracing::warn!(target: targets::SIGNAL, ?id, error = %err, "managed connection does not fit widget");
                }
            }
        }
    }

    // =========================================================================
    // Requests, time, services
    // =========================================================================

    fn apply_requests(&mut self, id: ObjectId, requests: Vec<TreeRequest>) {
        for request in requests {
            let result = match request {
                TreeRequest::SetPosition(position) => self.set_position(id, position),
                TreeRequest::SetSize(size) => self.set_size(id, size),
                TreeRequest::MoveToFront => self.move_to_front(id),
                TreeRequest::UncheckRadioSiblings => {
                    if let Ok(Some(parent)) = self.parent(id) {
                        self.uncheck_radio_buttons(parent, id);
                    }
                    Ok(())
                }
                TreeRequest::Hide => self.set_visible(id, false),
                TreeRequest::Close => {
                    self.remove(id);
                    Ok(())
                }
            };
            if let Err(err) = result {
                tracing::warn!(target: targets::CONTAINER, ?id, ?request, error = %err, "tree request failed");
            }
        }
    }

    /// Uncheck the radio buttons of a container, descending into nested
    /// containers that are not radio button groups themselves.
    fn uncheck_radio_buttons(&mut self, container: ObjectId, except: ObjectId) {
        for child in self.children_vec(container) {
            if child == except {
                continue;
            }
            match self.objects.get(child).map(|node| node.kind) {
                Some(WidgetKind::RadioButton) => {
                    if let Err(err) = self.update(child, |radio: &mut RadioButton, ctx| radio.set_checked(false, ctx)) {
                        tracing::warn!(target: targets::CONTAINER, ?child, error = %err, "could not uncheck radio button");
                    }
                }
                Some(WidgetKind::RadioButtonGroup) | None => {}
                Some(_) if self.is_container(child) => self.uncheck_radio_buttons(child, except),
                Some(_) => {}
            }
        }
    }

    /// Advance the logical clock: animations first, then the time hooks of
    /// visible widgets. Returns whether anything needs a redraw.
    #[tracing::instrument(skip(self), target = "horizon_trellis::container", level = "trace")]
    pub fn update_time(&mut self, elapsed: Duration) -> bool {
        self.services.clock += elapsed;
        let animated = self.update_animations(elapsed);
        let hooked = self.update_widget_time(self.root, elapsed);
        animated || hooked
    }

    fn update_widget_time(&mut self, id: ObjectId, elapsed: Duration) -> bool {
        let mut changed = self
            .with_behavior(id, |widget, ctx| widget.update_time(elapsed, ctx))
            .unwrap_or(false);
        for child in self.children_vec(id) {
            if self.core(child).is_ok_and(WidgetCore::is_visible) {
                changed |= self.update_widget_time(child, elapsed);
            }
        }
        changed
    }

    /// Time accumulated by [`update_time`](Self::update_time).
    pub fn clock(&self) -> Duration {
        self.services.clock
    }

    /// Replace the clipboard.
    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.services.clipboard = clipboard;
    }

    /// The clipboard.
    pub fn clipboard(&mut self) -> &mut dyn Clipboard {
        self.services.clipboard.as_mut()
    }

    /// Replace the font metrics.
    pub fn set_text_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.services.measure = measure;
    }

    pub(crate) fn set_timing(&mut self, double_click_time: Duration, caret_blink_interval: Duration) {
        self.services.double_click_time = double_click_time;
        self.services.caret_blink_interval = caret_blink_interval;
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new(Vector2f::new(800.0, 600.0))
    }
}

impl std::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetTree")
            .field("widgets", &self.objects.len())
            .field("window_size", &self.window_size)
            .field("clock", &self.services.clock)
            .finish()
    }
}

//! Keyboard focus.
//!
//! Focus is a path from the root down to at most one leaf: a focused widget's
//! container ancestors are focused as well, and every container remembers
//! which child is on the path. Unfocusing a container unfocuses its subtree
//! but keeps that memory, so focusing the container again restores the same
//! leaf.
//!
//! Tab traversal walks the children of a container in z-order. Containers
//! with an isolated focus cycle (Panel, ChildWindow, the root) wrap around
//! inside themselves and are skipped by their parent's traversal; other
//! containers (Group, RadioButtonGroup) hand traversal back to the parent
//! when their last child is passed.

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::ObjectId;

use super::WidgetTree;
use crate::error::Result;
use crate::widget::{signals, WidgetCore};

impl WidgetTree {
    /// Whether a widget may take focus right now.
    pub fn can_gain_focus(&self, id: ObjectId) -> bool {
        let Ok(node) = self.node(id) else {
            return false;
        };
        let kind_allows = node.behavior.as_ref().is_none_or(|b| b.can_gain_focus());
        kind_allows && node.core.focusable && node.core.visible && node.core.enabled
    }

    /// Focus or unfocus a widget.
    ///
    /// Focusing a container descends to the child it remembers, or to its
    /// first focusable child when it remembers none.
    pub fn set_focused(&mut self, id: ObjectId, focused: bool) -> Result<()> {
        self.node(id)?;
        if focused {
            self.focus_widget(id);
        } else {
            self.unfocus_widget(id);
        }
        Ok(())
    }

    /// The child of `container` on the focus path.
    pub fn focused_child(&self, container: ObjectId) -> Option<ObjectId> {
        self.container_state(container)?
            .focused_child
            .filter(|&child| self.core(child).is_ok_and(WidgetCore::is_focused))
    }

    /// The deepest focused widget.
    pub fn focused_leaf(&self) -> Option<ObjectId> {
        let mut current = self.focused_child(self.root)?;
        while let Some(child) = self.focused_child(current) {
            current = child;
        }
        Some(current)
    }

    pub(crate) fn focus_widget(&mut self, id: ObjectId) {
        if !self.can_gain_focus(id) {
            return;
        }
        if self.is_container(id) {
            let remembered = self.container_state(id).and_then(|state| state.focused_child);
            match remembered {
                Some(child) if self.can_gain_focus(child) => {
                    if !self.core(child).is_ok_and(WidgetCore::is_focused) {
                        self.focus_widget(child);
                    }
                }
                _ => {
                    if let Some(state) = self.container_state_mut(id) {
                        state.focused_child = None;
                    }
                    for child in self.children_vec(id) {
                        if self.try_focus_widget(id, child, false, true) {
                            break;
                        }
                    }
                }
            }
        }
        if !self.core(id).is_ok_and(WidgetCore::is_focused) {
            self.mark_focused(id);
        }
    }

    /// Focus only this widget and report it to the parent chain.
    pub(crate) fn mark_focused(&mut self, id: ObjectId) {
        if !self.can_gain_focus(id) {
            return;
        }
        let Some(node) = self.objects.get_mut(id) else {
            return;
        };
        if node.core.focused {
            return;
        }
        node.core.focused = true;
        tracing::trace!(target: targets::FOCUS, ?id, "focused");

        if let Ok(Some(parent)) = self.objects.parent(id) {
            self.child_widget_focused(parent, id);
        }
        self.emit(id, signals::FOCUSED, None);
        self.with_behavior(id, |widget, ctx| widget.focus_changed(true, ctx));
    }

    fn child_widget_focused(&mut self, container: ObjectId, child: ObjectId) {
        let previous = self.container_state(container).and_then(|state| state.focused_child);
        if previous != Some(child) {
            if let Some(previous) = previous {
                self.unfocus_widget(previous);
            }
            if let Some(state) = self.container_state_mut(container) {
                state.focused_child = Some(child);
            }
        }
        if !self.core(container).is_ok_and(WidgetCore::is_focused) {
            self.focus_widget(container);
        }
    }

    /// Unfocus a widget and its focused descendants. The remembered child of
    /// each container is kept.
    pub(crate) fn unfocus_widget(&mut self, id: ObjectId) {
        if let Some(child) = self.container_state(id).and_then(|state| state.focused_child) {
            if self.core(child).is_ok_and(WidgetCore::is_focused) {
                self.unfocus_widget(child);
            }
        }
        let Some(node) = self.objects.get_mut(id) else {
            return;
        };
        if !node.core.focused {
            return;
        }
        node.core.focused = false;
        tracing::trace!(target: targets::FOCUS, ?id, "unfocused");
        self.emit(id, signals::UNFOCUSED, None);
        self.with_behavior(id, |widget, ctx| widget.focus_changed(false, ctx));
    }

    /// 1-based index of the remembered child, 0 when there is none.
    fn focused_index(&self, container: ObjectId) -> usize {
        let Some(focused) = self.container_state(container).and_then(|s| s.focused_child) else {
            return 0;
        };
        self.objects
            .children(container)
            .ok()
            .and_then(|children| children.iter().position(|&c| c == focused))
            .map_or(0, |index| index + 1)
    }

    fn isolated_focus(&self, id: ObjectId) -> bool {
        self.behavior(id).is_some_and(|b| b.isolated_focus())
    }

    /// Move focus to the next widget of the root cycle.
    pub fn focus_next_widget(&mut self, recursive: bool) -> bool {
        self.focus_next_in(self.root, recursive)
    }

    /// Move focus to the previous widget of the root cycle.
    pub fn focus_previous_widget(&mut self, recursive: bool) -> bool {
        self.focus_previous_in(self.root, recursive)
    }

    /// Move focus to the next widget inside `container`.
    ///
    /// With `recursive` the traversal descends into non-isolated child
    /// containers and, when `container` is not isolated itself, returns
    /// false at the end so that the parent can continue.
    pub fn focus_next_in(&mut self, container: ObjectId, recursive: bool) -> bool {
        let focused = self.container_state(container).and_then(|s| s.focused_child);
        if recursive {
            if let Some(focused) = focused.filter(|&f| self.is_container(f)) {
                if self.focus_next_in(focused, true) {
                    return true;
                }
            }
        }

        let children = self.children_vec(container);
        let focused_index = self.focused_index(container);
        for &child in &children[focused_index.min(children.len())..] {
            if self.try_focus_widget(container, child, false, recursive) {
                return true;
            }
        }

        if recursive && !self.isolated_focus(container) {
            return false;
        }
        if focused.is_none() {
            return false;
        }
        // The focused widget takes part: it may be a container whose first
        // child was never focused.
        for &child in &children[..focused_index.min(children.len())] {
            if self.try_focus_widget(container, child, false, recursive) {
                return true;
            }
        }
        false
    }

    /// Move focus to the previous widget inside `container`.
    pub fn focus_previous_in(&mut self, container: ObjectId, recursive: bool) -> bool {
        let focused = self.container_state(container).and_then(|s| s.focused_child);
        if recursive {
            if let Some(focused) = focused.filter(|&f| self.is_container(f)) {
                if self.focus_previous_in(focused, true) {
                    return true;
                }
            }
        }

        let children = self.children_vec(container);
        let focused_index = self.focused_index(container).min(children.len());
        if focused_index > 0 {
            for &child in children[..focused_index - 1].iter().rev() {
                if self.try_focus_widget(container, child, true, recursive) {
                    return true;
                }
            }
            if recursive && !self.isolated_focus(container) {
                return false;
            }
        }

        for &child in children[focused_index..].iter().rev() {
            if self.try_focus_widget(container, child, true, recursive) {
                return true;
            }
        }
        if focused_index > 0 && self.try_focus_widget(container, children[focused_index - 1], true, recursive) {
            return true;
        }
        false
    }

    fn try_focus_widget(&mut self, container: ObjectId, widget: ObjectId, reverse: bool, recursive: bool) -> bool {
        if !self.can_gain_focus(widget) {
            return false;
        }

        if recursive && self.is_container(widget) {
            if self.isolated_focus(widget) {
                return false;
            }
            let previous = self.container_state_mut(widget).and_then(|state| state.focused_child.take());
            let child_focused = if reverse {
                self.focus_previous_in(widget, true)
            } else {
                self.focus_next_in(widget, true)
            };
            let now = self.container_state(widget).and_then(|state| state.focused_child);
            if let Some(previous) = previous.filter(|&p| Some(p) != now) {
                self.unfocus_widget(previous);
            }
            if !child_focused {
                return false;
            }
        }

        let current = self.container_state(container).and_then(|state| state.focused_child);
        if current == Some(widget) {
            return true;
        }
        if let Some(current) = current {
            self.unfocus_widget(current);
        }
        if let Some(state) = self.container_state_mut(container) {
            state.focused_child = Some(widget);
        }
        tracing::debug!(target: targets::FOCUS, ?widget, "focus moved");
        self.focus_widget(widget);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector2f;
    use crate::widgets::{Button, Group, Label, Panel};

    fn tree() -> WidgetTree {
        WidgetTree::new(Vector2f::new(800.0, 600.0))
    }

    fn focused(tree: &WidgetTree, id: ObjectId) -> bool {
        tree.core(id).unwrap().is_focused()
    }

    #[test]
    fn test_focus_marks_path_and_unfocuses_sibling() {
        let mut tree = tree();
        let root = tree.root();
        let group = tree.add(root, Group::new(), "Group").unwrap();
        let inner = tree.add(group, Button::new("a"), "a").unwrap();
        let other = tree.add(root, Button::new("b"), "b").unwrap();

        tree.set_focused(inner, true).unwrap();
        assert!(focused(&tree, inner) && focused(&tree, group) && focused(&tree, root));
        assert_eq!(tree.focused_leaf(), Some(inner));

        tree.set_focused(other, true).unwrap();
        assert!(!focused(&tree, inner) && !focused(&tree, group));
        assert_eq!(tree.focused_leaf(), Some(other));
    }

    #[test]
    fn test_container_restores_remembered_child() {
        let mut tree = tree();
        let root = tree.root();
        let group = tree.add(root, Group::new(), "Group").unwrap();
        let first = tree.add(group, Button::new("a"), "a").unwrap();
        let second = tree.add(group, Button::new("b"), "b").unwrap();

        tree.set_focused(second, true).unwrap();
        tree.set_focused(group, false).unwrap();
        assert!(!focused(&tree, second));

        tree.set_focused(group, true).unwrap();
        assert!(focused(&tree, second));
        assert!(!focused(&tree, first));
    }

    #[test]
    fn test_container_without_memory_focuses_first_child() {
        let mut tree = tree();
        let root = tree.root();
        let group = tree.add(root, Group::new(), "Group").unwrap();
        tree.add(group, Label::new("skip"), "label").unwrap();
        let button = tree.add(group, Button::new("a"), "a").unwrap();
        tree.set_focused(group, true).unwrap();
        assert_eq!(tree.focused_leaf(), Some(button));
    }

    #[test]
    fn test_hidden_or_disabled_cannot_focus() {
        let mut tree = tree();
        let button = tree.add(tree.root(), Button::new("a"), "a").unwrap();
        tree.set_enabled(button, false).unwrap();
        tree.set_focused(button, true).unwrap();
        assert!(!focused(&tree, button));

        tree.set_enabled(button, true).unwrap();
        tree.set_focused(button, true).unwrap();
        tree.set_visible(button, false).unwrap();
        assert!(!focused(&tree, button));
    }

    #[test]
    fn test_tab_skips_isolated_and_wraps() {
        let mut tree = tree();
        let root = tree.root();
        let a = tree.add(root, Button::new("a"), "a").unwrap();
        let panel = tree.add(root, Panel::new(), "Panel").unwrap();
        tree.add(panel, Button::new("hidden in panel"), "p").unwrap();
        let b = tree.add(root, Button::new("b"), "b").unwrap();

        assert!(tree.focus_next_widget(true));
        assert_eq!(tree.focused_leaf(), Some(a));
        assert!(tree.focus_next_widget(true));
        assert_eq!(tree.focused_leaf(), Some(b));
        assert!(tree.focus_next_widget(true));
        assert_eq!(tree.focused_leaf(), Some(a));
        assert!(tree.focus_previous_widget(true));
        assert_eq!(tree.focused_leaf(), Some(b));
    }

    #[test]
    fn test_focus_signals() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut tree = tree();
        let a = tree.add(tree.root(), Button::new("a"), "a").unwrap();
        let b = tree.add(tree.root(), Button::new("b"), "b").unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        for id in [a, b] {
            let log = log.clone();
            tree.connect(id, "Focused Unfocused", move |_: ObjectId, signal: &str| {
                log.borrow_mut().push(signal.to_string())
            })
            .unwrap();
        }
        tree.set_focused(a, true).unwrap();
        tree.set_focused(b, true).unwrap();
        assert_eq!(*log.borrow(), vec!["Focused", "Unfocused", "Focused"]);
    }
}

//! Mouse and keyboard routing through containers.
//!
//! The `process_*` functions receive positions in the child space of a
//! container (already shifted by its position and child offset). They find
//! the child below the pointer, keep the container's hover and capture state
//! and hand the event to the child in the child's parent space. The
//! `widget_*` functions then do the work shared by every widget (flags and
//! clickable signals), call the behavior hook with a local position and, for
//! containers, recurse.

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::ObjectId;

use super::WidgetTree;
use crate::event::{is_printable, Key, KeyEvent, MouseButton};
use crate::geometry::Vector2f;
use crate::widget::{signals, MouseRouting, WidgetCore};

impl WidgetTree {
    /// The topmost visible child whose shape contains `pos`. A disabled hit
    /// blocks the widgets below it and counts as no hit.
    pub(crate) fn child_at(&self, container: ObjectId, pos: Vector2f) -> Option<ObjectId> {
        let children = self.objects.children(container).ok()?;
        for &child in children.iter().rev() {
            let Some(node) = self.objects.get(child) else {
                continue;
            };
            if !node.core.visible {
                continue;
            }
            let local = pos - node.core.position;
            let hit = node
                .behavior
                .as_ref()
                .map_or_else(|| node.core.rect().contains(pos), |b| b.is_mouse_on_widget(local, node.core.size));
            if hit {
                return node.core.enabled.then_some(child);
            }
        }
        None
    }

    /// The deepest enabled widget under a point given in root coordinates.
    pub fn widget_at_position(&self, pos: Vector2f) -> Option<ObjectId> {
        let mut container = self.root;
        let mut pos = pos;
        let mut found = None;
        while let Some(child) = self.child_at(container, pos) {
            found = Some(child);
            if !self.is_container(child) {
                break;
            }
            let core = self.core(child).ok()?;
            pos = pos - core.position - self.child_offset(child);
            container = child;
        }
        found
    }

    fn update_below_mouse(&mut self, container: ObjectId, pos: Vector2f) -> Option<ObjectId> {
        let below = self.child_at(container, pos);
        let previous = self.container_state(container).and_then(|state| state.below_mouse);
        if previous != below {
            if let Some(state) = self.container_state_mut(container) {
                state.below_mouse = below;
            }
            if let Some(previous) = previous {
                self.widget_mouse_no_longer_on(previous);
            }
        }
        below
    }

    // =========================================================================
    // Container side
    // =========================================================================

    pub(crate) fn process_mouse_press(&mut self, container: ObjectId, button: MouseButton, pos: Vector2f) -> bool {
        let below = self.update_below_mouse(container, pos);
        if let Some(state) = self.container_state_mut(container) {
            match button {
                MouseButton::Left => state.left_down = below,
                MouseButton::Right => state.right_down = below,
                MouseButton::Middle => {}
            }
        }

        let Some(widget) = below else {
            // Pressing the empty area keeps the container focused but takes
            // focus away from its children.
            let focused = self.container_state_mut(container).and_then(|s| s.focused_child.take());
            if let Some(focused) = focused {
                self.unfocus_widget(focused);
            }
            self.mark_focused(container);
            return false;
        };

        let previous = self.container_state(container).and_then(|s| s.focused_child);
        if let Some(previous) = previous.filter(|&p| p != widget) {
            self.unfocus_widget(previous);
        }
        if let Some(state) = self.container_state_mut(container) {
            state.focused_child = Some(widget);
        }
        if !self.is_container(widget) {
            self.focus_widget(widget);
        }

        self.widget_mouse_pressed(widget, button, pos);
        true
    }

    pub(crate) fn process_mouse_release(&mut self, container: ObjectId, button: MouseButton, pos: Vector2f) -> bool {
        let below = self.update_below_mouse(container, pos);
        if let Some(widget) = below {
            self.widget_mouse_released(widget, button, pos);
        }

        let captured = self.container_state_mut(container).and_then(|state| match button {
            MouseButton::Left => state.left_down.take(),
            MouseButton::Right => state.right_down.take(),
            MouseButton::Middle => None,
        });
        match captured {
            Some(widget) => {
                self.widget_button_no_longer_down(widget, button);
                true
            }
            None => below.is_some(),
        }
    }

    pub(crate) fn process_mouse_move(&mut self, container: ObjectId, pos: Vector2f) -> bool {
        let captured = self.container_state(container).and_then(|state| state.left_down);
        if let Some(widget) = captured {
            let draggable = self.behavior(widget).is_some_and(|b| b.is_draggable());
            if draggable || self.is_container(widget) {
                self.widget_mouse_moved(widget, pos);
                return true;
            }
        }

        match self.update_below_mouse(container, pos) {
            Some(widget) => {
                self.widget_mouse_moved(widget, pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn process_mouse_wheel(&mut self, container: ObjectId, delta: f32, pos: Vector2f) -> bool {
        match self.update_below_mouse(container, pos) {
            Some(widget) => self.widget_mouse_wheel(widget, delta, pos),
            None => false,
        }
    }

    pub(crate) fn process_key_press(&mut self, container: ObjectId, event: &KeyEvent) -> bool {
        if matches!(event.key, Key::Unknown(_)) {
            return false;
        }
        match self.focused_child(container) {
            Some(widget) => self.widget_key_pressed(widget, event),
            None => false,
        }
    }

    pub(crate) fn process_text_entered(&mut self, container: ObjectId, code_point: u32) -> bool {
        if !is_printable(code_point) {
            return false;
        }
        let Some(c) = char::from_u32(code_point) else {
            return false;
        };
        match self.focused_child(container) {
            Some(widget) => self.widget_text_entered(widget, c),
            None => false,
        }
    }

    /// The pointer left the area of a container that is not a widget
    /// itself, such as the root leaving the window.
    pub(crate) fn clear_below_mouse(&mut self, container: ObjectId) {
        let below = self.container_state_mut(container).and_then(|state| state.below_mouse.take());
        if let Some(below) = below {
            self.widget_mouse_no_longer_on(below);
        }
    }

    // =========================================================================
    // Widget side, positions in the parent's child space
    // =========================================================================

    fn local_position(&self, id: ObjectId, pos: Vector2f) -> Vector2f {
        pos - self.core(id).map_or(Vector2f::ZERO, WidgetCore::position)
    }

    fn widget_mouse_pressed(&mut self, id: ObjectId, button: MouseButton, pos: Vector2f) {
        let local = self.local_position(id, pos);
        let Some(node) = self.objects.get_mut(id) else {
            return;
        };
        let signal = match button {
            MouseButton::Left => {
                node.core.mouse_down = true;
                signals::MOUSE_PRESSED
            }
            MouseButton::Right => {
                node.core.right_mouse_down = true;
                signals::RIGHT_MOUSE_PRESSED
            }
            MouseButton::Middle => return,
        };
        tracing::trace!(target: targets::CONTAINER, ?id, ?button, x = local.x, y = local.y, "mouse pressed");
        self.emit(id, signal, Some(&local));

        let routing = self.with_behavior(id, |widget, ctx| match button {
            MouseButton::Right => widget.right_mouse_pressed(local, ctx),
            _ => widget.left_mouse_pressed(local, ctx),
        });
        if routing == Some(MouseRouting::Children) && self.is_container(id) {
            let inner = local - self.child_offset(id);
            self.process_mouse_press(id, button, inner);
        }
    }

    fn widget_mouse_released(&mut self, id: ObjectId, button: MouseButton, pos: Vector2f) {
        let local = self.local_position(id, pos);
        let Ok(core) = self.core(id) else {
            return;
        };
        let (released, clicked, was_down) = match button {
            MouseButton::Left => (signals::MOUSE_RELEASED, signals::CLICKED, core.mouse_down),
            MouseButton::Right => (
                signals::RIGHT_MOUSE_RELEASED,
                signals::RIGHT_CLICKED,
                core.right_mouse_down,
            ),
            MouseButton::Middle => return,
        };
        self.emit(id, released, Some(&local));
        if was_down {
            self.emit(id, clicked, Some(&local));
        }

        let routing = self.with_behavior(id, |widget, ctx| match button {
            MouseButton::Right => widget.right_mouse_released(local, ctx),
            _ => widget.left_mouse_released(local, ctx),
        });
        if routing == Some(MouseRouting::Children) && self.is_container(id) {
            let inner = local - self.child_offset(id);
            self.process_mouse_release(id, button, inner);
        }
    }

    fn widget_button_no_longer_down(&mut self, id: ObjectId, button: MouseButton) {
        let Some(node) = self.objects.get_mut(id) else {
            return;
        };
        match button {
            MouseButton::Left => node.core.mouse_down = false,
            MouseButton::Right => node.core.right_mouse_down = false,
            MouseButton::Middle => return,
        }
        self.with_behavior(id, |widget, ctx| match button {
            MouseButton::Right => widget.right_mouse_button_no_longer_down(ctx),
            _ => widget.left_mouse_button_no_longer_down(ctx),
        });

        let captured = self.container_state_mut(id).and_then(|state| match button {
            MouseButton::Right => state.right_down.take(),
            _ => state.left_down.take(),
        });
        if let Some(child) = captured {
            self.widget_button_no_longer_down(child, button);
        }
    }

    fn widget_mouse_moved(&mut self, id: ObjectId, pos: Vector2f) {
        let local = self.local_position(id, pos);
        let Some(node) = self.objects.get_mut(id) else {
            return;
        };
        if !node.core.mouse_hover {
            node.core.mouse_hover = true;
            self.emit(id, signals::MOUSE_ENTERED, None);
        }

        let routing = self.with_behavior(id, |widget, ctx| widget.mouse_moved(local, ctx));
        if routing == Some(MouseRouting::Children) && self.is_container(id) {
            let inner = local - self.child_offset(id);
            self.process_mouse_move(id, inner);
        }
    }

    fn widget_mouse_wheel(&mut self, id: ObjectId, delta: f32, pos: Vector2f) -> bool {
        let local = self.local_position(id, pos);
        if self.is_container(id) {
            let inner = local - self.child_offset(id);
            if self.process_mouse_wheel(id, delta, inner) {
                return true;
            }
        }
        self.with_behavior(id, |widget, ctx| widget.mouse_wheel_scrolled(delta, local, ctx))
            .unwrap_or(false)
    }

    fn widget_mouse_no_longer_on(&mut self, id: ObjectId) {
        let Some(node) = self.objects.get_mut(id) else {
            return;
        };
        if !node.core.mouse_hover {
            return;
        }
        node.core.mouse_hover = false;
        self.emit(id, signals::MOUSE_LEFT, None);
        self.with_behavior(id, |widget, ctx| widget.mouse_no_longer_on_widget(ctx));
        self.clear_below_mouse(id);
    }

    fn widget_key_pressed(&mut self, id: ObjectId, event: &KeyEvent) -> bool {
        let handled = self
            .with_behavior(id, |widget, ctx| widget.key_pressed(event, ctx))
            .unwrap_or(false);
        if handled {
            return true;
        }
        self.is_container(id) && self.process_key_press(id, event)
    }

    fn widget_text_entered(&mut self, id: ObjectId, c: char) -> bool {
        let handled = self
            .with_behavior(id, |widget, ctx| widget.text_entered(c, ctx))
            .unwrap_or(false);
        if handled {
            return true;
        }
        self.is_container(id) && self.process_text_entered(id, c as u32)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::widgets::{Button, Panel};

    fn log_signals(tree: &mut WidgetTree, id: ObjectId, names: &str) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        tree.connect(id, names, move |_: ObjectId, signal: &str| sink.borrow_mut().push(signal.to_string()))
            .unwrap();
        log
    }

    fn setup() -> (WidgetTree, ObjectId, ObjectId) {
        let mut tree = WidgetTree::new(Vector2f::new(800.0, 600.0));
        let panel = tree.add(tree.root(), Panel::new(), "Panel").unwrap();
        tree.set_position(panel, (100.0, 100.0)).unwrap();
        tree.set_size(panel, (200.0, 200.0)).unwrap();
        let button = tree.add(panel, Button::new("x"), "x").unwrap();
        tree.set_position(button, (10.0, 10.0)).unwrap();
        tree.set_size(button, (50.0, 20.0)).unwrap();
        (tree, panel, button)
    }

    #[test]
    fn test_hit_test_reverse_z_order() {
        let (mut tree, panel, button) = setup();
        let root = tree.root();
        assert_eq!(tree.widget_at_position(Vector2f::new(115.0, 115.0)), Some(button));
        assert_eq!(tree.widget_at_position(Vector2f::new(250.0, 250.0)), Some(panel));
        assert_eq!(tree.widget_at_position(Vector2f::new(5.0, 5.0)), None);

        let cover = tree.add(root, Button::new("cover"), "cover").unwrap();
        tree.set_position(cover, (100.0, 100.0)).unwrap();
        tree.set_size(cover, (100.0, 100.0)).unwrap();
        assert_eq!(tree.widget_at_position(Vector2f::new(115.0, 115.0)), Some(cover));

        tree.set_enabled(cover, false).unwrap();
        assert_eq!(tree.widget_at_position(Vector2f::new(115.0, 115.0)), None);
        tree.set_visible(cover, false).unwrap();
        assert_eq!(tree.widget_at_position(Vector2f::new(115.0, 115.0)), Some(button));
    }

    #[test]
    fn test_click_sequence() {
        let (mut tree, _, button) = setup();
        let root = tree.root();
        let log = log_signals(&mut tree, button, "MousePressed MouseReleased Clicked");
        tree.process_mouse_press(root, MouseButton::Left, Vector2f::new(115.0, 115.0));
        tree.process_mouse_release(root, MouseButton::Left, Vector2f::new(115.0, 115.0));
        assert_eq!(*log.borrow(), vec!["MousePressed", "MouseReleased", "Clicked"]);
        assert!(!tree.core(button).unwrap().is_mouse_down());
        assert_eq!(tree.focused_leaf(), Some(button));
    }

    #[test]
    fn test_release_elsewhere_is_no_click() {
        let (mut tree, _, button) = setup();
        let root = tree.root();
        let log = log_signals(&mut tree, button, "Clicked");
        tree.process_mouse_press(root, MouseButton::Left, Vector2f::new(115.0, 115.0));
        tree.process_mouse_release(root, MouseButton::Left, Vector2f::new(500.0, 500.0));
        assert!(log.borrow().is_empty());
        assert!(!tree.core(button).unwrap().is_mouse_down());
    }

    #[test]
    fn test_hover_enter_and_leave_once() {
        let (mut tree, panel, button) = setup();
        let root = tree.root();
        let log = log_signals(&mut tree, button, "MouseEntered MouseLeft");
        let panel_log = log_signals(&mut tree, panel, "MouseEntered MouseLeft");
        for x in [115.0, 120.0, 125.0] {
            tree.process_mouse_move(root, Vector2f::new(x, 115.0));
        }
        tree.process_mouse_move(root, Vector2f::new(250.0, 250.0));
        tree.process_mouse_move(root, Vector2f::new(600.0, 600.0));
        assert_eq!(*log.borrow(), vec!["MouseEntered", "MouseLeft"]);
        assert_eq!(*panel_log.borrow(), vec!["MouseEntered", "MouseLeft"]);
    }

    #[test]
    fn test_press_on_empty_area_focuses_container_only() {
        let (mut tree, panel, button) = setup();
        let root = tree.root();
        tree.process_mouse_press(root, MouseButton::Left, Vector2f::new(115.0, 115.0));
        assert_eq!(tree.focused_leaf(), Some(button));
        tree.process_mouse_press(root, MouseButton::Left, Vector2f::new(250.0, 250.0));
        assert!(!tree.core(button).unwrap().is_focused());
        assert!(tree.core(panel).unwrap().is_focused());
        assert_eq!(tree.focused_leaf(), Some(panel));
    }

    #[test]
    fn test_keys_follow_focus() {
        let (mut tree, _, button) = setup();
        let root = tree.root();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        tree.connect(button, "Pressed", move |text: String| sink.borrow_mut().push(text))
            .unwrap();
        assert!(!tree.process_key_press(root, &KeyEvent::new(Key::Space)));
        tree.set_focused(button, true).unwrap();
        assert!(tree.process_key_press(root, &KeyEvent::new(Key::Space)));
        assert_eq!(*log.borrow(), vec!["x".to_string()]);
        assert!(!tree.process_text_entered(root, 8));
    }
}

//! Plain containers.
//!
//! The four containers here only differ in how they take part in focus
//! traversal and what they draw; child routing, hover tracking and layout are
//! done by the tree for every container.

use horizon_trellis_core::SignalSpec;

use crate::geometry::Vector2f;
use crate::render::DrawList;
use crate::widget::{signals, Widget, WidgetCore, WidgetKind};

/// The top-level container of a [`WidgetTree`](crate::tree::WidgetTree).
///
/// It covers the window and is always on the focus path.
#[derive(Debug, Default)]
pub struct Root;

impl Root {
    /// Create the root container.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Root {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Root
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::WIDGET
    }

    fn is_container(&self) -> bool {
        true
    }

    fn isolated_focus(&self) -> bool {
        true
    }

    fn draw(&self, _core: &WidgetCore, _list: &mut DrawList) {}
}

/// A container with a background.
///
/// Tab traversal cycles inside a panel instead of leaving it.
#[derive(Debug, Default)]
pub struct Panel;

impl Panel {
    /// Create an empty panel.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Panel {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Panel
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::CLICKABLE
    }

    fn default_size(&self) -> Vector2f {
        Vector2f::new(100.0, 100.0)
    }

    fn is_container(&self) -> bool {
        true
    }

    fn isolated_focus(&self) -> bool {
        true
    }
}

/// An invisible container whose children join the parent's tab order.
#[derive(Debug, Default)]
pub struct Group;

impl Group {
    /// Create an empty group.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Group {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Group
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::WIDGET
    }

    fn default_size(&self) -> Vector2f {
        Vector2f::new(100.0, 100.0)
    }

    fn is_container(&self) -> bool {
        true
    }

    fn draw(&self, _core: &WidgetCore, _list: &mut DrawList) {}
}

/// A group that separates its radio buttons from those outside it.
///
/// Checking a radio button unchecks the other radio buttons of the same
/// parent, looking into nested containers but never into a
/// `RadioButtonGroup`.
#[derive(Debug, Default)]
pub struct RadioButtonGroup;

impl RadioButtonGroup {
    /// Create an empty radio button group.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for RadioButtonGroup {
    fn kind(&self) -> WidgetKind {
        WidgetKind::RadioButtonGroup
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::WIDGET
    }

    fn default_size(&self) -> Vector2f {
        Vector2f::new(100.0, 100.0)
    }

    fn is_container(&self) -> bool {
        true
    }

    fn draw(&self, _core: &WidgetCore, _list: &mut DrawList) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::WidgetTree;
    use crate::widgets::Button;

    #[test]
    fn test_group_draws_only_children() {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let group = tree.add(tree.root(), Group::new(), "Group").unwrap();
        let button = tree.add(group, Button::new("x"), "x").unwrap();
        let mut commands = Vec::new();
        tree.draw(&mut commands);
        assert!(commands.iter().all(|c| c.widget != group));
        assert!(commands.iter().any(|c| c.widget == button));
    }
}

//! State shared by every widget.

use crate::geometry::{Rect, Vector2f};
use crate::layout::{Layout2d, LayoutContext};

/// The common state of a widget node.
///
/// The tree owns one `WidgetCore` per node and keeps it separate from the
/// widget's own behavior, so routing and focus code can inspect geometry and
/// flags without knowing the concrete widget type. Widget hooks get read
/// access through [`WidgetCtx`](super::WidgetCtx); all changes go through
/// [`WidgetTree`](crate::tree::WidgetTree) so signals fire and children are
/// laid out again.
#[derive(Debug, Clone)]
pub struct WidgetCore {
    pub(crate) position_layout: Layout2d,
    pub(crate) size_layout: Layout2d,
    pub(crate) position: Vector2f,
    pub(crate) size: Vector2f,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) focusable: bool,
    pub(crate) opacity: f32,
    pub(crate) inherited_opacity: f32,
    pub(crate) focused: bool,
    pub(crate) mouse_hover: bool,
    pub(crate) mouse_down: bool,
    pub(crate) right_mouse_down: bool,
}

impl WidgetCore {
    /// A visible, enabled, fully opaque widget of the given size at the
    /// parent's origin.
    pub fn new(size: Vector2f) -> Self {
        Self {
            position_layout: Layout2d::default(),
            size_layout: Layout2d::from(size),
            position: Vector2f::ZERO,
            size,
            visible: true,
            enabled: true,
            focusable: true,
            opacity: 1.0,
            inherited_opacity: 1.0,
            focused: false,
            mouse_hover: false,
            mouse_down: false,
            right_mouse_down: false,
        }
    }

    /// The position layout.
    pub fn position_layout(&self) -> &Layout2d {
        &self.position_layout
    }

    /// The size layout.
    pub fn size_layout(&self) -> &Layout2d {
        &self.size_layout
    }

    /// Resolved position relative to the parent's child area.
    #[inline]
    pub fn position(&self) -> Vector2f {
        self.position
    }

    /// Resolved size.
    #[inline]
    pub fn size(&self) -> Vector2f {
        self.size
    }

    /// Bounds in the parent's child-area coordinates.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Whether the widget is shown.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the widget accepts input.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether focus is allowed by the user setting.
    #[inline]
    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    /// The widget's own opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Combined opacity of all ancestors.
    pub fn inherited_opacity(&self) -> f32 {
        self.inherited_opacity
    }

    /// Opacity used for drawing.
    pub fn effective_opacity(&self) -> f32 {
        self.opacity * self.inherited_opacity
    }

    /// Whether the widget is on the focus path.
    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the pointer is over the widget.
    pub fn is_mouse_hover(&self) -> bool {
        self.mouse_hover
    }

    /// Whether the left button went down on the widget and is still held.
    pub fn is_mouse_down(&self) -> bool {
        self.mouse_down
    }

    /// Whether the right button went down on the widget and is still held.
    pub fn is_right_mouse_down(&self) -> bool {
        self.right_mouse_down
    }

    /// Evaluate the size layout against a parent size.
    pub(crate) fn resolve_size(&self, parent_size: Vector2f) -> Vector2f {
        self.size_layout.evaluate(&LayoutContext::new(parent_size))
    }

    /// Evaluate the position layout; the own size must already be resolved.
    pub(crate) fn resolve_position(&self, parent_size: Vector2f) -> Vector2f {
        self.position_layout
            .evaluate(&LayoutContext::with_own_size(parent_size, self.size))
    }

    pub(crate) fn clear_mouse_state(&mut self) {
        self.mouse_hover = false;
        self.mouse_down = false;
        self.right_mouse_down = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutValue;

    #[test]
    fn test_resolve_against_parent() {
        let mut core = WidgetCore::new(Vector2f::new(10.0, 10.0));
        core.size_layout = Layout2d::percent(50.0, 25.0);
        core.position_layout = Layout2d::new(
            LayoutValue::parse("parent.width - width").unwrap(),
            LayoutValue::from(5.0),
        );
        core.size = core.resolve_size(Vector2f::new(200.0, 100.0));
        assert_eq!(core.size, Vector2f::new(100.0, 25.0));
        assert_eq!(core.resolve_position(Vector2f::new(200.0, 100.0)), Vector2f::new(100.0, 5.0));
    }

    #[test]
    fn test_effective_opacity() {
        let mut core = WidgetCore::new(Vector2f::ZERO);
        core.opacity = 0.5;
        core.inherited_opacity = 0.5;
        assert_eq!(core.effective_opacity(), 0.25);
    }
}

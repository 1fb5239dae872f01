//! A panel whose content can be larger than the panel itself.

use horizon_trellis_core::{PropertyError, PropertyMap, PropertyValue, SignalSpec};

use super::scrollbar::{
    scrollbar_visibility, ScrollbarGeometry, ScrollbarModel, ScrollbarPolicy, DEFAULT_SCROLLBAR_WIDTH,
};
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part};
use crate::widget::{signals, MouseRouting, Widget, WidgetCore, WidgetCtx, WidgetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bar {
    Horizontal,
    Vertical,
}

/// A panel with a horizontal and a vertical scrollbar.
///
/// The content size is the bounding box of the visible children unless set
/// explicitly. Children are laid out against the full panel size; the
/// scrollbars are drawn over the content. Scrolling shifts the child area,
/// so child positions and layouts never change while scrolling.
#[derive(Debug, Clone)]
pub struct ScrollablePanel {
    horizontal: ScrollbarModel,
    vertical: ScrollbarModel,
    scrollbar_width: f32,
    // Bounding box of the children, as last reported by the tree.
    children_extent: Vector2f,
    content_size: Option<Vector2f>,
    active_bar: Option<Bar>,
}

impl Default for ScrollablePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollablePanel {
    /// An empty panel with automatic scrollbars.
    pub fn new() -> Self {
        Self {
            horizontal: ScrollbarModel::new(),
            vertical: ScrollbarModel::new(),
            scrollbar_width: DEFAULT_SCROLLBAR_WIDTH,
            children_extent: Vector2f::ZERO,
            content_size: None,
            active_bar: None,
        }
    }

    /// Builder-style scrollbar thickness.
    pub fn with_scrollbar_width(mut self, width: f32) -> Self {
        self.scrollbar_width = width.max(0.0);
        self
    }

    /// Builder-style scrollbar policies.
    pub fn with_policies(mut self, horizontal: ScrollbarPolicy, vertical: ScrollbarPolicy) -> Self {
        self.horizontal.set_policy(horizontal);
        self.vertical.set_policy(vertical);
        self
    }

    /// Size of the scrollable content.
    pub fn content_size(&self) -> Vector2f {
        self.content_size.unwrap_or(self.children_extent)
    }

    /// Fix the content size, or follow the children again with `None`.
    pub fn set_content_size(&mut self, size: Option<Vector2f>, ctx: &mut WidgetCtx<'_>) {
        self.content_size = size;
        self.update_scrollbars(ctx.core().size());
    }

    /// Current scroll offset.
    pub fn scroll_position(&self) -> Vector2f {
        Vector2f::new(self.horizontal.value(), self.vertical.value())
    }

    /// Scroll to an offset, clamped to the content.
    pub fn set_scroll_position(&mut self, position: Vector2f) {
        self.horizontal.set_value(position.x);
        self.vertical.set_value(position.y);
    }

    /// Change the horizontal scrollbar policy.
    pub fn set_horizontal_policy(&mut self, policy: ScrollbarPolicy, ctx: &mut WidgetCtx<'_>) {
        self.horizontal.set_policy(policy);
        self.update_scrollbars(ctx.core().size());
    }

    /// Change the vertical scrollbar policy.
    pub fn set_vertical_policy(&mut self, policy: ScrollbarPolicy, ctx: &mut WidgetCtx<'_>) {
        self.vertical.set_policy(policy);
        self.update_scrollbars(ctx.core().size());
    }

    /// Whether the horizontal scrollbar is shown.
    pub fn is_horizontal_scrollbar_shown(&self) -> bool {
        self.horizontal.is_shown()
    }

    /// Whether the vertical scrollbar is shown.
    pub fn is_vertical_scrollbar_shown(&self) -> bool {
        self.vertical.is_shown()
    }

    /// Area not covered by the scrollbars.
    pub fn viewport_size(&self) -> Vector2f {
        Vector2f::new(self.horizontal.viewport_size(), self.vertical.viewport_size())
    }

    fn update_scrollbars(&mut self, size: Vector2f) {
        let content = self.content_size();
        let layout = scrollbar_visibility(
            content,
            size,
            self.scrollbar_width,
            self.horizontal.policy(),
            self.vertical.policy(),
        );
        self.horizontal.set_content_size(content.x);
        self.horizontal.set_viewport_size(layout.viewport.x);
        self.vertical.set_content_size(content.y);
        self.vertical.set_viewport_size(layout.viewport.y);
    }

    fn bar_geometry(&self, bar: Bar, size: Vector2f) -> ScrollbarGeometry {
        let w = self.scrollbar_width;
        match bar {
            Bar::Vertical => {
                let bottom = if self.horizontal.is_shown() { w } else { 0.0 };
                ScrollbarGeometry {
                    rect: Rect::new(size.x - w, 0.0, w, (size.y - bottom).max(0.0)),
                    vertical: true,
                }
            }
            Bar::Horizontal => {
                let right = if self.vertical.is_shown() { w } else { 0.0 };
                ScrollbarGeometry {
                    rect: Rect::new(0.0, size.y - w, (size.x - right).max(0.0), w),
                    vertical: false,
                }
            }
        }
    }

    fn bar_at(&self, pos: Vector2f, size: Vector2f) -> Option<Bar> {
        [(Bar::Vertical, &self.vertical), (Bar::Horizontal, &self.horizontal)]
            .into_iter()
            .find(|(bar, model)| model.is_shown() && self.bar_geometry(*bar, size).rect.contains(pos))
            .map(|(bar, _)| bar)
    }

    fn model_mut(&mut self, bar: Bar) -> &mut ScrollbarModel {
        match bar {
            Bar::Horizontal => &mut self.horizontal,
            Bar::Vertical => &mut self.vertical,
        }
    }
}

impl Widget for ScrollablePanel {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ScrollablePanel
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

    fn child_offset(&self) -> Vector2f {
        -self.scroll_position()
    }

    fn left_mouse_pressed(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        let size = ctx.core().size();
        match self.bar_at(pos, size) {
            Some(bar) => {
                let geometry = self.bar_geometry(bar, size);
                self.model_mut(bar).press(&geometry, pos);
                self.active_bar = Some(bar);
                MouseRouting::Consumed
            }
            None => MouseRouting::Children,
        }
    }

    fn left_mouse_released(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if self.active_bar.is_some() || self.bar_at(pos, ctx.core().size()).is_some() {
            MouseRouting::Consumed
        } else {
            MouseRouting::Children
        }
    }

    fn mouse_moved(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        let size = ctx.core().size();
        if let Some(bar) = self.active_bar {
            if ctx.core().is_mouse_down() {
                let geometry = self.bar_geometry(bar, size);
                self.model_mut(bar).drag(&geometry, pos);
                return MouseRouting::Consumed;
            }
        }
        if self.bar_at(pos, size).is_some() {
            MouseRouting::Consumed
        } else {
            MouseRouting::Children
        }
    }

    fn left_mouse_button_no_longer_down(&mut self, _ctx: &mut WidgetCtx<'_>) {
        self.horizontal.release();
        self.vertical.release();
        self.active_bar = None;
    }

    fn mouse_wheel_scrolled(&mut self, delta: f32, _pos: Vector2f, _ctx: &mut WidgetCtx<'_>) -> bool {
        if self.vertical.maximum_value() > 0.0 {
            self.vertical.scroll_by(delta)
        } else {
            self.horizontal.scroll_by(delta)
        }
    }

    fn size_changed(&mut self, size: Vector2f, _ctx: &mut WidgetCtx<'_>) {
        self.update_scrollbars(size);
    }

    fn content_changed(&mut self, content_size: Vector2f, ctx: &mut WidgetCtx<'_>) {
        self.children_extent = content_size;
        self.update_scrollbars(ctx.core().size());
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        let size = core.size();
        list.push(Part::Background, Rect::from_origin_size(Vector2f::ZERO, size));
        if self.horizontal.is_shown() {
            self.horizontal.draw(&self.bar_geometry(Bar::Horizontal, size), list);
        }
        if self.vertical.is_shown() {
            self.vertical.draw(&self.bar_geometry(Bar::Vertical, size), list);
        }
    }

    fn properties(&self, out: &mut PropertyMap) {
        let content = self.content_size.unwrap_or(Vector2f::ZERO);
        out.insert("ContentSize".into(), [content.x, content.y].into());
        out.insert("ScrollbarWidth".into(), self.scrollbar_width.into());
        out.insert("HorizontalScrollbarPolicy".into(), self.horizontal.policy().name().into());
        out.insert("VerticalScrollbarPolicy".into(), self.vertical.policy().name().into());
        out.insert("HorizontalScrollAmount".into(), self.horizontal.scroll_amount().into());
        out.insert("VerticalScrollAmount".into(), self.vertical.scroll_amount().into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        match name {
            "ContentSize" => {
                let [x, y] = value.as_vector2(name)?;
                // Zero means "follow the children".
                self.content_size = (x != 0.0 || y != 0.0).then(|| Vector2f::new(x, y));
            }
            "ScrollbarWidth" => self.scrollbar_width = value.as_number(name)?.max(0.0),
            "HorizontalScrollbarPolicy" => {
                self.horizontal.set_policy(ScrollbarPolicy::parse(name, value.as_text(name)?)?)
            }
            "VerticalScrollbarPolicy" => {
                self.vertical.set_policy(ScrollbarPolicy::parse(name, value.as_text(name)?)?)
            }
            "HorizontalScrollAmount" => self.horizontal.set_scroll_amount(value.as_number(name)?),
            "VerticalScrollAmount" => self.vertical.set_scroll_amount(value.as_number(name)?),
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::WidgetTree;
    use crate::widgets::Button;

    fn setup() -> (WidgetTree, horizon_trellis_core::ObjectId) {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let panel = tree
            .add(tree.root(), ScrollablePanel::new().with_scrollbar_width(10.0), "Scroll")
            .unwrap();
        tree.set_size(panel, (100.0, 100.0)).unwrap();
        (tree, panel)
    }

    fn shown(tree: &WidgetTree, panel: horizon_trellis_core::ObjectId) -> (bool, bool) {
        let p = tree.widget::<ScrollablePanel>(panel).unwrap();
        (p.is_horizontal_scrollbar_shown(), p.is_vertical_scrollbar_shown())
    }

    #[test]
    fn test_scrollbars_follow_children() {
        let (mut tree, panel) = setup();
        let child = tree.add(panel, Button::new("x"), "x").unwrap();
        tree.set_size(child, (95.0, 50.0)).unwrap();
        assert_eq!(shown(&tree, panel), (false, false));

        tree.set_size(child, (95.0, 150.0)).unwrap();
        assert_eq!(shown(&tree, panel), (true, true));

        tree.set_size(child, (50.0, 150.0)).unwrap();
        assert_eq!(shown(&tree, panel), (false, true));

        tree.set_visible(child, false).unwrap();
        assert_eq!(shown(&tree, panel), (false, false));
    }

    #[test]
    fn test_wheel_scrolls_child_area() {
        let (mut tree, panel) = setup();
        let child = tree.add(panel, Button::new("x"), "x").unwrap();
        tree.set_size(child, (50.0, 300.0)).unwrap();

        let root = tree.root();
        assert!(tree.process_mouse_wheel(root, -1.0, Vector2f::new(20.0, 20.0)));
        let scroll = tree.widget::<ScrollablePanel>(panel).unwrap().scroll_position();
        assert_eq!(scroll, Vector2f::new(0.0, 20.0));
        assert_eq!(tree.absolute_position(child).unwrap(), Vector2f::new(0.0, -20.0));
        assert_eq!(tree.widget_at_position(Vector2f::new(20.0, 90.0)), Some(child));
        // Scrolling never changes the child's own position.
        assert_eq!(tree.core(child).unwrap().position(), Vector2f::ZERO);
    }

    #[test]
    fn test_explicit_content_size() {
        let (mut tree, panel) = setup();
        tree.update(panel, |p: &mut ScrollablePanel, ctx| {
            p.set_content_size(Some(Vector2f::new(300.0, 50.0)), ctx)
        })
        .unwrap();
        assert_eq!(shown(&tree, panel), (true, false));
        let p = tree.widget::<ScrollablePanel>(panel).unwrap();
        assert_eq!(p.viewport_size(), Vector2f::new(100.0, 90.0));
    }
}

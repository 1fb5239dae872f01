//! Scrollbars.
//!
//! [`ScrollbarModel`] is the value/viewport/content model shared by the
//! stand-alone [`Scrollbar`] widget and the internal scrollbars of
//! `ScrollablePanel`, `ListView` and `TextArea`. The value is always clamped
//! to `[0, max(0, content - viewport)]`.
//!
//! Whether a pair of scrollbars is shown is decided by
//! [`scrollbar_visibility`], which runs a fixed number of passes so that a
//! scrollbar appearing (and eating into the viewport of the other axis) can
//! never make the decision oscillate.

use horizon_trellis_core::{PropertyError, PropertyMap, PropertyValue, SignalSpec};
use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part};
use crate::widget::{signals, MouseRouting, Widget, WidgetCore, WidgetCtx, WidgetKind};

/// Default thickness of the scrollbars inside scrollable widgets.
pub const DEFAULT_SCROLLBAR_WIDTH: f32 = 16.0;

/// Minimum length of a scrollbar thumb.
const MIN_THUMB_LENGTH: f32 = 8.0;

/// When a scrollbar is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScrollbarPolicy {
    /// Only while the content does not fit.
    #[default]
    Automatic,
    /// Always, even when there is nothing to scroll.
    Always,
    /// Never; the content can still be scrolled from code or with the wheel.
    Never,
}

impl ScrollbarPolicy {
    /// Whether a scrollbar with this policy shows for the given lengths.
    pub fn shows(self, content: f32, viewport: f32) -> bool {
        match self {
            Self::Automatic => content > viewport,
            Self::Always => true,
            Self::Never => false,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Automatic => "Automatic",
            Self::Always => "Always",
            Self::Never => "Never",
        }
    }

    pub(crate) fn parse(name: &str, value: &str) -> Result<Self, PropertyError> {
        [Self::Automatic, Self::Always, Self::Never]
            .into_iter()
            .find(|policy| policy.name().eq_ignore_ascii_case(value))
            .ok_or(PropertyError::TypeMismatch {
                name: name.to_string(),
                expected: "Automatic, Always or Never",
                got: "text",
            })
    }
}

/// Outcome of [`scrollbar_visibility`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarLayout {
    /// Whether the horizontal scrollbar shows.
    pub horizontal: bool,
    /// Whether the vertical scrollbar shows.
    pub vertical: bool,
    /// The area left for the content.
    pub viewport: Vector2f,
}

/// Decide which of two scrollbars show when each one takes `thickness`
/// away from the other axis.
///
/// Three passes: horizontal against the full width, vertical against the
/// height left by the horizontal bar, and once more horizontal when the
/// vertical bar took width away.
pub fn scrollbar_visibility(
    content: Vector2f,
    area: Vector2f,
    thickness: f32,
    horizontal_policy: ScrollbarPolicy,
    vertical_policy: ScrollbarPolicy,
) -> ScrollbarLayout {
    let mut horizontal = horizontal_policy.shows(content.x, area.x);
    let available_height = area.y - if horizontal { thickness } else { 0.0 };
    let vertical = vertical_policy.shows(content.y, available_height);
    if vertical && !horizontal {
        horizontal = horizontal_policy.shows(content.x, area.x - thickness);
    }
    let viewport = Vector2f::new(
        area.x - if vertical { thickness } else { 0.0 },
        area.y - if horizontal { thickness } else { 0.0 },
    )
    .max(Vector2f::ZERO);
    ScrollbarLayout {
        horizontal,
        vertical,
        viewport,
    }
}

/// Where a scrollbar sits inside its owner, in the owner's local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarGeometry {
    /// Bounds of the whole scrollbar, arrows included.
    pub rect: Rect,
    /// Whether the bar runs top to bottom.
    pub vertical: bool,
}

impl ScrollbarGeometry {
    /// Geometry for a stand-alone bar; the orientation follows the longer side.
    pub fn for_size(size: Vector2f) -> Self {
        Self {
            rect: Rect::from_origin_size(Vector2f::ZERO, size),
            vertical: size.y >= size.x,
        }
    }

    fn along(&self, v: Vector2f) -> f32 {
        if self.vertical { v.y } else { v.x }
    }

    fn thickness(&self) -> f32 {
        if self.vertical { self.rect.size.x } else { self.rect.size.y }
    }

    fn length(&self) -> f32 {
        self.along(self.rect.size)
    }

    fn arrow_length(&self) -> f32 {
        self.thickness().min(self.length() / 2.0)
    }

    fn track_length(&self) -> f32 {
        (self.length() - 2.0 * self.arrow_length()).max(0.0)
    }

    fn segment(&self, start: f32, length: f32) -> Rect {
        let origin = self.rect.origin;
        if self.vertical {
            Rect::new(origin.x, origin.y + start, self.rect.size.x, length)
        } else {
            Rect::new(origin.x + start, origin.y, length, self.rect.size.y)
        }
    }
}

/// Scroll state along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollbarModel {
    value: f32,
    viewport_size: f32,
    content_size: f32,
    scroll_amount: f32,
    policy: ScrollbarPolicy,
    drag_offset: Option<f32>,
}

impl Default for ScrollbarModel {
    fn default() -> Self {
        Self {
            value: 0.0,
            viewport_size: 0.0,
            content_size: 0.0,
            scroll_amount: 20.0,
            policy: ScrollbarPolicy::Automatic,
            drag_offset: None,
        }
    }
}

impl ScrollbarModel {
    /// An empty model with the automatic policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scroll offset.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Largest valid value.
    pub fn maximum_value(&self) -> f32 {
        (self.content_size - self.viewport_size).max(0.0)
    }

    /// Set the scroll offset, clamped. Returns whether it changed.
    pub fn set_value(&mut self, value: f32) -> bool {
        let value = value.clamp(0.0, self.maximum_value());
        if value == self.value {
            return false;
        }
        self.value = value;
        true
    }

    /// Visible length.
    pub fn viewport_size(&self) -> f32 {
        self.viewport_size
    }

    /// Change the visible length. Returns whether the value had to move.
    pub fn set_viewport_size(&mut self, size: f32) -> bool {
        self.viewport_size = size.max(0.0);
        self.set_value(self.value)
    }

    /// Total length of the content.
    pub fn content_size(&self) -> f32 {
        self.content_size
    }

    /// Change the content length. Returns whether the value had to move.
    pub fn set_content_size(&mut self, size: f32) -> bool {
        self.content_size = size.max(0.0);
        self.set_value(self.value)
    }

    /// Distance scrolled per arrow click or wheel tick.
    pub fn scroll_amount(&self) -> f32 {
        self.scroll_amount
    }

    /// Change the distance scrolled per arrow click or wheel tick.
    pub fn set_scroll_amount(&mut self, amount: f32) {
        self.scroll_amount = amount.max(0.0);
    }

    /// The show policy.
    pub fn policy(&self) -> ScrollbarPolicy {
        self.policy
    }

    /// Change the show policy.
    pub fn set_policy(&mut self, policy: ScrollbarPolicy) {
        self.policy = policy;
    }

    /// Whether the bar shows under its policy.
    pub fn is_shown(&self) -> bool {
        self.policy.shows(self.content_size, self.viewport_size)
    }

    /// Scroll by wheel ticks, positive towards the start. Returns whether
    /// the value changed.
    pub fn scroll_by(&mut self, ticks: f32) -> bool {
        self.set_value(self.value - ticks * self.scroll_amount)
    }

    /// Whether the thumb is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    /// Start and length of the thumb on a track.
    pub fn thumb_span(&self, track: f32) -> (f32, f32) {
        if self.content_size <= self.viewport_size || self.content_size <= 0.0 {
            return (0.0, track);
        }
        let length = (track * self.viewport_size / self.content_size)
            .max(MIN_THUMB_LENGTH)
            .min(track);
        let maximum = self.maximum_value();
        let start = if maximum > 0.0 {
            (track - length) * self.value / maximum
        } else {
            0.0
        };
        (start, length)
    }

    fn value_for_thumb_start(&self, track: f32, start: f32) -> f32 {
        let (_, length) = self.thumb_span(track);
        let free = track - length;
        if free <= 0.0 {
            return 0.0;
        }
        start / free * self.maximum_value()
    }

    /// Handle a press at `pos`: arrows step, the track pages, the thumb
    /// starts a drag. Returns whether the value changed.
    pub fn press(&mut self, geometry: &ScrollbarGeometry, pos: Vector2f) -> bool {
        let along = geometry.along(pos - geometry.rect.origin);
        let arrow = geometry.arrow_length();
        if along < arrow {
            return self.set_value(self.value - self.scroll_amount);
        }
        if along >= geometry.length() - arrow {
            return self.set_value(self.value + self.scroll_amount);
        }
        let on_track = along - arrow;
        let (start, length) = self.thumb_span(geometry.track_length());
        if on_track < start {
            self.set_value(self.value - self.viewport_size)
        } else if on_track >= start + length {
            self.set_value(self.value + self.viewport_size)
        } else {
            self.drag_offset = Some(on_track - start);
            false
        }
    }

    /// Follow the pointer while dragging. Returns whether the value changed.
    pub fn drag(&mut self, geometry: &ScrollbarGeometry, pos: Vector2f) -> bool {
        let Some(offset) = self.drag_offset else {
            return false;
        };
        let along = geometry.along(pos - geometry.rect.origin) - geometry.arrow_length();
        let value = self.value_for_thumb_start(geometry.track_length(), along - offset);
        self.set_value(value)
    }

    /// End a drag.
    pub fn release(&mut self) {
        self.drag_offset = None;
    }

    /// Push the track and thumb parts.
    pub fn draw(&self, geometry: &ScrollbarGeometry, list: &mut DrawList) {
        let arrow = geometry.arrow_length();
        let track = geometry.track_length();
        list.push(Part::Track, geometry.rect);
        list.push(Part::Arrow, geometry.segment(0.0, arrow));
        list.push(Part::Arrow, geometry.segment(arrow + track, arrow));
        let (start, length) = self.thumb_span(track);
        list.push(Part::Thumb, geometry.segment(arrow + start, length));
    }
}

/// A stand-alone scrollbar.
///
/// Vertical when taller than wide. Emits `ValueChanged(f32)`.
#[derive(Debug, Clone, Default)]
pub struct Scrollbar {
    model: ScrollbarModel,
}

impl Scrollbar {
    /// A scrollbar with nothing to scroll.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style content and viewport lengths.
    pub fn with_sizes(mut self, content: f32, viewport: f32) -> Self {
        self.model.set_content_size(content);
        self.model.set_viewport_size(viewport);
        self
    }

    /// The scroll model.
    pub fn model(&self) -> &ScrollbarModel {
        &self.model
    }

    /// Current value.
    pub fn value(&self) -> f32 {
        self.model.value()
    }

    /// Set the value, clamped, emitting `ValueChanged` on change.
    pub fn set_value(&mut self, value: f32, ctx: &mut WidgetCtx<'_>) {
        if self.model.set_value(value) {
            self.value_changed(ctx);
        }
    }

    /// Change the content length.
    pub fn set_content_size(&mut self, size: f32, ctx: &mut WidgetCtx<'_>) {
        if self.model.set_content_size(size) {
            self.value_changed(ctx);
        }
    }

    /// Change the visible length.
    pub fn set_viewport_size(&mut self, size: f32, ctx: &mut WidgetCtx<'_>) {
        if self.model.set_viewport_size(size) {
            self.value_changed(ctx);
        }
    }

    /// Change the show policy.
    pub fn set_policy(&mut self, policy: ScrollbarPolicy) {
        self.model.set_policy(policy);
    }

    /// Change the distance scrolled per step.
    pub fn set_scroll_amount(&mut self, amount: f32) {
        self.model.set_scroll_amount(amount);
    }

    fn value_changed(&self, ctx: &WidgetCtx<'_>) {
        ctx.emit_value(signals::VALUE_CHANGED, self.model.value());
    }
}

impl Widget for Scrollbar {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Scrollbar
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::VALUED
    }

    fn default_size(&self) -> Vector2f {
        Vector2f::new(DEFAULT_SCROLLBAR_WIDTH, 160.0)
    }

    fn can_gain_focus(&self) -> bool {
        false
    }

    fn is_draggable(&self) -> bool {
        true
    }

    fn is_mouse_on_widget(&self, pos: Vector2f, size: Vector2f) -> bool {
        self.model.is_shown() && Rect::from_origin_size(Vector2f::ZERO, size).contains(pos)
    }

    fn left_mouse_pressed(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        let geometry = ScrollbarGeometry::for_size(ctx.core().size());
        if self.model.press(&geometry, pos) {
            self.value_changed(ctx);
        }
        MouseRouting::Consumed
    }

    fn mouse_moved(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        let geometry = ScrollbarGeometry::for_size(ctx.core().size());
        if ctx.core().is_mouse_down() && self.model.drag(&geometry, pos) {
            self.value_changed(ctx);
        }
        MouseRouting::Consumed
    }

    fn left_mouse_button_no_longer_down(&mut self, _ctx: &mut WidgetCtx<'_>) {
        self.model.release();
    }

    fn mouse_wheel_scrolled(&mut self, delta: f32, _pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> bool {
        if self.model.scroll_by(delta) {
            self.value_changed(ctx);
            return true;
        }
        false
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        if self.model.is_shown() {
            self.model.draw(&ScrollbarGeometry::for_size(core.size()), list);
        }
    }

    fn properties(&self, out: &mut PropertyMap) {
        out.insert("Value".into(), self.model.value().into());
        out.insert("ContentSize".into(), self.model.content_size().into());
        out.insert("ViewportSize".into(), self.model.viewport_size().into());
        out.insert("ScrollAmount".into(), self.model.scroll_amount().into());
        out.insert("Policy".into(), self.model.policy().name().into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        match name {
            "Value" => {
                self.model.set_value(value.as_number(name)?);
            }
            "ContentSize" => {
                self.model.set_content_size(value.as_number(name)?);
            }
            "ViewportSize" => {
                self.model.set_viewport_size(value.as_number(name)?);
            }
            "ScrollAmount" => self.model.set_scroll_amount(value.as_number(name)?),
            "Policy" => self.model.set_policy(ScrollbarPolicy::parse(name, value.as_text(name)?)?),
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::event::MouseButton;
    use crate::tree::WidgetTree;

    #[test]
    fn test_value_clamped_to_content() {
        let mut model = ScrollbarModel::new();
        model.set_viewport_size(100.0);
        model.set_content_size(250.0);
        assert!(model.set_value(1000.0));
        assert_eq!(model.value(), 150.0);
        assert!(model.set_viewport_size(200.0));
        assert_eq!(model.value(), 50.0);
        model.set_content_size(10.0);
        assert_eq!(model.value(), 0.0);
        assert!(!model.set_value(-5.0));
    }

    #[test]
    fn test_policy() {
        let mut model = ScrollbarModel::new();
        model.set_viewport_size(100.0);
        model.set_content_size(100.0);
        assert!(!model.is_shown());
        model.set_content_size(101.0);
        assert!(model.is_shown());
        model.set_policy(ScrollbarPolicy::Never);
        assert!(!model.is_shown());
        model.set_policy(ScrollbarPolicy::Always);
        model.set_content_size(0.0);
        assert!(model.is_shown());
    }

    #[test]
    fn test_visibility_converges() {
        let area = Vector2f::new(100.0, 100.0);
        let auto = ScrollbarPolicy::Automatic;
        // Fits exactly: nothing shows.
        let layout = scrollbar_visibility(Vector2f::new(100.0, 100.0), area, 10.0, auto, auto);
        assert!(!layout.horizontal && !layout.vertical);
        // Only the height overflows, but the vertical bar makes the width overflow too.
        let layout = scrollbar_visibility(Vector2f::new(95.0, 150.0), area, 10.0, auto, auto);
        assert!(layout.horizontal && layout.vertical);
        assert_eq!(layout.viewport, Vector2f::new(90.0, 90.0));
        // The horizontal bar makes the height overflow.
        let layout = scrollbar_visibility(Vector2f::new(150.0, 95.0), area, 10.0, auto, auto);
        assert!(layout.horizontal && layout.vertical);
        let layout = scrollbar_visibility(
            Vector2f::new(150.0, 95.0),
            area,
            10.0,
            auto,
            ScrollbarPolicy::Never,
        );
        assert!(layout.horizontal && !layout.vertical);
        assert_eq!(layout.viewport, Vector2f::new(100.0, 90.0));
    }

    #[test]
    fn test_widget_arrow_and_wheel() {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let bar = tree
            .add(tree.root(), Scrollbar::new().with_sizes(500.0, 100.0), "Bar")
            .unwrap();
        tree.set_size(bar, (16.0, 200.0)).unwrap();
        let values = Rc::new(RefCell::new(Vec::new()));
        let v = values.clone();
        tree.connect(bar, "ValueChanged", move |value: f32| v.borrow_mut().push(value)).unwrap();

        let root = tree.root();
        // Bottom arrow.
        tree.process_mouse_press(root, MouseButton::Left, Vector2f::new(8.0, 195.0));
        tree.process_mouse_release(root, MouseButton::Left, Vector2f::new(8.0, 195.0));
        // Wheel towards the start.
        tree.process_mouse_wheel(root, 1.0, Vector2f::new(8.0, 100.0));
        tree.process_mouse_wheel(root, 1.0, Vector2f::new(8.0, 100.0));
        assert_eq!(*values.borrow(), vec![20.0, 0.0]);
    }

    #[test]
    fn test_thumb_drag() {
        let mut model = ScrollbarModel::new();
        model.set_viewport_size(100.0);
        model.set_content_size(200.0);
        let geometry = ScrollbarGeometry::for_size(Vector2f::new(10.0, 120.0));
        // Track runs from 10 to 110, thumb is 50 long.
        assert!(!model.press(&geometry, Vector2f::new(5.0, 20.0)));
        assert!(model.is_dragging());
        assert!(model.drag(&geometry, Vector2f::new(5.0, 70.0)));
        assert_eq!(model.value(), 100.0);
        model.release();
        assert!(!model.drag(&geometry, Vector2f::new(5.0, 20.0)));
    }
}

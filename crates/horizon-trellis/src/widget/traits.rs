//! The widget behavior contract.

use std::any::Any;
use std::time::Duration;

use horizon_trellis_core::{ObjectId, PropertyError, PropertyMap, PropertyValue, SignalSpec, SignalTable};

use super::base::WidgetCore;
use super::kind::WidgetKind;
use crate::clipboard::Clipboard;
use crate::event::KeyEvent;
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part};
use crate::text::TextMeasure;
use crate::tree::Services;

/// What the tree should do with a mouse event after the widget's hook ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseRouting {
    /// The widget handled the event itself.
    Consumed,
    /// Forward the event to the children (containers only).
    Children,
}

/// A change only the tree can perform, queued by a widget hook.
///
/// Requests are applied in order after the hook returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TreeRequest {
    /// Move the widget to an absolute position.
    SetPosition(Vector2f),
    /// Resize the widget to an absolute size.
    SetSize(Vector2f),
    /// Raise the widget above its siblings.
    MoveToFront,
    /// Uncheck every sibling radio button.
    UncheckRadioSiblings,
    /// Hide the widget.
    Hide,
    /// Remove the widget from the tree.
    Close,
}

/// Access to the tree while a widget hook runs.
///
/// The widget's own [`WidgetCore`] is readable; changes that affect other
/// nodes are queued with [`request`](Self::request).
pub struct WidgetCtx<'a> {
    pub(crate) id: ObjectId,
    pub(crate) core: &'a WidgetCore,
    pub(crate) signals: &'a SignalTable,
    pub(crate) services: &'a mut Services,
    pub(crate) parent_size: Option<Vector2f>,
    pub(crate) requests: &'a mut Vec<TreeRequest>,
}

impl WidgetCtx<'_> {
    /// The widget's handle.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The widget's common state.
    pub fn core(&self) -> &WidgetCore {
        self.core
    }

    /// Inner size of the parent, if the widget has one.
    pub fn parent_size(&self) -> Option<Vector2f> {
        self.parent_size
    }

    /// Emit a signal that carries no value.
    pub fn emit(&self, signal: &str) {
        self.signals.emit(self.id, signal, None);
    }

    /// Emit a signal with a value.
    pub fn emit_value<T: Any>(&self, signal: &str, value: T) {
        self.signals.emit(self.id, signal, Some(&value));
    }

    /// Queue a change for the tree.
    pub fn request(&mut self, request: TreeRequest) {
        self.requests.push(request);
    }

    /// The clipboard.
    pub fn clipboard(&mut self) -> &mut dyn Clipboard {
        self.services.clipboard.as_mut()
    }

    /// Font metrics.
    pub fn measure(&self) -> &dyn TextMeasure {
        self.services.measure.as_ref()
    }

    /// The logical clock.
    pub fn clock(&self) -> Duration {
        self.services.clock
    }

    /// Maximum delay between the clicks of a double click.
    pub fn double_click_time(&self) -> Duration {
        self.services.double_click_time
    }

    /// Caret blink half-period for text widgets.
    pub fn caret_blink_interval(&self) -> Duration {
        self.services.caret_blink_interval
    }
}

/// Widget-specific behavior.
///
/// The tree performs the shared work (hit testing, hover and mouse-down
/// tracking, focus, common signals) and calls these hooks with positions in
/// the widget's local coordinates. Every hook has a default, so a widget only
/// implements what it reacts to.
pub trait Widget: Any {
    /// The concrete widget kind.
    fn kind(&self) -> WidgetKind;

    /// The signals this widget can emit.
    fn signals(&self) -> &'static [SignalSpec];

    /// Size given to a newly added widget until a size layout is set.
    fn default_size(&self) -> Vector2f {
        Vector2f::new(100.0, 24.0)
    }

    /// Whether this kind of widget takes keyboard focus.
    fn can_gain_focus(&self) -> bool {
        true
    }

    /// Whether the node owns children.
    fn is_container(&self) -> bool {
        false
    }

    /// Whether tab traversal wraps around inside this container instead of
    /// continuing in the parent.
    fn isolated_focus(&self) -> bool {
        false
    }

    /// Whether mouse moves keep coming while the left button is held, even
    /// outside the widget.
    fn is_draggable(&self) -> bool {
        false
    }

    /// Offset of the child area inside the widget (title bar, borders,
    /// scroll position).
    fn child_offset(&self) -> Vector2f {
        Vector2f::ZERO
    }

    /// Size of the child area for a given outer size.
    fn inner_size(&self, size: Vector2f) -> Vector2f {
        size
    }

    /// Whether a local point lies on the widget.
    fn is_mouse_on_widget(&self, pos: Vector2f, size: Vector2f) -> bool {
        Rect::from_origin_size(Vector2f::ZERO, size).contains(pos)
    }

    /// Left button went down on the widget.
    fn left_mouse_pressed(&mut self, _pos: Vector2f, _ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if self.is_container() {
            MouseRouting::Children
        } else {
            MouseRouting::Consumed
        }
    }

    /// Left button went up on the widget.
    fn left_mouse_released(&mut self, _pos: Vector2f, _ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if self.is_container() {
            MouseRouting::Children
        } else {
            MouseRouting::Consumed
        }
    }

    /// Right button went down on the widget.
    fn right_mouse_pressed(&mut self, _pos: Vector2f, _ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if self.is_container() {
            MouseRouting::Children
        } else {
            MouseRouting::Consumed
        }
    }

    /// Right button went up on the widget.
    fn right_mouse_released(&mut self, _pos: Vector2f, _ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if self.is_container() {
            MouseRouting::Children
        } else {
            MouseRouting::Consumed
        }
    }

    /// The pointer moved over the widget (or anywhere, while captured).
    fn mouse_moved(&mut self, _pos: Vector2f, _ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if self.is_container() {
            MouseRouting::Children
        } else {
            MouseRouting::Consumed
        }
    }

    /// The wheel turned over the widget. Returns whether it was used.
    fn mouse_wheel_scrolled(&mut self, _delta: f32, _pos: Vector2f, _ctx: &mut WidgetCtx<'_>) -> bool {
        false
    }

    /// The left button was released, wherever the pointer is.
    fn left_mouse_button_no_longer_down(&mut self, _ctx: &mut WidgetCtx<'_>) {}

    /// The right button was released, wherever the pointer is.
    fn right_mouse_button_no_longer_down(&mut self, _ctx: &mut WidgetCtx<'_>) {}

    /// The pointer left the widget.
    fn mouse_no_longer_on_widget(&mut self, _ctx: &mut WidgetCtx<'_>) {}

    /// A key went down while the widget had focus. Returns whether it was used.
    fn key_pressed(&mut self, _event: &KeyEvent, _ctx: &mut WidgetCtx<'_>) -> bool {
        false
    }

    /// A printable character was typed while the widget had focus.
    fn text_entered(&mut self, _c: char, _ctx: &mut WidgetCtx<'_>) -> bool {
        false
    }

    /// The widget gained or lost focus.
    fn focus_changed(&mut self, _focused: bool, _ctx: &mut WidgetCtx<'_>) {}

    /// The resolved size changed.
    fn size_changed(&mut self, _size: Vector2f, _ctx: &mut WidgetCtx<'_>) {}

    /// The bounding box of the children changed (containers only).
    fn content_changed(&mut self, _content_size: Vector2f, _ctx: &mut WidgetCtx<'_>) {}

    /// The logical clock advanced. Returns whether a redraw is needed.
    fn update_time(&mut self, _elapsed: Duration, _ctx: &mut WidgetCtx<'_>) -> bool {
        false
    }

    /// Describe the widget's visual parts in local coordinates.
    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        list.push(Part::Background, Rect::from_origin_size(Vector2f::ZERO, core.size()));
    }

    /// Write the widget-specific persisted properties.
    fn properties(&self, _out: &mut PropertyMap) {}

    /// Apply one widget-specific property.
    fn set_property(&mut self, name: &str, _value: &PropertyValue) -> Result<(), PropertyError> {
        Err(PropertyError::unknown(name))
    }
}

//! Value sliders.
//!
//! [`RangeModel`] holds the limits, step and value shared by [`Slider`],
//! `RangeSlider` and `EditBoxSlider`. It keeps `minimum <= value <= maximum`
//! at all times: raising the minimum above the maximum raises the maximum,
//! lowering the maximum below the minimum lowers the minimum, and values are
//! rounded to the step and clamped rather than rejected.

use horizon_trellis_core::{PropertyError, PropertyMap, PropertyValue, SignalSpec};
use serde::{Deserialize, Serialize};

use crate::event::{Key, KeyEvent};
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part};
use crate::widget::{signals, MouseRouting, Widget, WidgetCore, WidgetCtx, WidgetKind};

/// Limits, step and current value of a slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeModel {
    minimum: f32,
    maximum: f32,
    step: f32,
    value: f32,
}

impl Default for RangeModel {
    fn default() -> Self {
        Self {
            minimum: 0.0,
            maximum: 10.0,
            step: 1.0,
            value: 0.0,
        }
    }
}

impl RangeModel {
    /// A model over `[minimum, maximum]` with step 1, valued at the minimum.
    pub fn new(minimum: f32, maximum: f32) -> Self {
        let mut model = Self::default();
        model.set_maximum(maximum);
        model.set_minimum(minimum);
        model.set_value(minimum);
        model
    }

    /// Lower limit.
    pub fn minimum(&self) -> f32 {
        self.minimum
    }

    /// Upper limit.
    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    /// Rounding step, 0 for continuous values.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Current value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Change the lower limit. Returns whether the value moved.
    pub fn set_minimum(&mut self, minimum: f32) -> bool {
        self.minimum = minimum;
        if self.maximum < minimum {
            self.maximum = minimum;
        }
        self.value < minimum && self.set_value(minimum)
    }

    /// Change the upper limit. Returns whether the value moved.
    pub fn set_maximum(&mut self, maximum: f32) -> bool {
        self.maximum = maximum;
        let mut moved = false;
        if self.minimum > maximum {
            moved = self.set_minimum(maximum);
        }
        if self.value > maximum {
            moved |= self.set_value(maximum);
        }
        moved
    }

    /// Change the step. The current value is kept as is.
    pub fn set_step(&mut self, step: f32) {
        self.step = step.max(0.0);
    }

    /// Round a value to the step and clamp it to the limits.
    pub fn snap(&self, value: f32) -> f32 {
        let value = if self.step > 0.0 {
            self.minimum + ((value - self.minimum) / self.step).round() * self.step
        } else {
            value
        };
        value.clamp(self.minimum, self.maximum)
    }

    /// Set the value, snapped. Returns whether it changed.
    pub fn set_value(&mut self, value: f32) -> bool {
        let value = self.snap(value);
        if value == self.value {
            return false;
        }
        self.value = value;
        true
    }

    /// Position of a value between the limits, from 0 to 1.
    pub fn fraction_of(&self, value: f32) -> f32 {
        let span = self.maximum - self.minimum;
        if span <= 0.0 {
            0.0
        } else {
            (value - self.minimum) / span
        }
    }

    /// The unsnapped value at a fraction of the range.
    pub fn value_at(&self, fraction: f32) -> f32 {
        self.minimum + fraction * (self.maximum - self.minimum)
    }

    /// Distance moved by one key press or wheel tick.
    pub fn key_step(&self) -> f32 {
        if self.step > 0.0 { self.step } else { 1.0 }
    }
}

/// Track and thumb geometry of a slider in its local coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SliderTrack {
    size: Vector2f,
    vertical: bool,
    inverted: bool,
}

impl SliderTrack {
    /// Vertical when taller than wide. Vertical sliders grow upwards.
    pub(crate) fn new(size: Vector2f, inverted: bool) -> Self {
        Self {
            size,
            vertical: size.y > size.x,
            inverted,
        }
    }

    fn thumb_length(&self) -> f32 {
        if self.vertical { self.size.x / 2.0 } else { self.size.y / 2.0 }
    }

    fn length(&self) -> f32 {
        if self.vertical { self.size.y } else { self.size.x }
    }

    fn grows_forward(&self) -> bool {
        // Horizontal sliders grow to the right, vertical ones upwards.
        self.vertical == self.inverted
    }

    /// Fraction of the range under a local position.
    pub(crate) fn fraction_at(&self, pos: Vector2f) -> f32 {
        let free = self.length() - self.thumb_length();
        if free <= 0.0 {
            return 0.0;
        }
        let along = if self.vertical { pos.y } else { pos.x };
        let fraction = ((along - self.thumb_length() / 2.0) / free).clamp(0.0, 1.0);
        if self.grows_forward() { fraction } else { 1.0 - fraction }
    }

    /// Bounds of a thumb at a fraction of the range.
    pub(crate) fn thumb_rect(&self, fraction: f32) -> Rect {
        let fraction = if self.grows_forward() { fraction } else { 1.0 - fraction };
        let thumb = self.thumb_length();
        let start = (self.length() - thumb).max(0.0) * fraction;
        if self.vertical {
            Rect::new(0.0, start, self.size.x, thumb)
        } else {
            Rect::new(start, 0.0, thumb, self.size.y)
        }
    }

    /// The whole track.
    pub(crate) fn rect(&self) -> Rect {
        Rect::from_origin_size(Vector2f::ZERO, self.size)
    }
}

/// Direction a key moves a slider, if it is a slider key.
pub(crate) fn key_direction(key: Key) -> Option<f32> {
    match key {
        Key::ArrowRight | Key::ArrowUp => Some(1.0),
        Key::ArrowLeft | Key::ArrowDown => Some(-1.0),
        _ => None,
    }
}

/// Wheel ticks to a value delta: small deltas move one step, larger ones
/// move a whole number of steps.
pub(crate) fn wheel_delta(model: &RangeModel, delta: f32) -> f32 {
    if model.step() <= 0.0 {
        delta
    } else if delta.abs() <= 1.0 {
        model.step() * delta.signum()
    } else {
        delta.round() * model.step()
    }
}

/// A thumb on a track selecting one value.
///
/// Emits `ValueChanged(f32)`.
#[derive(Debug, Clone)]
pub struct Slider {
    range: RangeModel,
    inverted: bool,
    change_value_on_scroll: bool,
}

impl Default for Slider {
    fn default() -> Self {
        Self::new()
    }
}

impl Slider {
    /// A slider from 0 to 10 with step 1.
    pub fn new() -> Self {
        Self {
            range: RangeModel::default(),
            inverted: false,
            change_value_on_scroll: true,
        }
    }

    /// Builder-style limits.
    pub fn with_range(mut self, minimum: f32, maximum: f32) -> Self {
        self.range.set_maximum(maximum);
        self.range.set_minimum(minimum);
        self
    }

    /// Builder-style step.
    pub fn with_step(mut self, step: f32) -> Self {
        self.range.set_step(step);
        self
    }

    /// Builder-style value.
    pub fn with_value(mut self, value: f32) -> Self {
        self.range.set_value(value);
        self
    }

    /// The limits and value.
    pub fn range(&self) -> &RangeModel {
        &self.range
    }

    /// Current value.
    pub fn value(&self) -> f32 {
        self.range.value()
    }

    /// Lower limit.
    pub fn minimum(&self) -> f32 {
        self.range.minimum()
    }

    /// Upper limit.
    pub fn maximum(&self) -> f32 {
        self.range.maximum()
    }

    /// Set the value, snapped to the step and limits.
    pub fn set_value(&mut self, value: f32, ctx: &mut WidgetCtx<'_>) {
        if self.range.set_value(value) {
            self.value_changed(ctx);
        }
    }

    /// Change the lower limit; the value follows when it falls outside.
    pub fn set_minimum(&mut self, minimum: f32, ctx: &mut WidgetCtx<'_>) {
        if self.range.set_minimum(minimum) {
            self.value_changed(ctx);
        }
    }

    /// Change the upper limit; the value follows when it falls outside.
    pub fn set_maximum(&mut self, maximum: f32, ctx: &mut WidgetCtx<'_>) {
        if self.range.set_maximum(maximum) {
            self.value_changed(ctx);
        }
    }

    /// Change the rounding step.
    pub fn set_step(&mut self, step: f32) {
        self.range.set_step(step);
    }

    /// Swap the direction in which the value grows.
    pub fn set_inverted_direction(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    /// Whether the wheel changes the value.
    pub fn set_change_value_on_scroll(&mut self, enabled: bool) {
        self.change_value_on_scroll = enabled;
    }

    fn value_changed(&self, ctx: &WidgetCtx<'_>) {
        ctx.emit_value(signals::VALUE_CHANGED, self.range.value());
    }

    fn follow_pointer(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) {
        let track = SliderTrack::new(ctx.core().size(), self.inverted);
        let value = self.range.value_at(track.fraction_at(pos));
        self.set_value(value, ctx);
    }
}

impl Widget for Slider {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Slider
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::VALUED
    }

    fn default_size(&self) -> Vector2f {
        Vector2f::new(200.0, 16.0)
    }

    fn is_draggable(&self) -> bool {
        true
    }

    fn left_mouse_pressed(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        self.follow_pointer(pos, ctx);
        MouseRouting::Consumed
    }

    fn mouse_moved(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if ctx.core().is_mouse_down() {
            self.follow_pointer(pos, ctx);
        }
        MouseRouting::Consumed
    }

    fn mouse_wheel_scrolled(&mut self, delta: f32, _pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> bool {
        if !self.change_value_on_scroll {
            return false;
        }
        let delta = if self.inverted { -delta } else { delta };
        let value = self.range.value() + wheel_delta(&self.range, delta);
        self.set_value(value, ctx);
        true
    }

    fn key_pressed(&mut self, event: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
        let value = match event.key {
            Key::Home => self.range.minimum(),
            Key::End => self.range.maximum(),
            key => match key_direction(key) {
                Some(direction) => self.range.value() + direction * self.range.key_step(),
                None => return false,
            },
        };
        self.set_value(value, ctx);
        true
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        let track = SliderTrack::new(core.size(), self.inverted);
        list.push(Part::Background, track.rect());
        list.push(Part::Track, track.rect());
        list.push(Part::Thumb, track.thumb_rect(self.range.fraction_of(self.range.value())));
    }

    fn properties(&self, out: &mut PropertyMap) {
        out.insert("Minimum".into(), self.range.minimum().into());
        out.insert("Maximum".into(), self.range.maximum().into());
        out.insert("Value".into(), self.range.value().into());
        out.insert("Step".into(), self.range.step().into());
        out.insert("InvertedDirection".into(), self.inverted.into());
        out.insert("ChangeValueOnScroll".into(), self.change_value_on_scroll.into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        match name {
            "Minimum" => {
                self.range.set_minimum(value.as_number(name)?);
            }
            "Maximum" => {
                self.range.set_maximum(value.as_number(name)?);
            }
            "Value" => {
                self.range.set_value(value.as_number(name)?);
            }
            "Step" => self.range.set_step(value.as_number(name)?),
            "InvertedDirection" => self.inverted = value.as_bool(name)?,
            "ChangeValueOnScroll" => self.change_value_on_scroll = value.as_bool(name)?,
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
    fn test_range_invariants() {
        let mut range = RangeModel::new(0.0, 10.0);
        range.set_value(5.0);
        assert!(range.set_minimum(7.0));
        assert_eq!(range.value(), 7.0);
        assert!(range.set_maximum(6.0));
        assert_eq!((range.minimum(), range.maximum(), range.value()), (6.0, 6.0, 6.0));
        range.set_minimum(20.0);
        assert_eq!((range.minimum(), range.maximum(), range.value()), (20.0, 20.0, 20.0));
    }

    #[test]
    fn test_values_round_to_step() {
        let mut range = RangeModel::new(1.0, 11.0);
        range.set_step(2.0);
        range.set_value(4.2);
        assert_eq!(range.value(), 5.0);
        range.set_value(100.0);
        assert_eq!(range.value(), 11.0);
        range.set_step(0.0);
        range.set_value(4.2);
        assert_eq!(range.value(), 4.2);
    }

    #[test]
    fn test_drag_sets_value() {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let slider = tree.add(tree.root(), Slider::new(), "Slider").unwrap();
        // 216 wide: the thumb is 8 wide, leaving 208 of travel.
        tree.set_size(slider, (216.0, 16.0)).unwrap();
        let values = Rc::new(RefCell::new(Vec::new()));
        let v = values.clone();
        tree.connect(slider, "ValueChanged", move |value: f32| v.borrow_mut().push(value)).unwrap();

        let root = tree.root();
        tree.process_mouse_press(root, MouseButton::Left, Vector2f::new(108.0, 8.0));
        // Dragging continues outside the widget.
        tree.process_mouse_move(root, Vector2f::new(500.0, 100.0));
        tree.process_mouse_release(root, MouseButton::Left, Vector2f::new(500.0, 100.0));
        tree.process_mouse_move(root, Vector2f::new(0.0, 8.0));
        assert_eq!(*values.borrow(), vec![5.0, 10.0]);
    }

    #[test]
    fn test_keys_and_wheel() {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let slider = tree.add(tree.root(), Slider::new(), "Slider").unwrap();
        tree.set_focused(slider, true).unwrap();
        let root = tree.root();
        tree.process_key_press(root, &KeyEvent::new(Key::ArrowRight));
        tree.process_key_press(root, &KeyEvent::new(Key::ArrowUp));
        assert_eq!(tree.widget::<Slider>(slider).unwrap().value(), 2.0);
        tree.process_key_press(root, &KeyEvent::new(Key::End));
        tree.process_mouse_wheel(root, -3.0, Vector2f::new(10.0, 8.0));
        assert_eq!(tree.widget::<Slider>(slider).unwrap().value(), 7.0);
    }

    #[test]
    fn test_vertical_grows_upwards() {
        let track = SliderTrack::new(Vector2f::new(16.0, 108.0), false);
        // Thumb is 8 long, 100 of travel.
        assert_eq!(track.fraction_at(Vector2f::new(8.0, 104.0)), 0.0);
        assert_eq!(track.fraction_at(Vector2f::new(8.0, 4.0)), 1.0);
        assert_eq!(track.thumb_rect(1.0), Rect::new(0.0, 0.0, 16.0, 8.0));
    }
}

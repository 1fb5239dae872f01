//! A numeric edit box with a slider underneath.

use std::time::Duration;

use horizon_trellis_core::{PropertyError, PropertyMap, PropertyValue, SignalSpec};

use super::button::DEFAULT_TEXT_SIZE;
use super::edit_box::{edit_key, CaretBlink, EditOutcome, InputValidator, CARET_WIDTH, TEXT_PADDING};
use super::slider::{wheel_delta, RangeModel, SliderTrack};
use crate::event::{Key, KeyEvent};
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part};
use crate::text::TextBuffer;
use crate::widget::{signals, MouseRouting, Widget, WidgetCore, WidgetCtx, WidgetKind};

/// Share of the height taken by the slider.
const SLIDER_SHARE: f32 = 0.3;

/// A value that can be typed or dragged.
///
/// The text always shows the value with `decimal_places` decimals. Typed text
/// is applied on Enter or when focus leaves; text that does not parse is
/// replaced by the current value. Emits `ValueChanged`.
#[derive(Debug, Clone)]
pub struct EditBoxSlider {
    range: RangeModel,
    decimal_places: usize,
    buffer: TextBuffer,
    text_size: f32,
    blink: CaretBlink,
    dragging: bool,
    caret_x: f32,
}

impl Default for EditBoxSlider {
    fn default() -> Self {
        Self::new()
    }
}

impl EditBoxSlider {
    /// Range 0 to 10, value 0.
    pub fn new() -> Self {
        let mut slider = Self {
            range: RangeModel::default(),
            decimal_places: 0,
            buffer: TextBuffer::new(),
            text_size: DEFAULT_TEXT_SIZE,
            blink: CaretBlink::default(),
            dragging: false,
            caret_x: 0.0,
        };
        slider.sync_text();
        slider
    }

    /// Builder-style limits.
    pub fn with_range(mut self, minimum: f32, maximum: f32) -> Self {
        self.range = RangeModel::new(minimum, maximum);
        self.sync_text();
        self
    }

    /// Builder-style step.
    pub fn with_step(mut self, step: f32) -> Self {
        self.range.set_step(step);
        self
    }

    /// Builder-style decimals.
    pub fn with_decimal_places(mut self, places: usize) -> Self {
        self.decimal_places = places;
        self.sync_text();
        self
    }

    /// The limits, step and value.
    pub fn range(&self) -> &RangeModel {
        &self.range
    }

    /// The value.
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

    /// The text currently in the edit field.
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Number of decimals shown.
    pub fn decimal_places(&self) -> usize {
        self.decimal_places
    }

    /// Change the number of decimals shown.
    pub fn set_decimal_places(&mut self, places: usize) {
        self.decimal_places = places;
        self.sync_text();
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

    fn value_changed(&mut self, ctx: &mut WidgetCtx<'_>) {
        self.sync_text();
        self.refresh_caret(ctx);
        ctx.emit_value(signals::VALUE_CHANGED, self.range.value());
    }

    fn sync_text(&mut self) {
        let text = format!("{:.*}", self.decimal_places, self.range.value());
        self.buffer.set_text(&text);
    }

    /// Parse the typed text. The text is reset to the value either way.
    fn commit(&mut self, ctx: &mut WidgetCtx<'_>) {
        match self.buffer.text().trim().parse::<f32>() {
            Ok(value) if value.is_finite() && self.range.set_value(value) => self.value_changed(ctx),
            _ => {
                self.sync_text();
                self.refresh_caret(ctx);
            }
        }
    }

    fn split(size: Vector2f) -> (Rect, Rect) {
        let slider_height = size.y * SLIDER_SHARE;
        (
            Rect::new(0.0, 0.0, size.x, size.y - slider_height),
            Rect::new(0.0, size.y - slider_height, size.x, slider_height),
        )
    }

    fn follow_pointer(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) {
        let (_, slider) = Self::split(ctx.core().size());
        let track = SliderTrack::new(slider.size, false);
        let value = self.range.value_at(track.fraction_at(pos - slider.origin));
        self.set_value(value, ctx);
    }

    fn refresh_caret(&mut self, ctx: &WidgetCtx<'_>) {
        let text = &self.buffer.text()[..self.buffer.caret()];
        self.caret_x = ctx.measure().text_width(text, self.text_size);
        self.blink.reset();
    }
}

impl Widget for EditBoxSlider {
    fn kind(&self) -> WidgetKind {
        WidgetKind::EditBoxSlider
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::VALUED
    }

    fn default_size(&self) -> Vector2f {
        Vector2f::new(120.0, 36.0)
    }

    fn is_draggable(&self) -> bool {
        true
    }

    fn left_mouse_pressed(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        let (edit, slider) = Self::split(ctx.core().size());
        if slider.contains(pos) {
            self.dragging = true;
            self.follow_pointer(pos, ctx);
        } else if edit.contains(pos) {
            let x = pos.x - TEXT_PADDING;
            let offset = ctx.measure().offset_at(self.buffer.text(), self.text_size, x);
            self.buffer.set_caret(offset, false);
            self.refresh_caret(ctx);
        }
        MouseRouting::Consumed
    }

    fn mouse_moved(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if self.dragging && ctx.core().is_mouse_down() {
            self.follow_pointer(pos, ctx);
        }
        MouseRouting::Consumed
    }

    fn left_mouse_button_no_longer_down(&mut self, _ctx: &mut WidgetCtx<'_>) {
        self.dragging = false;
    }

    fn mouse_wheel_scrolled(&mut self, delta: f32, _pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> bool {
        let value = self.range.value() + wheel_delta(&self.range, delta);
        self.set_value(value, ctx);
        true
    }

    fn key_pressed(&mut self, event: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
        match event.key {
            Key::Enter => self.commit(ctx),
            Key::ArrowUp => {
                let value = self.range.value() + self.range.key_step();
                self.set_value(value, ctx);
            }
            Key::ArrowDown => {
                let value = self.range.value() - self.range.key_step();
                self.set_value(value, ctx);
            }
            _ => {
                let before = self.buffer.clone();
                match edit_key(&mut self.buffer, event, ctx.clipboard(), false) {
                    EditOutcome::Ignored => return false,
                    EditOutcome::Edited if !InputValidator::Float.accepts(self.buffer.text()) => {
                        self.buffer = before;
                    }
                    _ => {}
                }
                self.refresh_caret(ctx);
            }
        }
        true
    }

    fn text_entered(&mut self, c: char, ctx: &mut WidgetCtx<'_>) -> bool {
        let before = self.buffer.clone();
        let mut utf8 = [0; 4];
        if !self.buffer.insert(c.encode_utf8(&mut utf8)) {
            return false;
        }
        if !InputValidator::Float.accepts(self.buffer.text()) {
            self.buffer = before;
            return false;
        }
        self.refresh_caret(ctx);
        true
    }

    fn focus_changed(&mut self, focused: bool, ctx: &mut WidgetCtx<'_>) {
        if !focused {
            self.commit(ctx);
        }
        self.refresh_caret(ctx);
    }

    fn update_time(&mut self, elapsed: Duration, ctx: &mut WidgetCtx<'_>) -> bool {
        if !ctx.core().is_focused() {
            return false;
        }
        self.blink.advance(elapsed, ctx.caret_blink_interval())
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        let (edit, slider) = Self::split(core.size());
        list.push(Part::Background, edit);
        list.push(Part::Text(self.buffer.text().to_string()), edit);
        if core.is_focused() && self.blink.is_visible() {
            list.push(
                Part::Caret,
                Rect::new(TEXT_PADDING + self.caret_x, TEXT_PADDING, CARET_WIDTH, edit.size.y - 2.0 * TEXT_PADDING),
            );
        }
        let track = SliderTrack::new(slider.size, false);
        list.push(Part::Track, slider);
        list.push(
            Part::Thumb,
            track.thumb_rect(self.range.fraction_of(self.range.value())).translate(slider.origin),
        );
    }

    fn properties(&self, out: &mut PropertyMap) {
        out.insert("Minimum".into(), self.range.minimum().into());
        out.insert("Maximum".into(), self.range.maximum().into());
        out.insert("Value".into(), self.range.value().into());
        out.insert("Step".into(), self.range.step().into());
        out.insert("DecimalPlaces".into(), (self.decimal_places as i64).into());
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
            "DecimalPlaces" => self.decimal_places = value.as_integer(name)?.max(0) as usize,
            _ => return Err(PropertyError::unknown(name)),
        }
        self.sync_text();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use horizon_trellis_core::ObjectId;

    use super::*;
    use crate::tree::WidgetTree;

    fn setup(slider: EditBoxSlider) -> (WidgetTree, ObjectId, Rc<RefCell<Vec<f32>>>) {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let id = tree.add(tree.root(), slider, "Value").unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        tree.connect(id, "ValueChanged", move |value: f32| l.borrow_mut().push(value))
            .unwrap();
        (tree, id, log)
    }

    #[test]
    fn test_limits_move_value() {
        let (mut tree, id, log) = setup(EditBoxSlider::new());
        tree.update(id, |s: &mut EditBoxSlider, ctx| {
            s.set_value(4.0, ctx);
            s.set_minimum(6.0, ctx);
            s.set_maximum(5.0, ctx);
        })
        .unwrap();
        let s = tree.widget::<EditBoxSlider>(id).unwrap();
        assert_eq!((s.minimum(), s.maximum(), s.value()), (5.0, 5.0, 5.0));
        assert_eq!(s.text(), "5");
        assert_eq!(*log.borrow(), vec![4.0, 6.0, 5.0]);
    }

    #[test]
    fn test_typed_value_applies_on_enter() {
        let (mut tree, id, log) = setup(EditBoxSlider::new().with_step(0.0).with_decimal_places(1));
        tree.set_focused(id, true).unwrap();
        let root = tree.root();
        tree.process_key_press(root, &KeyEvent::with_modifiers(Key::A, crate::event::KeyboardModifiers::CTRL));
        for c in "7.34x".chars() {
            tree.process_text_entered(root, c as u32);
        }
        assert_eq!(tree.widget::<EditBoxSlider>(id).unwrap().text(), "7.34");
        tree.process_key_press(root, &KeyEvent::new(Key::Enter));
        let s = tree.widget::<EditBoxSlider>(id).unwrap();
        assert_eq!(s.value(), 7.34);
        assert_eq!(s.text(), "7.3");
        assert_eq!(*log.borrow(), vec![7.34]);
    }

    #[test]
    fn test_invalid_text_restored_on_focus_loss() {
        let (mut tree, id, log) = setup(EditBoxSlider::new());
        tree.set_focused(id, true).unwrap();
        let root = tree.root();
        tree.process_key_press(root, &KeyEvent::new(Key::Backspace));
        tree.process_text_entered(root, '-' as u32);
        assert_eq!(tree.widget::<EditBoxSlider>(id).unwrap().text(), "-");
        tree.set_focused(id, false).unwrap();
        assert_eq!(tree.widget::<EditBoxSlider>(id).unwrap().text(), "0");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_arrow_keys_step() {
        let (mut tree, id, _) = setup(EditBoxSlider::new().with_step(2.0));
        tree.set_focused(id, true).unwrap();
        let root = tree.root();
        tree.process_key_press(root, &KeyEvent::new(Key::ArrowUp));
        tree.process_key_press(root, &KeyEvent::new(Key::ArrowUp));
        tree.process_key_press(root, &KeyEvent::new(Key::ArrowDown));
        assert_eq!(tree.widget::<EditBoxSlider>(id).unwrap().value(), 2.0);
    }
}

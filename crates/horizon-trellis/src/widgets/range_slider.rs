//! A slider selecting a range with two thumbs.

use horizon_trellis_core::{PropertyError, PropertyMap, PropertyValue, SignalSpec};

use super::slider::{key_direction, RangeModel, SliderTrack};
use crate::event::KeyEvent;
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part};
use crate::widget::{signals, MouseRouting, Widget, WidgetCore, WidgetCtx, WidgetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Thumb {
    Start,
    End,
}

/// Two thumbs on one track.
///
/// The selection always satisfies `minimum <= start <= end <= maximum`:
/// moving the start past the end drags the end along and the other way
/// around. Emits `RangeChanged((start, end))`.
#[derive(Debug, Clone)]
pub struct RangeSlider {
    // The model's value is the selection start.
    range: RangeModel,
    selection_end: f32,
    dragged: Option<Thumb>,
    // Last thumb used, receives the arrow keys.
    active: Thumb,
}

impl Default for RangeSlider {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeSlider {
    /// A range slider from 0 to 10 with both thumbs at 0.
    pub fn new() -> Self {
        Self {
            range: RangeModel::default(),
            selection_end: 0.0,
            dragged: None,
            active: Thumb::End,
        }
    }

    /// Builder-style limits; the selection covers the whole range.
    pub fn with_range(mut self, minimum: f32, maximum: f32) -> Self {
        self.range = RangeModel::new(minimum, maximum);
        self.selection_end = self.range.maximum();
        self
    }

    /// Lower limit.
    pub fn minimum(&self) -> f32 {
        self.range.minimum()
    }

    /// Upper limit.
    pub fn maximum(&self) -> f32 {
        self.range.maximum()
    }

    /// Rounding step.
    pub fn step(&self) -> f32 {
        self.range.step()
    }

    /// Start of the selection.
    pub fn selection_start(&self) -> f32 {
        self.range.value()
    }

    /// End of the selection.
    pub fn selection_end(&self) -> f32 {
        self.selection_end
    }

    /// Change the lower limit. A selection start sitting on the old minimum
    /// moves with it.
    pub fn set_minimum(&mut self, minimum: f32, ctx: &mut WidgetCtx<'_>) {
        if self.apply_minimum(minimum) {
            self.range_changed(ctx);
        }
    }

    /// Change the upper limit. A selection end sitting on the old maximum
    /// moves with it.
    pub fn set_maximum(&mut self, maximum: f32, ctx: &mut WidgetCtx<'_>) {
        if self.apply_maximum(maximum) {
            self.range_changed(ctx);
        }
    }

    /// Change the rounding step.
    pub fn set_step(&mut self, step: f32) {
        self.range.set_step(step);
    }

    /// Move the start of the selection; the end is pushed up if needed.
    pub fn set_selection_start(&mut self, value: f32, ctx: &mut WidgetCtx<'_>) {
        if self.apply_start(value) {
            self.range_changed(ctx);
        }
    }

    /// Move the end of the selection; the start is pushed down if needed.
    pub fn set_selection_end(&mut self, value: f32, ctx: &mut WidgetCtx<'_>) {
        if self.apply_end(value) {
            self.range_changed(ctx);
        }
    }

    fn apply_start(&mut self, value: f32) -> bool {
        let value = self.range.snap(value);
        let before = (self.range.value(), self.selection_end);
        self.range.set_value(value);
        if self.selection_end < value {
            self.selection_end = value;
        }
        before != (self.range.value(), self.selection_end)
    }

    fn apply_end(&mut self, value: f32) -> bool {
        let value = self.range.snap(value);
        let before = (self.range.value(), self.selection_end);
        self.selection_end = value;
        if self.range.value() > value {
            self.range.set_value(value);
        }
        before != (self.range.value(), self.selection_end)
    }

    fn apply_minimum(&mut self, minimum: f32) -> bool {
        let old_minimum = self.range.minimum();
        let before = (self.range.value(), self.selection_end);
        let start = self.range.value();
        // Raising the limit may clamp the start; decide on the old value.
        self.range.set_minimum(minimum);
        if self.selection_end < self.range.minimum() {
            self.selection_end = self.range.minimum();
        }
        if old_minimum == start {
            self.apply_start(self.range.minimum());
        } else {
            self.apply_start(start);
        }
        before != (self.range.value(), self.selection_end)
    }

    fn apply_maximum(&mut self, maximum: f32) -> bool {
        let old_maximum = self.range.maximum();
        let before = (self.range.value(), self.selection_end);
        let end = self.selection_end;
        self.range.set_maximum(maximum);
        if old_maximum == end {
            self.apply_end(self.range.maximum());
        } else {
            self.apply_end(end);
        }
        before != (self.range.value(), self.selection_end)
    }

    fn range_changed(&self, ctx: &WidgetCtx<'_>) {
        ctx.emit_value(signals::RANGE_CHANGED, (self.range.value(), self.selection_end));
    }

    fn thumb_rects(&self, size: Vector2f) -> (Rect, Rect) {
        let track = SliderTrack::new(size, false);
        (
            track.thumb_rect(self.range.fraction_of(self.range.value())),
            track.thumb_rect(self.range.fraction_of(self.selection_end)),
        )
    }

    fn move_thumb(&mut self, thumb: Thumb, value: f32, ctx: &mut WidgetCtx<'_>) {
        match thumb {
            Thumb::Start => self.set_selection_start(value, ctx),
            Thumb::End => self.set_selection_end(value, ctx),
        }
    }
}

impl Widget for RangeSlider {
    fn kind(&self) -> WidgetKind {
        WidgetKind::RangeSlider
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::RANGE_SLIDER
    }

    fn default_size(&self) -> Vector2f {
        Vector2f::new(200.0, 16.0)
    }

    fn is_draggable(&self) -> bool {
        true
    }

    fn left_mouse_pressed(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        let size = ctx.core().size();
        let (start_rect, end_rect) = self.thumb_rects(size);
        let value = self.range.value_at(SliderTrack::new(size, false).fraction_at(pos));
        // The end thumb is drawn on top, so it wins when both overlap.
        let thumb = if end_rect.contains(pos) {
            Thumb::End
        } else if start_rect.contains(pos) {
            Thumb::Start
        } else if value < self.range.value()
            || (value - self.range.value()).abs() < (value - self.selection_end).abs()
        {
            Thumb::Start
        } else {
            Thumb::End
        };
        self.dragged = Some(thumb);
        self.active = thumb;
        self.move_thumb(thumb, value, ctx);
        MouseRouting::Consumed
    }

    fn mouse_moved(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if let Some(thumb) = self.dragged.filter(|_| ctx.core().is_mouse_down()) {
            let track = SliderTrack::new(ctx.core().size(), false);
            let value = self.range.value_at(track.fraction_at(pos));
            self.move_thumb(thumb, value, ctx);
        }
        MouseRouting::Consumed
    }

    fn left_mouse_button_no_longer_down(&mut self, _ctx: &mut WidgetCtx<'_>) {
        self.dragged = None;
    }

    fn key_pressed(&mut self, event: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
        let Some(direction) = key_direction(event.key) else {
            return false;
        };
        let current = match self.active {
            Thumb::Start => self.range.value(),
            Thumb::End => self.selection_end,
        };
        self.move_thumb(self.active, current + direction * self.range.key_step(), ctx);
        true
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        let track = SliderTrack::new(core.size(), false);
        let (start_rect, end_rect) = self.thumb_rects(core.size());
        list.push(Part::Background, track.rect());
        list.push(Part::Track, track.rect());
        let selected = Rect::from_origin_size(
            start_rect.origin.min(end_rect.origin),
            end_rect.bottom_right().max(start_rect.bottom_right()) - start_rect.origin.min(end_rect.origin),
        );
        list.push(Part::Selection, selected);
        list.push(Part::Thumb, start_rect);
        list.push(Part::Thumb, end_rect);
    }

    fn properties(&self, out: &mut PropertyMap) {
        out.insert("Minimum".into(), self.range.minimum().into());
        out.insert("Maximum".into(), self.range.maximum().into());
        out.insert("SelectionStart".into(), self.range.value().into());
        out.insert("SelectionEnd".into(), self.selection_end.into());
        out.insert("Step".into(), self.range.step().into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        match name {
            "Minimum" => {
                self.apply_minimum(value.as_number(name)?);
            }
            "Maximum" => {
                self.apply_maximum(value.as_number(name)?);
            }
            "SelectionStart" => {
                self.apply_start(value.as_number(name)?);
            }
            "SelectionEnd" => {
                self.apply_end(value.as_number(name)?);
            }
            "Step" => self.range.set_step(value.as_number(name)?),
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

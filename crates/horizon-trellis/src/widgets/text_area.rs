//! Multi-line text input with scrollbars.

use std::time::Duration;

use horizon_trellis_core::{PropertyError, PropertyMap, PropertyValue, SignalSpec};
use unicode_segmentation::UnicodeSegmentation;

use super::button::DEFAULT_TEXT_SIZE;
use super::edit_box::{edit_key, CaretBlink, EditOutcome, CARET_WIDTH, TEXT_PADDING};
use super::scrollbar::{
    scrollbar_visibility, ScrollbarGeometry, ScrollbarModel, ScrollbarPolicy, DEFAULT_SCROLLBAR_WIDTH,
};
use crate::event::{Key, KeyEvent};
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part};
use crate::text::TextBuffer;
use crate::widget::{signals, MouseRouting, Widget, WidgetCore, WidgetCtx, WidgetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bar {
    Horizontal,
    Vertical,
}

/// Editable multi-line text.
///
/// Lines are not wrapped; long lines scroll horizontally. Emits
/// `TextChanged` on edits and `SelectionChanged` whenever the selected range
/// changes.
#[derive(Debug, Clone)]
pub struct TextArea {
    buffer: TextBuffer,
    default_text: String,
    text_size: f32,
    read_only: bool,
    horizontal: ScrollbarModel,
    vertical: ScrollbarModel,
    scrollbar_width: f32,
    active_bar: Option<Bar>,
    blink: CaretBlink,
    selecting: bool,
    // Cached from the text measure.
    line_height: f32,
    caret_pos: Vector2f,
    selection_rects: Vec<Rect>,
}

impl Default for TextArea {
    fn default() -> Self {
        Self::new()
    }
}

impl TextArea {
    /// An empty text area.
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::multiline(),
            default_text: String::new(),
            text_size: DEFAULT_TEXT_SIZE,
            read_only: false,
            horizontal: ScrollbarModel::new(),
            vertical: ScrollbarModel::new(),
            scrollbar_width: DEFAULT_SCROLLBAR_WIDTH,
            active_bar: None,
            blink: CaretBlink::default(),
            selecting: false,
            line_height: DEFAULT_TEXT_SIZE * 1.25,
            caret_pos: Vector2f::ZERO,
            selection_rects: Vec::new(),
        }
    }

    /// Builder-style initial text.
    pub fn with_text(mut self, text: &str) -> Self {
        self.buffer.set_text(text);
        self
    }

    /// The text, lines separated by `\n`.
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Replace the text. Emits `TextChanged` when it differs.
    pub fn set_text(&mut self, text: &str, ctx: &mut WidgetCtx<'_>) {
        if self.buffer.text() == text {
            return;
        }
        self.buffer.set_text(text);
        self.refresh(ctx);
        ctx.emit_value(signals::TEXT_CHANGED, self.buffer.text().to_string());
    }

    /// Append text at the end without moving a selection.
    pub fn add_text(&mut self, text: &str, ctx: &mut WidgetCtx<'_>) {
        let mut joined = self.buffer.text().to_string();
        joined.push_str(text);
        self.set_text(&joined, ctx);
    }

    /// The caret/selection model.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Selected text, empty without selection.
    pub fn selected_text(&self) -> &str {
        self.buffer.selected_text()
    }

    /// Select a byte range. Emits `SelectionChanged` when it differs.
    pub fn set_selection(&mut self, start: usize, end: usize, ctx: &mut WidgetCtx<'_>) {
        let before = self.buffer.selection_range();
        self.buffer.select(start, end);
        self.refresh(ctx);
        if before != self.buffer.selection_range() {
            ctx.emit(signals::SELECTION_CHANGED);
        }
    }

    /// Placeholder shown while empty.
    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    /// Change the placeholder.
    pub fn set_default_text(&mut self, text: impl Into<String>) {
        self.default_text = text.into();
    }

    /// Grapheme limit, if any.
    pub fn maximum_characters(&self) -> Option<usize> {
        self.buffer.max_length()
    }

    /// Limit the number of graphemes.
    pub fn set_maximum_characters(&mut self, max: Option<usize>) {
        self.buffer.set_max_length(max);
    }

    /// Whether typing is refused.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Refuse or allow editing.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Number of lines.
    pub fn lines_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// Vertical scroll state.
    pub fn vertical_scrollbar(&self) -> &ScrollbarModel {
        &self.vertical
    }

    /// Horizontal scroll state.
    pub fn horizontal_scrollbar(&self) -> &ScrollbarModel {
        &self.horizontal
    }

    /// Change when the vertical bar shows.
    pub fn set_vertical_policy(&mut self, policy: ScrollbarPolicy, ctx: &mut WidgetCtx<'_>) {
        self.vertical.set_policy(policy);
        self.refresh(ctx);
    }

    /// Change when the horizontal bar shows.
    pub fn set_horizontal_policy(&mut self, policy: ScrollbarPolicy, ctx: &mut WidgetCtx<'_>) {
        self.horizontal.set_policy(policy);
        self.refresh(ctx);
    }

    fn bar_geometry(&self, bar: Bar, size: Vector2f) -> ScrollbarGeometry {
        let w = self.scrollbar_width;
        match bar {
            Bar::Vertical => ScrollbarGeometry {
                rect: Rect::new(
                    size.x - w,
                    0.0,
                    w,
                    (size.y - if self.horizontal.is_shown() { w } else { 0.0 }).max(0.0),
                ),
                vertical: true,
            },
            Bar::Horizontal => ScrollbarGeometry {
                rect: Rect::new(
                    0.0,
                    size.y - w,
                    (size.x - if self.vertical.is_shown() { w } else { 0.0 }).max(0.0),
                    w,
                ),
                vertical: false,
            },
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

    fn scroll(&self) -> Vector2f {
        Vector2f::new(self.horizontal.value(), self.vertical.value())
    }

    /// Recompute content size, scrollbars, caret and selection geometry, and
    /// scroll the caret into view.
    fn refresh(&mut self, ctx: &WidgetCtx<'_>) {
        let measure = ctx.measure();
        let size = ctx.core().size();
        self.line_height = measure.line_height(self.text_size);
        let widest = self
            .buffer
            .lines()
            .map(|line| measure.text_width(line, self.text_size))
            .fold(0.0, f32::max);
        let content = Vector2f::new(
            widest + CARET_WIDTH + 2.0 * TEXT_PADDING,
            self.buffer.line_count() as f32 * self.line_height + 2.0 * TEXT_PADDING,
        );
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
        self.vertical.set_scroll_amount(self.line_height);
        self.horizontal.set_scroll_amount(self.line_height);

        let (line, _) = self.buffer.caret_line_column();
        let x_in_line = |line: usize, offset: usize| {
            let start = self.buffer.offset_of(line, 0);
            let text = self.buffer.line(line);
            measure.text_width(&text[..offset.saturating_sub(start).min(text.len())], self.text_size)
        };
        self.caret_pos = Vector2f::new(
            TEXT_PADDING + x_in_line(line, self.buffer.caret()),
            TEXT_PADDING + line as f32 * self.line_height,
        );

        self.selection_rects.clear();
        if let Some((start, end)) = self.buffer.selection_range() {
            let first = self.buffer.text()[..start].matches('\n').count();
            let last = self.buffer.text()[..end].matches('\n').count();
            for l in first..=last {
                let line_start = self.buffer.offset_of(l, 0);
                let line_end = line_start + self.buffer.line(l).len();
                let left = x_in_line(l, start.max(line_start));
                let right = x_in_line(l, end.min(line_end));
                // Selected line breaks show as a sliver.
                let right = if end > line_end { right + CARET_WIDTH * 4.0 } else { right };
                self.selection_rects.push(Rect::new(
                    TEXT_PADDING + left,
                    TEXT_PADDING + l as f32 * self.line_height,
                    right - left,
                    self.line_height,
                ));
            }
        }

        // Keep the caret inside the viewport.
        let view = layout.viewport;
        let caret = self.caret_pos;
        if caret.y < self.vertical.value() {
            self.vertical.set_value(caret.y - TEXT_PADDING);
        } else if caret.y + self.line_height + TEXT_PADDING > self.vertical.value() + view.y {
            self.vertical.set_value(caret.y + self.line_height + TEXT_PADDING - view.y);
        }
        if caret.x < self.horizontal.value() {
            self.horizontal.set_value(caret.x - TEXT_PADDING);
        } else if caret.x + CARET_WIDTH + TEXT_PADDING > self.horizontal.value() + view.x {
            self.horizontal.set_value(caret.x + CARET_WIDTH + TEXT_PADDING - view.x);
        }
        self.blink.reset();
    }

    fn offset_at(&self, pos: Vector2f, ctx: &WidgetCtx<'_>) -> usize {
        let content = pos + self.scroll() - Vector2f::splat(TEXT_PADDING);
        let line = if content.y <= 0.0 || self.line_height <= 0.0 {
            0
        } else {
            ((content.y / self.line_height) as usize).min(self.buffer.line_count() - 1)
        };
        let text = self.buffer.line(line);
        let byte = ctx.measure().offset_at(text, self.text_size, content.x);
        let column = text[..byte].graphemes(true).count();
        self.buffer.offset_of(line, column)
    }

    /// Apply a change to the buffer and emit what changed.
    fn after_edit(&mut self, text_before: &str, selection_before: Option<(usize, usize)>, ctx: &mut WidgetCtx<'_>) {
        self.refresh(ctx);
        if self.buffer.text() != text_before {
            ctx.emit_value(signals::TEXT_CHANGED, self.buffer.text().to_string());
        }
        if self.buffer.selection_range() != selection_before {
            ctx.emit(signals::SELECTION_CHANGED);
        }
    }

    fn visible_lines(&self) -> usize {
        if self.line_height <= 0.0 {
            return 1;
        }
        ((self.vertical.viewport_size() / self.line_height) as usize).max(1)
    }
}

impl Widget for TextArea {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TextArea
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::TEXT_AREA
    }

    fn default_size(&self) -> Vector2f {
        Vector2f::new(240.0, 120.0)
    }

    fn is_draggable(&self) -> bool {
        true
    }

    fn left_mouse_pressed(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        let size = ctx.core().size();
        if let Some(bar) = self.bar_at(pos, size) {
            let geometry = self.bar_geometry(bar, size);
            self.model_mut(bar).press(&geometry, pos);
            self.active_bar = Some(bar);
            return MouseRouting::Consumed;
        }
        let text_before = self.buffer.text().to_string();
        let selection_before = self.buffer.selection_range();
        let offset = self.offset_at(pos, ctx);
        self.buffer.set_caret(offset, false);
        self.selecting = true;
        self.after_edit(&text_before, selection_before, ctx);
        MouseRouting::Consumed
    }

    fn mouse_moved(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if !ctx.core().is_mouse_down() {
            return MouseRouting::Consumed;
        }
        if let Some(bar) = self.active_bar {
            let geometry = self.bar_geometry(bar, ctx.core().size());
            self.model_mut(bar).drag(&geometry, pos);
        } else if self.selecting {
            let offset = self.offset_at(pos, ctx);
            if offset != self.buffer.caret() {
                let text_before = self.buffer.text().to_string();
                let selection_before = self.buffer.selection_range();
                self.buffer.set_caret(offset, true);
                self.after_edit(&text_before, selection_before, ctx);
            }
        }
        MouseRouting::Consumed
    }

    fn left_mouse_button_no_longer_down(&mut self, _ctx: &mut WidgetCtx<'_>) {
        if let Some(bar) = self.active_bar.take() {
            self.model_mut(bar).release();
        }
        self.selecting = false;
    }

    fn mouse_wheel_scrolled(&mut self, delta: f32, _pos: Vector2f, _ctx: &mut WidgetCtx<'_>) -> bool {
        if self.vertical.maximum_value() > 0.0 {
            self.vertical.scroll_by(delta);
            true
        } else if self.horizontal.maximum_value() > 0.0 {
            self.horizontal.scroll_by(delta);
            true
        } else {
            false
        }
    }

    fn key_pressed(&mut self, event: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
        let text_before = self.buffer.text().to_string();
        let selection_before = self.buffer.selection_range();
        let extend = event.modifiers.shift;
        match event.key {
            Key::Enter if !self.read_only => {
                self.buffer.insert("\n");
            }
            Key::PageUp => {
                for _ in 0..self.visible_lines() {
                    self.buffer.move_up(extend);
                }
            }
            Key::PageDown => {
                for _ in 0..self.visible_lines() {
                    self.buffer.move_down(extend);
                }
            }
            _ => {
                if edit_key(&mut self.buffer, event, ctx.clipboard(), self.read_only) == EditOutcome::Ignored {
                    return false;
                }
            }
        }
        self.after_edit(&text_before, selection_before, ctx);
        true
    }

    fn text_entered(&mut self, c: char, ctx: &mut WidgetCtx<'_>) -> bool {
        if self.read_only {
            return false;
        }
        let text_before = self.buffer.text().to_string();
        let selection_before = self.buffer.selection_range();
        let mut utf8 = [0; 4];
        if !self.buffer.insert(c.encode_utf8(&mut utf8)) {
            return false;
        }
        self.after_edit(&text_before, selection_before, ctx);
        true
    }

    fn focus_changed(&mut self, _focused: bool, ctx: &mut WidgetCtx<'_>) {
        self.blink.reset();
        self.refresh(ctx);
    }

    fn size_changed(&mut self, _size: Vector2f, ctx: &mut WidgetCtx<'_>) {
        self.refresh(ctx);
    }

    fn update_time(&mut self, elapsed: Duration, ctx: &mut WidgetCtx<'_>) -> bool {
        if !ctx.core().is_focused() {
            return false;
        }
        self.blink.advance(elapsed, ctx.caret_blink_interval())
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        let size = core.size();
        list.push(Part::Background, Rect::from_origin_size(Vector2f::ZERO, size));
        let scroll = self.scroll();
        for rect in &self.selection_rects {
            list.push(Part::Selection, rect.translate(-scroll));
        }
        if self.buffer.text().is_empty() {
            if !self.default_text.is_empty() {
                list.push(
                    Part::Text(self.default_text.clone()),
                    Rect::new(TEXT_PADDING, TEXT_PADDING, size.x, self.line_height),
                );
            }
        } else {
            let view_height = self.vertical.viewport_size();
            for (index, line) in self.buffer.lines().enumerate() {
                let top = TEXT_PADDING + index as f32 * self.line_height - scroll.y;
                if top + self.line_height < 0.0 || top > view_height {
                    continue;
                }
                if !line.is_empty() {
                    list.push(
                        Part::Text(line.to_string()),
                        Rect::new(TEXT_PADDING - scroll.x, top, self.horizontal.content_size(), self.line_height),
                    );
                }
            }
        }
        if core.is_focused() && self.blink.is_visible() {
            list.push(
                Part::Caret,
                Rect::from_origin_size(self.caret_pos - scroll, Vector2f::new(CARET_WIDTH, self.line_height)),
            );
        }
        for (bar, model) in [(Bar::Vertical, &self.vertical), (Bar::Horizontal, &self.horizontal)] {
            if model.is_shown() {
                model.draw(&self.bar_geometry(bar, size), list);
            }
        }
    }

    fn properties(&self, out: &mut PropertyMap) {
        out.insert("Text".into(), self.buffer.text().into());
        out.insert("DefaultText".into(), self.default_text.clone().into());
        out.insert("TextSize".into(), self.text_size.into());
        out.insert(
            "MaximumCharacters".into(),
            (self.buffer.max_length().unwrap_or(0) as i64).into(),
        );
        out.insert("ReadOnly".into(), self.read_only.into());
        out.insert("HorizontalScrollbarPolicy".into(), self.horizontal.policy().name().into());
        out.insert("VerticalScrollbarPolicy".into(), self.vertical.policy().name().into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        match name {
            "Text" => self.buffer.set_text(value.as_text(name)?),
            "DefaultText" => self.default_text = value.as_text(name)?.to_string(),
            "TextSize" => self.text_size = value.as_number(name)?.max(0.0),
            "MaximumCharacters" => {
                let max = value.as_integer(name)?;
                self.buffer.set_max_length((max > 0).then_some(max as usize));
            }
            "ReadOnly" => self.read_only = value.as_bool(name)?,
            "HorizontalScrollbarPolicy" => {
                self.horizontal.set_policy(ScrollbarPolicy::parse(name, value.as_text(name)?)?);
            }
            "VerticalScrollbarPolicy" => {
                self.vertical.set_policy(ScrollbarPolicy::parse(name, value.as_text(name)?)?);
            }
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use horizon_trellis_core::ObjectId;

    use super::*;
    use crate::event::{KeyboardModifiers, MouseButton};
    use crate::tree::WidgetTree;

    fn setup() -> (WidgetTree, ObjectId) {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let area = tree.add(tree.root(), TextArea::new(), "Area").unwrap();
        tree.set_focused(area, true).unwrap();
        (tree, area)
    }

    fn type_text(tree: &mut WidgetTree, text: &str) {
        let root = tree.root();
        for c in text.chars() {
            if c == '\n' {
                tree.process_key_press(root, &KeyEvent::new(Key::Enter));
            } else {
                tree.process_text_entered(root, c as u32);
            }
        }
    }

    #[test]
    fn test_enter_inserts_line_break() {
        let (mut tree, area) = setup();
        type_text(&mut tree, "ab\ncd");
        let widget = tree.widget::<TextArea>(area).unwrap();
        assert_eq!(widget.text(), "ab\ncd");
        assert_eq!(widget.lines_count(), 2);
        assert_eq!(widget.buffer().caret_line_column(), (1, 2));
    }

    #[test]
    fn test_selection_changed_signal() {
        let (mut tree, area) = setup();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        tree.connect(area, "SelectionChanged", move || c.set(c.get() + 1)).unwrap();
        type_text(&mut tree, "hello");
        assert_eq!(count.get(), 0);
        let root = tree.root();
        tree.process_key_press(root, &KeyEvent::with_modifiers(Key::ArrowLeft, KeyboardModifiers::SHIFT));
        tree.process_key_press(root, &KeyEvent::with_modifiers(Key::ArrowLeft, KeyboardModifiers::SHIFT));
        assert_eq!(count.get(), 2);
        assert_eq!(tree.widget::<TextArea>(area).unwrap().selected_text(), "lo");
        // Typing over the selection clears it.
        type_text(&mut tree, "p");
        assert_eq!(count.get(), 3);
        assert_eq!(tree.widget::<TextArea>(area).unwrap().text(), "help");
    }

    #[test]
    fn test_vertical_scrollbar_follows_caret() {
        let (mut tree, area) = setup();
        // 16.25 per line at size 13; 20 lines do not fit in 120.
        type_text(&mut tree, &"x\n".repeat(20));
        let widget = tree.widget::<TextArea>(area).unwrap();
        assert!(widget.vertical_scrollbar().is_shown());
        assert!(!widget.horizontal_scrollbar().is_shown());
        let bar = widget.vertical_scrollbar();
        assert_eq!(bar.value(), bar.maximum_value());

        let root = tree.root();
        tree.process_key_press(root, &KeyEvent::with_modifiers(Key::Home, KeyboardModifiers::CTRL));
        assert_eq!(tree.widget::<TextArea>(area).unwrap().vertical_scrollbar().value(), 0.0);
    }

    #[test]
    fn test_click_on_second_line() {
        let (mut tree, area) = setup();
        type_text(&mut tree, "abc\ndef");
        let root = tree.root();
        // Line 1 spans y 18.25..34.5; x = 2 + 6.5 lands between "d" and "e".
        tree.process_mouse_press(root, MouseButton::Left, Vector2f::new(8.5, 25.0));
        tree.process_mouse_release(root, MouseButton::Left, Vector2f::new(8.5, 25.0));
        assert_eq!(tree.widget::<TextArea>(area).unwrap().buffer().caret(), 5);
    }

    #[test]
    fn test_read_only_refuses_typing() {
        let (mut tree, area) = setup();
        tree.update(area, |a: &mut TextArea, _| a.set_read_only(true)).unwrap();
        type_text(&mut tree, "a\nb");
        assert_eq!(tree.widget::<TextArea>(area).unwrap().text(), "");
    }
}

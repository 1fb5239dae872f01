//! Single-line text input.

use std::time::Duration;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{PropertyError, PropertyMap, PropertyValue, SignalSpec};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use super::button::DEFAULT_TEXT_SIZE;
use crate::clipboard::Clipboard;
use crate::event::{Key, KeyEvent};
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part};
use crate::text::TextBuffer;
use crate::widget::{signals, MouseRouting, Widget, WidgetCore, WidgetCtx, WidgetKind};

/// Space between the border and the text.
pub(crate) const TEXT_PADDING: f32 = 2.0;

/// Width of the drawn caret.
pub(crate) const CARET_WIDTH: f32 = 1.0;

/// Outcome of feeding a key to a [`TextBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditOutcome {
    /// The key means nothing to a text field.
    Ignored,
    /// Caret, selection or clipboard changed; the text did not.
    Handled,
    /// The text changed.
    Edited,
}

/// Caret movement, deletion and clipboard shortcuts shared by the text
/// widgets. Enter and Tab are left to the caller.
pub(crate) fn edit_key(
    buffer: &mut TextBuffer,
    event: &KeyEvent,
    clipboard: &mut dyn Clipboard,
    read_only: bool,
) -> EditOutcome {
    let extend = event.modifiers.shift;
    let word = event.is_shortcut();
    let edited = |changed: bool| if changed { EditOutcome::Edited } else { EditOutcome::Handled };
    match event.key {
        Key::A if event.is_shortcut() => {
            buffer.select_all();
            EditOutcome::Handled
        }
        Key::C if event.is_shortcut() => {
            if buffer.has_selection() {
                if let Err(err) = clipboard.set_text(buffer.selected_text()) {
                    tracing::warn!(target: targets::GUI, error = %err, "copy failed");
                }
            }
            EditOutcome::Handled
        }
        Key::X if event.is_shortcut() => {
            if read_only || !buffer.has_selection() {
                return EditOutcome::Handled;
            }
            if let Err(err) = clipboard.set_text(buffer.selected_text()) {
                tracing::warn!(target: targets::GUI, error = %err, "cut failed");
                return EditOutcome::Handled;
            }
            edited(buffer.cut().is_some())
        }
        Key::V if event.is_shortcut() => {
            if read_only {
                return EditOutcome::Handled;
            }
            match clipboard.get_text() {
                Ok(text) => edited(buffer.insert(&text)),
                Err(err) => {
                    tracing::warn!(target: targets::GUI, error = %err, "paste failed");
                    EditOutcome::Handled
                }
            }
        }
        Key::ArrowLeft => {
            buffer.move_left(extend, word);
            EditOutcome::Handled
        }
        Key::ArrowRight => {
            buffer.move_right(extend, word);
            EditOutcome::Handled
        }
        Key::ArrowUp if buffer.is_multiline() => {
            buffer.move_up(extend);
            EditOutcome::Handled
        }
        Key::ArrowDown if buffer.is_multiline() => {
            buffer.move_down(extend);
            EditOutcome::Handled
        }
        Key::Home => {
            if word {
                buffer.set_caret(0, extend);
            } else {
                buffer.move_home(extend);
            }
            EditOutcome::Handled
        }
        Key::End => {
            if word {
                buffer.set_caret(buffer.text().len(), extend);
            } else {
                buffer.move_end(extend);
            }
            EditOutcome::Handled
        }
        Key::Backspace if !read_only => edited(buffer.backspace()),
        Key::Delete if !read_only => edited(buffer.delete()),
        Key::Backspace | Key::Delete => EditOutcome::Handled,
        _ => EditOutcome::Ignored,
    }
}

/// Character classes an edit box accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputValidator {
    /// Anything.
    #[default]
    All,
    /// An optionally signed integer.
    Int,
    /// Digits only.
    UInt,
    /// An optionally signed decimal number.
    Float,
}

impl InputValidator {
    /// Whether `text` is acceptable, including the partial input a user
    /// types on the way to a valid one ("-", "1.").
    pub fn accepts(self, text: &str) -> bool {
        let unsigned = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        let signed = |s: &str| s.strip_prefix(['-', '+']).unwrap_or(s).to_string();
        match self {
            Self::All => true,
            Self::UInt => unsigned(text),
            Self::Int => unsigned(&signed(text)),
            Self::Float => {
                let body = signed(text);
                let mut parts = body.splitn(2, '.');
                let whole = parts.next().unwrap_or_default();
                let fraction = parts.next().unwrap_or_default();
                unsigned(whole) && unsigned(fraction)
            }
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Int => "Int",
            Self::UInt => "UInt",
            Self::Float => "Float",
        }
    }

    fn parse(name: &str, value: &str) -> Result<Self, PropertyError> {
        [Self::All, Self::Int, Self::UInt, Self::Float]
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(value))
            .ok_or(PropertyError::TypeMismatch {
                name: name.to_string(),
                expected: "All, Int, UInt or Float",
                got: "text",
            })
    }
}

/// Caret visibility while focused.
#[derive(Debug, Clone, Default)]
pub(crate) struct CaretBlink {
    visible: bool,
    elapsed: Duration,
}

impl CaretBlink {
    /// Show the caret and restart the interval.
    pub(crate) fn reset(&mut self) {
        self.visible = true;
        self.elapsed = Duration::ZERO;
    }

    /// Advance; returns whether the caret flipped.
    pub(crate) fn advance(&mut self, elapsed: Duration, interval: Duration) -> bool {
        if interval.is_zero() {
            return false;
        }
        self.elapsed += elapsed;
        let mut flipped = false;
        while self.elapsed >= interval {
            self.elapsed -= interval;
            self.visible = !self.visible;
            flipped = !flipped;
        }
        flipped
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.visible
    }
}

/// A one-line text field.
///
/// Typing replaces the selection. Ctrl+A, Ctrl+C, Ctrl+X and Ctrl+V use the
/// tree's clipboard. Every change of the text emits `TextChanged`; Enter
/// emits `ReturnKeyPressed`.
#[derive(Debug, Clone)]
pub struct EditBox {
    buffer: TextBuffer,
    default_text: String,
    text_size: f32,
    read_only: bool,
    password_character: Option<char>,
    validator: InputValidator,
    blink: CaretBlink,
    // Cached from the text measure; `draw` has no access to it.
    text_offset: f32,
    caret_x: f32,
    selection_x: Option<(f32, f32)>,
    last_click: Option<Duration>,
}

impl Default for EditBox {
    fn default() -> Self {
        Self::new()
    }
}

impl EditBox {
    /// An empty edit box.
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::new(),
            default_text: String::new(),
            text_size: DEFAULT_TEXT_SIZE,
            read_only: false,
            password_character: None,
            validator: InputValidator::All,
            blink: CaretBlink::default(),
            text_offset: 0.0,
            caret_x: 0.0,
            selection_x: None,
            last_click: None,
        }
    }

    /// Builder-style initial text.
    pub fn with_text(mut self, text: &str) -> Self {
        self.buffer.set_text(text);
        self
    }

    /// Builder-style placeholder.
    pub fn with_default_text(mut self, text: impl Into<String>) -> Self {
        self.default_text = text.into();
        self
    }

    /// Builder-style validator.
    pub fn with_validator(mut self, validator: InputValidator) -> Self {
        self.validator = validator;
        self
    }

    /// The text.
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Replace the text. Emits `TextChanged` when it differs.
    pub fn set_text(&mut self, text: &str, ctx: &mut WidgetCtx<'_>) {
        if self.buffer.text() == text {
            return;
        }
        self.buffer.set_text(text);
        self.text_changed(ctx);
    }

    /// The caret/selection model.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Text shown while empty and unfocused.
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

    /// Limit the number of graphemes; longer text is cut.
    pub fn set_maximum_characters(&mut self, max: Option<usize>) {
        self.buffer.set_max_length(max);
    }

    /// Whether typing is refused.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Refuse or allow editing. Selecting and copying keep working.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Character drawn instead of each grapheme.
    pub fn password_character(&self) -> Option<char> {
        self.password_character
    }

    /// Mask the text.
    pub fn set_password_character(&mut self, c: Option<char>) {
        self.password_character = c;
    }

    /// The accepted input.
    pub fn validator(&self) -> InputValidator {
        self.validator
    }

    /// Restrict input. Existing text is cleared when it does not match.
    pub fn set_validator(&mut self, validator: InputValidator) {
        self.validator = validator;
        if !validator.accepts(self.buffer.text()) {
            self.buffer.set_text("");
        }
    }

    /// Character size.
    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    /// Whether the caret is currently drawn.
    pub fn is_caret_visible(&self) -> bool {
        self.blink.is_visible()
    }

    /// Text as drawn, masked when a password character is set.
    fn displayed_text(&self) -> String {
        match self.password_character {
            Some(c) => std::iter::repeat_n(c, self.buffer.grapheme_count()).collect(),
            None => self.buffer.text().to_string(),
        }
    }

    /// Byte offset in the displayed text for a byte offset in the real text.
    fn displayed_offset(&self, offset: usize) -> usize {
        match self.password_character {
            Some(c) => self.buffer.text()[..offset].graphemes(true).count() * c.len_utf8(),
            None => offset,
        }
    }

    /// Byte offset in the real text for a byte offset in the displayed text.
    fn real_offset(&self, displayed: usize) -> usize {
        match self.password_character {
            Some(c) => {
                let index = displayed / c.len_utf8();
                self.buffer
                    .text()
                    .grapheme_indices(true)
                    .nth(index)
                    .map_or(self.buffer.text().len(), |(offset, _)| offset)
            }
            None => displayed,
        }
    }

    fn refresh_geometry(&mut self, ctx: &WidgetCtx<'_>) {
        let shown = self.displayed_text();
        let measure = ctx.measure();
        let x_of = |offset: usize| measure.text_width(&shown[..offset], self.text_size);
        let caret_x = x_of(self.displayed_offset(self.buffer.caret()));
        let width = (ctx.core().size().x - 2.0 * TEXT_PADDING).max(0.0);
        if caret_x - self.text_offset > width {
            self.text_offset = caret_x - width;
        } else if caret_x < self.text_offset {
            self.text_offset = caret_x;
        }
        let full = measure.text_width(&shown, self.text_size);
        self.text_offset = self.text_offset.min((full - width).max(0.0)).max(0.0);
        self.caret_x = caret_x;
        self.selection_x = self
            .buffer
            .selection_range()
            .map(|(start, end)| (x_of(self.displayed_offset(start)), x_of(self.displayed_offset(end))));
        self.blink.reset();
    }

    fn text_changed(&mut self, ctx: &mut WidgetCtx<'_>) {
        self.refresh_geometry(ctx);
        ctx.emit_value(signals::TEXT_CHANGED, self.buffer.text().to_string());
    }

    fn offset_at(&self, pos: Vector2f, ctx: &WidgetCtx<'_>) -> usize {
        let shown = self.displayed_text();
        let x = pos.x - TEXT_PADDING + self.text_offset;
        self.real_offset(ctx.measure().offset_at(&shown, self.text_size, x))
    }
}

impl Widget for EditBox {
    fn kind(&self) -> WidgetKind {
        WidgetKind::EditBox
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::EDIT_BOX
    }

    fn default_size(&self) -> Vector2f {
        Vector2f::new(160.0, 24.0)
    }

    fn is_draggable(&self) -> bool {
        true
    }

    fn left_mouse_pressed(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        let now = ctx.clock();
        let double = self
            .last_click
            .is_some_and(|last| now.saturating_sub(last) <= ctx.double_click_time());
        if double {
            self.buffer.select_all();
            self.last_click = None;
        } else {
            let offset = self.offset_at(pos, ctx);
            self.buffer.set_caret(offset, false);
            self.last_click = Some(now);
        }
        self.refresh_geometry(ctx);
        MouseRouting::Consumed
    }

    fn mouse_moved(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if ctx.core().is_mouse_down() && self.last_click.is_some() {
            let offset = self.offset_at(pos, ctx);
            if offset != self.buffer.caret() {
                self.buffer.set_caret(offset, true);
                self.refresh_geometry(ctx);
            }
        }
        MouseRouting::Consumed
    }

    fn key_pressed(&mut self, event: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
        if event.key == Key::Enter {
            ctx.emit_value(signals::RETURN_KEY_PRESSED, self.buffer.text().to_string());
            return true;
        }
        let before = self.buffer.clone();
        match edit_key(&mut self.buffer, event, ctx.clipboard(), self.read_only) {
            EditOutcome::Ignored => false,
            EditOutcome::Handled => {
                self.refresh_geometry(ctx);
                true
            }
            EditOutcome::Edited => {
                if self.validator.accepts(self.buffer.text()) {
                    self.text_changed(ctx);
                } else {
                    self.buffer = before;
                }
                true
            }
        }
    }

    fn text_entered(&mut self, c: char, ctx: &mut WidgetCtx<'_>) -> bool {
        if self.read_only {
            return false;
        }
        let before = self.buffer.clone();
        let mut utf8 = [0; 4];
        if !self.buffer.insert(c.encode_utf8(&mut utf8)) {
            return false;
        }
        if self.validator.accepts(self.buffer.text()) {
            self.text_changed(ctx);
            true
        } else {
            self.buffer = before;
            false
        }
    }

    fn focus_changed(&mut self, focused: bool, ctx: &mut WidgetCtx<'_>) {
        if !focused {
            self.buffer.deselect();
        }
        self.refresh_geometry(ctx);
    }

    fn size_changed(&mut self, _size: Vector2f, ctx: &mut WidgetCtx<'_>) {
        self.refresh_geometry(ctx);
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
        let inner = Rect::new(TEXT_PADDING, TEXT_PADDING, size.x - 2.0 * TEXT_PADDING, size.y - 2.0 * TEXT_PADDING);
        if let Some((start, end)) = self.selection_x {
            list.push(
                Part::Selection,
                Rect::new(TEXT_PADDING + start - self.text_offset, inner.top(), end - start, inner.size.y),
            );
        }
        if self.buffer.text().is_empty() {
            if !core.is_focused() && !self.default_text.is_empty() {
                list.push(Part::Text(self.default_text.clone()), inner);
            }
        } else {
            list.push(Part::Text(self.displayed_text()), inner.translate(Vector2f::new(-self.text_offset, 0.0)));
        }
        if core.is_focused() && self.blink.is_visible() {
            list.push(
                Part::Caret,
                Rect::new(TEXT_PADDING + self.caret_x - self.text_offset, inner.top(), CARET_WIDTH, inner.size.y),
            );
        }
    }

    fn properties(&self, out: &mut PropertyMap) {
        out.insert("Text".into(), self.buffer.text().into());
        out.insert("DefaultText".into(), self.default_text.clone().into());
        out.insert(
            "MaximumCharacters".into(),
            (self.buffer.max_length().unwrap_or(0) as i64).into(),
        );
        out.insert("TextSize".into(), self.text_size.into());
        out.insert("ReadOnly".into(), self.read_only.into());
        out.insert(
            "PasswordCharacter".into(),
            self.password_character.map(String::from).unwrap_or_default().into(),
        );
        out.insert("InputValidator".into(), self.validator.name().into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        match name {
            "Text" => self.buffer.set_text(value.as_text(name)?),
            "DefaultText" => self.default_text = value.as_text(name)?.to_string(),
            "MaximumCharacters" => {
                let max = value.as_integer(name)?;
                self.buffer.set_max_length((max > 0).then_some(max as usize));
            }
            "TextSize" => self.text_size = value.as_number(name)?.max(0.0),
            "ReadOnly" => self.read_only = value.as_bool(name)?,
            "PasswordCharacter" => self.password_character = value.as_text(name)?.chars().next(),
            "InputValidator" => self.set_validator(InputValidator::parse(name, value.as_text(name)?)?),
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use horizon_trellis_core::ObjectId;

    use super::*;
    use crate::event::{KeyboardModifiers, MouseButton};
    use crate::tree::WidgetTree;

    fn setup() -> (WidgetTree, ObjectId, Rc<RefCell<Vec<String>>>) {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let edit = tree.add(tree.root(), EditBox::new(), "Edit").unwrap();
        tree.set_focused(edit, true).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        tree.connect(edit, "TextChanged", move |text: String| l.borrow_mut().push(text))
            .unwrap();
        (tree, edit, log)
    }

    fn type_text(tree: &mut WidgetTree, text: &str) {
        let root = tree.root();
        for c in text.chars() {
            tree.process_text_entered(root, c as u32);
        }
    }

    fn press(tree: &mut WidgetTree, key: Key, modifiers: KeyboardModifiers) {
        let root = tree.root();
        tree.process_key_press(root, &KeyEvent::with_modifiers(key, modifiers));
    }

    #[test]
    fn test_typing_and_backspace() {
        let (mut tree, edit, log) = setup();
        type_text(&mut tree, "abc");
        press(&mut tree, Key::Backspace, KeyboardModifiers::NONE);
        assert_eq!(tree.widget::<EditBox>(edit).unwrap().text(), "ab");
        assert_eq!(*log.borrow(), vec!["a", "ab", "abc", "ab"]);
    }

    #[test]
    fn test_control_characters_are_ignored() {
        let (mut tree, edit, log) = setup();
        let root = tree.root();
        tree.process_text_entered(root, 8);
        tree.process_text_entered(root, 127);
        assert_eq!(tree.widget::<EditBox>(edit).unwrap().text(), "");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_cut_and_paste_through_clipboard() {
        let (mut tree, edit, _) = setup();
        type_text(&mut tree, "hello");
        press(&mut tree, Key::A, KeyboardModifiers::CTRL);
        press(&mut tree, Key::X, KeyboardModifiers::CTRL);
        assert_eq!(tree.widget::<EditBox>(edit).unwrap().text(), "");
        assert_eq!(tree.clipboard().get_text().unwrap(), "hello");
        press(&mut tree, Key::V, KeyboardModifiers::CTRL);
        press(&mut tree, Key::V, KeyboardModifiers::CTRL);
        assert_eq!(tree.widget::<EditBox>(edit).unwrap().text(), "hellohello");
    }

    #[test]
    fn test_return_key() {
        let (mut tree, edit, _) = setup();
        let returned = Rc::new(RefCell::new(Vec::new()));
        let r = returned.clone();
        tree.connect(edit, "ReturnKeyPressed", move |text: String| r.borrow_mut().push(text))
            .unwrap();
        type_text(&mut tree, "ok");
        press(&mut tree, Key::Enter, KeyboardModifiers::NONE);
        assert_eq!(*returned.borrow(), vec!["ok"]);
    }

    #[test]
    fn test_maximum_characters_and_validator() {
        let (mut tree, edit, _) = setup();
        tree.update(edit, |e: &mut EditBox, _| {
            e.set_maximum_characters(Some(3));
            e.set_validator(InputValidator::Int);
        })
        .unwrap();
        type_text(&mut tree, "-1x234");
        assert_eq!(tree.widget::<EditBox>(edit).unwrap().text(), "-12");
    }

    #[test]
    fn test_click_places_caret() {
        let (mut tree, edit, _) = setup();
        type_text(&mut tree, "abcdef");
        // Monospace: 6.5 per grapheme at size 13, text starts at x = 2.
        let root = tree.root();
        tree.process_mouse_press(root, MouseButton::Left, Vector2f::new(2.0 + 13.0, 10.0));
        tree.process_mouse_release(root, MouseButton::Left, Vector2f::new(2.0 + 13.0, 10.0));
        assert_eq!(tree.widget::<EditBox>(edit).unwrap().buffer().caret(), 2);
    }

    #[test]
    fn test_caret_blinks_while_focused() {
        let (mut tree, edit, _) = setup();
        assert!(tree.update_time(Duration::from_millis(500)));
        assert!(!tree.widget::<EditBox>(edit).unwrap().is_caret_visible());
        assert!(!tree.update_time(Duration::from_millis(100)));
        tree.set_focused(edit, false).unwrap();
        assert!(!tree.update_time(Duration::from_secs(2)));
    }

    #[test]
    fn test_validator_partial_input() {
        assert!(InputValidator::Float.accepts("-1."));
        assert!(InputValidator::Float.accepts(""));
        assert!(!InputValidator::Float.accepts("1.2.3"));
        assert!(!InputValidator::UInt.accepts("-1"));
        assert!(InputValidator::Int.accepts("+"));
    }
}

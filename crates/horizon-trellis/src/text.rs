//! Text editing and measurement.
//!
//! [`TextBuffer`] is the caret/selection model shared by `EditBox` and
//! `TextArea`. All offsets are byte offsets into the UTF-8 text and always sit
//! on grapheme boundaries, so a caret never splits a combining sequence or an
//! emoji.
//!
//! Glyph metrics come from a [`TextMeasure`] collaborator. The default
//! [`MonospaceMeasure`] gives every grapheme the same advance, which is enough
//! for hit testing and tests; a real backend plugs in its font metrics.

use unicode_segmentation::UnicodeSegmentation;

/// Font metrics needed for caret placement and row heights.
pub trait TextMeasure {
    /// Width of `text` rendered at `character_size`.
    fn text_width(&self, text: &str, character_size: f32) -> f32;

    /// Distance between two baselines at `character_size`.
    fn line_height(&self, character_size: f32) -> f32;

    /// Byte offset of the grapheme boundary closest to `x` within `text`.
    fn offset_at(&self, text: &str, character_size: f32, x: f32) -> usize {
        if x <= 0.0 {
            return 0;
        }
        let mut left = 0.0;
        for (offset, grapheme) in text.grapheme_indices(true) {
            let right = left + self.text_width(grapheme, character_size);
            if x < right {
                return if x - left <= right - x {
                    offset
                } else {
                    offset + grapheme.len()
                };
            }
            left = right;
        }
        text.len()
    }
}

/// Fixed-advance metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    /// Advance of one grapheme as a fraction of the character size.
    pub advance: f32,
    /// Line height as a fraction of the character size.
    pub line_spacing: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            advance: 0.5,
            line_spacing: 1.25,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_width(&self, text: &str, character_size: f32) -> f32 {
        text.graphemes(true).count() as f32 * self.advance * character_size
    }

    fn line_height(&self, character_size: f32) -> f32 {
        self.line_spacing * character_size
    }
}

/// Editable text with a caret and an optional selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    caret: usize,
    anchor: Option<usize>,
    max_length: Option<usize>,
    multiline: bool,
}

impl TextBuffer {
    /// An empty single-line buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty buffer that accepts line breaks.
    pub fn multiline() -> Self {
        Self {
            multiline: true,
            ..Self::default()
        }
    }

    /// The full text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text; the caret moves to the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = self.filter(text);
        if let Some(max) = self.max_length {
            self.text = self.text.graphemes(true).take(max).collect();
        }
        self.caret = self.text.len();
        self.anchor = None;
    }

    /// Whether line breaks are kept.
    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// Maximum number of graphemes, if limited.
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Limit the number of graphemes. Existing text is truncated.
    pub fn set_max_length(&mut self, max: Option<usize>) {
        self.max_length = max;
        if let Some(max) = max {
            if self.grapheme_count() > max {
                let text = self.text.clone();
                self.set_text(&text);
            }
        }
    }

    /// Number of graphemes in the text.
    pub fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    fn filter(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n");
        if self.multiline {
            text
        } else {
            text.replace('\n', "")
        }
    }

    // =========================================================================
    // Caret and selection
    // =========================================================================

    /// The caret as a byte offset.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Move the caret, snapping to a grapheme boundary.
    ///
    /// With `extend` the selection grows from its anchor (or from the old
    /// caret); otherwise any selection is dropped.
    pub fn set_caret(&mut self, pos: usize, extend: bool) {
        let pos = self.snap(pos.min(self.text.len()));
        self.place_caret(pos, extend);
    }

    fn place_caret(&mut self, pos: usize, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.caret);
            }
        } else {
            self.anchor = None;
        }
        self.caret = pos;
    }

    /// Whether a non-empty range is selected.
    pub fn has_selection(&self) -> bool {
        self.anchor.is_some_and(|anchor| anchor != self.caret)
    }

    /// The selected byte range, ordered.
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        self.anchor
            .filter(|&anchor| anchor != self.caret)
            .map(|anchor| (anchor.min(self.caret), anchor.max(self.caret)))
    }

    /// The selected text, empty without selection.
    pub fn selected_text(&self) -> &str {
        match self.selection_range() {
            Some((start, end)) => &self.text[start..end],
            None => "",
        }
    }

    /// Select everything, caret at the end.
    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.caret = self.text.len();
    }

    /// Select a byte range, caret at `end`.
    pub fn select(&mut self, start: usize, end: usize) {
        let start = self.snap(start.min(self.text.len()));
        let end = self.snap(end.min(self.text.len()));
        self.anchor = Some(start);
        self.caret = end;
    }

    /// Drop the selection without touching the text.
    pub fn deselect(&mut self) {
        self.anchor = None;
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Insert text at the caret, replacing the selection.
    ///
    /// Returns whether the text changed.
    pub fn insert(&mut self, text: &str) -> bool {
        let mut changed = self.delete_selection();
        let mut text = self.filter(text);
        if let Some(max) = self.max_length {
            let allowed = max.saturating_sub(self.grapheme_count());
            text = text.graphemes(true).take(allowed).collect();
        }
        if !text.is_empty() {
            self.text.insert_str(self.caret, &text);
            self.caret += text.len();
            changed = true;
        }
        changed
    }

    /// Remove the selected text. Returns whether anything was removed.
    pub fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection_range() else {
            self.anchor = None;
            return false;
        };
        self.text.replace_range(start..end, "");
        self.caret = start;
        self.anchor = None;
        true
    }

    /// Backspace: remove the selection or the grapheme before the caret.
    pub fn backspace(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.caret == 0 {
            return false;
        }
        let prev = self.prev_boundary(self.caret);
        self.text.replace_range(prev..self.caret, "");
        self.caret = prev;
        true
    }

    /// Delete: remove the selection or the grapheme after the caret.
    pub fn delete(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.caret >= self.text.len() {
            return false;
        }
        let next = self.next_boundary(self.caret);
        self.text.replace_range(self.caret..next, "");
        true
    }

    /// Remove and return the selection.
    pub fn cut(&mut self) -> Option<String> {
        let selected = self.selected_text().to_string();
        if selected.is_empty() {
            return None;
        }
        self.delete_selection();
        Some(selected)
    }

    // =========================================================================
    // Caret movement
    // =========================================================================

    /// One grapheme (or word) to the left. A selection collapses to its
    /// start when not extending.
    pub fn move_left(&mut self, extend: bool, word: bool) {
        if !extend {
            if let Some((start, _)) = self.selection_range() {
                self.place_caret(start, false);
                return;
            }
        }
        let pos = if word {
            self.word_boundary_before(self.caret)
        } else {
            self.prev_boundary(self.caret)
        };
        self.place_caret(pos, extend);
    }

    /// One grapheme (or word) to the right.
    pub fn move_right(&mut self, extend: bool, word: bool) {
        if !extend {
            if let Some((_, end)) = self.selection_range() {
                self.place_caret(end, false);
                return;
            }
        }
        let pos = if word {
            self.word_boundary_after(self.caret)
        } else {
            self.next_boundary(self.caret)
        };
        self.place_caret(pos, extend);
    }

    /// To the start of the current line.
    pub fn move_home(&mut self, extend: bool) {
        let (line, _) = self.caret_line_column();
        let pos = self.line_start(line);
        self.place_caret(pos, extend);
    }

    /// To the end of the current line.
    pub fn move_end(&mut self, extend: bool) {
        let (line, _) = self.caret_line_column();
        let pos = self.line_start(line) + self.line(line).len();
        self.place_caret(pos, extend);
    }

    /// One line up, keeping the column where possible.
    pub fn move_up(&mut self, extend: bool) {
        let (line, column) = self.caret_line_column();
        let pos = if line == 0 {
            0
        } else {
            self.offset_of(line - 1, column)
        };
        self.place_caret(pos, extend);
    }

    /// One line down, keeping the column where possible.
    pub fn move_down(&mut self, extend: bool) {
        let (line, column) = self.caret_line_column();
        let pos = if line + 1 >= self.line_count() {
            self.text.len()
        } else {
            self.offset_of(line + 1, column)
        };
        self.place_caret(pos, extend);
    }

    // =========================================================================
    // Lines
    // =========================================================================

    /// Number of lines (at least one).
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// The text of one line without its break, empty past the end.
    pub fn line(&self, index: usize) -> &str {
        self.text.split('\n').nth(index).unwrap_or("")
    }

    /// Iterate over the lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    fn line_start(&self, index: usize) -> usize {
        self.text
            .split('\n')
            .take(index)
            .map(|line| line.len() + 1)
            .sum()
    }

    /// Line index and grapheme column of the caret.
    pub fn caret_line_column(&self) -> (usize, usize) {
        let before = &self.text[..self.caret];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        (line, before[line_start..].graphemes(true).count())
    }

    /// Byte offset of a line/column pair, clamped to the line.
    pub fn offset_of(&self, line: usize, column: usize) -> usize {
        let line = line.min(self.line_count().saturating_sub(1));
        let start = self.line_start(line);
        let within: usize = self
            .line(line)
            .graphemes(true)
            .take(column)
            .map(str::len)
            .sum();
        start + within
    }

    // =========================================================================
    // Boundaries
    // =========================================================================

    fn prev_boundary(&self, pos: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .map(|(offset, _)| offset)
            .take_while(|&offset| offset < pos)
            .last()
            .unwrap_or(0)
    }

    fn next_boundary(&self, pos: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .map(|(offset, g)| offset + g.len())
            .find(|&end| end > pos)
            .unwrap_or(self.text.len())
    }

    fn snap(&self, pos: usize) -> usize {
        let mut offset = 0;
        for grapheme in self.text.graphemes(true) {
            let next = offset + grapheme.len();
            if pos <= offset {
                return offset;
            }
            if pos < next {
                return if pos - offset <= next - pos { offset } else { next };
            }
            offset = next;
        }
        self.text.len()
    }

    fn word_boundary_before(&self, pos: usize) -> usize {
        let chars: Vec<(usize, char)> = self.text[..pos].char_indices().collect();
        let mut idx = chars.len();
        while idx > 0 && !chars[idx - 1].1.is_alphanumeric() {
            idx -= 1;
        }
        while idx > 0 && chars[idx - 1].1.is_alphanumeric() {
            idx -= 1;
        }
        chars.get(idx).map_or(0, |&(offset, _)| offset)
    }

    fn word_boundary_after(&self, pos: usize) -> usize {
        let rest = &self.text[pos..];
        let mut chars = rest.char_indices().peekable();
        while chars.next_if(|&(_, c)| c.is_alphanumeric()).is_some() {}
        while chars.next_if(|&(_, c)| !c.is_alphanumeric()).is_some() {}
        chars.peek().map_or(self.text.len(), |&(offset, _)| pos + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> TextBuffer {
        let mut buffer = TextBuffer::new();
        buffer.set_text(text);
        buffer
    }

    #[test]
    fn test_insert_and_backspace() {
        let mut text = buffer("Hello");
        assert!(text.insert(" world"));
        assert_eq!(text.text(), "Hello world");
        assert!(text.backspace());
        assert_eq!(text.text(), "Hello worl");
        text.set_caret(0, false);
        assert!(!text.backspace());
        assert!(text.delete());
        assert_eq!(text.text(), "ello worl");
    }

    #[test]
    fn test_grapheme_boundaries() {
        // 'e' + combining acute accent is one grapheme.
        let mut text = buffer("ae\u{301}b");
        text.set_caret(0, false);
        text.move_right(false, false);
        text.move_right(false, false);
        assert_eq!(text.caret(), 1 + "e\u{301}".len());
        assert!(text.backspace());
        assert_eq!(text.text(), "ab");
        // A position inside the sequence snaps to a boundary.
        let mut text = buffer("e\u{301}");
        text.set_caret(1, false);
        assert!(text.caret() == 0 || text.caret() == 3);
    }

    #[test]
    fn test_selection() {
        let mut text = buffer("Hello world");
        text.set_caret(0, false);
        text.move_right(true, true);
        assert_eq!(text.selected_text(), "Hello ");
        assert!(text.insert("Goodbye "));
        assert_eq!(text.text(), "Goodbye world");
        assert!(!text.has_selection());

        text.select_all();
        assert_eq!(text.cut().as_deref(), Some("Goodbye world"));
        assert_eq!(text.text(), "");
        assert_eq!(text.cut(), None);
    }

    #[test]
    fn test_move_collapses_selection() {
        let mut text = buffer("abcdef");
        text.select(1, 4);
        text.move_left(false, false);
        assert_eq!(text.caret(), 1);
        text.select(1, 4);
        text.move_right(false, false);
        assert_eq!(text.caret(), 4);
    }

    #[test]
    fn test_word_movement() {
        let mut text = buffer("one two  three");
        text.move_left(false, true);
        assert_eq!(text.caret(), 9);
        text.move_left(false, true);
        assert_eq!(text.caret(), 4);
        text.move_right(false, true);
        assert_eq!(text.caret(), 9);
    }

    #[test]
    fn test_single_line_drops_breaks() {
        let mut text = TextBuffer::new();
        text.insert("a\nb");
        assert_eq!(text.text(), "ab");
        let mut area = TextBuffer::multiline();
        area.insert("a\r\nb");
        assert_eq!(area.text(), "a\nb");
    }

    #[test]
    fn test_max_length() {
        let mut text = TextBuffer::new();
        text.set_max_length(Some(3));
        text.insert("abcdef");
        assert_eq!(text.text(), "abc");
        assert!(!text.insert("x"));
    }

    #[test]
    fn test_lines_and_vertical_movement() {
        let mut text = TextBuffer::multiline();
        text.set_text("first line\nab\nthird");
        assert_eq!(text.line_count(), 3);
        assert_eq!(text.caret_line_column(), (2, 5));

        text.move_up(false);
        assert_eq!(text.caret_line_column(), (1, 2));
        text.move_up(false);
        assert_eq!(text.caret_line_column(), (0, 2));
        text.move_end(false);
        assert_eq!(text.caret_line_column(), (0, 10));
        text.move_down(false);
        assert_eq!(text.caret_line_column(), (1, 2));
        text.move_home(true);
        assert_eq!(text.selected_text(), "ab");
    }

    #[test]
    fn test_monospace_offsets() {
        let measure = MonospaceMeasure::default();
        assert_eq!(measure.text_width("abcd", 20.0), 40.0);
        assert_eq!(measure.offset_at("abcd", 20.0, 14.0), 1);
        assert_eq!(measure.offset_at("abcd", 20.0, 16.0), 2);
        assert_eq!(measure.offset_at("abcd", 20.0, 100.0), 4);
        assert_eq!(measure.offset_at("abcd", 20.0, -5.0), 0);
    }
}

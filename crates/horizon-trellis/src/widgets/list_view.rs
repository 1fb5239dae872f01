//! Multi-column list with a header.

use std::collections::BTreeSet;
use std::time::Duration;

use horizon_trellis_core::{PropertyError, PropertyMap, PropertyValue, SignalSpec};

use super::scrollbar::{
    scrollbar_visibility, ScrollbarGeometry, ScrollbarModel, ScrollbarPolicy, DEFAULT_SCROLLBAR_WIDTH,
};
use crate::event::{Key, KeyEvent};
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part};
use crate::widget::{signals, MouseRouting, Widget, WidgetCore, WidgetCtx, WidgetKind};

/// Width given to a column added without one.
pub const DEFAULT_COLUMN_WIDTH: f32 = 100.0;

/// One column of a [`ListView`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListViewColumn {
    /// Header text.
    pub caption: String,
    /// Width in pixels.
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bar {
    Horizontal,
    Vertical,
}

/// Rows of cells under a row of column headers.
///
/// Clicking a row selects it; with multi-select enabled clicks toggle rows
/// instead. Two clicks on the same row within the double-click time emit
/// `DoubleClicked`. Clicking a header emits `HeaderClicked`.
#[derive(Debug, Clone)]
pub struct ListView {
    columns: Vec<ListViewColumn>,
    rows: Vec<Vec<String>>,
    selected: BTreeSet<usize>,
    multi_select: bool,
    hovered: Option<usize>,
    header_visible: bool,
    header_height: f32,
    item_height: f32,
    horizontal: ScrollbarModel,
    vertical: ScrollbarModel,
    scrollbar_width: f32,
    active_bar: Option<Bar>,
    last_click: Option<(usize, Duration)>,
    // Outer size from the last hook, for changes made outside hooks.
    size: Vector2f,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    /// An empty list without columns.
    pub fn new() -> Self {
        let mut list = Self {
            columns: Vec::new(),
            rows: Vec::new(),
            selected: BTreeSet::new(),
            multi_select: false,
            hovered: None,
            header_visible: true,
            header_height: 24.0,
            item_height: 20.0,
            horizontal: ScrollbarModel::new(),
            vertical: ScrollbarModel::new(),
            scrollbar_width: DEFAULT_SCROLLBAR_WIDTH,
            active_bar: None,
            last_click: None,
            size: Vector2f::ZERO,
        };
        list.size = list.default_size();
        list
    }

    /// Builder-style column.
    pub fn with_column(mut self, caption: impl Into<String>, width: f32) -> Self {
        self.add_column(caption, width);
        self
    }

    /// Builder-style multi-select.
    pub fn with_multi_select(mut self, multi_select: bool) -> Self {
        self.multi_select = multi_select;
        self
    }

    /// Append a column. Returns its index.
    pub fn add_column(&mut self, caption: impl Into<String>, width: f32) -> usize {
        let width = if width > 0.0 { width } else { DEFAULT_COLUMN_WIDTH };
        self.columns.push(ListViewColumn {
            caption: caption.into(),
            width,
        });
        self.update_scrollbars();
        self.columns.len() - 1
    }

    /// The columns.
    pub fn columns(&self) -> &[ListViewColumn] {
        &self.columns
    }

    /// Change the width of a column. Returns false for a bad index.
    pub fn set_column_width(&mut self, index: usize, width: f32) -> bool {
        let Some(column) = self.columns.get_mut(index) else {
            return false;
        };
        column.width = width.max(0.0);
        self.update_scrollbars();
        true
    }

    /// Remove every column; rows are kept.
    pub fn remove_all_columns(&mut self) {
        self.columns.clear();
        self.update_scrollbars();
    }

    /// Append a row of cells. Returns its index.
    pub fn add_item<I, S>(&mut self, cells: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self.update_scrollbars();
        self.rows.len() - 1
    }

    /// Replace the cells of a row. Returns false for a bad index.
    pub fn change_item<I, S>(&mut self, index: usize, cells: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        *row = cells.into_iter().map(Into::into).collect();
        true
    }

    /// Remove a row. Returns false for a bad index.
    pub fn remove_item(&mut self, index: usize, ctx: &mut WidgetCtx<'_>) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        let was_selected = self.selected.remove(&index);
        self.selected = self
            .selected
            .iter()
            .map(|&i| if i > index { i - 1 } else { i })
            .collect();
        self.hovered = None;
        self.last_click = None;
        self.update_scrollbars();
        if was_selected {
            ctx.emit_value(signals::ITEM_SELECTED, self.selected_item_index());
        }
        true
    }

    /// Remove every row.
    pub fn remove_all_items(&mut self, ctx: &mut WidgetCtx<'_>) {
        self.rows.clear();
        self.hovered = None;
        self.last_click = None;
        self.update_scrollbars();
        if !self.selected.is_empty() {
            self.selected.clear();
            ctx.emit_value(signals::ITEM_SELECTED, None::<usize>);
        }
    }

    /// Number of rows.
    pub fn item_count(&self) -> usize {
        self.rows.len()
    }

    /// The cells of a row.
    pub fn item_row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// One cell; missing cells of a short row read as empty.
    pub fn item_cell(&self, row: usize, column: usize) -> Option<&str> {
        let row = self.rows.get(row)?;
        (column < self.columns.len().max(row.len()))
            .then(|| row.get(column).map_or("", String::as_str))
    }

    /// Whether several rows can be selected.
    pub fn multi_select(&self) -> bool {
        self.multi_select
    }

    /// Allow or forbid several selected rows. Turning it off keeps only the
    /// first selected row.
    pub fn set_multi_select(&mut self, multi_select: bool) {
        self.multi_select = multi_select;
        if !multi_select {
            let first = self.selected.first().copied();
            self.selected = first.into_iter().collect();
        }
    }

    /// First selected row.
    pub fn selected_item_index(&self) -> Option<usize> {
        self.selected.first().copied()
    }

    /// All selected rows, ascending.
    pub fn selected_item_indices(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// Select one row, replacing the selection. Returns false (and
    /// deselects) for a bad index.
    pub fn set_selected_item(&mut self, index: usize, ctx: &mut WidgetCtx<'_>) -> bool {
        if index >= self.rows.len() {
            self.deselect_items(ctx);
            return false;
        }
        self.select_only(index, ctx);
        true
    }

    /// Clear the selection.
    pub fn deselect_items(&mut self, ctx: &mut WidgetCtx<'_>) {
        if !self.selected.is_empty() {
            self.selected.clear();
            ctx.emit_value(signals::ITEM_SELECTED, None::<usize>);
        }
    }

    /// Show or hide the header row.
    pub fn set_header_visible(&mut self, visible: bool) {
        self.header_visible = visible;
        self.update_scrollbars();
    }

    /// Height of every row.
    pub fn item_height(&self) -> f32 {
        self.item_height
    }

    /// Change the height of every row.
    pub fn set_item_height(&mut self, height: f32) {
        self.item_height = height.max(1.0);
        self.update_scrollbars();
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
    pub fn set_vertical_policy(&mut self, policy: ScrollbarPolicy) {
        self.vertical.set_policy(policy);
        self.update_scrollbars();
    }

    /// Change when the horizontal bar shows.
    pub fn set_horizontal_policy(&mut self, policy: ScrollbarPolicy) {
        self.horizontal.set_policy(policy);
        self.update_scrollbars();
    }

    fn select_only(&mut self, index: usize, ctx: &mut WidgetCtx<'_>) {
        if self.selected.len() == 1 && self.selected.contains(&index) {
            return;
        }
        self.selected.clear();
        self.selected.insert(index);
        ctx.emit_value(signals::ITEM_SELECTED, Some(index));
    }

    fn header(&self) -> f32 {
        if self.header_visible { self.header_height } else { 0.0 }
    }

    fn content_size(&self) -> Vector2f {
        Vector2f::new(
            self.columns.iter().map(|c| c.width).sum(),
            self.rows.len() as f32 * self.item_height,
        )
    }

    fn update_scrollbars(&mut self) {
        let area = Vector2f::new(self.size.x, (self.size.y - self.header()).max(0.0));
        let content = self.content_size();
        let layout = scrollbar_visibility(
            content,
            area,
            self.scrollbar_width,
            self.horizontal.policy(),
            self.vertical.policy(),
        );
        self.horizontal.set_content_size(content.x);
        self.horizontal.set_viewport_size(layout.viewport.x);
        self.vertical.set_content_size(content.y);
        self.vertical.set_viewport_size(layout.viewport.y);
        self.vertical.set_scroll_amount(self.item_height);
    }

    fn bar_geometry(&self, bar: Bar) -> ScrollbarGeometry {
        let (size, w, top) = (self.size, self.scrollbar_width, self.header());
        match bar {
            Bar::Vertical => ScrollbarGeometry {
                rect: Rect::new(
                    size.x - w,
                    top,
                    w,
                    (size.y - top - if self.horizontal.is_shown() { w } else { 0.0 }).max(0.0),
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

    fn bar_at(&self, pos: Vector2f) -> Option<Bar> {
        [(Bar::Vertical, &self.vertical), (Bar::Horizontal, &self.horizontal)]
            .into_iter()
            .find(|(bar, model)| model.is_shown() && self.bar_geometry(*bar).rect.contains(pos))
            .map(|(bar, _)| bar)
    }

    fn model_mut(&mut self, bar: Bar) -> &mut ScrollbarModel {
        match bar {
            Bar::Horizontal => &mut self.horizontal,
            Bar::Vertical => &mut self.vertical,
        }
    }

    fn column_at(&self, x: f32) -> Option<usize> {
        let x = x + self.horizontal.value();
        let mut left = 0.0;
        for (index, column) in self.columns.iter().enumerate() {
            if x >= left && x < left + column.width {
                return Some(index);
            }
            left += column.width;
        }
        None
    }

    fn row_at(&self, y: f32) -> Option<usize> {
        let y = y - self.header() + self.vertical.value();
        if y < 0.0 || y >= self.vertical.viewport_size() + self.vertical.value() {
            return None;
        }
        let row = (y / self.item_height) as usize;
        (row < self.rows.len()).then_some(row)
    }

    /// Scroll so that a row is fully visible.
    fn scroll_to(&mut self, row: usize) {
        let top = row as f32 * self.item_height;
        if top < self.vertical.value() {
            self.vertical.set_value(top);
        } else if top + self.item_height > self.vertical.value() + self.vertical.viewport_size() {
            self.vertical
                .set_value(top + self.item_height - self.vertical.viewport_size());
        }
    }

    fn rows_per_page(&self) -> usize {
        ((self.vertical.viewport_size() / self.item_height) as usize).max(1)
    }
}

impl Widget for ListView {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ListView
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::LIST_VIEW
    }

    fn default_size(&self) -> Vector2f {
        Vector2f::new(300.0, 200.0)
    }

    fn is_draggable(&self) -> bool {
        true
    }

    fn left_mouse_pressed(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        self.size = ctx.core().size();
        if let Some(bar) = self.bar_at(pos) {
            let geometry = self.bar_geometry(bar);
            self.model_mut(bar).press(&geometry, pos);
            self.active_bar = Some(bar);
            return MouseRouting::Consumed;
        }
        if pos.y < self.header() {
            if let Some(column) = self.column_at(pos.x) {
                ctx.emit_value(signals::HEADER_CLICKED, column);
            }
            return MouseRouting::Consumed;
        }
        let Some(row) = self.row_at(pos.y) else {
            self.last_click = None;
            self.deselect_items(ctx);
            return MouseRouting::Consumed;
        };

        if self.multi_select {
            if !self.selected.remove(&row) {
                self.selected.insert(row);
            }
            ctx.emit_value(signals::ITEM_SELECTED, Some(row));
        } else {
            self.select_only(row, ctx);
        }

        let now = ctx.clock();
        match self.last_click {
            Some((last_row, at)) if last_row == row && now.saturating_sub(at) <= ctx.double_click_time() => {
                self.last_click = None;
                ctx.emit_value(signals::DOUBLE_CLICKED, row);
            }
            _ => self.last_click = Some((row, now)),
        }
        MouseRouting::Consumed
    }

    fn mouse_moved(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if let Some(bar) = self.active_bar.filter(|_| ctx.core().is_mouse_down()) {
            let geometry = self.bar_geometry(bar);
            self.model_mut(bar).drag(&geometry, pos);
            return MouseRouting::Consumed;
        }
        self.hovered = if pos.y >= self.header() && self.bar_at(pos).is_none() {
            self.row_at(pos.y)
        } else {
            None
        };
        MouseRouting::Consumed
    }

    fn left_mouse_button_no_longer_down(&mut self, _ctx: &mut WidgetCtx<'_>) {
        if let Some(bar) = self.active_bar.take() {
            self.model_mut(bar).release();
        }
    }

    fn mouse_no_longer_on_widget(&mut self, _ctx: &mut WidgetCtx<'_>) {
        self.hovered = None;
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
        if self.rows.is_empty() {
            return false;
        }
        let last = self.rows.len() - 1;
        let current = self.selected.last().copied();
        let target = match event.key {
            Key::A if event.is_shortcut() && self.multi_select => {
                self.selected = (0..self.rows.len()).collect();
                ctx.emit_value(signals::ITEM_SELECTED, Some(0usize));
                return true;
            }
            Key::ArrowUp => current.map_or(0, |i| i.saturating_sub(1)),
            Key::ArrowDown => current.map_or(0, |i| (i + 1).min(last)),
            Key::PageUp => current.map_or(0, |i| i.saturating_sub(self.rows_per_page())),
            Key::PageDown => current.map_or(0, |i| (i + self.rows_per_page()).min(last)),
            Key::Home => 0,
            Key::End => last,
            _ => return false,
        };
        self.select_only(target, ctx);
        self.scroll_to(target);
        true
    }

    fn size_changed(&mut self, size: Vector2f, _ctx: &mut WidgetCtx<'_>) {
        self.size = size;
        self.update_scrollbars();
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        let size = core.size();
        list.push(Part::Background, Rect::from_origin_size(Vector2f::ZERO, size));
        let scroll = Vector2f::new(self.horizontal.value(), self.vertical.value());
        let top = self.header();

        let mut left = -scroll.x;
        for (index, column) in self.columns.iter().enumerate() {
            if self.header_visible {
                let rect = Rect::new(left, 0.0, column.width, self.header_height);
                list.push(Part::Header(index), rect);
                list.push(Part::Text(column.caption.clone()), rect);
            }
            left += column.width;
        }

        let row_width = self.content_size().x.max(self.horizontal.viewport_size());
        let first = (scroll.y / self.item_height) as usize;
        let visible = (self.vertical.viewport_size() / self.item_height).ceil() as usize + 1;
        for (index, row) in self.rows.iter().enumerate().skip(first).take(visible) {
            let y = top + index as f32 * self.item_height - scroll.y;
            list.push(
                Part::Item {
                    index,
                    selected: self.selected.contains(&index),
                    hovered: self.hovered == Some(index),
                },
                Rect::new(-scroll.x, y, row_width, self.item_height),
            );
            let mut left = -scroll.x;
            for (cell, column) in row.iter().zip(&self.columns) {
                if !cell.is_empty() {
                    list.push(Part::Text(cell.clone()), Rect::new(left, y, column.width, self.item_height));
                }
                left += column.width;
            }
        }

        for (bar, model) in [(Bar::Vertical, &self.vertical), (Bar::Horizontal, &self.horizontal)] {
            if model.is_shown() {
                model.draw(&self.bar_geometry(bar), list);
            }
        }
    }

    fn properties(&self, out: &mut PropertyMap) {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("{}\t{}", c.caption, c.width))
            .collect::<Vec<_>>();
        out.insert("Columns".into(), columns.into());
        let rows = self.rows.iter().map(|row| row.join("\t")).collect::<Vec<_>>();
        out.insert("Items".into(), rows.into());
        out.insert("MultiSelect".into(), self.multi_select.into());
        out.insert("HeaderVisible".into(), self.header_visible.into());
        out.insert("HeaderHeight".into(), self.header_height.into());
        out.insert("ItemHeight".into(), self.item_height.into());
        out.insert("HorizontalScrollbarPolicy".into(), self.horizontal.policy().name().into());
        out.insert("VerticalScrollbarPolicy".into(), self.vertical.policy().name().into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        match name {
            "Columns" => {
                let mut columns = Vec::new();
                for entry in value.as_text_list(name)? {
                    let (caption, width) = entry.rsplit_once('\t').ok_or(PropertyError::TypeMismatch {
                        name: name.to_string(),
                        expected: "caption and width separated by a tab",
                        got: "text",
                    })?;
                    let width = width.parse::<f32>().map_err(|_| PropertyError::TypeMismatch {
                        name: name.to_string(),
                        expected: "a numeric column width",
                        got: "text",
                    })?;
                    columns.push(ListViewColumn {
                        caption: caption.to_string(),
                        width,
                    });
                }
                self.columns = columns;
            }
            "Items" => {
                self.rows = value
                    .as_text_list(name)?
                    .iter()
                    .map(|row| row.split('\t').map(str::to_string).collect())
                    .collect();
                self.selected.retain(|&i| i < self.rows.len());
            }
            "MultiSelect" => self.set_multi_select(value.as_bool(name)?),
            "HeaderVisible" => self.header_visible = value.as_bool(name)?,
            "HeaderHeight" => self.header_height = value.as_number(name)?.max(0.0),
            "ItemHeight" => self.item_height = value.as_number(name)?.max(1.0),
            "HorizontalScrollbarPolicy" => {
                self.horizontal.set_policy(ScrollbarPolicy::parse(name, value.as_text(name)?)?);
            }
            "VerticalScrollbarPolicy" => {
                self.vertical.set_policy(ScrollbarPolicy::parse(name, value.as_text(name)?)?);
            }
            _ => return Err(PropertyError::unknown(name)),
        }
        self.update_scrollbars();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use horizon_trellis_core::ObjectId;

    use super::*;
    use crate::event::MouseButton;
    use crate::tree::WidgetTree;

    fn setup(rows: usize) -> (WidgetTree, ObjectId) {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let mut list = ListView::new().with_column("Name", 120.0).with_column("Size", 80.0);
        for i in 0..rows {
            list.add_item([format!("file{i}"), format!("{i} KB")]);
        }
        let id = tree.add(tree.root(), list, "List").unwrap();
        (tree, id)
    }

    fn click(tree: &mut WidgetTree, x: f32, y: f32) {
        let root = tree.root();
        tree.process_mouse_press(root, MouseButton::Left, Vector2f::new(x, y));
        tree.process_mouse_release(root, MouseButton::Left, Vector2f::new(x, y));
    }

    #[test]
    fn test_click_row_and_double_click() {
        let (mut tree, list) = setup(3);
        let selected = Rc::new(RefCell::new(Vec::new()));
        let s = selected.clone();
        tree.connect(list, "ItemSelected", move |index: Option<usize>| s.borrow_mut().push(index))
            .unwrap();
        let doubled = Rc::new(RefCell::new(Vec::new()));
        let d = doubled.clone();
        tree.connect(list, "DoubleClicked", move |index: usize| d.borrow_mut().push(index))
            .unwrap();

        // Header is 24 high, rows 20: y = 50 is row 1.
        click(&mut tree, 10.0, 50.0);
        tree.update_time(Duration::from_millis(200));
        click(&mut tree, 10.0, 50.0);
        // Too late for a double click.
        tree.update_time(Duration::from_millis(600));
        click(&mut tree, 10.0, 50.0);
        assert_eq!(*selected.borrow(), vec![Some(1)]);
        assert_eq!(*doubled.borrow(), vec![1]);

        // Below the last row deselects.
        click(&mut tree, 10.0, 150.0);
        assert_eq!(*selected.borrow(), vec![Some(1), None]);
    }

    #[test]
    fn test_header_click() {
        let (mut tree, list) = setup(1);
        let headers = Rc::new(RefCell::new(Vec::new()));
        let h = headers.clone();
        tree.connect(list, "HeaderClicked", move |column: usize| h.borrow_mut().push(column))
            .unwrap();
        click(&mut tree, 10.0, 10.0);
        click(&mut tree, 150.0, 10.0);
        click(&mut tree, 250.0, 10.0);
        assert_eq!(*headers.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_multi_select_toggles() {
        let (mut tree, list) = setup(4);
        tree.update(list, |l: &mut ListView, _| l.set_multi_select(true)).unwrap();
        click(&mut tree, 10.0, 30.0);
        click(&mut tree, 10.0, 90.0);
        tree.update_time(Duration::from_secs(1));
        click(&mut tree, 10.0, 30.0);
        let widget = tree.widget::<ListView>(list).unwrap();
        assert_eq!(widget.selected_item_indices(), vec![3]);
    }

    #[test]
    fn test_scrollbar_and_keyboard() {
        // 200 high: 176 for rows, 8.8 rows of 20 visible.
        let (mut tree, list) = setup(20);
        let widget = tree.widget::<ListView>(list).unwrap();
        assert!(widget.vertical_scrollbar().is_shown());
        assert!(!widget.horizontal_scrollbar().is_shown());

        tree.set_focused(list, true).unwrap();
        let root = tree.root();
        tree.process_key_press(root, &KeyEvent::new(Key::End));
        let widget = tree.widget::<ListView>(list).unwrap();
        assert_eq!(widget.selected_item_index(), Some(19));
        assert_eq!(widget.vertical_scrollbar().value(), 400.0 - 176.0);

        tree.process_key_press(root, &KeyEvent::new(Key::Home));
        assert_eq!(tree.widget::<ListView>(list).unwrap().vertical_scrollbar().value(), 0.0);
    }

    #[test]
    fn test_remove_item_shifts_selection() {
        let (mut tree, list) = setup(3);
        tree.update(list, |l: &mut ListView, ctx| {
            l.set_selected_item(2, ctx);
            assert!(l.remove_item(0, ctx));
            assert_eq!(l.selected_item_index(), Some(1));
            assert!(!l.remove_item(7, ctx));
            assert_eq!(l.item_cell(0, 0), Some("file1"));
        })
        .unwrap();
    }

    #[test]
    fn test_columns_and_items_properties() {
        let (tree, list) = setup(2);
        let mut out = PropertyMap::new();
        tree.widget::<ListView>(list).unwrap().properties(&mut out);
        let mut copy = ListView::new();
        for (name, value) in &out {
            copy.set_property(name, value).unwrap();
        }
        assert_eq!(copy.columns()[1].caption, "Size");
        assert_eq!(copy.columns()[1].width, 80.0);
        assert_eq!(copy.item_row(1), Some(&["file1".to_string(), "1 KB".to_string()][..]));
    }
}

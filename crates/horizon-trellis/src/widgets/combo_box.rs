//! Drop-down selection.

use horizon_trellis_core::{PropertyError, PropertyMap, PropertyValue, SignalSpec};

use crate::event::{Key, KeyEvent};
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part};
use crate::widget::{signals, MouseRouting, TreeRequest, Widget, WidgetCore, WidgetCtx, WidgetKind};

/// A closed box showing the selected item that opens a list below itself.
///
/// Every row of the open list is as tall as the box. With
/// `items_to_display` set, the list shows that many rows and the wheel
/// scrolls it. Emits `ItemSelected(Option<usize>)`.
#[derive(Debug, Clone, Default)]
pub struct ComboBox {
    items: Vec<String>,
    selected: Option<usize>,
    expanded: bool,
    hovered: Option<usize>,
    items_to_display: usize,
    first_visible: usize,
}

impl ComboBox {
    /// An empty combo box.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style items.
    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    /// The items.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Append an item. Returns its index.
    pub fn add_item(&mut self, text: impl Into<String>) -> usize {
        self.items.push(text.into());
        self.items.len() - 1
    }

    /// Replace the text of an item. Returns false for a bad index.
    pub fn change_item(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                *item = text.into();
                true
            }
            None => false,
        }
    }

    /// Remove an item. Removing the selected item clears the selection.
    /// Returns false for a bad index.
    pub fn remove_item(&mut self, index: usize, ctx: &mut WidgetCtx<'_>) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        self.hovered = None;
        self.first_visible = self.first_visible.min(self.items.len().saturating_sub(1));
        match self.selected {
            Some(selected) if selected == index => self.select(None, ctx),
            Some(selected) if selected > index => self.selected = Some(selected - 1),
            _ => {}
        }
        true
    }

    /// Remove every item.
    pub fn remove_all_items(&mut self, ctx: &mut WidgetCtx<'_>) {
        self.items.clear();
        self.hovered = None;
        self.first_visible = 0;
        self.select(None, ctx);
    }

    /// Index of the selected item.
    pub fn selected_item_index(&self) -> Option<usize> {
        self.selected
    }

    /// Text of the selected item.
    pub fn selected_item(&self) -> Option<&str> {
        self.selected.and_then(|i| self.items.get(i)).map(String::as_str)
    }

    /// Select by index. Returns false (and deselects) for a bad index.
    pub fn set_selected_item_index(&mut self, index: usize, ctx: &mut WidgetCtx<'_>) -> bool {
        if index >= self.items.len() {
            self.select(None, ctx);
            return false;
        }
        self.select(Some(index), ctx);
        true
    }

    /// Select the first item with this text. Returns false (and deselects)
    /// when there is none.
    pub fn set_selected_item(&mut self, text: &str, ctx: &mut WidgetCtx<'_>) -> bool {
        let index = self.items.iter().position(|item| item == text);
        self.select(index, ctx);
        index.is_some()
    }

    /// Clear the selection.
    pub fn deselect_item(&mut self, ctx: &mut WidgetCtx<'_>) {
        self.select(None, ctx);
    }

    /// Whether the list is open.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Maximum rows shown at once, 0 for all.
    pub fn items_to_display(&self) -> usize {
        self.items_to_display
    }

    /// Limit the rows shown at once; 0 shows all.
    pub fn set_items_to_display(&mut self, count: usize) {
        self.items_to_display = count;
    }

    fn select(&mut self, index: Option<usize>, ctx: &mut WidgetCtx<'_>) {
        if self.selected == index {
            return;
        }
        self.selected = index;
        ctx.emit_value(signals::ITEM_SELECTED, index);
    }

    fn visible_rows(&self) -> usize {
        let remaining = self.items.len() - self.first_visible.min(self.items.len());
        if self.items_to_display == 0 {
            remaining
        } else {
            self.items_to_display.min(remaining)
        }
    }

    fn list_rect(&self, size: Vector2f) -> Rect {
        Rect::new(0.0, size.y, size.x, self.visible_rows() as f32 * size.y)
    }

    fn item_at(&self, pos: Vector2f, size: Vector2f) -> Option<usize> {
        let list = self.list_rect(size);
        if !self.expanded || !list.contains(pos) || size.y <= 0.0 {
            return None;
        }
        let row = ((pos.y - list.top()) / size.y) as usize;
        Some(self.first_visible + row).filter(|&index| index < self.items.len())
    }

    fn expand(&mut self, ctx: &mut WidgetCtx<'_>) {
        if self.items.is_empty() {
            return;
        }
        self.expanded = true;
        self.hovered = self.selected;
        // Start the list at the selection when it would be scrolled out.
        if let Some(selected) = self.selected {
            if self.items_to_display > 0 && selected >= self.first_visible + self.items_to_display {
                self.first_visible = selected + 1 - self.items_to_display;
            } else if selected < self.first_visible {
                self.first_visible = selected;
            }
        }
        ctx.request(TreeRequest::MoveToFront);
    }

    fn collapse(&mut self) {
        self.expanded = false;
        self.hovered = None;
    }

    fn max_first_visible(&self) -> usize {
        if self.items_to_display == 0 {
            0
        } else {
            self.items.len().saturating_sub(self.items_to_display)
        }
    }
}

impl Widget for ComboBox {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ComboBox
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::COMBO_BOX
    }

    fn default_size(&self) -> Vector2f {
        Vector2f::new(150.0, 24.0)
    }

    fn is_mouse_on_widget(&self, pos: Vector2f, size: Vector2f) -> bool {
        Rect::from_origin_size(Vector2f::ZERO, size).contains(pos)
            || (self.expanded && self.list_rect(size).contains(pos))
    }

    fn left_mouse_pressed(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        let size = ctx.core().size();
        if let Some(index) = self.item_at(pos, size) {
            self.collapse();
            self.select(Some(index), ctx);
        } else if self.expanded {
            self.collapse();
        } else {
            self.expand(ctx);
        }
        MouseRouting::Consumed
    }

    fn mouse_moved(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if self.expanded {
            self.hovered = self.item_at(pos, ctx.core().size());
        }
        MouseRouting::Consumed
    }

    fn mouse_no_longer_on_widget(&mut self, _ctx: &mut WidgetCtx<'_>) {
        self.hovered = None;
    }

    fn mouse_wheel_scrolled(&mut self, delta: f32, _pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> bool {
        if self.items.is_empty() || delta == 0.0 {
            return false;
        }
        if self.expanded {
            let first = if delta > 0.0 {
                self.first_visible.saturating_sub(1)
            } else {
                (self.first_visible + 1).min(self.max_first_visible())
            };
            self.first_visible = first;
            return true;
        }
        // Turning the wheel away from the user selects the previous item.
        let next = match (self.selected, delta > 0.0) {
            (None, _) => 0,
            (Some(index), true) => index.saturating_sub(1),
            (Some(index), false) => (index + 1).min(self.items.len() - 1),
        };
        self.select(Some(next), ctx);
        true
    }

    fn key_pressed(&mut self, event: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
        match event.key {
            Key::ArrowUp | Key::ArrowDown if !self.items.is_empty() => {
                let last = self.items.len() - 1;
                if self.expanded {
                    let current = self.hovered.or(self.selected);
                    self.hovered = Some(match (current, event.key) {
                        (None, _) => 0,
                        (Some(i), Key::ArrowUp) => i.saturating_sub(1),
                        (Some(i), _) => (i + 1).min(last),
                    });
                } else {
                    let next = match (self.selected, event.key) {
                        (None, _) => 0,
                        (Some(i), Key::ArrowUp) => i.saturating_sub(1),
                        (Some(i), _) => (i + 1).min(last),
                    };
                    self.select(Some(next), ctx);
                }
                true
            }
            Key::Enter | Key::Space => {
                if self.expanded {
                    let hovered = self.hovered;
                    self.collapse();
                    if hovered.is_some() {
                        self.select(hovered, ctx);
                    }
                } else {
                    self.expand(ctx);
                }
                true
            }
            Key::Escape if self.expanded => {
                self.collapse();
                true
            }
            _ => false,
        }
    }

    fn focus_changed(&mut self, focused: bool, _ctx: &mut WidgetCtx<'_>) {
        if !focused {
            self.collapse();
        }
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        let size = core.size();
        let body = Rect::from_origin_size(Vector2f::ZERO, size);
        list.push(Part::Background, body);
        if let Some(text) = self.selected_item() {
            list.push(Part::Text(text.to_string()), body);
        }
        list.push(Part::Arrow, Rect::new((size.x - size.y).max(0.0), 0.0, size.y.min(size.x), size.y));
        if !self.expanded {
            return;
        }
        for row in 0..self.visible_rows() {
            let index = self.first_visible + row;
            let rect = Rect::new(0.0, size.y * (row + 1) as f32, size.x, size.y);
            list.push(
                Part::Item {
                    index,
                    selected: self.selected == Some(index),
                    hovered: self.hovered == Some(index),
                },
                rect,
            );
            list.push(Part::Text(self.items[index].clone()), rect);
        }
    }

    fn properties(&self, out: &mut PropertyMap) {
        out.insert("Items".into(), self.items.clone().into());
        out.insert(
            "SelectedItemIndex".into(),
            self.selected.map_or(-1, |index| index as i64).into(),
        );
        out.insert("ItemsToDisplay".into(), (self.items_to_display as i64).into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        match name {
            "Items" => {
                self.items = value.as_text_list(name)?.to_vec();
                self.selected = self.selected.filter(|&i| i < self.items.len());
            }
            "SelectedItemIndex" => {
                let index = value.as_integer(name)?;
                self.selected = usize::try_from(index).ok().filter(|&i| i < self.items.len());
            }
            "ItemsToDisplay" => self.items_to_display = value.as_integer(name)?.max(0) as usize,
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

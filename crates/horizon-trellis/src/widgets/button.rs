//! Clickable buttons: [`Button`], [`CheckBox`] and [`RadioButton`].

use horizon_trellis_core::{PropertyError, PropertyMap, PropertyValue, SignalSpec};

use crate::event::{Key, KeyEvent};
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part};
use crate::widget::{signals, MouseRouting, TreeRequest, Widget, WidgetCore, WidgetCtx, WidgetKind};

/// Default character size of button captions.
pub const DEFAULT_TEXT_SIZE: f32 = 13.0;

fn caption_rect(core: &WidgetCore, indent: f32) -> Rect {
    let size = core.size();
    Rect::new(indent, 0.0, (size.x - indent).max(0.0), size.y)
}

/// A push button.
///
/// Emits `Pressed(String)` with its caption when clicked with the left
/// button or activated with Space or Enter while focused.
#[derive(Debug, Clone)]
pub struct Button {
    text: String,
    text_size: f32,
}

impl Button {
    /// Create a button with a caption.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            text_size: DEFAULT_TEXT_SIZE,
        }
    }

    /// Builder-style caption size.
    pub fn with_text_size(mut self, size: f32) -> Self {
        self.text_size = size.max(0.0);
        self
    }

    /// The caption.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Change the caption.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Character size of the caption.
    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    fn press(&self, ctx: &WidgetCtx<'_>) {
        ctx.emit_value(signals::PRESSED, self.text.clone());
    }
}

impl Widget for Button {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Button
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::BUTTON
    }

    fn left_mouse_released(&mut self, _pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if ctx.core().is_mouse_down() {
            self.press(ctx);
        }
        MouseRouting::Consumed
    }

    fn key_pressed(&mut self, event: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
        match event.key {
            Key::Space | Key::Enter => {
                self.press(ctx);
                true
            }
            _ => false,
        }
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        list.push(Part::Background, Rect::from_origin_size(Vector2f::ZERO, core.size()));
        if !self.text.is_empty() {
            list.push(Part::Text(self.text.clone()), caption_rect(core, 0.0));
        }
    }

    fn properties(&self, out: &mut PropertyMap) {
        out.insert("Text".into(), self.text.clone().into());
        out.insert("TextSize".into(), self.text_size.into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        match name {
            "Text" => self.text = value.as_text(name)?.to_string(),
            "TextSize" => self.text_size = value.as_number(name)?.max(0.0),
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

/// A two-state check box with a caption.
#[derive(Debug, Clone)]
pub struct CheckBox {
    text: String,
    checked: bool,
}

impl CheckBox {
    /// Create an unchecked check box.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: false,
        }
    }

    /// The caption.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Change the caption.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Whether the box is checked.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Check or uncheck the box. Emits `Checked` or `Unchecked`, then
    /// `Changed`, when the state actually changes.
    pub fn set_checked(&mut self, checked: bool, ctx: &mut WidgetCtx<'_>) {
        if self.checked == checked {
            return;
        }
        self.checked = checked;
        let signal = if checked { signals::CHECKED } else { signals::UNCHECKED };
        ctx.emit_value(signal, checked);
        ctx.emit_value(signals::CHANGED, checked);
    }
}

impl Widget for CheckBox {
    fn kind(&self) -> WidgetKind {
        WidgetKind::CheckBox
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::CHECKABLE
    }

    fn left_mouse_released(&mut self, _pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if ctx.core().is_mouse_down() {
            self.set_checked(!self.checked, ctx);
        }
        MouseRouting::Consumed
    }

    fn key_pressed(&mut self, event: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
        if event.key == Key::Space {
            self.set_checked(!self.checked, ctx);
            return true;
        }
        false
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        let side = core.size().y;
        let boxed = Rect::new(0.0, 0.0, side, side);
        list.push(Part::Background, boxed);
        if self.checked {
            list.push(Part::CheckMark, boxed);
        }
        if !self.text.is_empty() {
            list.push(Part::Text(self.text.clone()), caption_rect(core, side * 1.2));
        }
    }

    fn properties(&self, out: &mut PropertyMap) {
        out.insert("Text".into(), self.text.clone().into());
        out.insert("Checked".into(), self.checked.into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        match name {
            "Text" => self.text = value.as_text(name)?.to_string(),
            "Checked" => self.checked = value.as_bool(name)?,
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

/// An option that excludes the other radio buttons of its parent.
///
/// Clicking checks the button; it can only be unchecked from code or by
/// checking a sibling.
#[derive(Debug, Clone)]
pub struct RadioButton {
    text: String,
    checked: bool,
}

impl RadioButton {
    /// Create an unchecked radio button.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            checked: false,
        }
    }

    /// The caption.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Change the caption.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Whether the option is selected.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Select or deselect the option. Selecting unchecks the sibling radio
    /// buttons once the call returns to the tree.
    pub fn set_checked(&mut self, checked: bool, ctx: &mut WidgetCtx<'_>) {
        if self.checked == checked {
            return;
        }
        self.checked = checked;
        if checked {
            ctx.request(TreeRequest::UncheckRadioSiblings);
            ctx.emit_value(signals::CHECKED, true);
        } else {
            ctx.emit_value(signals::UNCHECKED, false);
        }
        ctx.emit_value(signals::CHANGED, checked);
    }
}

impl Widget for RadioButton {
    fn kind(&self) -> WidgetKind {
        WidgetKind::RadioButton
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::CHECKABLE
    }

    fn left_mouse_released(&mut self, _pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        if ctx.core().is_mouse_down() {
            self.set_checked(true, ctx);
        }
        MouseRouting::Consumed
    }

    fn key_pressed(&mut self, event: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
        if event.key == Key::Space {
            self.set_checked(true, ctx);
            return true;
        }
        false
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        let side = core.size().y;
        let circle = Rect::new(0.0, 0.0, side, side);
        list.push(Part::Background, circle);
        if self.checked {
            list.push(Part::CheckMark, circle);
        }
        if !self.text.is_empty() {
            list.push(Part::Text(self.text.clone()), caption_rect(core, side * 1.2));
        }
    }

    fn properties(&self, out: &mut PropertyMap) {
        out.insert("Text".into(), self.text.clone().into());
        out.insert("Checked".into(), self.checked.into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        match name {
            "Text" => self.text = value.as_text(name)?.to_string(),
            "Checked" => self.checked = value.as_bool(name)?,
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
    use crate::event::MouseButton;
    use crate::tree::WidgetTree;

    fn click(tree: &mut WidgetTree, pos: Vector2f) {
        let root = tree.root();
        tree.process_mouse_press(root, MouseButton::Left, pos);
        tree.process_mouse_release(root, MouseButton::Left, pos);
    }

    #[test]
    fn test_button_pressed_on_click_only() {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let button = tree.add(tree.root(), Button::new("OK"), "Ok").unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        tree.connect(button, "Pressed", move |text: String| l.borrow_mut().push(text)).unwrap();

        click(&mut tree, Vector2f::new(10.0, 10.0));
        // Release without a press on the button.
        tree.process_mouse_release(tree.root(), MouseButton::Left, Vector2f::new(10.0, 10.0));
        assert_eq!(*log.borrow(), vec!["OK".to_string()]);
    }

    #[test]
    fn test_checkbox_toggles_and_signals() {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let check = tree.add(tree.root(), CheckBox::new("c"), "c").unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        tree.connect(check, "Checked Unchecked Changed", move |value: bool, _: ObjectId, signal: &str| {
            l.borrow_mut().push(format!("{signal}:{value}"))
        })
        .unwrap();

        click(&mut tree, Vector2f::new(5.0, 5.0));
        assert!(tree.widget::<CheckBox>(check).unwrap().is_checked());
        tree.process_key_press(tree.root(), &KeyEvent::new(Key::Space));
        assert!(!tree.widget::<CheckBox>(check).unwrap().is_checked());
        assert_eq!(
            *log.borrow(),
            vec!["Checked:true", "Changed:true", "Unchecked:false", "Changed:false"]
        );
    }

    #[test]
    fn test_radio_click_unchecks_sibling() {
        let mut tree = WidgetTree::new(Vector2f::new(400.0, 300.0));
        let root = tree.root();
        let a = tree.add(root, RadioButton::new("a"), "a").unwrap();
        let b = tree.add(root, RadioButton::new("b"), "b").unwrap();
        tree.set_position(b, (0.0, 50.0)).unwrap();

        click(&mut tree, Vector2f::new(5.0, 5.0));
        click(&mut tree, Vector2f::new(5.0, 55.0));
        assert!(!tree.widget::<RadioButton>(a).unwrap().is_checked());
        assert!(tree.widget::<RadioButton>(b).unwrap().is_checked());

        // Clicking a checked radio button keeps it checked.
        click(&mut tree, Vector2f::new(5.0, 55.0));
        assert!(tree.widget::<RadioButton>(b).unwrap().is_checked());
    }

    #[test]
    fn test_properties() {
        let mut button = Button::new("a");
        button.set_property("Text", &"b".into()).unwrap();
        assert_eq!(button.text(), "b");
        assert!(matches!(
            button.set_property("Text", &true.into()),
            Err(PropertyError::TypeMismatch { .. })
        ));
        assert!(matches!(
            button.set_property("Bogus", &true.into()),
            Err(PropertyError::UnknownProperty { .. })
        ));
    }
}

//! Static text.

use horizon_trellis_core::{PropertyError, PropertyMap, PropertyValue, SignalSpec};
use serde::{Deserialize, Serialize};

use super::button::DEFAULT_TEXT_SIZE;
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part};
use crate::widget::{signals, Widget, WidgetCore, WidgetKind};

/// Horizontal placement of a label's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalAlignment {
    /// Flush with the left edge.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush with the right edge.
    Right,
}

impl HorizontalAlignment {
    fn name(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Center => "Center",
            Self::Right => "Right",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        [Self::Left, Self::Center, Self::Right]
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
    }
}

/// A piece of text. Labels never take keyboard focus.
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    text_size: f32,
    alignment: HorizontalAlignment,
}

impl Label {
    /// Create a label.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            text_size: DEFAULT_TEXT_SIZE,
            alignment: HorizontalAlignment::Left,
        }
    }

    /// Builder-style alignment.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Character size.
    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    /// Change the character size.
    pub fn set_text_size(&mut self, size: f32) {
        self.text_size = size.max(0.0);
    }

    /// Horizontal placement of the text.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Change the horizontal placement.
    pub fn set_alignment(&mut self, alignment: HorizontalAlignment) {
        self.alignment = alignment;
    }
}

impl Widget for Label {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Label
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::CLICKABLE
    }

    fn can_gain_focus(&self) -> bool {
        false
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        list.push(Part::Background, Rect::from_origin_size(Vector2f::ZERO, core.size()));
        if !self.text.is_empty() {
            list.push(Part::Text(self.text.clone()), Rect::from_origin_size(Vector2f::ZERO, core.size()));
        }
    }

    fn properties(&self, out: &mut PropertyMap) {
        out.insert("Text".into(), self.text.clone().into());
        out.insert("TextSize".into(), self.text_size.into());
        out.insert("HorizontalAlignment".into(), self.alignment.name().into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        match name {
            "Text" => self.text = value.as_text(name)?.to_string(),
            "TextSize" => self.set_text_size(value.as_number(name)?),
            "HorizontalAlignment" => {
                let text = value.as_text(name)?;
                self.alignment = HorizontalAlignment::from_name(text).ok_or(PropertyError::TypeMismatch {
                    name: name.to_string(),
                    expected: "Left, Center or Right",
                    got: "text",
                })?;
            }
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_not_focusable() {
        assert!(!Label::new("x").can_gain_focus());
    }

    #[test]
    fn test_alignment_property() {
        let mut label = Label::new("x");
        label.set_property("HorizontalAlignment", &"center".into()).unwrap();
        assert_eq!(label.alignment(), HorizontalAlignment::Center);
        assert!(label.set_property("HorizontalAlignment", &"Middle".into()).is_err());
    }
}

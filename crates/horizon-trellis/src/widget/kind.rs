//! The closed set of widget kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::traits::Widget;
use crate::widgets::{
    Button, CheckBox, ChildWindow, ComboBox, EditBox, EditBoxSlider, Group, Label, ListView, Panel,
    RadioButton, RadioButtonGroup, RangeSlider, Root, ScrollablePanel, Scrollbar, Slider, TextArea,
};

/// Every widget type the toolkit provides.
///
/// Used for type-specific persistence and in draw commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
    /// The top-level container owned by the tree.
    Root,
    /// Plain container with an isolated focus cycle.
    Panel,
    /// Container that takes part in its parent's focus cycle.
    Group,
    /// Group that makes its radio buttons exclusive.
    RadioButtonGroup,
    /// Panel with scrollbars.
    ScrollablePanel,
    /// Movable, resizable window inside the GUI.
    ChildWindow,
    /// Push button.
    Button,
    /// Two-state check box.
    CheckBox,
    /// Exclusive option.
    RadioButton,
    /// Static text.
    Label,
    /// Single-line text input.
    EditBox,
    /// Multi-line text input.
    TextArea,
    /// Value slider.
    Slider,
    /// Slider with two thumbs.
    RangeSlider,
    /// Slider with an edit box showing the value.
    EditBoxSlider,
    /// Stand-alone scrollbar.
    Scrollbar,
    /// Drop-down list.
    ComboBox,
    /// Multi-column list.
    ListView,
}

impl WidgetKind {
    /// All kinds, in declaration order.
    pub const ALL: [WidgetKind; 18] = [
        Self::Root,
        Self::Panel,
        Self::Group,
        Self::RadioButtonGroup,
        Self::ScrollablePanel,
        Self::ChildWindow,
        Self::Button,
        Self::CheckBox,
        Self::RadioButton,
        Self::Label,
        Self::EditBox,
        Self::TextArea,
        Self::Slider,
        Self::RangeSlider,
        Self::EditBoxSlider,
        Self::Scrollbar,
        Self::ComboBox,
        Self::ListView,
    ];

    /// The type name, e.g. `"EditBox"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Panel => "Panel",
            Self::Group => "Group",
            Self::RadioButtonGroup => "RadioButtonGroup",
            Self::ScrollablePanel => "ScrollablePanel",
            Self::ChildWindow => "ChildWindow",
            Self::Button => "Button",
            Self::CheckBox => "CheckBox",
            Self::RadioButton => "RadioButton",
            Self::Label => "Label",
            Self::EditBox => "EditBox",
            Self::TextArea => "TextArea",
            Self::Slider => "Slider",
            Self::RangeSlider => "RangeSlider",
            Self::EditBoxSlider => "EditBoxSlider",
            Self::Scrollbar => "Scrollbar",
            Self::ComboBox => "ComboBox",
            Self::ListView => "ListView",
        }
    }

    /// Look a kind up by type name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Whether widgets of this kind own children.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Self::Root
                | Self::Panel
                | Self::Group
                | Self::RadioButtonGroup
                | Self::ScrollablePanel
                | Self::ChildWindow
        )
    }

    /// A default-constructed widget of this kind, for loading saved trees.
    pub fn create(self) -> Box<dyn Widget> {
        match self {
            Self::Root => Box::new(Root::new()),
            Self::Panel => Box::new(Panel::new()),
            Self::Group => Box::new(Group::new()),
            Self::RadioButtonGroup => Box::new(RadioButtonGroup::new()),
            Self::ScrollablePanel => Box::new(ScrollablePanel::new()),
            Self::ChildWindow => Box::new(ChildWindow::new("")),
            Self::Button => Box::new(Button::new("")),
            Self::CheckBox => Box::new(CheckBox::new("")),
            Self::RadioButton => Box::new(RadioButton::new("")),
            Self::Label => Box::new(Label::new("")),
            Self::EditBox => Box::new(EditBox::new()),
            Self::TextArea => Box::new(TextArea::new()),
            Self::Slider => Box::new(Slider::new()),
            Self::RangeSlider => Box::new(RangeSlider::new()),
            Self::EditBoxSlider => Box::new(EditBoxSlider::new()),
            Self::Scrollbar => Box::new(Scrollbar::new()),
            Self::ComboBox => Box::new(ComboBox::new()),
            Self::ListView => Box::new(ListView::new()),
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for kind in WidgetKind::ALL {
            assert_eq!(WidgetKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(WidgetKind::from_name("editbox"), Some(WidgetKind::EditBox));
        assert_eq!(WidgetKind::from_name("Picture"), None);
    }

    #[test]
    fn test_factory_matches_kind() {
        for kind in WidgetKind::ALL {
            let widget = kind.create();
            assert_eq!(widget.kind(), kind);
            assert_eq!(widget.is_container(), kind.is_container());
        }
    }
}

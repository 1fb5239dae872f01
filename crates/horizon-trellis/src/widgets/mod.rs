//! Standard widgets.
//!
//! - Containers: [`Root`], [`Panel`], [`Group`], [`RadioButtonGroup`],
//!   [`ScrollablePanel`], [`ChildWindow`]
//! - Buttons: [`Button`], [`CheckBox`], [`RadioButton`]
//! - Text: [`Label`], [`EditBox`], [`TextArea`]
//! - Values: [`Scrollbar`], [`Slider`], [`RangeSlider`], [`EditBoxSlider`]
//! - Item views: [`ComboBox`], [`ListView`]

mod button;
mod child_window;
mod combo_box;
mod edit_box;
mod edit_box_slider;
mod label;
mod list_view;
mod panel;
mod range_slider;
mod scrollable_panel;
mod scrollbar;
mod slider;
mod text_area;

pub use button::{Button, CheckBox, RadioButton, DEFAULT_TEXT_SIZE};
pub use child_window::{ChildWindow, ChildWindowConfig, CloseBehavior, Interaction, ResizeEdges};
pub use combo_box::ComboBox;
pub use edit_box::{EditBox, InputValidator};
pub use edit_box_slider::EditBoxSlider;
pub use label::{HorizontalAlignment, Label};
pub use list_view::{ListView, ListViewColumn, DEFAULT_COLUMN_WIDTH};
pub use panel::{Group, Panel, RadioButtonGroup, Root};
pub use range_slider::RangeSlider;
pub use scrollable_panel::ScrollablePanel;
pub use scrollbar::{
    scrollbar_visibility, Scrollbar, ScrollbarGeometry, ScrollbarLayout, ScrollbarModel, ScrollbarPolicy,
    DEFAULT_SCROLLBAR_WIDTH,
};
pub use slider::{RangeModel, Slider};
pub use text_area::TextArea;

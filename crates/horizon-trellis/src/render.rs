//! Draw traversal output.
//!
//! The toolkit does not rasterize anything. [`WidgetTree::draw`] walks the
//! visible widgets back to front, asks each one for its visual [`Part`]s and
//! hands the backend one [`DrawCommand`] per part, with absolute geometry,
//! the clip rectangle of the enclosing containers and the effective opacity.
//!
//! [`WidgetTree::draw`]: crate::tree::WidgetTree::draw

use horizon_trellis_core::ObjectId;

use crate::geometry::Rect;
use crate::widget::WidgetKind;

/// A visual element of a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// The widget body.
    Background,
    /// A run of text.
    Text(String),
    /// The text caret.
    Caret,
    /// Highlighted selection.
    Selection,
    /// Slider or scrollbar track.
    Track,
    /// Slider or scrollbar thumb.
    Thumb,
    /// ChildWindow title bar.
    TitleBar,
    /// ChildWindow title button.
    TitleButton(TitleButton),
    /// Check mark of a CheckBox or RadioButton.
    CheckMark,
    /// ComboBox arrow.
    Arrow,
    /// A row of a list.
    Item {
        /// Row index.
        index: usize,
        /// Whether the row is selected.
        selected: bool,
        /// Whether the pointer is over the row.
        hovered: bool,
    },
    /// A column header.
    Header(usize),
}

/// Buttons in a ChildWindow title bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleButton {
    /// Closes the window.
    Close,
    /// Maximizes the window.
    Maximize,
    /// Minimizes the window.
    Minimize,
}

/// Parts collected from one widget, in widget-local coordinates.
#[derive(Debug, Default)]
pub struct DrawList {
    parts: Vec<(Part, Rect)>,
}

impl DrawList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part.
    pub fn push(&mut self, part: Part, rect: Rect) {
        self.parts.push((part, rect));
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (Part, Rect)> + '_ {
        self.parts.drain(..)
    }
}

/// One thing for the backend to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// The widget the part belongs to.
    pub widget: ObjectId,
    /// The widget's kind.
    pub kind: WidgetKind,
    /// What to draw.
    pub part: Part,
    /// Absolute bounds.
    pub rect: Rect,
    /// Absolute clip rectangle from the enclosing containers.
    pub clip: Rect,
    /// Opacity including the inherited opacity.
    pub opacity: f32,
}

/// Receives draw commands in back-to-front order.
pub trait Renderer {
    /// Draw one part.
    fn draw(&mut self, command: &DrawCommand);
}

/// Records the commands, for tests and headless use.
impl Renderer for Vec<DrawCommand> {
    fn draw(&mut self, command: &DrawCommand) {
        self.push(command.clone());
    }
}

//! Commonly used types, for glob imports:
//!
//! ```
//! use horizon_trellis::prelude::*;
//! ```

// ============================================================================
// Context and Tree
// ============================================================================

pub use crate::gui::{CommandQueue, Gui, GuiConfig, TabKeyUsage};
pub use crate::tree::{SavedWidget, WidgetTree};

// ============================================================================
// Handles, Signals and Properties
// ============================================================================

pub use horizon_trellis_core::{
    ConnectionId, ObjectId, PropertyMap, PropertyValue, TimerId, TimerRegistry,
};
pub use crate::widget::signals;

// ============================================================================
// Geometry, Layout and Input
// ============================================================================

pub use crate::event::{Event, Key, KeyEvent, KeyboardModifiers, MouseButton};
pub use crate::geometry::{Rect, Vector2f};
pub use crate::layout::{Layout2d, LayoutValue};

// ============================================================================
// Animation and Drawing
// ============================================================================

pub use crate::animation::{AnimationChannel, ShowEffectType};
pub use crate::render::{DrawCommand, Part, Renderer};

// ============================================================================
// Widget Foundation
// ============================================================================

pub use crate::error::{Result, TrellisError};
pub use crate::widget::{MouseRouting, TreeRequest, Widget, WidgetCore, WidgetCtx, WidgetKind};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widgets::{
    Button, CheckBox, ChildWindow, ChildWindowConfig, CloseBehavior, ComboBox, EditBox, EditBoxSlider, Group,
    InputValidator, Label, ListView, Panel, RadioButton, RadioButtonGroup, RangeSlider, ScrollablePanel,
    Scrollbar, ScrollbarPolicy, Slider, TextArea,
};

//! Horizon Trellis: a retained-mode widget toolkit core.
//!
//! The crate holds everything between a windowing backend and a renderer:
//!
//! - **Widget tree**: containers owning their children, hit-testing,
//!   coordinate transforms, z-order and clipping ([`tree`])
//! - **Input routing**: mouse capture, hover tracking, keyboard focus paths
//!   and Tab traversal ([`tree`], [`gui`])
//! - **Layout**: position and size expressions bound to the parent
//!   ([`layout`])
//! - **Animation**: move, resize and fade tasks plus show/hide effects on a
//!   logical clock ([`animation`])
//! - **Widgets**: buttons, text editing, sliders, scrollbars, item views and
//!   child windows ([`widgets`])
//!
//! Backends translate native input into [`Event`]s and implement
//! [`Renderer`]; font metrics and the clipboard are pluggable through
//! [`TextMeasure`] and [`Clipboard`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_trellis::prelude::*;
//!
//! let mut gui = Gui::new(Vector2f::new(800.0, 600.0));
//! let root = gui.root();
//! let slider = gui.tree_mut().add(root, Slider::new(), "Volume").unwrap();
//! gui.tree_mut().set_position(slider, Layout2d::percent(10.0, 50.0)).unwrap();
//!
//! gui.tree_mut()
//!     .connect(slider, "ValueChanged", |value: f32| println!("volume {value}"))
//!     .unwrap();
//!
//! gui.handle_event(&Event::key(Key::Tab));
//! gui.handle_event(&Event::key(Key::ArrowRight));
//! gui.update_time(Duration::from_millis(16));
//!
//! let mut commands: Vec<DrawCommand> = Vec::new();
//! gui.draw(&mut commands);
//! assert!(!commands.is_empty());
//! ```

pub mod animation;
pub mod clipboard;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gui;
pub mod layout;
pub mod prelude;
pub mod render;
pub mod text;
pub mod tree;
pub mod widget;
pub mod widgets;

pub use horizon_trellis_core::{
    ConnectionId, ObjectId, PropertyError, PropertyMap, PropertyValue, SignalError, TimerId, TimerRegistry,
};

pub use animation::{AnimationChannel, AnimationTrack, ShowEffectType};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use error::{Result, TrellisError};
pub use event::{Event, Key, KeyEvent, KeyboardModifiers, MouseButton};
pub use geometry::{Rect, Vector2f};
pub use gui::{CommandQueue, Gui, GuiConfig, TabKeyUsage};
pub use layout::{Axis, Binding, Layout2d, LayoutContext, LayoutError, LayoutValue, Operation};
pub use render::{DrawCommand, DrawList, Part, Renderer, TitleButton};
pub use text::{MonospaceMeasure, TextBuffer, TextMeasure};
pub use tree::{SavedWidget, WidgetTree};
pub use widget::{MouseRouting, TreeRequest, Widget, WidgetCore, WidgetCtx, WidgetKind};

// Handles and value types cross thread boundaries freely; the context
// types are tied to the thread that drives the GUI.
static_assertions::assert_impl_all!(ObjectId: Copy, Send, Sync);
static_assertions::assert_impl_all!(ConnectionId: Copy, Send, Sync);
static_assertions::assert_impl_all!(TimerId: Copy, Send, Sync);
static_assertions::assert_impl_all!(Rect: Copy, Send, Sync);
static_assertions::assert_impl_all!(Event: Copy, Send, Sync);
static_assertions::assert_not_impl_any!(Gui: Send, Sync);

//! The widget contract.
//!
//! A widget node in the [`WidgetTree`](crate::tree::WidgetTree) pairs a
//! [`WidgetCore`] (geometry, visibility, focus and mouse flags) with a boxed
//! [`Widget`] behavior. The tree does the work every widget shares and calls
//! the behavior's hooks for the rest.
//!
//! # Implementing a widget
//!
//! ```ignore
//! use horizon_trellis::widget::{signals, Widget, WidgetCtx, WidgetKind, MouseRouting};
//!
//! struct Counter { clicks: u32 }
//!
//! impl Widget for Counter {
//!     fn kind(&self) -> WidgetKind { WidgetKind::Button }
//!     fn signals(&self) -> &'static [SignalSpec] { signals::CLICKABLE }
//!
//!     fn left_mouse_released(&mut self, _pos: Vector2f, _ctx: &mut WidgetCtx<'_>) -> MouseRouting {
//!         self.clicks += 1;
//!         MouseRouting::Consumed
//!     }
//! }
//! ```

mod base;
mod kind;
pub mod signals;
mod traits;

pub use base::WidgetCore;
pub use kind::WidgetKind;
pub use traits::{MouseRouting, TreeRequest, Widget, WidgetCtx};

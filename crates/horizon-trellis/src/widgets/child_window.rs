//! Movable, resizable windows inside the GUI.

use horizon_trellis_core::{PropertyError, PropertyMap, PropertyValue, SignalSpec};
use serde::{Deserialize, Serialize};

use crate::event::{Key, KeyEvent};
use crate::geometry::{Rect, Vector2f};
use crate::render::{DrawList, Part, TitleButton};
use crate::widget::{signals, MouseRouting, TreeRequest, Widget, WidgetCore, WidgetCtx, WidgetKind};

/// Space around the title buttons.
const BUTTON_PADDING: f32 = 2.0;

/// What the close button does after emitting `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CloseBehavior {
    /// Remove the window from the tree.
    #[default]
    Remove,
    /// Hide the window.
    Hide,
    /// Only emit `Closed`; the application decides.
    None,
}

impl CloseBehavior {
    fn name(self) -> &'static str {
        match self {
            Self::Remove => "Remove",
            Self::Hide => "Hide",
            Self::None => "None",
        }
    }

    fn parse(name: &str, value: &str) -> Result<Self, PropertyError> {
        [Self::Remove, Self::Hide, Self::None]
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(value))
            .ok_or(PropertyError::TypeMismatch {
                name: name.to_string(),
                expected: "Remove, Hide or None",
                got: "text",
            })
    }
}

fn title_button_name(button: TitleButton) -> &'static str {
    match button {
        TitleButton::Close => "Close",
        TitleButton::Maximize => "Maximize",
        TitleButton::Minimize => "Minimize",
    }
}

/// Appearance and behavior settings of a [`ChildWindow`].
///
/// Sizes are outer sizes, title bar and borders included.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildWindowConfig {
    /// Height of the title bar.
    pub title_bar_height: f32,
    /// Width of the borders, which are also the resize handles.
    pub border_width: f32,
    /// Smallest size reachable by resizing.
    pub minimum_size: Vector2f,
    /// Largest size reachable by resizing.
    pub maximum_size: Vector2f,
    /// Whether the borders resize the window.
    pub resizable: bool,
    /// Whether dragging keeps the window inside its parent.
    pub keep_in_parent: bool,
    /// Buttons shown in the title bar, laid out right to left in the order
    /// close, maximize, minimize.
    pub title_buttons: Vec<TitleButton>,
    /// What closing does.
    pub close_behavior: CloseBehavior,
}

impl Default for ChildWindowConfig {
    fn default() -> Self {
        Self {
            title_bar_height: 20.0,
            border_width: 2.0,
            minimum_size: Vector2f::ZERO,
            maximum_size: Vector2f::splat(f32::MAX),
            resizable: false,
            keep_in_parent: false,
            title_buttons: vec![TitleButton::Close],
            close_behavior: CloseBehavior::Remove,
        }
    }
}

impl ChildWindowConfig {
    /// Set the title bar height.
    pub fn with_title_bar_height(mut self, height: f32) -> Self {
        self.title_bar_height = height.max(0.0);
        self
    }

    /// Set the border width.
    pub fn with_border_width(mut self, width: f32) -> Self {
        self.border_width = width.max(0.0);
        self
    }

    /// Set the size limits for resizing.
    pub fn with_size_limits(mut self, minimum: Vector2f, maximum: Vector2f) -> Self {
        self.minimum_size = minimum;
        self.maximum_size = maximum.max(minimum);
        self
    }

    /// Enable resizing by the borders.
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Keep the window inside its parent while dragging.
    pub fn with_keep_in_parent(mut self, keep: bool) -> Self {
        self.keep_in_parent = keep;
        self
    }

    /// Set the title buttons.
    pub fn with_title_buttons(mut self, buttons: impl Into<Vec<TitleButton>>) -> Self {
        self.title_buttons = buttons.into();
        self
    }

    /// Set what closing does.
    pub fn with_close_behavior(mut self, behavior: CloseBehavior) -> Self {
        self.close_behavior = behavior;
        self
    }
}

/// Edges grabbed for a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeEdges {
    /// Left border.
    pub left: bool,
    /// Top border.
    pub top: bool,
    /// Right border.
    pub right: bool,
    /// Bottom border.
    pub bottom: bool,
}

impl ResizeEdges {
    fn any(self) -> bool {
        self.left || self.top || self.right || self.bottom
    }
}

/// What a held left button is doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    /// Nothing.
    #[default]
    Idle,
    /// Moving the window; `offset` is the grab point in the window.
    Dragging {
        /// Local grab point.
        offset: Vector2f,
    },
    /// Resizing from the grabbed edges.
    Resizing {
        /// The grabbed edges.
        edges: ResizeEdges,
        /// Position and size when the drag started, in the parent's child
        /// space.
        anchor: Rect,
        /// Pointer position when the drag started, in the same space.
        grab: Vector2f,
    },
}

/// A container with a title bar that can be dragged, resized and closed.
///
/// Pressing anywhere on the window raises it above its siblings. Tab
/// traversal stays inside the window.
#[derive(Debug, Clone)]
pub struct ChildWindow {
    title: String,
    config: ChildWindowConfig,
    interaction: Interaction,
    pressed_button: Option<TitleButton>,
    hovered_button: Option<TitleButton>,
}

impl ChildWindow {
    /// A window with default settings.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            config: ChildWindowConfig::default(),
            interaction: Interaction::Idle,
            pressed_button: None,
            hovered_button: None,
        }
    }

    /// Builder-style settings.
    pub fn with_config(mut self, config: ChildWindowConfig) -> Self {
        self.config = config;
        self
    }

    /// The title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The settings.
    pub fn config(&self) -> &ChildWindowConfig {
        &self.config
    }

    /// The current interaction.
    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Enable or disable resizing.
    pub fn set_resizable(&mut self, resizable: bool) {
        self.config.resizable = resizable;
    }

    /// Keep the window inside its parent while dragging.
    pub fn set_keep_in_parent(&mut self, keep: bool) {
        self.config.keep_in_parent = keep;
    }

    /// Change the title buttons.
    pub fn set_title_buttons(&mut self, buttons: impl Into<Vec<TitleButton>>) {
        self.config.title_buttons = buttons.into();
    }

    /// Change what closing does.
    pub fn set_close_behavior(&mut self, behavior: CloseBehavior) {
        self.config.close_behavior = behavior;
    }

    /// Change the smallest size; a smaller window grows.
    pub fn set_minimum_size(&mut self, size: Vector2f, ctx: &mut WidgetCtx<'_>) {
        self.config.minimum_size = size;
        self.config.maximum_size = self.config.maximum_size.max(size);
        self.enforce_limits(ctx);
    }

    /// Change the largest size; a larger window shrinks.
    pub fn set_maximum_size(&mut self, size: Vector2f, ctx: &mut WidgetCtx<'_>) {
        self.config.maximum_size = size;
        self.config.minimum_size = self.config.minimum_size.min(size);
        self.enforce_limits(ctx);
    }

    /// Emit `Closed`, then remove or hide the window per the close behavior.
    pub fn close(&mut self, ctx: &mut WidgetCtx<'_>) {
        ctx.emit(signals::CLOSED);
        match self.config.close_behavior {
            CloseBehavior::Remove => ctx.request(TreeRequest::Close),
            CloseBehavior::Hide => ctx.request(TreeRequest::Hide),
            CloseBehavior::None => {}
        }
    }

    fn enforce_limits(&self, ctx: &mut WidgetCtx<'_>) {
        let size = ctx.core().size();
        let clamped = size.min(self.config.maximum_size).max(self.config.minimum_size);
        if clamped != size {
            ctx.request(TreeRequest::SetSize(clamped));
        }
    }

    fn title_bar(&self, size: Vector2f) -> Rect {
        let b = self.config.border_width;
        Rect::new(b, b, (size.x - 2.0 * b).max(0.0), self.config.title_bar_height)
    }

    fn client_area(&self, size: Vector2f) -> Rect {
        Rect::from_origin_size(self.child_offset(), self.inner_size(size))
    }

    /// Title buttons with their bounds, right to left.
    fn title_buttons(&self, size: Vector2f) -> impl Iterator<Item = (TitleButton, Rect)> + '_ {
        let bar = self.title_bar(size);
        let side = (bar.size.y - 2.0 * BUTTON_PADDING).max(0.0);
        [TitleButton::Close, TitleButton::Maximize, TitleButton::Minimize]
            .into_iter()
            .filter(|button| self.config.title_buttons.contains(button))
            .enumerate()
            .map(move |(slot, button)| {
                let right = bar.right() - BUTTON_PADDING - slot as f32 * (side + BUTTON_PADDING);
                (button, Rect::new(right - side, bar.top() + BUTTON_PADDING, side, side))
            })
    }

    fn button_at(&self, pos: Vector2f, size: Vector2f) -> Option<TitleButton> {
        self.title_buttons(size)
            .find(|(_, rect)| rect.contains(pos))
            .map(|(button, _)| button)
    }

    fn edges_at(&self, pos: Vector2f, size: Vector2f) -> ResizeEdges {
        let b = self.config.border_width;
        ResizeEdges {
            left: pos.x < b,
            top: pos.y < b,
            right: pos.x >= size.x - b,
            bottom: pos.y >= size.y - b,
        }
    }

    fn trigger(&mut self, button: TitleButton, ctx: &mut WidgetCtx<'_>) {
        match button {
            TitleButton::Close => self.close(ctx),
            TitleButton::Maximize => ctx.emit(signals::MAXIMIZED),
            TitleButton::Minimize => ctx.emit(signals::MINIMIZED),
        }
    }

    fn drag_to(&self, offset: Vector2f, pos: Vector2f, ctx: &mut WidgetCtx<'_>) {
        let core = ctx.core();
        let mut target = core.position() + pos - offset;
        if self.config.keep_in_parent {
            if let Some(parent) = ctx.parent_size() {
                let limit = (parent - core.size()).max(Vector2f::ZERO);
                target = target.clamp(Vector2f::ZERO, limit);
            }
        }
        if target != core.position() {
            ctx.request(TreeRequest::SetPosition(target));
        }
    }

    fn resize_to(&self, edges: ResizeEdges, anchor: Rect, grab: Vector2f, pos: Vector2f, ctx: &mut WidgetCtx<'_>) {
        let pointer = ctx.core().position() + pos;
        let delta = pointer - grab;
        let (min, max) = (self.config.minimum_size, self.config.maximum_size);

        let mut position = anchor.origin;
        let mut size = anchor.size;
        if edges.left {
            size.x = (anchor.size.x - delta.x).min(max.x).max(min.x);
            position.x = anchor.right() - size.x;
        } else if edges.right {
            size.x = (anchor.size.x + delta.x).min(max.x).max(min.x);
        }
        if edges.top {
            size.y = (anchor.size.y - delta.y).min(max.y).max(min.y);
            position.y = anchor.bottom() - size.y;
        } else if edges.bottom {
            size.y = (anchor.size.y + delta.y).min(max.y).max(min.y);
        }

        if position != ctx.core().position() {
            ctx.request(TreeRequest::SetPosition(position));
        }
        if size != ctx.core().size() {
            ctx.request(TreeRequest::SetSize(size));
        }
    }
}

impl Widget for ChildWindow {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ChildWindow
    }

    fn signals(&self) -> &'static [SignalSpec] {
        signals::CHILD_WINDOW
    }

    fn default_size(&self) -> Vector2f {
        Vector2f::new(200.0, 150.0)
    }

    fn is_container(&self) -> bool {
        true
    }

    fn isolated_focus(&self) -> bool {
        true
    }

    fn child_offset(&self) -> Vector2f {
        let b = self.config.border_width;
        Vector2f::new(b, b + self.config.title_bar_height)
    }

    fn inner_size(&self, size: Vector2f) -> Vector2f {
        let b = self.config.border_width;
        Vector2f::new(size.x - 2.0 * b, size.y - 2.0 * b - self.config.title_bar_height).max(Vector2f::ZERO)
    }

    fn left_mouse_pressed(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        ctx.request(TreeRequest::MoveToFront);
        let size = ctx.core().size();

        if self.client_area(size).contains(pos) {
            return MouseRouting::Children;
        }
        if let Some(button) = self.button_at(pos, size) {
            self.pressed_button = Some(button);
            return MouseRouting::Consumed;
        }
        if self.title_bar(size).contains(pos) {
            self.interaction = Interaction::Dragging { offset: pos };
            return MouseRouting::Consumed;
        }
        let edges = self.edges_at(pos, size);
        if self.config.resizable && edges.any() {
            self.interaction = Interaction::Resizing {
                edges,
                anchor: ctx.core().rect(),
                grab: ctx.core().position() + pos,
            };
        }
        MouseRouting::Consumed
    }

    fn left_mouse_released(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        let size = ctx.core().size();
        if let Some(button) = self.pressed_button.take() {
            if self.button_at(pos, size) == Some(button) {
                self.trigger(button, ctx);
            }
            return MouseRouting::Consumed;
        }
        if self.interaction == Interaction::Idle && self.client_area(size).contains(pos) {
            MouseRouting::Children
        } else {
            MouseRouting::Consumed
        }
    }

    fn mouse_moved(&mut self, pos: Vector2f, ctx: &mut WidgetCtx<'_>) -> MouseRouting {
        let size = ctx.core().size();
        match self.interaction {
            Interaction::Dragging { offset } if ctx.core().is_mouse_down() => {
                self.drag_to(offset, pos, ctx);
                MouseRouting::Consumed
            }
            Interaction::Resizing { edges, anchor, grab } if ctx.core().is_mouse_down() => {
                self.resize_to(edges, anchor, grab, pos, ctx);
                MouseRouting::Consumed
            }
            _ => {
                self.hovered_button = self.button_at(pos, size);
                if self.client_area(size).contains(pos) || ctx.core().is_mouse_down() {
                    MouseRouting::Children
                } else {
                    MouseRouting::Consumed
                }
            }
        }
    }

    fn left_mouse_button_no_longer_down(&mut self, _ctx: &mut WidgetCtx<'_>) {
        self.interaction = Interaction::Idle;
        self.pressed_button = None;
    }

    fn mouse_no_longer_on_widget(&mut self, _ctx: &mut WidgetCtx<'_>) {
        self.hovered_button = None;
    }

    fn key_pressed(&mut self, event: &KeyEvent, ctx: &mut WidgetCtx<'_>) -> bool {
        if event.key == Key::Escape {
            ctx.emit(signals::ESCAPE_KEY_PRESSED);
            return true;
        }
        false
    }

    fn draw(&self, core: &WidgetCore, list: &mut DrawList) {
        let size = core.size();
        list.push(Part::Background, Rect::from_origin_size(Vector2f::ZERO, size));
        let bar = self.title_bar(size);
        list.push(Part::TitleBar, bar);
        if !self.title.is_empty() {
            list.push(Part::Text(self.title.clone()), bar);
        }
        for (button, rect) in self.title_buttons(size) {
            list.push(Part::TitleButton(button), rect);
        }
    }

    fn properties(&self, out: &mut PropertyMap) {
        let c = &self.config;
        out.insert("Title".into(), self.title.clone().into());
        out.insert("TitleBarHeight".into(), c.title_bar_height.into());
        out.insert("BorderWidth".into(), c.border_width.into());
        out.insert("MinimumSize".into(), c.minimum_size.to_array().into());
        out.insert("MaximumSize".into(), c.maximum_size.to_array().into());
        out.insert("Resizable".into(), c.resizable.into());
        out.insert("KeepInParent".into(), c.keep_in_parent.into());
        let buttons = c
            .title_buttons
            .iter()
            .map(|&b| title_button_name(b).to_string())
            .collect::<Vec<_>>();
        out.insert("TitleButtons".into(), buttons.into());
        out.insert("CloseBehavior".into(), c.close_behavior.name().into());
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> Result<(), PropertyError> {
        let c = &mut self.config;
        match name {
            "Title" => self.title = value.as_text(name)?.to_string(),
            "TitleBarHeight" => c.title_bar_height = value.as_number(name)?.max(0.0),
            "BorderWidth" => c.border_width = value.as_number(name)?.max(0.0),
            "MinimumSize" => c.minimum_size = Vector2f::from_array(value.as_vector2(name)?),
            "MaximumSize" => c.maximum_size = Vector2f::from_array(value.as_vector2(name)?),
            "Resizable" => c.resizable = value.as_bool(name)?,
            "KeepInParent" => c.keep_in_parent = value.as_bool(name)?,
            "TitleButtons" => {
                let mut buttons = Vec::new();
                for entry in value.as_text_list(name)? {
                    let button = [TitleButton::Close, TitleButton::Maximize, TitleButton::Minimize]
                        .into_iter()
                        .find(|&b| title_button_name(b).eq_ignore_ascii_case(entry))
                        .ok_or(PropertyError::TypeMismatch {
                            name: name.to_string(),
                            expected: "Close, Maximize or Minimize",
                            got: "text",
                        })?;
                    buttons.push(button);
                }
                c.title_buttons = buttons;
            }
            "CloseBehavior" => c.close_behavior = CloseBehavior::parse(name, value.as_text(name)?)?,
            _ => return Err(PropertyError::unknown(name)),
        }
        Ok(())
    }
}

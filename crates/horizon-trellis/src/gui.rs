//! The GUI context.
//!
//! [`Gui`] owns the widget tree and the timer registry. A backend feeds it
//! normalized [`Event`]s, advances it with [`Gui::update_time`] and asks it to
//! [`draw`](Gui::draw). There is no global state: independent `Gui` values
//! never see each other's widgets, timers or connections.
//!
//! Signal handlers only borrow what they capture, so they cannot change the
//! tree that is emitting. They push work onto the [`CommandQueue`] instead,
//! which runs once the current event or time step has been dispatched.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::gui::Gui;
//! use horizon_trellis::widgets::Button;
//! use horizon_trellis::{Event, Vector2f};
//!
//! let mut gui = Gui::new(Vector2f::new(800.0, 600.0));
//! let root = gui.root();
//! let button = gui.tree_mut().add(root, Button::new("Quit"), "QuitButton").unwrap();
//!
//! let commands = gui.commands();
//! gui.tree_mut()
//!     .connect(button, "Pressed", move || {
//!         commands.push(move |gui| {
//!             gui.tree_mut().remove(button);
//!         })
//!     })
//!     .unwrap();
//!
//! gui.handle_event(&Event::left_press(5.0, 5.0));
//! gui.handle_event(&Event::left_release(5.0, 5.0));
//! assert!(!gui.tree().contains(button));
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{ObjectId, TimerRegistry};
use serde::{Deserialize, Serialize};

use crate::event::{Event, Key, MouseButton};
use crate::geometry::Vector2f;
use crate::render::Renderer;
use crate::tree::WidgetTree;

/// What the Tab key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TabKeyUsage {
    /// Tab and Shift+Tab move the focus between widgets.
    #[default]
    SwitchFocus,
    /// Tab reaches the focused widget like any other key.
    PassToWidget,
}

/// Settings of a [`Gui`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuiConfig {
    /// What the Tab key does.
    pub tab_key_usage: TabKeyUsage,
    /// Longest gap between the clicks of a double click.
    pub double_click_time: Duration,
    /// Time the caret of text widgets stays on, then off.
    pub caret_blink_interval: Duration,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            tab_key_usage: TabKeyUsage::SwitchFocus,
            double_click_time: Duration::from_millis(500),
            caret_blink_interval: Duration::from_millis(500),
        }
    }
}

impl GuiConfig {
    /// Set what the Tab key does.
    pub fn with_tab_key_usage(mut self, usage: TabKeyUsage) -> Self {
        self.tab_key_usage = usage;
        self
    }

    /// Set the double click time.
    pub fn with_double_click_time(mut self, time: Duration) -> Self {
        self.double_click_time = time;
        self
    }

    /// Set the caret blink interval.
    pub fn with_caret_blink_interval(mut self, interval: Duration) -> Self {
        self.caret_blink_interval = interval;
        self
    }
}

type Command = Box<dyn FnOnce(&mut Gui)>;

/// Work deferred until the current dispatch has finished.
///
/// Cloning shares the queue, so handlers can capture their own handle.
#[derive(Clone, Default)]
pub struct CommandQueue {
    commands: Rc<RefCell<VecDeque<Command>>>,
}

impl CommandQueue {
    /// Queue a command.
    pub fn push(&self, command: impl FnOnce(&mut Gui) + 'static) {
        self.commands.borrow_mut().push_back(Box::new(command));
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    fn pop(&self) -> Option<Command> {
        self.commands.borrow_mut().pop_front()
    }
}

impl std::fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandQueue").field("len", &self.len()).finish()
    }
}

/// The context that owns everything one window shows.
pub struct Gui {
    tree: WidgetTree,
    timers: TimerRegistry,
    config: GuiConfig,
    commands: CommandQueue,
    touch_finger: Option<u32>,
    window_focused: bool,
    close_requested: bool,
}

impl Gui {
    /// A GUI with default settings covering a window of `window_size`.
    pub fn new(window_size: Vector2f) -> Self {
        Self::with_config(window_size, GuiConfig::default())
    }

    /// A GUI with custom settings.
    pub fn with_config(window_size: Vector2f, config: GuiConfig) -> Self {
        let mut tree = WidgetTree::new(window_size);
        tree.set_timing(config.double_click_time, config.caret_blink_interval);
        Self {
            tree,
            timers: TimerRegistry::new(),
            config,
            commands: CommandQueue::default(),
            touch_finger: None,
            window_focused: true,
            close_requested: false,
        }
    }

    /// The settings.
    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    /// Replace the settings.
    pub fn set_config(&mut self, config: GuiConfig) {
        self.tree.set_timing(config.double_click_time, config.caret_blink_interval);
        self.config = config;
    }

    /// Change what the Tab key does.
    pub fn set_tab_key_usage(&mut self, usage: TabKeyUsage) {
        self.config.tab_key_usage = usage;
    }

    /// The widget tree.
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// The widget tree, mutably.
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// The root container.
    pub fn root(&self) -> ObjectId {
        self.tree.root()
    }

    /// The timers.
    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// The timers, mutably.
    pub fn timers_mut(&mut self) -> &mut TimerRegistry {
        &mut self.timers
    }

    /// A handle to the deferred command queue.
    pub fn commands(&self) -> CommandQueue {
        self.commands.clone()
    }

    /// Whether the window has keyboard focus.
    pub fn has_window_focus(&self) -> bool {
        self.window_focused
    }

    /// Whether the backend reported [`Event::Closed`].
    pub fn is_close_requested(&self) -> bool {
        self.close_requested
    }

    /// The size of the window the root covers.
    pub fn window_size(&self) -> Vector2f {
        self.tree.window_size()
    }

    /// Resize the root, relaying out every widget.
    pub fn set_window_size(&mut self, size: Vector2f) {
        self.tree.set_window_size(size);
    }

    /// Route one backend event. Returns whether a widget handled it.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        tracing::trace!(target: targets::GUI, ?event, "event");
        let handled = self.dispatch(event);
        self.run_commands();
        handled
    }

    fn dispatch(&mut self, event: &Event) -> bool {
        let root = self.tree.root();
        match *event {
            Event::MouseButtonPressed { button, position } => self.tree.process_mouse_press(root, button, position),
            Event::MouseButtonReleased { button, position } => {
                self.tree.process_mouse_release(root, button, position)
            }
            Event::MouseMoved { position } => self.tree.process_mouse_move(root, position),
            Event::MouseWheelScrolled { delta, position } => self.tree.process_mouse_wheel(root, delta, position),
            Event::MouseLeft => {
                self.tree.clear_below_mouse(root);
                false
            }
            Event::MouseEntered | Event::KeyReleased(_) => false,
            Event::TouchBegan { finger, position } => {
                if self.touch_finger.is_some() {
                    return false;
                }
                self.touch_finger = Some(finger);
                self.tree.process_mouse_move(root, position);
                self.tree.process_mouse_press(root, MouseButton::Left, position)
            }
            Event::TouchMoved { finger, position } => {
                self.touch_finger == Some(finger) && self.tree.process_mouse_move(root, position)
            }
            Event::TouchEnded { finger, position } => {
                if self.touch_finger != Some(finger) {
                    return false;
                }
                self.touch_finger = None;
                let handled = self.tree.process_mouse_release(root, MouseButton::Left, position);
                self.tree.clear_below_mouse(root);
                handled
            }
            Event::KeyPressed(key_event) => {
                if key_event.key == Key::Tab && self.config.tab_key_usage == TabKeyUsage::SwitchFocus {
                    if key_event.modifiers.shift {
                        self.tree.focus_previous_widget(true)
                    } else {
                        self.tree.focus_next_widget(true)
                    }
                } else {
                    self.tree.process_key_press(root, &key_event)
                }
            }
            Event::TextEntered(code_point) => self.tree.process_text_entered(root, code_point),
            Event::Resized { width, height } => {
                tracing::debug!(target: targets::GUI, width, height, "window resized");
                self.tree.set_window_size(Vector2f::new(width, height));
                true
            }
            Event::GainedFocus => {
                self.window_focused = true;
                false
            }
            Event::LostFocus => {
                self.window_focused = false;
                false
            }
            Event::Closed => {
                tracing::debug!(target: targets::GUI, "close requested");
                self.close_requested = true;
                false
            }
        }
    }

    /// Advance the logical clock: timers, then animations and widget time
    /// hooks. Returns whether anything changed.
    pub fn update_time(&mut self, elapsed: Duration) -> bool {
        let fired = self.timers.update_time(elapsed);
        let changed = self.tree.update_time(elapsed);
        self.run_commands();
        fired || changed
    }

    /// Time until the next timer fires, for backends that sleep.
    pub fn next_scheduled_time(&self) -> Option<Duration> {
        self.timers.next_scheduled_time()
    }

    /// Draw every visible widget, back to front.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        self.tree.draw(renderer);
    }

    fn run_commands(&mut self) {
        // Commands may queue more commands; those run in the same pass.
        while let Some(command) = self.commands.pop() {
            command(self);
        }
    }
}

impl Default for Gui {
    fn default() -> Self {
        Self::new(Vector2f::new(800.0, 600.0))
    }
}

impl std::fmt::Debug for Gui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gui")
            .field("tree", &self.tree)
            .field("timers", &self.timers.len())
            .field("config", &self.config)
            .field("window_focused", &self.window_focused)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::event::{KeyEvent, KeyboardModifiers};
    use crate::widgets::{Button, EditBox};

    fn two_buttons(gui: &mut Gui) -> (ObjectId, ObjectId) {
        let root = gui.root();
        let first = gui.tree_mut().add(root, Button::new("one"), "One").unwrap();
        let second = gui.tree_mut().add(root, Button::new("two"), "Two").unwrap();
        gui.tree_mut().set_position(second, (0.0, 50.0)).unwrap();
        (first, second)
    }

    #[test]
    fn test_tab_switches_focus() {
        let mut gui = Gui::default();
        let (first, second) = two_buttons(&mut gui);

        assert!(gui.handle_event(&Event::key(Key::Tab)));
        assert_eq!(gui.tree().focused_leaf(), Some(first));
        gui.handle_event(&Event::key(Key::Tab));
        assert_eq!(gui.tree().focused_leaf(), Some(second));
        gui.handle_event(&Event::KeyPressed(KeyEvent::with_modifiers(
            Key::Tab,
            KeyboardModifiers::SHIFT,
        )));
        assert_eq!(gui.tree().focused_leaf(), Some(first));
    }

    #[test]
    fn test_tab_passed_to_widget() {
        let mut gui = Gui::with_config(
            Vector2f::new(800.0, 600.0),
            GuiConfig::default().with_tab_key_usage(TabKeyUsage::PassToWidget),
        );
        let (first, _) = two_buttons(&mut gui);
        gui.tree_mut().set_focused(first, true).unwrap();
        gui.handle_event(&Event::key(Key::Tab));
        assert_eq!(gui.tree().focused_leaf(), Some(first));
    }

    #[test]
    fn test_first_finger_acts_as_left_button() {
        let mut gui = Gui::default();
        let (first, _) = two_buttons(&mut gui);
        let pressed = Rc::new(Cell::new(0));
        let p = pressed.clone();
        gui.tree_mut().connect(first, "Pressed", move || p.set(p.get() + 1)).unwrap();

        let at = Vector2f::new(10.0, 10.0);
        assert!(gui.handle_event(&Event::TouchBegan { finger: 0, position: at }));
        // A second finger is ignored.
        assert!(!gui.handle_event(&Event::TouchBegan { finger: 1, position: at }));
        assert!(!gui.handle_event(&Event::TouchEnded { finger: 1, position: at }));
        gui.handle_event(&Event::TouchEnded { finger: 0, position: at });
        assert_eq!(pressed.get(), 1);
        assert!(!gui.tree().core(first).unwrap().is_mouse_hover());
    }

    #[test]
    fn test_commands_run_after_dispatch() {
        let mut gui = Gui::default();
        let (first, second) = two_buttons(&mut gui);
        let commands = gui.commands();
        gui.tree_mut()
            .connect(first, "Pressed", move || {
                commands.push(move |gui| {
                    gui.tree_mut().remove(second);
                })
            })
            .unwrap();

        gui.handle_event(&Event::left_press(10.0, 10.0));
        assert!(gui.tree().contains(second));
        gui.handle_event(&Event::left_release(10.0, 10.0));
        assert!(!gui.tree().contains(second));
        assert!(gui.commands().is_empty());
    }

    #[test]
    fn test_update_time_runs_timers_then_widgets() {
        let mut gui = Gui::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        gui.timers_mut().create(move || sink.borrow_mut().push("timer"), Duration::from_millis(100), true);

        assert!(!gui.update_time(Duration::from_millis(50)));
        assert!(gui.update_time(Duration::from_millis(50)));
        assert_eq!(*log.borrow(), vec!["timer"]);
        assert_eq!(gui.tree().clock(), Duration::from_millis(100));
        assert_eq!(gui.next_scheduled_time(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_caret_blink_follows_config() {
        let config = GuiConfig::default().with_caret_blink_interval(Duration::from_millis(200));
        let mut gui = Gui::with_config(Vector2f::new(800.0, 600.0), config);
        let root = gui.root();
        let edit = gui.tree_mut().add(root, EditBox::new(), "Edit").unwrap();
        gui.tree_mut().set_focused(edit, true).unwrap();
        assert!(gui.tree().widget::<EditBox>(edit).unwrap().is_caret_visible());
        gui.update_time(Duration::from_millis(200));
        assert!(!gui.tree().widget::<EditBox>(edit).unwrap().is_caret_visible());
    }

    #[test]
    fn test_window_events() {
        let mut gui = Gui::default();
        gui.handle_event(&Event::Resized { width: 1024.0, height: 768.0 });
        assert_eq!(gui.window_size(), Vector2f::new(1024.0, 768.0));
        assert_eq!(gui.tree().core(gui.root()).unwrap().size(), Vector2f::new(1024.0, 768.0));

        gui.handle_event(&Event::LostFocus);
        assert!(!gui.has_window_focus());
        gui.handle_event(&Event::GainedFocus);
        assert!(gui.has_window_focus());

        assert!(!gui.is_close_requested());
        gui.handle_event(&Event::Closed);
        assert!(gui.is_close_requested());
    }
}

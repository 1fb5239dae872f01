//! Time-driven animation of widget position, size and opacity.
//!
//! Every widget has three independent channels ([`AnimationChannel`]). A
//! channel runs at most one task; starting a new one replaces the old task
//! without running its completion. Tasks advance when the tree's logical
//! clock does ([`WidgetTree::update_time`]) and write the interpolated value
//! straight into the widget's resolved geometry, so the widget's layouts stay
//! untouched while it moves.
//!
//! Show and hide effects are built on top of these tasks:
//!
//! ```
//! use std::time::Duration;
//! use horizon_trellis::animation::ShowEffectType;
//! use horizon_trellis::tree::WidgetTree;
//! use horizon_trellis::widgets::Panel;
//! use horizon_trellis::Vector2f;
//!
//! let mut tree = WidgetTree::new(Vector2f::new(800.0, 600.0));
//! let panel = tree.add(tree.root(), Panel::new(), "Panel").unwrap();
//! tree.set_position(panel, (100.0, 50.0)).unwrap();
//!
//! tree.show_with_effect(panel, ShowEffectType::SlideFromLeft, Duration::from_millis(300)).unwrap();
//! assert_eq!(tree.core(panel).unwrap().position().x, -100.0);
//!
//! tree.update_time(Duration::from_millis(400));
//! assert_eq!(tree.core(panel).unwrap().position().x, 100.0);
//! assert!(!tree.is_animation_playing(panel));
//! ```
//!
//! [`WidgetTree::update_time`]: crate::tree::WidgetTree::update_time

use std::fmt;
use std::time::Duration;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::Vector2f;
use crate::tree::WidgetTree;
use crate::widget::signals;

/// The independently animated properties of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationChannel {
    /// Position.
    Move,
    /// Size.
    Resize,
    /// Inherited opacity.
    Fade,
}

/// Visual effects for [`WidgetTree::show_with_effect`] and
/// [`WidgetTree::hide_with_effect`].
///
/// Slides name a direction of travel, so `SlideFromLeft` and `SlideToRight`
/// move the same way: a show effect enters from the left, a hide effect
/// leaves to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShowEffectType {
    /// Opacity change.
    Fade,
    /// Grow from or shrink to the center.
    Scale,
    /// Travel toward the left edge.
    SlideToLeft,
    /// Travel toward the right edge.
    SlideToRight,
    /// Travel toward the top edge.
    SlideToTop,
    /// Travel toward the bottom edge.
    SlideToBottom,
    /// Enter from or leave past the left edge.
    SlideFromLeft,
    /// Enter from or leave past the right edge.
    SlideFromRight,
    /// Enter from or leave past the top edge.
    SlideFromTop,
    /// Enter from or leave past the bottom edge.
    SlideFromBottom,
}

/// The value range of one task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationTrack {
    /// Move between two positions.
    Move {
        /// Start position.
        from: Vector2f,
        /// End position.
        to: Vector2f,
    },
    /// Resize between two sizes.
    Resize {
        /// Start size.
        from: Vector2f,
        /// End size.
        to: Vector2f,
    },
    /// Change the inherited opacity.
    Fade {
        /// Start opacity.
        from: f32,
        /// End opacity.
        to: f32,
    },
}

impl AnimationTrack {
    /// The channel this track runs on.
    pub fn channel(&self) -> AnimationChannel {
        match self {
            Self::Move { .. } => AnimationChannel::Move,
            Self::Resize { .. } => AnimationChannel::Resize,
            Self::Fade { .. } => AnimationChannel::Fade,
        }
    }
}

/// Callback run by the tree when a task completes.
pub type FinishCallback = Box<dyn FnOnce(&mut WidgetTree, ObjectId)>;

enum Finish {
    Nothing,
    /// Keep the end value by turning it into an absolute layout.
    Commit,
    ShowEffect(ShowEffectType),
    HideEffect { effect: ShowEffectType, opacity: f32 },
    Callback(FinishCallback),
}

impl fmt::Debug for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nothing => f.write_str("Nothing"),
            Self::Commit => f.write_str("Commit"),
            Self::ShowEffect(effect) => write!(f, "ShowEffect({effect:?})"),
            Self::HideEffect { effect, .. } => write!(f, "HideEffect({effect:?})"),
            Self::Callback(_) => f.write_str("Callback"),
        }
    }
}

#[derive(Debug)]
struct AnimationTask {
    widget: ObjectId,
    track: AnimationTrack,
    elapsed: Duration,
    total: Duration,
    finish: Finish,
}

/// Running tasks, owned by the tree.
#[derive(Debug, Default)]
pub(crate) struct AnimationEngine {
    tasks: Vec<AnimationTask>,
}

impl AnimationEngine {
    fn start(&mut self, task: AnimationTask) {
        let channel = task.track.channel();
        if let Some(index) = self
            .tasks
            .iter()
            .position(|t| t.widget == task.widget && t.track.channel() == channel)
        {
            let replaced = self.tasks.remove(index);
            tracing::trace!(target: targets::ANIMATION, widget = ?replaced.widget, ?channel, "animation replaced");
        }
        self.tasks.push(task);
    }

    fn find(&self, widget: ObjectId, channel: AnimationChannel) -> Option<&AnimationTask> {
        self.tasks
            .iter()
            .find(|t| t.widget == widget && t.track.channel() == channel)
    }

    pub(crate) fn cancel_widget(&mut self, widget: ObjectId) {
        self.tasks.retain(|t| t.widget != widget);
    }

    fn is_playing(&self, widget: ObjectId) -> bool {
        self.tasks.iter().any(|t| t.widget == widget)
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }
}

impl WidgetTree {
    /// Start a task on the track's channel, replacing any task running there.
    ///
    /// The start value is applied immediately. `on_finish` runs once the end
    /// value has been applied, before `AnimationFinished` is emitted.
    pub fn start_animation(
        &mut self,
        id: ObjectId,
        track: AnimationTrack,
        duration: Duration,
        on_finish: Option<FinishCallback>,
    ) -> Result<()> {
        self.node(id)?;
        let finish = on_finish.map_or(Finish::Nothing, Finish::Callback);
        self.start_task(id, track, duration, finish);
        Ok(())
    }

    fn start_task(&mut self, id: ObjectId, track: AnimationTrack, duration: Duration, finish: Finish) {
        tracing::debug!(target: targets::ANIMATION, ?id, ?track, ?duration, "animation started");
        self.apply_track(id, &track, Progress::Start);
        self.animations.start(AnimationTask {
            widget: id,
            track,
            elapsed: Duration::ZERO,
            total: duration,
            finish,
        });
    }

    /// Move a widget to `position` over `duration`. The position becomes the
    /// widget's absolute position layout when the move completes.
    pub fn move_with_animation(&mut self, id: ObjectId, position: Vector2f, duration: Duration) -> Result<()> {
        let from = self.core(id)?.position();
        self.start_task(id, AnimationTrack::Move { from, to: position }, duration, Finish::Commit);
        Ok(())
    }

    /// Resize a widget to `size` over `duration`. The size becomes the
    /// widget's absolute size layout when the resize completes.
    pub fn resize_with_animation(&mut self, id: ObjectId, size: Vector2f, duration: Duration) -> Result<()> {
        let from = self.core(id)?.size();
        self.start_task(id, AnimationTrack::Resize { from, to: size }, duration, Finish::Commit);
        Ok(())
    }

    /// Whether any channel of the widget is animating.
    pub fn is_animation_playing(&self, id: ObjectId) -> bool {
        self.animations.is_playing(id)
    }

    /// Number of running tasks across all widgets.
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Make a widget visible with an effect.
    ///
    /// `SlideFromRight` and `SlideFromBottom` need the parent size; on the
    /// root they only show the widget.
    pub fn show_with_effect(&mut self, id: ObjectId, effect: ShowEffectType, duration: Duration) -> Result<()> {
        self.set_visible(id, true)?;
        let Some((position, size)) = self.resting_geometry(id) else {
            return Ok(());
        };
        let parent_size = self.parent(id)?.and_then(|_| self.parent_inner_size(id));
        let done = Finish::ShowEffect(effect);

        match effect {
            ShowEffectType::Fade => {
                let resting = self.resting_inherited_opacity(id);
                let (from, duration) = match self.animations.find(id, AnimationChannel::Fade) {
                    Some(_) if resting > 0.0 => {
                        let current = self.core(id)?.inherited_opacity();
                        let remaining = ((resting - current) / resting).clamp(0.0, 1.0);
                        (current, duration.mul_f32(remaining))
                    }
                    _ => (0.0, duration),
                };
                self.start_task(id, AnimationTrack::Fade { from, to: resting }, duration, done);
            }
            ShowEffectType::Scale => {
                let center = position + size / 2.0;
                self.start_task(id, AnimationTrack::Move { from: center, to: position }, duration, Finish::Nothing);
                self.start_task(id, AnimationTrack::Resize { from: Vector2f::ZERO, to: size }, duration, done);
            }
            ShowEffectType::SlideFromLeft | ShowEffectType::SlideToRight => {
                let from = Vector2f::new(-size.x, position.y);
                self.start_task(id, AnimationTrack::Move { from, to: position }, duration, done);
            }
            ShowEffectType::SlideFromTop | ShowEffectType::SlideToBottom => {
                let from = Vector2f::new(position.x, -size.y);
                self.start_task(id, AnimationTrack::Move { from, to: position }, duration, done);
            }
            ShowEffectType::SlideFromRight | ShowEffectType::SlideToLeft => {
                let Some(parent_size) = parent_size else {
                    tracing::warn!(target: targets::ANIMATION, ?id, ?effect, "slide needs a parent, showing without effect");
                    return Ok(());
                };
                let from = Vector2f::new(parent_size.x, position.y);
                self.start_task(id, AnimationTrack::Move { from, to: position }, duration, done);
            }
            ShowEffectType::SlideFromBottom | ShowEffectType::SlideToTop => {
                let Some(parent_size) = parent_size else {
                    tracing::warn!(target: targets::ANIMATION, ?id, ?effect, "slide needs a parent, showing without effect");
                    return Ok(());
                };
                let from = Vector2f::new(position.x, parent_size.y);
                self.start_task(id, AnimationTrack::Move { from, to: position }, duration, done);
            }
        }
        Ok(())
    }

    /// Hide a widget with an effect.
    ///
    /// When the effect completes the widget becomes invisible and its
    /// position, size and inherited opacity are restored.
    pub fn hide_with_effect(&mut self, id: ObjectId, effect: ShowEffectType, duration: Duration) -> Result<()> {
        let current_opacity = self.core(id)?.inherited_opacity();
        let Some((position, size)) = self.resting_geometry(id) else {
            return Ok(());
        };
        let parent_size = self.parent(id)?.and_then(|_| self.parent_inner_size(id));
        let resting_opacity = self.resting_inherited_opacity(id);
        let done = Finish::HideEffect {
            effect,
            opacity: resting_opacity,
        };

        // Slides towards the far edge of a missing parent run against a zero size.
        let far_edge = parent_size.unwrap_or_else(|| {
            if matches!(
                effect,
                ShowEffectType::SlideToRight
                    | ShowEffectType::SlideFromLeft
                    | ShowEffectType::SlideToBottom
                    | ShowEffectType::SlideFromTop
            ) {
                tracing::warn!(target: targets::ANIMATION, ?id, ?effect, "slide needs a parent, using a zero size");
            }
            Vector2f::ZERO
        });

        let mut duration = duration;
        let track = match effect {
            ShowEffectType::Fade => {
                // A fade that is still running only has the visible part left to undo.
                if self.animations.find(id, AnimationChannel::Fade).is_some() && resting_opacity > 0.0 {
                    duration = duration.mul_f32((current_opacity / resting_opacity).clamp(0.0, 1.0));
                }
                AnimationTrack::Fade {
                    from: current_opacity,
                    to: 0.0,
                }
            }
            ShowEffectType::Scale => {
                let center = position + size / 2.0;
                self.start_task(id, AnimationTrack::Move { from: position, to: center }, duration, Finish::Nothing);
                AnimationTrack::Resize {
                    from: size,
                    to: Vector2f::ZERO,
                }
            }
            ShowEffectType::SlideToLeft | ShowEffectType::SlideFromRight => AnimationTrack::Move {
                from: position,
                to: Vector2f::new(-size.x, position.y),
            },
            ShowEffectType::SlideToTop | ShowEffectType::SlideFromBottom => AnimationTrack::Move {
                from: position,
                to: Vector2f::new(position.x, -size.y),
            },
            ShowEffectType::SlideToRight | ShowEffectType::SlideFromLeft => AnimationTrack::Move {
                from: position,
                to: Vector2f::new(far_edge.x, position.y),
            },
            ShowEffectType::SlideToBottom | ShowEffectType::SlideFromTop => AnimationTrack::Move {
                from: position,
                to: Vector2f::new(position.x, far_edge.y),
            },
        };
        self.start_task(id, track, duration, done);
        Ok(())
    }

    /// Advance every task. Returns whether any task ran.
    #[tracing::instrument(skip(self), target = "horizon_trellis::animation", level = "trace")]
    pub(crate) fn update_animations(&mut self, elapsed: Duration) -> bool {
        if self.animations.tasks.is_empty() {
            return false;
        }
        let tasks = std::mem::take(&mut self.animations.tasks);
        let mut running = Vec::with_capacity(tasks.len());
        let mut finished = Vec::new();
        for mut task in tasks {
            if !self.contains(task.widget) {
                continue;
            }
            task.elapsed += elapsed;
            if task.elapsed >= task.total {
                self.apply_track(task.widget, &task.track, Progress::End);
                finished.push(task);
            } else {
                let ratio = (task.elapsed.as_nanos() as f64 / task.total.as_nanos() as f64) as f32;
                self.apply_track(task.widget, &task.track, Progress::Ratio(ratio));
                running.push(task);
            }
        }
        running.append(&mut self.animations.tasks);
        self.animations.tasks = running;

        for task in finished {
            self.finish_task(task);
        }
        true
    }

    fn apply_track(&mut self, id: ObjectId, track: &AnimationTrack, progress: Progress) {
        match *track {
            AnimationTrack::Move { from, to } => {
                let position = progress.pick(from, to, |t| from.lerp(to, t));
                self.set_resolved_geometry(id, Some(position), None);
            }
            AnimationTrack::Resize { from, to } => {
                let size = progress.pick(from, to, |t| from.lerp(to, t));
                self.set_resolved_geometry(id, None, Some(size));
            }
            AnimationTrack::Fade { from, to } => {
                let opacity = progress.pick(from, to, |t| from + (to - from) * t);
                self.set_inherited_opacity(id, opacity);
            }
        }
    }

    fn finish_task(&mut self, task: AnimationTask) {
        let id = task.widget;
        if !self.contains(id) {
            return;
        }
        let channel = task.track.channel();
        tracing::debug!(target: targets::ANIMATION, ?id, ?channel, "animation finished");

        match task.finish {
            Finish::Nothing => {}
            Finish::Commit => {
                let result = match task.track {
                    AnimationTrack::Move { to, .. } => self.set_position(id, to),
                    AnimationTrack::Resize { to, .. } => self.set_size(id, to),
                    AnimationTrack::Fade { .. } => Ok(()),
                };
                if let Err(err) = result {
                    tracing::warn!(target: targets::ANIMATION, ?id, error = %err, "could not keep animated value");
                }
            }
            Finish::ShowEffect(effect) => {
                self.relayout(id);
                self.emit(id, signals::SHOW_EFFECT_FINISHED, Some(&(effect, true)));
            }
            Finish::HideEffect { effect, opacity } => {
                if let Err(err) = self.set_visible(id, false) {
                    tracing::warn!(target: targets::ANIMATION, ?id, error = %err, "could not hide widget");
                }
                self.set_inherited_opacity(id, opacity);
                self.relayout(id);
                self.emit(id, signals::SHOW_EFFECT_FINISHED, Some(&(effect, false)));
            }
            Finish::Callback(callback) => callback(self, id),
        }
        self.emit(id, signals::ANIMATION_FINISHED, Some(&channel));
    }
}

#[derive(Debug, Clone, Copy)]
enum Progress {
    Start,
    Ratio(f32),
    End,
}

impl Progress {
    fn pick<T>(self, from: T, to: T, lerp: impl FnOnce(f32) -> T) -> T {
        match self {
            Self::Start => from,
            Self::Ratio(t) => lerp(t),
            Self::End => to,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::widgets::{Button, Panel};

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn setup() -> (WidgetTree, ObjectId) {
        let mut tree = WidgetTree::new(Vector2f::new(800.0, 600.0));
        let button = tree.add(tree.root(), Button::new("x"), "x").unwrap();
        tree.set_position(button, (40.0, 30.0)).unwrap();
        tree.set_size(button, (100.0, 20.0)).unwrap();
        (tree, button)
    }

    #[test]
    fn test_move_interpolates_and_commits() {
        let (mut tree, button) = setup();
        tree.move_with_animation(button, Vector2f::new(140.0, 30.0), ms(100)).unwrap();
        tree.update_time(ms(25));
        assert_eq!(tree.core(button).unwrap().position(), Vector2f::new(65.0, 30.0));

        tree.update_time(ms(500));
        assert_eq!(tree.core(button).unwrap().position(), Vector2f::new(140.0, 30.0));
        // The end value became the layout, so a relayout keeps it.
        tree.set_window_size(Vector2f::new(1000.0, 1000.0));
        assert_eq!(tree.core(button).unwrap().position(), Vector2f::new(140.0, 30.0));
        assert!(!tree.is_animation_playing(button));
    }

    #[test]
    fn test_replacing_skips_old_completion() {
        let (mut tree, button) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = log.clone();
        tree.start_animation(
            button,
            AnimationTrack::Fade { from: 1.0, to: 0.0 },
            ms(100),
            Some(Box::new(move |_, _| first.borrow_mut().push("first"))),
        )
        .unwrap();
        let second = log.clone();
        tree.start_animation(
            button,
            AnimationTrack::Fade { from: 0.5, to: 1.0 },
            ms(100),
            Some(Box::new(move |_, _| second.borrow_mut().push("second"))),
        )
        .unwrap();
        assert_eq!(tree.animation_count(), 1);
        tree.update_time(ms(100));
        assert_eq!(*log.borrow(), vec!["second"]);
    }

    #[test]
    fn test_channels_are_independent() {
        let (mut tree, button) = setup();
        tree.move_with_animation(button, Vector2f::ZERO, ms(100)).unwrap();
        tree.resize_with_animation(button, Vector2f::new(10.0, 10.0), ms(200)).unwrap();
        assert_eq!(tree.animation_count(), 2);
        tree.update_time(ms(100));
        assert_eq!(tree.animation_count(), 1);
        assert!(tree.is_animation_playing(button));
    }

    #[test]
    fn test_finished_signal_carries_channel() {
        let (mut tree, button) = setup();
        let channels = Rc::new(RefCell::new(Vec::new()));
        let c = channels.clone();
        tree.connect(button, "AnimationFinished", move |channel: AnimationChannel| {
            c.borrow_mut().push(channel)
        })
        .unwrap();
        tree.resize_with_animation(button, Vector2f::new(10.0, 10.0), ms(50)).unwrap();
        tree.update_time(ms(50));
        assert_eq!(*channels.borrow(), vec![AnimationChannel::Resize]);
    }

    #[test]
    fn test_removed_widget_cancels_tasks() {
        let (mut tree, button) = setup();
        tree.move_with_animation(button, Vector2f::ZERO, ms(100)).unwrap();
        tree.remove(button);
        assert_eq!(tree.animation_count(), 0);
        assert!(!tree.update_time(ms(10)));
    }

    #[test]
    fn test_fade_drives_inherited_opacity_of_subtree() {
        let mut tree = WidgetTree::new(Vector2f::new(800.0, 600.0));
        let panel = tree.add(tree.root(), Panel::new(), "Panel").unwrap();
        let child = tree.add(panel, Button::new("x"), "x").unwrap();
        tree.hide_with_effect(panel, ShowEffectType::Fade, ms(100)).unwrap();
        tree.update_time(ms(50));
        assert_eq!(tree.core(panel).unwrap().opacity(), 1.0);
        assert_eq!(tree.core(panel).unwrap().inherited_opacity(), 0.5);
        assert_eq!(tree.core(child).unwrap().inherited_opacity(), 0.5);
    }

    #[test]
    fn test_slide_from_right_on_root_only_shows() {
        let mut tree = WidgetTree::new(Vector2f::new(800.0, 600.0));
        let root = tree.root();
        tree.set_visible(root, false).unwrap();
        tree.show_with_effect(root, ShowEffectType::SlideFromRight, ms(100)).unwrap();
        assert!(tree.core(root).unwrap().is_visible());
        assert!(!tree.is_animation_playing(root));
    }

    #[test]
    fn test_slide_to_right_on_root_runs_against_zero_size() {
        let mut tree = WidgetTree::new(Vector2f::new(800.0, 600.0));
        let root = tree.root();
        tree.hide_with_effect(root, ShowEffectType::SlideToRight, ms(100)).unwrap();
        assert!(tree.is_animation_playing(root));
        tree.update_time(ms(50));
        assert!(tree.core(root).unwrap().is_visible());
        assert_eq!(tree.core(root).unwrap().position(), Vector2f::ZERO);

        tree.update_time(ms(50));
        assert!(!tree.core(root).unwrap().is_visible());
        assert!(!tree.is_animation_playing(root));
    }
}

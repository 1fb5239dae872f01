//! Timer system for Horizon Trellis.
//!
//! Provides one-shot and repeating timers driven by a logical clock. Nothing
//! here reads the wall clock: the embedding application advances time by
//! calling [`TimerRegistry::update_time`] once per frame with the elapsed
//! duration, and callbacks run synchronously inside that call.
//!
//! # Firing policy
//!
//! A timer fires at most once per `update_time` call. When the delta covers
//! the remaining time the callback runs and the countdown restarts at the
//! full interval; the overshoot is not carried into the next period.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! use horizon_trellis_core::TimerRegistry;
//!
//! let mut timers = TimerRegistry::new();
//! let count = Rc::new(Cell::new(0));
//! let c = count.clone();
//! timers.create(move || c.set(c.get() + 1), Duration::from_millis(100), true);
//!
//! timers.update_time(Duration::from_millis(60));
//! timers.update_time(Duration::from_millis(60));
//! assert_eq!(count.get(), 1);
//! ```

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::error::TimerError;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once and is then removed.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

/// Callback invoked when a timer fires.
///
/// The registry and the firing timer's id are passed in so a callback can
/// stop itself or start other timers.
pub type TimerCallback = Box<dyn FnMut(&mut TimerRegistry, TimerId)>;

/// Internal timer data.
struct TimerData {
    /// Taken out while the callback runs.
    callback: Option<TimerCallback>,
    interval: Duration,
    remaining: Duration,
    kind: TimerKind,
    enabled: bool,
}

/// Registry of all timers of one GUI instance.
pub struct TimerRegistry {
    timers: SlotMap<TimerId, TimerData>,
    /// Creation order, which is also firing order within one update.
    order: Vec<TimerId>,
    clock: Duration,
}

impl TimerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            order: Vec::new(),
            clock: Duration::ZERO,
        }
    }

    fn insert(&mut self, callback: TimerCallback, interval: Duration, kind: TimerKind, enabled: bool) -> TimerId {
        let id = self.timers.insert(TimerData {
            callback: Some(callback),
            interval,
            remaining: interval,
            kind,
            enabled,
        });
        self.order.push(id);
        tracing::trace!(target: targets::TIMER, ?id, ?interval, ?kind, enabled, "timer created");
        id
    }

    /// Create a repeating timer.
    pub fn create(&mut self, mut callback: impl FnMut() + 'static, interval: Duration, enabled: bool) -> TimerId {
        self.insert(Box::new(move |_, _| callback()), interval, TimerKind::Repeating, enabled)
    }

    /// Create a repeating timer whose callback can reach the registry.
    pub fn create_with_registry(
        &mut self,
        callback: impl FnMut(&mut TimerRegistry, TimerId) + 'static,
        interval: Duration,
        enabled: bool,
    ) -> TimerId {
        self.insert(Box::new(callback), interval, TimerKind::Repeating, enabled)
    }

    /// Run `callback` once after `delay`.
    ///
    /// A zero delay fires on the next [`update_time`](Self::update_time),
    /// even one with a zero delta.
    pub fn schedule_callback(&mut self, mut callback: impl FnMut() + 'static, delay: Duration) -> TimerId {
        self.insert(Box::new(move |_, _| callback()), delay, TimerKind::OneShot, true)
    }

    /// Remove a timer. Returns whether it existed.
    pub fn remove(&mut self, id: TimerId) -> bool {
        let removed = self.timers.remove(id).is_some();
        if removed {
            self.order.retain(|&t| t != id);
        }
        removed
    }

    /// Check if a timer exists.
    pub fn contains(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Enable or disable a timer.
    ///
    /// Both directions restart the countdown at the full interval.
    pub fn set_enabled(&mut self, id: TimerId, enabled: bool) -> Result<(), TimerError> {
        let timer = self.timers.get_mut(id).ok_or(TimerError::InvalidTimerId)?;
        timer.enabled = enabled;
        timer.remaining = timer.interval;
        Ok(())
    }

    /// Whether a timer is enabled. Removed timers report `false`.
    pub fn is_enabled(&self, id: TimerId) -> bool {
        self.timers.get(id).is_some_and(|t| t.enabled)
    }

    /// Change the interval.
    ///
    /// Setting the same interval again is a no-op; otherwise an enabled timer
    /// restarts its countdown.
    pub fn set_interval(&mut self, id: TimerId, interval: Duration) -> Result<(), TimerError> {
        let timer = self.timers.get_mut(id).ok_or(TimerError::InvalidTimerId)?;
        if timer.interval == interval {
            return Ok(());
        }
        timer.interval = interval;
        if timer.enabled {
            timer.remaining = interval;
        }
        Ok(())
    }

    /// The interval of a timer.
    pub fn interval(&self, id: TimerId) -> Option<Duration> {
        self.timers.get(id).map(|t| t.interval)
    }

    /// Replace the callback of a timer.
    pub fn set_callback(&mut self, id: TimerId, mut callback: impl FnMut() + 'static) -> Result<(), TimerError> {
        let timer = self.timers.get_mut(id).ok_or(TimerError::InvalidTimerId)?;
        timer.callback = Some(Box::new(move |_, _| callback()));
        Ok(())
    }

    /// Total time advanced through [`update_time`](Self::update_time).
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Number of timers, enabled or not.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether there are no timers.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Remove all timers and reset the clock.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.order.clear();
        self.clock = Duration::ZERO;
    }

    /// Time until the next enabled timer fires, or `None` when nothing is
    /// enabled.
    pub fn next_scheduled_time(&self) -> Option<Duration> {
        self.timers
            .values()
            .filter(|t| t.enabled)
            .map(|t| t.remaining)
            .min()
    }

    /// Advance the logical clock and fire every timer whose countdown ran out.
    ///
    /// Returns whether any timer fired.
    #[tracing::instrument(skip(self), target = "horizon_trellis_core::timer", level = "trace")]
    pub fn update_time(&mut self, elapsed: Duration) -> bool {
        self.clock += elapsed;

        // Callbacks may create or remove timers, so walk a snapshot.
        let snapshot = self.order.clone();
        let mut fired = false;
        for id in snapshot {
            let Some(timer) = self.timers.get_mut(id) else {
                continue;
            };
            if !timer.enabled {
                continue;
            }
            if timer.remaining > elapsed {
                timer.remaining -= elapsed;
                continue;
            }

            timer.remaining = timer.interval;
            let one_shot = timer.kind == TimerKind::OneShot;
            if one_shot {
                timer.enabled = false;
            }
            let callback = timer.callback.take();
            fired = true;
            tracing::trace!(target: targets::TIMER, ?id, "timer fired");

            if let Some(mut callback) = callback {
                callback(self, id);
                if let Some(timer) = self.timers.get_mut(id) {
                    if timer.callback.is_none() {
                        timer.callback = Some(callback);
                    }
                }
            }

            // A one-shot callback that re-enabled its own timer keeps it.
            if one_shot && !self.is_enabled(id) {
                self.remove(id);
            }
        }
        fired
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("timers", &self.timers.len())
            .field("clock", &self.clock)
            .finish()
    }
}

static_assertions::assert_impl_all!(TimerId: Copy, Send, Sync);

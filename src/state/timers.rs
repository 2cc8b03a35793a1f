//! Timers Module - Deterministic interval timers
//!
//! `setInterval` / `clearInterval` on a virtual clock. The host drives time
//! with [`advance`] (from its event loop, or directly in tests), so timer
//! callbacks always run on the document's thread and never overlap.
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::state::timers;
//! use std::time::Duration;
//!
//! let id = timers::set_interval(Duration::from_millis(5000), || next_slide());
//! timers::advance(Duration::from_millis(16));
//! if let Some(id) = id {
//!     timers::clear_interval(id);
//! }
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use spark_signals::{signal, Signal};

use crate::types::Callback;

/// Handle returned by [`set_interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Timer {
    period: Duration,
    next_due: Duration,
    callback: Callback,
}

struct TimerRegistry {
    timers: BTreeMap<TimerId, Timer>,
    next_id: u64,
}

impl TimerRegistry {
    fn new() -> Self {
        Self {
            timers: BTreeMap::new(),
            next_id: 0,
        }
    }
}

thread_local! {
    static REGISTRY: RefCell<TimerRegistry> = RefCell::new(TimerRegistry::new());
    /// Virtual clock (time since the document started)
    static NOW: Signal<Duration> = signal(Duration::ZERO);
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Current virtual time.
pub fn now() -> Duration {
    NOW.with(|s| s.get())
}

/// Run `callback` every `period`, first after one full period.
///
/// A zero period would fire forever within one `advance`, so it is refused
/// (returns None).
pub fn set_interval<F>(period: Duration, callback: F) -> Option<TimerId>
where
    F: Fn() + 'static,
{
    if period.is_zero() {
        tracing::warn!("refusing zero-period interval");
        return None;
    }

    let next_due = now() + period;
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = TimerId(reg.next_id);
        reg.next_id += 1;
        reg.timers.insert(
            id,
            Timer {
                period,
                next_due,
                callback: Rc::new(callback),
            },
        );
        id
    });
    Some(id)
}

/// Cancel an interval. Unknown or already cleared ids are ignored.
pub fn clear_interval(id: TimerId) {
    REGISTRY.with(|reg| {
        reg.borrow_mut().timers.remove(&id);
    });
}

/// Is the interval still scheduled?
pub fn is_active(id: TimerId) -> bool {
    REGISTRY.with(|reg| reg.borrow().timers.contains_key(&id))
}

/// Number of scheduled intervals.
pub fn active_count() -> usize {
    REGISTRY.with(|reg| reg.borrow().timers.len())
}

/// Move the clock forward by `delta`, firing every interval that falls due.
///
/// Firings run in due-time order (ties by creation order). The registry is
/// not borrowed while a callback runs, so callbacks may set or clear
/// intervals, including their own.
pub fn advance(delta: Duration) {
    let target = now() + delta;

    loop {
        let due = REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            let (&id, _) = reg
                .timers
                .iter()
                .filter(|(_, timer)| timer.next_due <= target)
                .min_by_key(|(id, timer)| (timer.next_due, **id))?;
            let timer = reg.timers.get_mut(&id)?;
            let fired_at = timer.next_due;
            timer.next_due += timer.period;
            Some((fired_at, timer.callback.clone()))
        });

        let Some((fired_at, callback)) = due else {
            break;
        };
        NOW.with(|s| s.set(fired_at));
        callback();
    }

    NOW.with(|s| s.set(target));
}

/// Reset all timers and the clock (for testing)
pub fn reset_timers() {
    REGISTRY.with(|reg| *reg.borrow_mut() = TimerRegistry::new());
    NOW.with(|s| s.set(Duration::ZERO));
}

// =============================================================================
// TESTS
// =============================================================================

//! Per-channel rate limiting for motor commands.
//!
//! Slamming a motor from full reverse to full forward in one cycle shocks the
//! gearbox and browns out the brain. The [`RateLimiter`] keeps the last value
//! it emitted for every motor channel and only lets each new command move a
//! bounded distance away from it.
//!
//! # Example
//!
//! ```
//! use clawbot::filter::{FilterPolicy, RateLimiter};
//! use clawbot::peripherals::{MAX_SPEED, MotorChannel};
//!
//! let mut filter = RateLimiter::new(FilterPolicy::MaxStep { step: 10 }, MAX_SPEED);
//! let left = MotorChannel::new(2);
//!
//! assert_eq!(filter.step(left, 100), 10);
//! assert_eq!(filter.step(left, 100), 20);
//! ```

use heapless::FnvIndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::peripherals::{MotorChannel, clamp_speed};

/// Number of channels a limiter can remember.
pub const FILTER_CHANNELS: usize = 16;

/// How far a filtered value may move toward its target in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterPolicy {
    /// Move by at most `step` units per cycle.
    MaxStep { step: i16 },
    /// Move by `alpha` of the remaining error per cycle, rounded, and by at
    /// least one unit until the target is reached. `alpha` above 1 acts as 1;
    /// zero, negative or NaN values move one unit per cycle.
    Exponential { alpha: f64 },
    /// No smoothing; the clamped target is emitted as is.
    Passthrough,
}

impl Default for FilterPolicy {
    fn default() -> Self { FilterPolicy::MaxStep { step: 10 } }
}

impl FilterPolicy {
    /// Computes the next emitted value from the last one and the target.
    ///
    /// The result always lies between `last` and `target` (inclusive), so the
    /// output approaches the target monotonically and never overshoots.
    pub fn advance(&self, last: i16, target: i16) -> i16 {
        let error = i32::from(target) - i32::from(last);
        if error == 0 {
            return last;
        }
        let delta = match *self {
            FilterPolicy::MaxStep { step } => {
                let step = i32::from(step.max(1));
                error.clamp(-step, step)
            }
            FilterPolicy::Exponential { alpha } => {
                // non-positive or NaN alpha degrades to the one-unit minimum
                let alpha = if alpha > 0.0 { alpha.min(1.0) } else { 0.0 };
                let delta = (alpha * f64::from(error)).round() as i32;
                if delta == 0 {
                    error.signum()
                } else {
                    delta.clamp(-error.abs(), error.abs())
                }
            }
            FilterPolicy::Passthrough => error,
        };
        // |delta| <= |error|, so the sum lies between last and target
        (i32::from(last) + delta) as i16
    }
}

/// Low-pass filter holding one memory per motor channel.
///
/// A channel's memory is created the first time it is stepped, starting from
/// a stopped motor (0).
#[derive(Debug, Clone)]
pub struct RateLimiter {
    policy:    FilterPolicy,
    max_speed: i16,
    memory:    FnvIndexMap<MotorChannel, i16, FILTER_CHANNELS>,
}

impl RateLimiter {
    /// Creates a limiter whose outputs never exceed `max_speed` in magnitude.
    pub fn new(policy: FilterPolicy, max_speed: i16) -> Self {
        Self {
            policy,
            max_speed: max_speed.saturating_abs(),
            memory: FnvIndexMap::new(),
        }
    }

    /// The smoothing policy in use.
    pub fn policy(&self) -> FilterPolicy { self.policy }

    /// Moves the channel's stored value toward `target`, stores it and
    /// returns it.
    pub fn step(&mut self, channel: MotorChannel, target: i16) -> i16 {
        let target = clamp_speed(target, self.max_speed);
        let last = clamp_speed(self.last(channel), self.max_speed);
        let next = self.policy.advance(last, target);

        if self.memory.insert(channel, next).is_err() {
            warn!("Rate limiter memory full, {} runs unfiltered", channel);
            return target;
        }
        next
    }

    /// The last value emitted for a channel, or 0 if it was never stepped.
    pub fn last(&self, channel: MotorChannel) -> i16 {
        self.memory.get(&channel).copied().unwrap_or(0)
    }

    /// Forgets every channel, as if all motors had just been stopped.
    pub fn reset(&mut self) { self.memory.clear(); }
}

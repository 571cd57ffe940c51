//! Differential drivetrain mixing.
//!
//! This module turns the driver's forward and turn sticks into left and right
//! wheel commands for a four-motor differential ("tank") base.
//!
//! # Pipeline
//!
//! 1. **Response curve**: each stick is optionally squared (sign preserved),
//!    which gives fine control near the center and full power at the ends.
//! 2. **Arcade mix**: `left = forward + turn`, `right = -forward + turn`. The
//!    right-side motors are mounted mirrored, hence the negated forward term.
//! 3. **Saturation**: if either side exceeds the maximum speed, both sides
//!    are scaled down by the same factor so the turning radius is kept.
//! 4. **Rate limiting**: each side goes through the [`RateLimiter`].
//!
//! # Example
//!
//! ```
//! use clawbot::drivetrain::{Differential, arcade_mix};
//! use clawbot::filter::{FilterPolicy, RateLimiter};
//! use clawbot::peripherals::{MAX_SPEED, MotorChannel};
//!
//! let (left, right) = arcade_mix(127.0, 127.0, false, 127.0);
//! assert_eq!((left, right), (127.0, 0.0));
//!
//! let drivetrain = Differential::new(
//!     [MotorChannel::new(2), MotorChannel::new(3)],
//!     [MotorChannel::new(8), MotorChannel::new(9)],
//!     MAX_SPEED,
//! );
//! let mut filter = RateLimiter::new(FilterPolicy::Passthrough, MAX_SPEED);
//! assert_eq!(drivetrain.mix(&mut filter, 0, 50, false), (50, 50));
//! ```

use log::trace;

use crate::{
    filter::RateLimiter,
    peripherals::{MotorChannel, RobotIo, controller::clamp_axis},
};

/// Squares a stick value while keeping its sign.
///
/// The value is normalized by `max`, squared in magnitude and scaled back, so
/// `square_response(max, max) == max`, `square_response(0.0, max) == 0.0` and
/// the sign of the input is always preserved.
pub fn square_response(value: f64, max: f64) -> f64 {
    if max == 0.0 {
        return 0.0;
    }
    let normalized = value / max;
    normalized * normalized.abs() * max
}

/// Mixes forward and turn commands into `(left, right)` side speeds.
///
/// Both outputs stay within `[-max, max]`; when the raw mix exceeds that
/// range both sides are scaled by the same factor, preserving their ratio.
pub fn arcade_mix(forward: f64, turn: f64, square_inputs: bool, max: f64) -> (f64, f64) {
    let (forward, turn) = if square_inputs {
        (square_response(forward, max), square_response(turn, max))
    } else {
        (forward, turn)
    };

    let mut left = forward + turn;
    let mut right = -forward + turn;

    let max_abs = left.abs().max(right.abs());
    if max_abs > max {
        // max_abs > max >= 0 here, so the division is defined
        let scale = max / max_abs;
        left *= scale;
        right *= scale;
    }
    (left, right)
}

/// A four-motor differential drivetrain.
///
/// The front motor of each side is the filter key for that side; the back
/// motor always receives the same command as the front one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Differential {
    /// Front and back motors on the left side.
    pub left:      [MotorChannel; 2],
    /// Front and back motors on the right side.
    pub right:     [MotorChannel; 2],
    /// Largest command sent to a drive motor.
    pub max_speed: i16,
}

impl Differential {
    /// Creates a drivetrain from `[front, back]` motor pairs.
    pub fn new(left: [MotorChannel; 2], right: [MotorChannel; 2], max_speed: i16) -> Self {
        Self {
            left,
            right,
            max_speed: max_speed.saturating_abs(),
        }
    }

    /// Computes filtered `(left, right)` speeds from raw stick values.
    ///
    /// Out-of-range stick values are clamped first. The filter is stepped
    /// once for each side, so this must be called once per control cycle.
    pub fn mix(
        &self,
        filter: &mut RateLimiter,
        forward: i8,
        turn: i8,
        square_inputs: bool,
    ) -> (i16, i16) {
        let (left, right) = arcade_mix(
            f64::from(clamp_axis(forward)),
            f64::from(clamp_axis(turn)),
            square_inputs,
            f64::from(self.max_speed),
        );

        let left = filter.step(self.left[0], left.round() as i16);
        let right = filter.step(self.right[0], right.round() as i16);
        (left, right)
    }

    /// Mixes the sticks and commands all four drive motors.
    ///
    /// Returns the `(left, right)` speeds that were sent.
    pub fn drive<I: RobotIo>(
        &self,
        io: &mut I,
        filter: &mut RateLimiter,
        forward: i8,
        turn: i8,
        square_inputs: bool,
    ) -> (i16, i16) {
        let (left, right) = self.mix(filter, forward, turn, square_inputs);
        trace!("drive fwd={} turn={} -> left={} right={}", forward, turn, left, right);

        for motor in self.left {
            io.set_actuator(motor, left);
        }
        for motor in self.right {
            io.set_actuator(motor, right);
        }
        (left, right)
    }

    /// Stops every drive motor immediately, bypassing the filter.
    pub fn stop<I: RobotIo>(&self, io: &mut I) {
        for motor in self.left.into_iter().chain(self.right) {
            io.set_actuator(motor, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        filter::FilterPolicy,
        peripherals::{MAX_SPEED, sim::SimIo},
    };

    fn drivetrain() -> Differential {
        Differential::new(
            [MotorChannel::new(2), MotorChannel::new(3)],
            [MotorChannel::new(8), MotorChannel::new(9)],
            MAX_SPEED,
        )
    }

    fn passthrough() -> RateLimiter { RateLimiter::new(FilterPolicy::Passthrough, MAX_SPEED) }

    #[test]
    fn square_response_properties() {
        for x in -127..=127 {
            let y = square_response(f64::from(x), 127.0);
            assert_eq!(y == 0.0, x == 0, "x = {}", x);
            if x != 0 {
                assert_eq!(y.signum(), f64::from(x).signum(), "x = {}", x);
            }
            assert!(y.abs() <= 127.0);
        }
        assert_eq!(square_response(0.0, 127.0), 0.0);
        assert_eq!(square_response(127.0, 127.0), 127.0);
        assert_eq!(square_response(-127.0, 127.0), -127.0);
    }

    #[test]
    fn square_response_halves_at_midpoint() {
        let y = square_response(63.5, 127.0);
        assert!((y - 31.75).abs() < 1e-9);
    }

    #[test]
    fn zero_input_gives_zero_output() {
        assert_eq!(arcade_mix(0.0, 0.0, true, 127.0), (0.0, 0.0));
        assert_eq!(drivetrain().mix(&mut passthrough(), 0, 0, true), (0, 0));
    }

    #[test]
    fn pure_turn_drives_both_sides_equally() {
        let (left, right) = drivetrain().mix(&mut passthrough(), 0, 80, false);
        assert_eq!(left, 80);
        assert_eq!(right, 80);
    }

    #[test]
    fn pure_forward_drives_sides_opposite() {
        let (left, right) = drivetrain().mix(&mut passthrough(), 90, 0, false);
        assert_eq!((left, right), (90, -90));
    }

    #[test]
    fn saturation_scales_both_sides() {
        let (left, right) = arcade_mix(127.0, 127.0, false, 127.0);
        assert_eq!(left, 127.0);
        assert_eq!(right, 0.0);

        let (left, right) = arcade_mix(100.0, 50.0, false, 127.0);
        assert!((left - 127.0).abs() < 1e-9);
        assert!((right + 127.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn minimum_axis_value_is_clamped() {
        let (left, right) = drivetrain().mix(&mut passthrough(), i8::MIN, 0, false);
        assert_eq!((left, right), (-127, 127));
    }

    #[test]
    fn most_negative_max_speed_is_saturated() {
        let dt = Differential::new(
            [MotorChannel::new(2), MotorChannel::new(3)],
            [MotorChannel::new(8), MotorChannel::new(9)],
            i16::MIN,
        );
        assert_eq!(dt.max_speed, i16::MAX);
        assert_eq!(dt.mix(&mut passthrough(), 127, 0, false), (127, -127));
    }

    #[test]
    fn drive_commands_all_four_motors() {
        let mut io = SimIo::new();
        let dt = drivetrain();
        dt.drive(&mut io, &mut passthrough(), 60, 20, false);
        assert_eq!(io.motor(MotorChannel::new(2)), 80);
        assert_eq!(io.motor(MotorChannel::new(3)), 80);
        assert_eq!(io.motor(MotorChannel::new(8)), -40);
        assert_eq!(io.motor(MotorChannel::new(9)), -40);

        dt.stop(&mut io);
        for port in [2, 3, 8, 9] {
            assert_eq!(io.motor(MotorChannel::new(port)), 0);
        }
    }

    #[test]
    fn drive_output_is_rate_limited() {
        let mut filter = RateLimiter::new(FilterPolicy::MaxStep { step: 10 }, MAX_SPEED);
        let dt = drivetrain();
        assert_eq!(dt.mix(&mut filter, 127, 0, true), (10, -10));
        assert_eq!(dt.mix(&mut filter, 127, 0, true), (20, -20));
    }

    #[test]
    fn repeated_input_is_idempotent_after_convergence() {
        let mut filter = RateLimiter::new(FilterPolicy::MaxStep { step: 10 }, MAX_SPEED);
        let dt = drivetrain();
        for _ in 0..30 {
            dt.mix(&mut filter, 70, -30, true);
        }
        let settled = dt.mix(&mut filter, 70, -30, true);
        for _ in 0..10 {
            assert_eq!(dt.mix(&mut filter, 70, -30, true), settled);
        }
    }

    proptest! {
        #[test]
        fn saturation_preserves_ratio(forward in -127i32..=127, turn in -127i32..=127) {
            let raw_left = f64::from(forward + turn);
            let raw_right = f64::from(-forward + turn);
            let (left, right) = arcade_mix(f64::from(forward), f64::from(turn), false, 127.0);

            prop_assert!(left.abs() <= 127.0 + 1e-9);
            prop_assert!(right.abs() <= 127.0 + 1e-9);
            // cross-multiplied ratio check avoids dividing by a zero side
            prop_assert!((left * raw_right - right * raw_left).abs() < 1e-6);
        }
    }
}

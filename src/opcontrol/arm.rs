//! Dual-motor arm control.
//!
//! The arm is lifted by two motors mounted facing each other, so the right
//! motor always receives the negated command of the left one. How the driver
//! commands the arm is chosen once at startup with an [`ArmScheme`].

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    drivetrain::square_response,
    filter::RateLimiter,
    peripherals::{
        MotorChannel, RobotIo,
        controller::{AXIS_MAX, Axis, ButtonBinding, ButtonGroup, Direction, clamp_axis},
    },
};

/// How the driver commands the arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum ArmScheme {
    /// The arm follows an analog axis (squared response) while `enable` is
    /// held. The axis shares a stick with turning, so turning is suppressed
    /// while `enable` or `turn_lock` is held.
    Joystick {
        axis:      Axis,
        enable:    ButtonBinding,
        turn_lock: ButtonBinding,
    },
    /// `raise` drives the arm up at full arm speed, `lower` drives it down.
    Buttons {
        raise: ButtonBinding,
        lower: ButtonBinding,
    },
}

impl ArmScheme {
    /// Joystick scheme on the right vertical axis, enabled by the group 6 bumpers.
    pub const fn joystick(slot: u8) -> Self {
        ArmScheme::Joystick {
            axis:      Axis::RightY,
            enable:    ButtonBinding::new(slot, ButtonGroup::Group6, Direction::Up),
            turn_lock: ButtonBinding::new(slot, ButtonGroup::Group6, Direction::Down),
        }
    }

    /// Button scheme on the group 6 bumpers.
    pub const fn buttons(slot: u8) -> Self {
        ArmScheme::Buttons {
            raise: ButtonBinding::new(slot, ButtonGroup::Group6, Direction::Up),
            lower: ButtonBinding::new(slot, ButtonGroup::Group6, Direction::Down),
        }
    }
}

impl ArmScheme {
    /// The buttons the scheme reads, with their roles.
    pub fn bindings(&self) -> [(&'static str, ButtonBinding); 2] {
        match *self {
            ArmScheme::Joystick {
                enable, turn_lock, ..
            } => [("arm enable", enable), ("arm turn_lock", turn_lock)],
            ArmScheme::Buttons { raise, lower } => [("arm raise", raise), ("arm lower", lower)],
        }
    }
}

impl Default for ArmScheme {
    fn default() -> Self { ArmScheme::joystick(1) }
}

/// The arm motors and the scheme driving them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmControl {
    /// How the driver commands the arm.
    pub scheme:    ArmScheme,
    /// Left arm motor, driven with the arm command as is.
    pub left:      MotorChannel,
    /// Right arm motor, driven with the negated arm command.
    pub right:     MotorChannel,
    /// Largest command sent to an arm motor.
    pub max_speed: i16,
}

impl ArmControl {
    /// Creates an arm controller. The sign of `max_speed` is ignored.
    pub fn new(scheme: ArmScheme, left: MotorChannel, right: MotorChannel, max_speed: i16) -> Self {
        Self {
            scheme,
            left,
            right,
            max_speed: max_speed.saturating_abs(),
        }
    }

    /// Reads the driver's inputs and returns the unfiltered arm command for
    /// the left motor.
    pub fn target<I: RobotIo>(&self, io: &mut I, slot: u8) -> i16 {
        match self.scheme {
            ArmScheme::Joystick { axis, enable, .. } => {
                if !io.read_digital(enable) {
                    return 0;
                }
                let max = f64::from(AXIS_MAX);
                let value = f64::from(clamp_axis(io.read_axis(slot, axis)));
                (square_response(value, max) / max * f64::from(self.max_speed)).round() as i16
            }
            ArmScheme::Buttons { raise, lower } => {
                if io.read_digital(raise) {
                    self.max_speed
                } else if io.read_digital(lower) {
                    -self.max_speed
                } else {
                    0
                }
            }
        }
    }

    /// Whether the arm currently owns the stick that normally turns the robot.
    pub fn locks_turn<I: RobotIo>(&self, io: &mut I) -> bool {
        match self.scheme {
            ArmScheme::Joystick {
                enable, turn_lock, ..
            } => io.read_digital(enable) || io.read_digital(turn_lock),
            ArmScheme::Buttons { .. } => false,
        }
    }

    /// Filters `target` and commands both arm motors, the right one mirrored.
    ///
    /// Returns the filtered left motor command.
    pub fn drive<I: RobotIo>(&self, io: &mut I, filter: &mut RateLimiter, target: i16) -> i16 {
        let left = filter.step(self.left, target);
        let right = filter.step(self.right, target.saturating_neg());
        trace!("arm target={} -> left={} right={}", target, left, right);

        io.set_actuator(self.left, left);
        io.set_actuator(self.right, right);
        left
    }

    /// Stops both arm motors immediately, bypassing the filter.
    pub fn stop<I: RobotIo>(&self, io: &mut I) {
        io.set_actuator(self.left, 0);
        io.set_actuator(self.right, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        filter::FilterPolicy,
        peripherals::{MAX_SPEED, sim::SimIo},
    };

    const LEFT: MotorChannel = MotorChannel::new(4);
    const RIGHT: MotorChannel = MotorChannel::new(7);

    fn arm(scheme: ArmScheme) -> ArmControl { ArmControl::new(scheme, LEFT, RIGHT, MAX_SPEED) }

    #[test]
    fn joystick_scheme_requires_enable() {
        let arm = arm(ArmScheme::joystick(1));
        let mut io = SimIo::new();
        io.set_axis(1, Axis::RightY, 127);
        assert_eq!(arm.target(&mut io, 1), 0);

        io.set_button(ButtonBinding::new(1, ButtonGroup::Group6, Direction::Up), true);
        assert_eq!(arm.target(&mut io, 1), 127);

        io.set_axis(1, Axis::RightY, -127);
        assert_eq!(arm.target(&mut io, 1), -127);
    }

    #[test]
    fn joystick_scheme_squares_response() {
        let arm = arm(ArmScheme::joystick(1));
        let mut io = SimIo::new();
        io.set_button(ButtonBinding::new(1, ButtonGroup::Group6, Direction::Up), true);
        io.set_axis(1, Axis::RightY, 64);
        // (64/127)^2 * 127 = 32.25
        assert_eq!(arm.target(&mut io, 1), 32);
        io.set_axis(1, Axis::RightY, -64);
        assert_eq!(arm.target(&mut io, 1), -32);
    }

    #[test]
    fn joystick_scheme_locks_turn() {
        let arm = arm(ArmScheme::joystick(1));
        let mut io = SimIo::new();
        assert!(!arm.locks_turn(&mut io));
        io.set_button(ButtonBinding::new(1, ButtonGroup::Group6, Direction::Down), true);
        assert!(arm.locks_turn(&mut io));
        assert_eq!(arm.target(&mut io, 1), 0);
    }

    #[test]
    fn button_scheme_drives_full_speed() {
        let arm = arm(ArmScheme::buttons(1));
        let mut io = SimIo::new();
        assert_eq!(arm.target(&mut io, 1), 0);
        assert!(!arm.locks_turn(&mut io));

        let raise = ButtonBinding::new(1, ButtonGroup::Group6, Direction::Up);
        let lower = ButtonBinding::new(1, ButtonGroup::Group6, Direction::Down);
        io.set_button(lower, true);
        assert_eq!(arm.target(&mut io, 1), -127);
        io.set_button(raise, true);
        assert_eq!(arm.target(&mut io, 1), 127);
    }

    #[test]
    fn drive_mirrors_right_motor() {
        let arm = arm(ArmScheme::buttons(1));
        let mut io = SimIo::new();
        let mut filter = RateLimiter::new(FilterPolicy::Passthrough, MAX_SPEED);
        assert_eq!(arm.drive(&mut io, &mut filter, 90), 90);
        assert_eq!(io.motor(LEFT), 90);
        assert_eq!(io.motor(RIGHT), -90);

        arm.stop(&mut io);
        assert_eq!(io.motor(LEFT), 0);
        assert_eq!(io.motor(RIGHT), 0);
    }

    #[test]
    fn extreme_speeds_saturate() {
        let arm = ArmControl::new(ArmScheme::buttons(1), LEFT, RIGHT, i16::MIN);
        assert_eq!(arm.max_speed, i16::MAX);

        let mut io = SimIo::new();
        io.set_button(ButtonBinding::new(1, ButtonGroup::Group6, Direction::Down), true);
        assert_eq!(arm.target(&mut io, 1), -i16::MAX);

        let mut filter = RateLimiter::new(FilterPolicy::Passthrough, i16::MAX);
        assert_eq!(arm.drive(&mut io, &mut filter, i16::MIN), -i16::MAX);
        assert_eq!(filter.last(RIGHT), i16::MAX);
    }

    #[test]
    fn drive_is_rate_limited() {
        let arm = arm(ArmScheme::buttons(1));
        let mut io = SimIo::new();
        let mut filter = RateLimiter::new(FilterPolicy::MaxStep { step: 10 }, MAX_SPEED);
        arm.drive(&mut io, &mut filter, 127);
        assert_eq!(io.motor(LEFT), 10);
        assert_eq!(io.motor(RIGHT), -10);
    }
}

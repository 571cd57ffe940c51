//! Hardware access for the control loop.
//!
//! The operator control code never talks to a joystick or a motor directly.
//! Everything goes through the [`RobotIo`] capability, so the same control
//! session runs against the real robot, the [`sim::SimIo`] test double, or any
//! other backend.
//!
//! # Backends
//!
//! - [`sim::SimIo`]: scripted inputs and recorded outputs, for tests and bench
//!   runs on a host machine.
//! - `v5::V5Io` (feature `vexide`): a VEX V5 controller and smart motors.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Joystick input identifiers.
///
/// Provides [`Axis`](controller::Axis), [`ButtonGroup`](controller::ButtonGroup),
/// [`Direction`](controller::Direction) and
/// [`ButtonBinding`](controller::ButtonBinding).
pub mod controller;

/// Host-side simulated hardware.
pub mod sim;

/// VEX V5 hardware backend.
#[cfg(feature = "vexide")]
pub mod v5;

use controller::{Axis, ButtonBinding};

/// Largest motor command magnitude an actuator accepts.
pub const MAX_SPEED: i16 = 127;

/// Number of motor ports on the robot brain.
pub const MOTOR_PORTS: u8 = 10;

/// An addressable actuator (motor port).
///
/// Ports are numbered from 1 to [`MOTOR_PORTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MotorChannel(u8);

impl MotorChannel {
    /// Creates a channel for the given port number.
    pub const fn new(port: u8) -> Self { Self(port) }

    /// The port number.
    pub const fn port(self) -> u8 { self.0 }

    /// Whether the port number exists on the brain.
    pub const fn is_valid(self) -> bool { self.0 >= 1 && self.0 <= MOTOR_PORTS }
}

impl fmt::Display for MotorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "port {}", self.0) }
}

/// The hardware capability the control loop depends on.
///
/// Implementations are expected to be infallible from the caller's point of
/// view: a failed read yields a neutral value (zero axis, released button)
/// and a failed write is logged and skipped.
pub trait RobotIo {
    /// Reads an analog axis. The value is in `[-127, 127]`; callers still
    /// clamp it, so returning `-128` is tolerated.
    fn read_axis(&mut self, slot: u8, axis: Axis) -> i8;

    /// Reads the current physical state of a digital button.
    fn read_digital(&mut self, binding: ButtonBinding) -> bool;

    /// Commands an actuator. The backend clamps `speed` to its legal range.
    fn set_actuator(&mut self, channel: MotorChannel, speed: i16);
}

impl<T: RobotIo + ?Sized> RobotIo for &mut T {
    fn read_axis(&mut self, slot: u8, axis: Axis) -> i8 { (**self).read_axis(slot, axis) }

    fn read_digital(&mut self, binding: ButtonBinding) -> bool { (**self).read_digital(binding) }

    fn set_actuator(&mut self, channel: MotorChannel, speed: i16) {
        (**self).set_actuator(channel, speed)
    }
}

/// Clamps a motor command into `[-max, max]`. The sign of `max` is ignored.
pub fn clamp_speed(speed: i16, max: i16) -> i16 {
    let max = max.saturating_abs();
    speed.clamp(-max, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motor_channel_validity() {
        assert!(!MotorChannel::new(0).is_valid());
        assert!(MotorChannel::new(1).is_valid());
        assert!(MotorChannel::new(10).is_valid());
        assert!(!MotorChannel::new(11).is_valid());
    }

    #[test]
    fn clamp_speed_limits_both_directions() {
        assert_eq!(clamp_speed(200, MAX_SPEED), 127);
        assert_eq!(clamp_speed(-200, MAX_SPEED), -127);
        assert_eq!(clamp_speed(-60, MAX_SPEED), -60);
    }

    #[test]
    fn clamp_speed_tolerates_any_max() {
        assert_eq!(clamp_speed(200, -MAX_SPEED), 127);
        assert_eq!(clamp_speed(i16::MIN, i16::MIN), -i16::MAX);
        assert_eq!(clamp_speed(i16::MAX, i16::MIN), i16::MAX);
    }
}

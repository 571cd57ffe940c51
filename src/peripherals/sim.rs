//! Simulated robot hardware.
//!
//! [`SimIo`] stands in for the joystick and motors when no robot is attached.
//! Inputs are set by the caller before each cycle and every motor command is
//! recorded, so a control session can be stepped and inspected from tests.
//!
//! # Example
//!
//! ```
//! use clawbot::peripherals::{MotorChannel, RobotIo, controller::Axis, sim::SimIo};
//!
//! let mut io = SimIo::new();
//! io.set_axis(1, Axis::LeftY, 100);
//! assert_eq!(io.read_axis(1, Axis::LeftY), 100);
//!
//! io.set_actuator(MotorChannel::new(2), 300);
//! assert_eq!(io.motor(MotorChannel::new(2)), 127);
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use super::{
    MAX_SPEED, MotorChannel, RobotIo, clamp_speed,
    controller::{Axis, ButtonBinding},
};

/// Scripted inputs and recorded outputs.
#[derive(Debug, Default, Clone)]
pub struct SimIo {
    axes:     HashMap<(u8, Axis), i8>,
    pressed:  HashSet<ButtonBinding>,
    motors:   BTreeMap<MotorChannel, i16>,
    commands: Vec<(MotorChannel, i16)>,
}

impl SimIo {
    /// Creates a simulator with every axis centered, every button released
    /// and every motor stopped.
    pub fn new() -> Self { Self::default() }

    /// Sets the value an axis will report.
    pub fn set_axis(&mut self, slot: u8, axis: Axis, value: i8) {
        self.axes.insert((slot, axis), value);
    }

    /// Presses or releases a button.
    pub fn set_button(&mut self, binding: ButtonBinding, pressed: bool) {
        if pressed {
            self.pressed.insert(binding);
        } else {
            self.pressed.remove(&binding);
        }
    }

    /// Centers every axis and releases every button.
    pub fn release_all(&mut self) {
        self.axes.clear();
        self.pressed.clear();
    }

    /// The last command sent to a motor, or 0 if it was never commanded.
    pub fn motor(&self, channel: MotorChannel) -> i16 {
        self.motors.get(&channel).copied().unwrap_or(0)
    }

    /// Every motor command in the order it was issued.
    pub fn commands(&self) -> &[(MotorChannel, i16)] { &self.commands }

    /// Forgets the recorded command history. Current motor values are kept.
    pub fn clear_commands(&mut self) { self.commands.clear(); }
}

impl RobotIo for SimIo {
    fn read_axis(&mut self, slot: u8, axis: Axis) -> i8 {
        self.axes.get(&(slot, axis)).copied().unwrap_or(0)
    }

    fn read_digital(&mut self, binding: ButtonBinding) -> bool { self.pressed.contains(&binding) }

    fn set_actuator(&mut self, channel: MotorChannel, speed: i16) {
        let speed = clamp_speed(speed, MAX_SPEED);
        self.motors.insert(channel, speed);
        self.commands.push((channel, speed));
    }
}

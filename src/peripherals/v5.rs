//! [`RobotIo`] backed by real V5 hardware through vexide.
//!
//! The legacy button groups map onto the V5 controller as follows:
//!
//! | Group | Up | Down | Left | Right |
//! |-------|----|------|------|-------|
//! | 5     | L1 | L2   | -    | -     |
//! | 6     | R1 | R2   | -    | -     |
//! | 7     | Up | Down | Left | Right |
//! | 8     | X  | B    | Y    | A     |
//!
//! Slot 1 is the primary controller and slot 2 the partner controller.

use std::collections::BTreeMap;

use log::warn;
use vexide::{
    controller::{ButtonState, ControllerState},
    prelude::{Controller, Motor},
};

use super::{
    MAX_SPEED, MotorChannel, RobotIo, clamp_speed,
    controller::{AXIS_MAX, Axis, ButtonBinding, ButtonGroup, Direction},
};

/// Voltage sent to a motor commanded at full speed.
const FULL_VOLTAGE: f64 = 12.0;

/// Controllers and motors of a V5 robot.
pub struct V5Io {
    primary: Controller,
    partner: Option<Controller>,
    motors:  BTreeMap<MotorChannel, Motor>,
}

impl V5Io {
    /// Creates an I/O layer with only the primary controller and no motors.
    pub fn new(primary: Controller) -> Self {
        Self {
            primary,
            partner: None,
            motors: BTreeMap::new(),
        }
    }

    /// Adds the partner controller, read as slot 2.
    pub fn with_partner(mut self, partner: Controller) -> Self {
        self.partner = Some(partner);
        self
    }

    /// Attaches a motor to a channel, replacing any motor already there.
    pub fn with_motor(mut self, channel: MotorChannel, motor: Motor) -> Self {
        self.motors.insert(channel, motor);
        self
    }

    fn state(&self, slot: u8) -> ControllerState {
        let controller = match slot {
            1 => &self.primary,
            2 => match &self.partner {
                Some(partner) => partner,
                None => return ControllerState::default(),
            },
            _ => return ControllerState::default(),
        };
        controller.state().unwrap_or_else(|e| {
            warn!("Controller State Error: {}", e);
            ControllerState::default()
        })
    }
}

impl RobotIo for V5Io {
    fn read_axis(&mut self, slot: u8, axis: Axis) -> i8 {
        let state = self.state(slot);
        let value = match axis {
            Axis::RightX => state.right_stick.x(),
            Axis::RightY => state.right_stick.y(),
            Axis::LeftY => state.left_stick.y(),
            Axis::LeftX => state.left_stick.x(),
        };
        let max = f64::from(AXIS_MAX);
        (value * max).round().clamp(-max, max) as i8
    }

    fn read_digital(&mut self, binding: ButtonBinding) -> bool {
        let state = self.state(binding.slot);
        button_state(&state, binding.group, binding.direction)
            .map(|button| button.is_pressed())
            .unwrap_or(false)
    }

    fn set_actuator(&mut self, channel: MotorChannel, speed: i16) {
        let Some(motor) = self.motors.get_mut(&channel) else {
            return;
        };
        let speed = clamp_speed(speed, MAX_SPEED);
        let voltage = f64::from(speed) / f64::from(MAX_SPEED) * FULL_VOLTAGE;
        if let Err(e) = motor.set_voltage(voltage) {
            warn!("Motor Error on {}: {}", channel, e);
        }
    }
}

fn button_state(
    state: &ControllerState,
    group: ButtonGroup,
    direction: Direction,
) -> Option<ButtonState> {
    match (group, direction) {
        (ButtonGroup::Group5, Direction::Up) => Some(state.button_l1),
        (ButtonGroup::Group5, Direction::Down) => Some(state.button_l2),
        (ButtonGroup::Group6, Direction::Up) => Some(state.button_r1),
        (ButtonGroup::Group6, Direction::Down) => Some(state.button_r2),
        (ButtonGroup::Group5 | ButtonGroup::Group6, _) => None,
        (ButtonGroup::Group7, Direction::Up) => Some(state.button_up),
        (ButtonGroup::Group7, Direction::Down) => Some(state.button_down),
        (ButtonGroup::Group7, Direction::Left) => Some(state.button_left),
        (ButtonGroup::Group7, Direction::Right) => Some(state.button_right),
        (ButtonGroup::Group8, Direction::Up) => Some(state.button_x),
        (ButtonGroup::Group8, Direction::Down) => Some(state.button_b),
        (ButtonGroup::Group8, Direction::Left) => Some(state.button_y),
        (ButtonGroup::Group8, Direction::Right) => Some(state.button_a),
    }
}

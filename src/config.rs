//! Operator control configuration.
//!
//! Every tunable of the control loop lives in [`ControlConfig`]. The defaults
//! reproduce the competition robot's setup, and a TOML document can override
//! any subset of them:
//!
//! ```
//! use clawbot::config::ControlConfig;
//! use clawbot::opcontrol::arm::ArmScheme;
//!
//! let config = ControlConfig::from_toml_str(
//!     r#"
//!     low_speed_divisor = 3
//!
//!     [claw]
//!     open_duration = 25
//!
//!     [arm]
//!     scheme = "buttons"
//!     raise = { slot = 1, group = "group6", direction = "up" }
//!     lower = { slot = 1, group = "group6", direction = "down" }
//!     "#,
//! )?;
//!
//! assert_eq!(config.low_speed_divisor, 3);
//! assert_eq!(config.claw.open_duration, 25);
//! assert_eq!(config.arm, ArmScheme::buttons(1));
//! # Ok::<(), clawbot::error::ControlError>(())
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ControlError, Result},
    filter::FilterPolicy,
    opcontrol::{arm::ArmScheme, claw::ClawConfig},
    peripherals::{
        MAX_SPEED, MotorChannel,
        controller::{Axis, ButtonBinding, ButtonGroup, Direction},
    },
};

/// Buttons with a fixed meaning during operator control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bindings {
    /// Toggles the claw between closing and opening.
    pub claw_toggle: ButtonBinding,
    /// Drives the claw open while held and resets its sequence.
    pub claw_open:   ButtonBinding,
    /// Toggles low-speed mode.
    pub low_speed:   ButtonBinding,
}

impl Bindings {
    /// Every binding with its role, for validation and logging.
    pub fn all(&self) -> [(&'static str, ButtonBinding); 3] {
        [
            ("claw_toggle", self.claw_toggle),
            ("claw_open", self.claw_open),
            ("low_speed", self.low_speed),
        ]
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            claw_toggle: ButtonBinding::new(1, ButtonGroup::Group8, Direction::Down),
            claw_open:   ButtonBinding::new(1, ButtonGroup::Group8, Direction::Left),
            low_speed:   ButtonBinding::new(1, ButtonGroup::Group8, Direction::Right),
        }
    }
}

/// Motor port assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorMap {
    /// Front left drive motor, the filter key for the left side.
    pub front_left:  MotorChannel,
    /// Back left drive motor.
    pub back_left:   MotorChannel,
    /// Front right drive motor, the filter key for the right side.
    pub front_right: MotorChannel,
    /// Back right drive motor.
    pub back_right:  MotorChannel,
    /// Claw motor.
    pub claw:        MotorChannel,
    /// Left arm motor.
    pub left_arm:    MotorChannel,
    /// Right arm motor, mounted mirrored to the left one.
    pub right_arm:   MotorChannel,
}

impl Default for MotorMap {
    fn default() -> Self {
        Self {
            front_left:  MotorChannel::new(2),
            back_left:   MotorChannel::new(3),
            left_arm:    MotorChannel::new(4),
            claw:        MotorChannel::new(5),
            right_arm:   MotorChannel::new(6),
            front_right: MotorChannel::new(8),
            back_right:  MotorChannel::new(9),
        }
    }
}

impl MotorMap {
    /// Every assigned port with its role, for validation and logging.
    pub fn ports(&self) -> [(&'static str, MotorChannel); 7] {
        [
            ("front_left", self.front_left),
            ("back_left", self.back_left),
            ("front_right", self.front_right),
            ("back_right", self.back_right),
            ("claw", self.claw),
            ("left_arm", self.left_arm),
            ("right_arm", self.right_arm),
        ]
    }
}

/// Complete configuration of an operator control session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Joystick slot the driver uses.
    pub slot:              u8,
    /// Axis read as the forward/backward command.
    pub drive_axis:        Axis,
    /// Axis read as the turn command.
    pub turn_axis:         Axis,
    /// Apply the squared response curve to the drive sticks.
    pub square_inputs:     bool,
    /// Largest drive motor command.
    pub max_speed:         i16,
    /// Largest arm motor command.
    pub arm_max_speed:     i16,
    /// Divisor applied to drive and arm commands in low-speed mode.
    pub low_speed_divisor: i16,
    /// Delay between control cycles, in milliseconds.
    pub cycle_period_ms:   u64,
    /// Smoothing applied to drive and arm motors.
    pub filter:            FilterPolicy,
    /// Claw speeds and travel time.
    pub claw:              ClawConfig,
    /// How the driver commands the arm.
    pub arm:               ArmScheme,
    /// Buttons with a fixed meaning.
    pub bindings:          Bindings,
    /// Motor port assignments.
    pub motors:            MotorMap,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            slot:              1,
            drive_axis:        Axis::LeftY,
            turn_axis:         Axis::RightX,
            square_inputs:     true,
            max_speed:         MAX_SPEED,
            arm_max_speed:     MAX_SPEED,
            low_speed_divisor: 2,
            cycle_period_ms:   20,
            filter:            FilterPolicy::default(),
            claw:              ClawConfig::default(),
            arm:               ArmScheme::default(),
            bindings:          Bindings::default(),
            motors:            MotorMap::default(),
        }
    }
}

impl ControlConfig {
    /// Parses a TOML document on top of the defaults and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::ConfigParse`] for malformed documents and
    /// [`ControlError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let config: ControlConfig =
            toml::from_str(document).map_err(|e| ControlError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidConfig`] if a value cannot be
    /// represented in TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ControlError::InvalidConfig(e.to_string()))
    }

    /// The delay between control cycles.
    pub fn cycle_period(&self) -> Duration { Duration::from_millis(self.cycle_period_ms) }

    /// Checks every value against its legal range.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        fn invalid(message: String) -> Result<()> { Err(ControlError::InvalidConfig(message)) }

        if !(1..=2).contains(&self.slot) {
            return invalid(format!("slot must be 1 or 2, got {}", self.slot));
        }
        if !(1..=MAX_SPEED).contains(&self.max_speed) {
            return invalid(format!(
                "max_speed must be in 1..={}, got {}",
                MAX_SPEED, self.max_speed
            ));
        }
        if !(1..=MAX_SPEED).contains(&self.arm_max_speed) {
            return invalid(format!(
                "arm_max_speed must be in 1..={}, got {}",
                MAX_SPEED, self.arm_max_speed
            ));
        }
        if self.low_speed_divisor < 1 {
            return invalid(format!(
                "low_speed_divisor must be at least 1, got {}",
                self.low_speed_divisor
            ));
        }
        if self.cycle_period_ms == 0 {
            return invalid("cycle_period_ms must be positive".to_string());
        }

        match self.filter {
            FilterPolicy::MaxStep { step } if step < 1 => {
                return invalid(format!("filter step must be at least 1, got {}", step));
            }
            FilterPolicy::Exponential { alpha } if !(alpha > 0.0 && alpha <= 1.0) => {
                return invalid(format!("filter alpha must be in (0, 1], got {}", alpha));
            }
            _ => {}
        }

        let claw = &self.claw;
        let speeds = -MAX_SPEED..=MAX_SPEED;
        if !speeds.contains(&claw.closing_speed) || !speeds.contains(&claw.grip_strength) {
            return invalid(format!(
                "claw speeds must be within ±{}, got closing {} grip {}",
                MAX_SPEED, claw.closing_speed, claw.grip_strength
            ));
        }
        if claw.open_duration == 0 {
            return invalid("claw open_duration must be positive".to_string());
        }

        let ports = self.motors.ports();
        for (i, (role, channel)) in ports.iter().enumerate() {
            if !channel.is_valid() {
                return invalid(format!("motor {} has invalid {}", role, channel));
            }
            if let Some((other, _)) = ports[i + 1..].iter().find(|(_, c)| c == channel) {
                return invalid(format!("motors {} and {} share {}", role, other, channel));
            }
        }

        let buttons: Vec<_> = self
            .bindings
            .all()
            .into_iter()
            .chain(self.arm.bindings())
            .collect();
        for (i, (role, binding)) in buttons.iter().enumerate() {
            if !(1..=2).contains(&binding.slot) {
                return invalid(format!("{} has invalid slot {}", role, binding.slot));
            }
            if let Some((other, _)) = buttons[i + 1..].iter().find(|(_, other)| other == binding) {
                return invalid(format!("{} and {} share {}", role, other, binding));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ControlConfig::default();
        config.validate().unwrap();
        assert_eq!(config.cycle_period(), Duration::from_millis(20));
        assert_eq!(config.claw.open_duration, 30);
        assert_eq!(config.claw.closing_speed, -60);
        assert_eq!(config.claw.grip_strength, -40);
        assert_eq!(config.drive_axis.channel(), 3);
        assert_eq!(config.turn_axis.channel(), 1);
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(ControlConfig::from_toml_str("").unwrap(), ControlConfig::default());
    }

    #[test]
    fn overrides_apply() {
        let config = ControlConfig::from_toml_str(
            r#"
            square_inputs = false
            cycle_period_ms = 10

            [filter]
            kind = "exponential"
            alpha = 0.25

            [motors]
            claw = 10
            "#,
        )
        .unwrap();
        assert!(!config.square_inputs);
        assert_eq!(config.cycle_period(), Duration::from_millis(10));
        assert_eq!(config.filter, FilterPolicy::Exponential { alpha: 0.25 });
        assert_eq!(config.motors.claw, MotorChannel::new(10));
        assert_eq!(config.motors.front_left, MotorChannel::new(2));
    }

    #[test]
    fn dumped_defaults_parse_back() {
        let config = ControlConfig::default();
        let document = config.to_toml_string().unwrap();
        assert_eq!(ControlConfig::from_toml_str(&document).unwrap(), config);
    }

    #[test]
    fn rejects_zero_divisor() {
        let err = ControlConfig::from_toml_str("low_speed_divisor = 0").unwrap_err();
        assert!(matches!(err, ControlError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_shared_motor_port() {
        let err = ControlConfig::from_toml_str("[motors]\nclaw = 2").unwrap_err();
        assert_eq!(
            err,
            ControlError::InvalidConfig("motors front_left and claw share port 2".to_string())
        );
    }

    #[test]
    fn rejects_shared_bindings() {
        let err = ControlConfig::from_toml_str(
            "[bindings]\nclaw_open = { slot = 1, group = \"group8\", direction = \"down\" }",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ControlError::InvalidConfig(
                "claw_toggle and claw_open share slot 1 group 8 down".to_string()
            )
        );

        let err = ControlConfig::from_toml_str(
            "[bindings]\nclaw_open = { slot = 1, group = \"group6\", direction = \"up\" }",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ControlError::InvalidConfig(
                "claw_open and arm enable share slot 1 group 6 up".to_string()
            )
        );
    }

    #[test]
    fn rejects_binding_on_missing_slot() {
        let err = ControlConfig::from_toml_str(
            "[bindings]\nlow_speed = { slot = 3, group = \"group8\", direction = \"right\" }",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ControlError::InvalidConfig("low_speed has invalid slot 3".to_string())
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        for document in [
            "slot = 3",
            "max_speed = 0",
            "arm_max_speed = 200",
            "cycle_period_ms = 0",
            "[filter]\nkind = \"max_step\"\nstep = 0",
            "[filter]\nkind = \"exponential\"\nalpha = 1.5",
            "[claw]\nclosing_speed = -300",
            "[claw]\nclosing_speed = -32768",
            "[claw]\ngrip_strength = -32768",
            "[claw]\nopen_duration = 0",
            "[motors]\nright_arm = 11",
        ] {
            assert!(
                matches!(
                    ControlConfig::from_toml_str(document),
                    Err(ControlError::InvalidConfig(_))
                ),
                "accepted {:?}",
                document
            );
        }
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = ControlConfig::from_toml_str("max_speed = \"fast\"").unwrap_err();
        assert!(matches!(err, ControlError::ConfigParse(_)));
    }
}

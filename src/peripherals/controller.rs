//! Joystick input identifiers.
//!
//! The control code addresses joystick inputs the way the driver thinks about
//! them: an analog [`Axis`] on a joystick slot, or a digital button named by
//! its [`ButtonGroup`] and [`Direction`]. Groups 5 and 6 are the shoulder
//! bumpers (Up/Down only), groups 7 and 8 are the left and right four-way
//! button pads.
//!
//! # Example
//!
//! ```
//! use clawbot::peripherals::controller::{ButtonBinding, ButtonGroup, Direction};
//!
//! let claw_toggle = ButtonBinding::new(1, ButtonGroup::Group8, Direction::Down);
//! assert_eq!(claw_toggle.to_string(), "slot 1 group 8 down");
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

/// Largest magnitude an analog axis reports.
pub const AXIS_MAX: i8 = 127;

/// An analog joystick channel.
///
/// Channels are numbered 1 to 4 on the joystick; the variant names describe
/// which stick and direction each number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Channel 1: right stick, horizontal.
    RightX,
    /// Channel 2: right stick, vertical.
    RightY,
    /// Channel 3: left stick, vertical.
    LeftY,
    /// Channel 4: left stick, horizontal.
    LeftX,
}

impl Axis {
    /// The joystick channel number of this axis.
    pub const fn channel(self) -> u8 {
        match self {
            Axis::RightX => 1,
            Axis::RightY => 2,
            Axis::LeftY => 3,
            Axis::LeftX => 4,
        }
    }
}

/// A group of digital buttons on the joystick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonGroup {
    /// Left shoulder bumpers.
    Group5,
    /// Right shoulder bumpers.
    Group6,
    /// Left button pad.
    Group7,
    /// Right button pad.
    Group8,
}

impl ButtonGroup {
    /// The group number printed on the joystick.
    pub const fn number(self) -> u8 {
        match self {
            ButtonGroup::Group5 => 5,
            ButtonGroup::Group6 => 6,
            ButtonGroup::Group7 => 7,
            ButtonGroup::Group8 => 8,
        }
    }
}

/// A button position inside a [`ButtonGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// One physical button: joystick slot, group and direction.
///
/// Bindings are the keys of the toggle registry and the arguments of
/// [`RobotIo::read_digital`](crate::peripherals::RobotIo::read_digital).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ButtonBinding {
    /// The joystick slot (1 for the primary joystick, 2 for the partner).
    pub slot:      u8,
    /// The button group.
    pub group:     ButtonGroup,
    /// The button inside the group.
    pub direction: Direction,
}

impl ButtonBinding {
    /// Creates a binding for the given slot, group and direction.
    pub const fn new(slot: u8, group: ButtonGroup, direction: Direction) -> Self {
        Self {
            slot,
            group,
            direction,
        }
    }
}

impl fmt::Display for ButtonBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(
            f,
            "slot {} group {} {}",
            self.slot,
            self.group.number(),
            direction
        )
    }
}

/// Clamps a raw axis reading into `[-AXIS_MAX, AXIS_MAX]`.
///
/// Joystick firmware can report `-128` at the far negative end; it is folded
/// onto `-127` so the axis is symmetric.
pub fn clamp_axis(raw: i8) -> i8 { raw.max(-AXIS_MAX) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_channels_match_joystick_numbering() {
        assert_eq!(Axis::RightX.channel(), 1);
        assert_eq!(Axis::RightY.channel(), 2);
        assert_eq!(Axis::LeftY.channel(), 3);
        assert_eq!(Axis::LeftX.channel(), 4);
    }

    #[test]
    fn clamp_axis_folds_minimum() {
        assert_eq!(clamp_axis(i8::MIN), -127);
        assert_eq!(clamp_axis(-127), -127);
        assert_eq!(clamp_axis(0), 0);
        assert_eq!(clamp_axis(127), 127);
    }

    #[test]
    fn binding_display() {
        let binding = ButtonBinding::new(2, ButtonGroup::Group6, Direction::Up);
        assert_eq!(binding.to_string(), "slot 2 group 6 up");
    }
}

//! Operator control for the driver-controlled period.
//!
//! This module maps joystick input to the robot's drive base, arm and claw
//! once per control cycle.
//!
//! # Features
//!
//! - **Edge detection**: Pressed/Held/Released/Idle states and latched
//!   toggles for momentary buttons.
//! - **Claw sequencing**: Timed close, grip and open travel with a manual
//!   open override.
//! - **Arm control**: Mirrored dual-motor arm on a joystick axis or buttons.
//! - **Low-speed mode**: A toggle that scales down drive and arm commands.
//!
//! # Example
//!
//! ```
//! use clawbot::config::ControlConfig;
//! use clawbot::opcontrol::OperatorControl;
//! use clawbot::peripherals::sim::SimIo;
//!
//! let mut control = OperatorControl::new(ControlConfig::default())?;
//! let mut io = SimIo::new();
//!
//! let mut cycles = 0;
//! control.run_blocking(&mut io, || {
//!     cycles += 1;
//!     cycles > 3
//! })?;
//! assert_eq!(control.cycles(), 3);
//! # Ok::<(), clawbot::error::ControlError>(())
//! ```

/// Arm schemes and the mirrored arm motor pair.
pub mod arm;

/// Counter-driven claw state machine.
pub mod claw;

/// The per-cycle operator control session.
///
/// Provides [`OperatorControl`](controller::OperatorControl), which owns all
/// session state and drives every mechanism from one joystick snapshot.
pub mod controller;

/// Button edge detection and toggle latching.
pub mod toggle;

pub use controller::{CycleOutput, OperatorControl};

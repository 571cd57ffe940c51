//! # Clawbot
//!
//! Clawbot is the operator control loop for a competition robot with a
//! four-motor differential drive, a two-motor arm and a timed claw. It
//! provides the pieces that turn a joystick snapshot into motor commands,
//! including:
//!
//! - **Edge Detection**: Pressed/Held/Released/Idle button states and latched
//!   toggles for momentary buttons.
//! - **Rate Limiting**: Per-motor filters that keep commands from jumping
//!   between cycles.
//! - **Drive Mixing**: Arcade mixing with an optional squared response and
//!   ratio-preserving saturation.
//! - **Claw Sequencing**: Cycle-counted close, grip and open travel with a
//!   manual open override.
//! - **Configuration**: Every tunable in one TOML-loadable struct.
//! - **Logging**: A file-based logger for reviewing driver sessions.
//!
//! All hardware access goes through the [`RobotIo`](peripherals::RobotIo)
//! trait, so the control loop runs on a host against
//! [`SimIo`](peripherals::sim::SimIo) as well as on the robot. The V5 backend
//! is enabled with the `vexide` feature.
//!
//! ## Quick Start
//!
//! ```ignore
//! use clawbot::{config::ControlConfig, opcontrol::OperatorControl, peripherals::v5::V5Io};
//! use vexide::prelude::*;
//!
//! #[vexide::main]
//! async fn main(peripherals: Peripherals) {
//!     let config = ControlConfig::default();
//!     let mut io = V5Io::new(peripherals.primary_controller)
//!         .with_motor(config.motors.front_left, Motor::new(peripherals.port_2, Gearset::Green, Direction::Forward));
//!         // ...remaining motors
//!
//!     let mut control = OperatorControl::new(config).unwrap();
//!     control.run(&mut io).await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`opcontrol`]: The operator control session and its mechanisms.
//! - [`drivetrain`]: Arcade mixing for the differential drive.
//! - [`filter`]: Per-motor rate limiting.
//! - [`peripherals`]: Joystick and motor access.
//! - [`config`]: Session configuration.
//! - [`fs`]: Filesystem utilities including logging.

/// Operator control configuration.
///
/// Provides [`ControlConfig`](config::ControlConfig), loadable from TOML and
/// validated before a session starts.
pub mod config;

/// Differential drivetrain mixing.
///
/// Provides the [`Differential`](drivetrain::Differential) struct and the
/// [`arcade_mix`](drivetrain::arcade_mix) and
/// [`square_response`](drivetrain::square_response) functions.
pub mod drivetrain;

/// Error types.
pub mod error;

/// Motor command rate limiting.
///
/// Provides [`RateLimiter`](filter::RateLimiter), which remembers the last
/// command per motor and bounds how far the next one may move.
pub mod filter;

/// Filesystem utilities module.
///
/// Contains logging functionality for recording driver sessions to a file,
/// on the robot the V5 Brain's SD card.
pub mod fs;

/// Operator control module.
///
/// Maps joystick input to the drive base, arm and claw once per control
/// cycle, with toggle buttons and a low-speed mode.
pub mod opcontrol;

/// Hardware access module.
///
/// Defines the [`RobotIo`](peripherals::RobotIo) trait and its simulated and
/// V5 implementations.
pub mod peripherals;

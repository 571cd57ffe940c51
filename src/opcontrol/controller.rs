//! The operator control session.
//!
//! [`OperatorControl`] owns all per-session state (toggle records, filter
//! memory, claw sequence, low-speed mode) and maps one joystick snapshot to
//! motor commands per call to [`OperatorControl::cycle`]. Each cycle runs:
//!
//! 1. **Drive**: forward and turn sticks through the drivetrain mixer. Turning
//!    is suppressed while the arm owns the turn stick.
//! 2. **Claw**: the toggle and manual-open buttons through the claw sequencer.
//! 3. **Arm**: the arm scheme's inputs to both arm motors.
//! 4. **Buttons**: every registered button is sampled for the next cycle.
//!
//! Low-speed mode divides the drive sticks and the arm target by
//! `low_speed_divisor` before they are mixed and filtered.
//!
//! # Example
//!
//! ```
//! use clawbot::config::ControlConfig;
//! use clawbot::opcontrol::controller::OperatorControl;
//! use clawbot::peripherals::{controller::Axis, sim::SimIo};
//!
//! let mut control = OperatorControl::new(ControlConfig::default())?;
//! let mut io = SimIo::new();
//! io.set_axis(1, Axis::LeftY, 127);
//!
//! let output = control.cycle(&mut io)?;
//! assert_eq!((output.left, output.right), (10, -10));
//! # Ok::<(), clawbot::error::ControlError>(())
//! ```

use std::thread;

use log::{debug, info, trace};

use super::{
    arm::ArmControl,
    claw::{ClawPhase, ClawSequencer},
    toggle::ToggleButtons,
};
use crate::{
    config::ControlConfig,
    drivetrain::Differential,
    error::Result,
    filter::RateLimiter,
    peripherals::{RobotIo, controller::clamp_axis},
};

/// Motor commands issued by one control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleOutput {
    /// Left drive side.
    pub left:      i16,
    /// Right drive side.
    pub right:     i16,
    /// Claw motor.
    pub claw:      i16,
    /// Left arm motor; the right arm motor received the negation.
    pub arm:       i16,
    /// Whether low-speed mode was active.
    pub low_speed: bool,
}

/// A single operator control session.
///
/// Create one per enable period and call [`cycle`](Self::cycle) once per
/// control period from a single task. [`reset`](Self::reset) starts over with
/// the claw assumed fully open.
#[derive(Debug, Clone)]
pub struct OperatorControl {
    config:     ControlConfig,
    toggles:    ToggleButtons,
    filter:     RateLimiter,
    claw:       ClawSequencer,
    drivetrain: Differential,
    arm:        ArmControl,
    low_speed:  bool,
    cycles:     u64,
}

impl OperatorControl {
    /// Validates `config` and builds a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidConfig`](crate::error::ControlError::InvalidConfig)
    /// for a bad configuration, or
    /// [`ControlError::TooManyBindings`](crate::error::ControlError::TooManyBindings)
    /// if the bindings cannot be registered.
    pub fn new(config: ControlConfig) -> Result<Self> {
        config.validate()?;

        let mut toggles = ToggleButtons::new();
        toggles.register(config.bindings.low_speed)?;
        toggles.register(config.bindings.claw_toggle)?;
        toggles.register(config.bindings.claw_open)?;

        let motors = config.motors;
        let drivetrain = Differential::new(
            [motors.front_left, motors.back_left],
            [motors.front_right, motors.back_right],
            config.max_speed,
        );
        let arm = ArmControl::new(
            config.arm,
            motors.left_arm,
            motors.right_arm,
            config.arm_max_speed,
        );

        Ok(Self {
            filter: RateLimiter::new(config.filter, config.max_speed.max(config.arm_max_speed)),
            claw: ClawSequencer::new(config.claw),
            toggles,
            drivetrain,
            arm,
            low_speed: false,
            cycles: 0,
            config,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &ControlConfig { &self.config }

    /// Number of cycles run since the session started or was reset.
    pub fn cycles(&self) -> u64 { self.cycles }

    /// Whether low-speed mode is active.
    pub fn is_low_speed(&self) -> bool { self.low_speed }

    /// The claw's current phase.
    pub fn claw_phase(&self) -> ClawPhase { self.claw.phase() }

    /// The claw's closing progress.
    pub fn claw_progress(&self) -> u16 { self.claw.progress() }

    /// Runs one control cycle against `io`.
    ///
    /// # Errors
    ///
    /// Only fails if a configured binding is missing from the toggle
    /// registry, which [`new`](Self::new) rules out.
    pub fn cycle<I: RobotIo>(&mut self, io: &mut I) -> Result<CycleOutput> {
        let slot = self.config.slot;
        let bindings = self.config.bindings;

        let low_speed = self.toggles.is_toggled(bindings.low_speed)?;
        if low_speed != self.low_speed {
            debug!("Low speed mode {}", if low_speed { "on" } else { "off" });
            self.low_speed = low_speed;
        }
        let divisor = if low_speed {
            self.config.low_speed_divisor
        } else {
            1
        };

        // drive
        let forward = clamp_axis(io.read_axis(slot, self.config.drive_axis));
        let turn = if self.arm.locks_turn(io) {
            0
        } else {
            clamp_axis(io.read_axis(slot, self.config.turn_axis))
        };
        let (left, right) = self.drivetrain.drive(
            io,
            &mut self.filter,
            reduce(forward, divisor),
            reduce(turn, divisor),
            self.config.square_inputs,
        );

        // claw
        let claw = self.claw.step(
            self.toggles.get(bindings.claw_toggle)?,
            self.toggles.get(bindings.claw_open)?,
        );
        io.set_actuator(self.config.motors.claw, claw);

        // arm
        let arm_target = self.arm.target(io, slot) / divisor;
        let arm = self.arm.drive(io, &mut self.filter, arm_target);

        self.toggles.update_all(io);
        self.cycles += 1;

        let output = CycleOutput {
            left,
            right,
            claw,
            arm,
            low_speed,
        };
        trace!("cycle {}: {:?}", self.cycles, output);
        Ok(output)
    }

    /// Commands every motor to zero, bypassing the filter.
    pub fn stop<I: RobotIo>(&self, io: &mut I) {
        self.drivetrain.stop(io);
        self.arm.stop(io);
        io.set_actuator(self.config.motors.claw, 0);
    }

    /// Starts the session over: buttons idle, filters at rest, claw open,
    /// low-speed mode off.
    pub fn reset(&mut self) {
        info!("Operator control reset after {} cycles", self.cycles);
        self.toggles.reset();
        self.filter.reset();
        self.claw.reset();
        self.low_speed = false;
        self.cycles = 0;
    }

    /// Runs cycles on the current thread until `stop` returns `true`,
    /// sleeping one cycle period between them. All motors are stopped before
    /// returning.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by [`cycle`](Self::cycle).
    pub fn run_blocking<I, F>(&mut self, io: &mut I, mut stop: F) -> Result<()>
    where
        I: RobotIo,
        F: FnMut() -> bool,
    {
        info!(
            "Operator control started ({} ms period, arm {:?})",
            self.config.cycle_period_ms, self.config.arm
        );
        let period = self.config.cycle_period();

        let result = loop {
            if stop() {
                break Ok(());
            }
            if let Err(e) = self.cycle(io) {
                break Err(e);
            }
            thread::sleep(period);
        };

        self.stop(io);
        info!("Operator control stopped after {} cycles", self.cycles);
        result
    }

    /// Runs cycles forever as a vexide task, sleeping one cycle period
    /// between them.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by [`cycle`](Self::cycle), after
    /// stopping all motors.
    #[cfg(feature = "vexide")]
    pub async fn run<I: RobotIo>(&mut self, io: &mut I) -> Result<()> {
        info!(
            "Operator control started ({} ms period, arm {:?})",
            self.config.cycle_period_ms, self.config.arm
        );
        let period = self.config.cycle_period();
        loop {
            if let Err(e) = self.cycle(io) {
                self.stop(io);
                return Err(e);
            }
            vexide::time::sleep(period).await;
        }
    }
}

/// Divides a stick value for low-speed mode.
fn reduce(value: i8, divisor: i16) -> i8 {
    // |value| <= 127 and divisor >= 1, so the quotient fits
    (i16::from(value) / divisor.max(1)) as i8
}

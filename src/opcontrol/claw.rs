//! Timed open/close/grip sequencing for the claw.
//!
//! The claw has no position sensor, so its travel is measured in control
//! cycles. Closing runs the motor at closing speed for `open_duration` cycles
//! and then drops to a lighter grip force that holds the game object without
//! stalling the motor at full power. Opening unwinds the same number of cycles
//! at the opposite speed.
//!
//! A separate manual-open button overrides the sequence: while it is down the
//! claw is driven open at full speed, and releasing it leaves the sequencer in
//! its fully open starting state.
//!
//! The claw must be fully open when a session starts.
//!
//! # Example
//!
//! ```
//! use clawbot::opcontrol::{
//!     claw::{ClawConfig, ClawPhase, ClawSequencer},
//!     toggle::ButtonLogic,
//! };
//!
//! let mut claw = ClawSequencer::new(ClawConfig::default());
//! assert_eq!(claw.step(ButtonLogic::Pressed, ButtonLogic::Idle), -60);
//! assert_eq!(claw.phase(), ClawPhase::Closing);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use super::toggle::ButtonLogic;

/// Claw speeds and travel time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClawConfig {
    /// Motor command while closing. Opening uses the negation.
    pub closing_speed: i16,
    /// Motor command once fully closed.
    pub grip_strength: i16,
    /// Number of cycles a full close (or open) takes.
    pub open_duration: u16,
}

impl Default for ClawConfig {
    fn default() -> Self {
        Self {
            closing_speed: -60,
            grip_strength: -40,
            open_duration: 30,
        }
    }
}

impl ClawConfig {
    /// Motor command while opening.
    pub fn opening_speed(&self) -> i16 { self.closing_speed.saturating_neg() }
}

/// Where the claw is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClawPhase {
    /// Fully open and idle.
    Open,
    /// Travelling closed.
    Closing,
    /// Fully closed and holding with grip strength.
    Gripping,
    /// Travelling open.
    Opening,
    /// Driven open by the manual override button.
    ManualOpen,
}

/// Counter-driven claw state machine.
#[derive(Debug, Clone)]
pub struct ClawSequencer {
    config:     ClawConfig,
    closing:    bool,
    progress:   u16,
    overridden: bool,
}

impl ClawSequencer {
    /// Creates a sequencer for a fully open claw.
    pub fn new(config: ClawConfig) -> Self {
        Self {
            config,
            closing: false,
            progress: 0,
            overridden: false,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ClawConfig { &self.config }

    /// Cycles of closing travel completed, in `[0, open_duration]`.
    pub fn progress(&self) -> u16 { self.progress }

    /// Whether the driver last asked the claw to close.
    pub fn is_closing(&self) -> bool { self.closing }

    /// The phase the next cycle will run in.
    pub fn phase(&self) -> ClawPhase {
        if self.overridden {
            ClawPhase::ManualOpen
        } else if self.closing {
            if self.progress < self.config.open_duration {
                ClawPhase::Closing
            } else {
                ClawPhase::Gripping
            }
        } else if self.progress > 0 {
            ClawPhase::Opening
        } else {
            ClawPhase::Open
        }
    }

    /// Advances one cycle and returns the claw motor command.
    ///
    /// `toggle` is this cycle's state of the open/close toggle button and
    /// `manual_open` the state of the override button.
    pub fn step(&mut self, toggle: ButtonLogic, manual_open: ButtonLogic) -> i16 {
        match manual_open {
            ButtonLogic::Pressed | ButtonLogic::Held => {
                if !self.overridden {
                    debug!("Claw manual open engaged at progress {}", self.progress);
                    self.overridden = true;
                }
                self.open_fully();
                return self.config.opening_speed();
            }
            ButtonLogic::Released => {
                debug!("Claw manual open released");
                self.overridden = false;
                self.open_fully();
                return 0;
            }
            ButtonLogic::Idle => self.overridden = false,
        }

        if toggle == ButtonLogic::Pressed {
            self.closing = !self.closing;
            debug!(
                "Claw {} from progress {}",
                if self.closing { "closing" } else { "opening" },
                self.progress
            );
        }

        if self.closing {
            if self.progress < self.config.open_duration {
                self.progress += 1;
                self.config.closing_speed
            } else {
                self.config.grip_strength
            }
        } else if self.progress > 0 {
            self.progress -= 1;
            self.config.opening_speed()
        } else {
            0
        }
    }

    /// Returns to the fully open starting state.
    pub fn reset(&mut self) {
        self.open_fully();
        self.overridden = false;
    }

    fn open_fully(&mut self) {
        self.closing = false;
        self.progress = 0;
    }
}

//! Edge detection and toggle latching for momentary buttons.
//!
//! Joystick buttons only report whether they are physically down. Most driver
//! controls care about *changes* instead: a press flips a mode, a release ends
//! an override. [`ToggleButtons`] keeps one [`ToggleRecord`] per registered
//! binding and derives a [`ButtonLogic`] state from the last two raw samples.
//!
//! # Cycle order
//!
//! Consumers read this cycle's events with [`ToggleButtons::get`] first, then
//! the loop calls [`ToggleButtons::update_all`] exactly once at the end of the
//! cycle. The update samples the buttons and prepares the events the next
//! cycle will see.
//!
//! # Example
//!
//! ```
//! use clawbot::opcontrol::toggle::{ButtonLogic, ToggleButtons};
//! use clawbot::peripherals::controller::{ButtonBinding, ButtonGroup, Direction};
//!
//! let button = ButtonBinding::new(1, ButtonGroup::Group8, Direction::Down);
//! let mut toggles = ToggleButtons::new();
//! toggles.register(button)?;
//!
//! assert_eq!(toggles.update(button, true)?, ButtonLogic::Pressed);
//! assert_eq!(toggles.update(button, true)?, ButtonLogic::Held);
//! assert!(toggles.is_toggled(button)?);
//! # Ok::<(), clawbot::error::ControlError>(())
//! ```

use heapless::FnvIndexMap;
use log::trace;

use crate::{
    error::{ControlError, Result},
    peripherals::{RobotIo, controller::ButtonBinding},
};

/// Number of bindings a registry can hold.
pub const MAX_BINDINGS: usize = 16;

/// The logical state of a button, derived from consecutive raw samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonLogic {
    /// Went down since the previous sample. Lasts one cycle.
    Pressed,
    /// Went up since the previous sample. Lasts one cycle.
    Released,
    /// Still down after the cycle it was pressed in.
    Held,
    /// Up, and was up on the previous sample.
    #[default]
    Idle,
}

impl ButtonLogic {
    /// Whether the button is physically down (Pressed or Held).
    pub fn is_down(self) -> bool { matches!(self, ButtonLogic::Pressed | ButtonLogic::Held) }
}

/// Per-binding edge detector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToggleRecord {
    /// The raw state seen on the last update.
    pub raw:     bool,
    /// The logical state derived on the last update.
    pub logic:   ButtonLogic,
    /// Latched toggle bit, flipped on every press.
    pub latched: bool,
}

impl ToggleRecord {
    /// Feeds a new raw sample and returns the derived state.
    pub fn update(&mut self, raw: bool) -> ButtonLogic {
        self.logic = match (self.raw, raw) {
            (false, true) => ButtonLogic::Pressed,
            (true, true) => ButtonLogic::Held,
            (true, false) => ButtonLogic::Released,
            (false, false) => ButtonLogic::Idle,
        };
        if self.logic == ButtonLogic::Pressed {
            self.latched = !self.latched;
        }
        self.raw = raw;
        self.logic
    }
}

/// Registry of edge detectors keyed by button binding.
#[derive(Debug, Clone, Default)]
pub struct ToggleButtons {
    records: FnvIndexMap<ButtonBinding, ToggleRecord, MAX_BINDINGS>,
}

impl ToggleButtons {
    /// Creates an empty registry.
    pub fn new() -> Self { Self::default() }

    /// Registers a binding in the Idle, released, un-toggled state.
    ///
    /// Registering the same binding twice keeps the existing record.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::TooManyBindings`] when the registry is full.
    pub fn register(&mut self, binding: ButtonBinding) -> Result<()> {
        if self.records.contains_key(&binding) {
            return Ok(());
        }
        self.records
            .insert(binding, ToggleRecord::default())
            .map(|_| ())
            .map_err(|_| ControlError::TooManyBindings {
                binding,
                capacity: MAX_BINDINGS,
            })
    }

    /// Whether a binding has been registered.
    pub fn is_registered(&self, binding: ButtonBinding) -> bool {
        self.records.contains_key(&binding)
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize { self.records.len() }

    /// Whether no binding is registered.
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Feeds a raw sample to one binding and returns its new logical state.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnregisteredBinding`] for unknown bindings.
    pub fn update(&mut self, binding: ButtonBinding, raw: bool) -> Result<ButtonLogic> {
        let record = self
            .records
            .get_mut(&binding)
            .ok_or(ControlError::UnregisteredBinding(binding))?;
        let logic = record.update(raw);
        if logic == ButtonLogic::Pressed {
            trace!("{} pressed, toggle now {}", binding, record.latched);
        }
        Ok(logic)
    }

    /// Samples every registered binding through `io` and updates it.
    pub fn update_all<I: RobotIo>(&mut self, io: &mut I) {
        for (binding, record) in self.records.iter_mut() {
            record.update(io.read_digital(*binding));
        }
    }

    /// The current logical state of a binding.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnregisteredBinding`] for unknown bindings.
    pub fn get(&self, binding: ButtonBinding) -> Result<ButtonLogic> {
        self.record(binding).map(|record| record.logic)
    }

    /// The latched toggle bit of a binding.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnregisteredBinding`] for unknown bindings.
    pub fn is_toggled(&self, binding: ButtonBinding) -> Result<bool> {
        self.record(binding).map(|record| record.latched)
    }

    /// Returns every record to its freshly registered state. Registrations
    /// are kept.
    pub fn reset(&mut self) {
        for (_, record) in self.records.iter_mut() {
            *record = ToggleRecord::default();
        }
    }

    fn record(&self, binding: ButtonBinding) -> Result<&ToggleRecord> {
        self.records
            .get(&binding)
            .ok_or(ControlError::UnregisteredBinding(binding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peripherals::{
        controller::{ButtonGroup, Direction},
        sim::SimIo,
    };

    const BUTTON: ButtonBinding = ButtonBinding::new(1, ButtonGroup::Group8, Direction::Down);
    const OTHER: ButtonBinding = ButtonBinding::new(1, ButtonGroup::Group8, Direction::Left);

    #[test]
    fn raw_sequence_produces_edges() {
        let mut toggles = ToggleButtons::new();
        toggles.register(BUTTON).unwrap();

        let states: Vec<ButtonLogic> = [false, true, true, false, false]
            .into_iter()
            .map(|raw| toggles.update(BUTTON, raw).unwrap())
            .collect();

        assert_eq!(
            states,
            vec![
                ButtonLogic::Idle,
                ButtonLogic::Pressed,
                ButtonLogic::Held,
                ButtonLogic::Released,
                ButtonLogic::Idle,
            ]
        );
    }

    #[test]
    fn get_does_not_advance_state() {
        let mut toggles = ToggleButtons::new();
        toggles.register(BUTTON).unwrap();
        toggles.update(BUTTON, true).unwrap();
        assert_eq!(toggles.get(BUTTON).unwrap(), ButtonLogic::Pressed);
        assert_eq!(toggles.get(BUTTON).unwrap(), ButtonLogic::Pressed);
    }

    #[test]
    fn press_flips_latched_toggle() {
        let mut toggles = ToggleButtons::new();
        toggles.register(BUTTON).unwrap();
        assert!(!toggles.is_toggled(BUTTON).unwrap());

        for raw in [true, true, false] {
            toggles.update(BUTTON, raw).unwrap();
        }
        assert!(toggles.is_toggled(BUTTON).unwrap());

        for raw in [true, false] {
            toggles.update(BUTTON, raw).unwrap();
        }
        assert!(!toggles.is_toggled(BUTTON).unwrap());
    }

    #[test]
    fn unregistered_binding_is_an_error() {
        let mut toggles = ToggleButtons::new();
        toggles.register(BUTTON).unwrap();
        assert_eq!(
            toggles.get(OTHER),
            Err(ControlError::UnregisteredBinding(OTHER))
        );
        assert_eq!(
            toggles.update(OTHER, true),
            Err(ControlError::UnregisteredBinding(OTHER))
        );
        assert!(toggles.is_toggled(OTHER).is_err());
    }

    #[test]
    fn double_registration_keeps_state() {
        let mut toggles = ToggleButtons::new();
        toggles.register(BUTTON).unwrap();
        toggles.update(BUTTON, true).unwrap();
        toggles.register(BUTTON).unwrap();
        assert_eq!(toggles.len(), 1);
        assert_eq!(toggles.get(BUTTON).unwrap(), ButtonLogic::Pressed);
    }

    #[test]
    fn registry_capacity_is_enforced() {
        let mut toggles = ToggleButtons::new();
        let groups = [
            ButtonGroup::Group5,
            ButtonGroup::Group6,
            ButtonGroup::Group7,
            ButtonGroup::Group8,
        ];
        let directions = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
        for group in groups {
            for direction in directions {
                toggles.register(ButtonBinding::new(1, group, direction)).unwrap();
            }
        }
        let extra = ButtonBinding::new(2, ButtonGroup::Group5, Direction::Up);
        assert_eq!(
            toggles.register(extra),
            Err(ControlError::TooManyBindings {
                binding:  extra,
                capacity: MAX_BINDINGS,
            })
        );
    }

    #[test]
    fn update_all_samples_io() {
        let mut io = SimIo::new();
        let mut toggles = ToggleButtons::new();
        toggles.register(BUTTON).unwrap();
        toggles.register(OTHER).unwrap();

        io.set_button(BUTTON, true);
        toggles.update_all(&mut io);
        assert_eq!(toggles.get(BUTTON).unwrap(), ButtonLogic::Pressed);
        assert_eq!(toggles.get(OTHER).unwrap(), ButtonLogic::Idle);

        io.set_button(BUTTON, false);
        io.set_button(OTHER, true);
        toggles.update_all(&mut io);
        assert_eq!(toggles.get(BUTTON).unwrap(), ButtonLogic::Released);
        assert_eq!(toggles.get(OTHER).unwrap(), ButtonLogic::Pressed);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut toggles = ToggleButtons::new();
        toggles.register(BUTTON).unwrap();
        toggles.update(BUTTON, true).unwrap();
        toggles.reset();
        assert_eq!(toggles.get(BUTTON).unwrap(), ButtonLogic::Idle);
        assert!(!toggles.is_toggled(BUTTON).unwrap());
        assert_eq!(toggles.update(BUTTON, true).unwrap(), ButtonLogic::Pressed);
    }
}

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::components::ComponentType;
use crate::error::{CircuitError, Result};
use crate::pin::{Pin, PinRef};

/// Canvas coordinates. Carried for the editor, ignored by the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// A node of the circuit graph.
///
/// The pin set is fixed by [`ComponentType::pin_layout`] when the component is
/// built; afterwards only pin values and the `active` flag change.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    id: String,
    kind: ComponentType,
    pub label: String,
    pub position: Option<Position>,
    pins: IndexMap<&'static str, Pin>,
    // Toggle: user setting. Clock: current phase. Gate: last output. Probe: last input.
    active: bool,
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentType) -> Self {
        let id = id.into();
        let pins = kind
            .pin_layout()
            .iter()
            .map(|(name, direction)| (*name, Pin::new(*name, *direction, id.clone())))
            .collect();

        let mut component = Component {
            id,
            kind,
            label: String::new(),
            position: None,
            pins,
            active: false,
        };
        // Gates settle on their all-low output, so NOT/NAND/NOR/XNOR start high
        component.process();
        component
    }

    pub fn toggle_source(id: impl Into<String>, active: bool) -> Self {
        let mut component = Component::new(id, ComponentType::ToggleSource);
        component.set_active(active);
        component
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ComponentType {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins.values()
    }

    pub fn has_pin(&self, name: &str) -> bool {
        self.pins.contains_key(name)
    }

    pub fn pin(&self, name: &str) -> Result<&Pin> {
        self.pins.get(name).ok_or_else(|| self.unknown_pin(name))
    }

    pub(crate) fn pin_mut(&mut self, name: &str) -> Result<&mut Pin> {
        let id = &self.id;
        self.pins
            .get_mut(name)
            .ok_or_else(|| CircuitError::UnknownPin {
                component: id.clone(),
                pin: name.to_string(),
            })
    }

    pub fn pin_value(&self, name: &str) -> Result<bool> {
        self.pin(name).map(Pin::value)
    }

    /// Drives a pin directly, bypassing wires. Mostly useful for testing gates in isolation.
    pub fn set_pin_value(&mut self, name: &str, value: bool) -> Result<()> {
        self.pin_mut(name)?.set_value(value);
        Ok(())
    }

    pub fn pin_ref(&self, name: &str) -> Result<PinRef> {
        self.pin(name).map(Pin::pin_ref)
    }

    /// Recomputes outputs from the current input values (or from internal
    /// state for sources). Touches nothing outside this component.
    pub fn process(&mut self) {
        match self.kind {
            ComponentType::ToggleSource | ComponentType::Clock => {
                let active = self.active;
                self.drive_output(active);
            }
            ComponentType::DisplayProbe => {
                self.active = self.input_values().first().copied().unwrap_or(false);
            }
            kind => {
                if let Some(gate) = kind.gate() {
                    let out = gate.eval(&self.input_values());
                    self.drive_output(out);
                    self.active = out;
                }
            }
        }
    }

    /// Flips a toggle source and returns the new state. `None` for every other kind.
    pub fn toggle(&mut self) -> Option<bool> {
        if self.kind != ComponentType::ToggleSource {
            return None;
        }
        let active = !self.active;
        self.set_active(active);
        Some(active)
    }

    /// Moves a clock to the given phase. Returns false if this is not a clock.
    pub fn tick(&mut self, is_high: bool) -> bool {
        if self.kind != ComponentType::Clock {
            return false;
        }
        self.set_active(is_high);
        true
    }

    /// Probe reading as 0/1. `None` for every other kind.
    pub fn value(&self) -> Option<u8> {
        if self.kind != ComponentType::DisplayProbe {
            return None;
        }
        self.pins.get("in").map(|pin| u8::from(pin.value()))
    }

    /// Zeroes every pin and the derived `active` flag. A toggle source keeps
    /// its user setting and reasserts it on the next `process`.
    pub fn reset(&mut self) {
        for pin in self.pins.values_mut() {
            pin.set_value(false);
        }
        if self.kind != ComponentType::ToggleSource {
            self.active = false;
        }
    }

    pub(crate) fn pins_mut(&mut self) -> impl Iterator<Item = &mut Pin> {
        self.pins.values_mut()
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
        self.drive_output(active);
    }

    fn drive_output(&mut self, value: bool) {
        if let Some(out) = self.pins.get_mut("out") {
            out.set_value(value);
        }
    }

    fn input_values(&self) -> Vec<bool> {
        self.pins
            .values()
            .filter(|pin| pin.is_input())
            .map(Pin::value)
            .collect()
    }

    fn unknown_pin(&self, name: &str) -> CircuitError {
        CircuitError::UnknownPin {
            component: self.id.clone(),
            pin: name.to_string(),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.kind)?;
        for pin in self.pins.values() {
            write!(f, " {}={}", pin.id(), u8::from(pin.value()))?;
        }
        Ok(())
    }
}

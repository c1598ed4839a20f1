use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    Input,
    Output,
}

impl PinDirection {
    pub fn to_str(&self) -> &'static str {
        match self {
            PinDirection::Input => "input",
            PinDirection::Output => "output",
        }
    }
}

/// Address of a pin inside a circuit, written `componentId/pinId` in saved files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinRef {
    pub component: String,
    pub pin: String,
}

impl PinRef {
    pub fn new(component: impl Into<String>, pin: impl Into<String>) -> Self {
        PinRef {
            component: component.into(),
            pin: pin.into(),
        }
    }

    /// Parses `componentId/pinId`. The pin id is the segment after the last slash.
    pub fn parse(path: &str) -> Result<Self> {
        match path.rsplit_once('/') {
            Some((component, pin)) if !component.is_empty() && !pin.is_empty() => {
                Ok(PinRef::new(component, pin))
            }
            _ => Err(CircuitError::InvalidPinPath(path.to_string())),
        }
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.component, self.pin)
    }
}

impl FromStr for PinRef {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self> {
        PinRef::parse(s)
    }
}

/// A named, directional signal endpoint owned by a component.
///
/// Wires are referenced by id only; the owning [`Circuit`](crate::circuit::Circuit)
/// keeps both sides of every link in sync.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    id: &'static str,
    direction: PinDirection,
    value: bool,
    owner: String,
    connected_wires: Vec<String>,
}

impl Pin {
    pub fn new(id: &'static str, direction: PinDirection, owner: impl Into<String>) -> Self {
        Pin {
            id,
            direction,
            value: false,
            owner: owner.into(),
            connected_wires: Vec::new(),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn direction(&self) -> PinDirection {
        self.direction
    }

    pub fn is_input(&self) -> bool {
        self.direction == PinDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PinDirection::Output
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn set_value(&mut self, value: bool) {
        self.value = value;
    }

    /// Id of the component this pin belongs to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn pin_ref(&self) -> PinRef {
        PinRef::new(self.owner.clone(), self.id)
    }

    pub fn connected_wires(&self) -> &[String] {
        &self.connected_wires
    }

    pub fn is_connected_to(&self, wire_id: &str) -> bool {
        self.connected_wires.iter().any(|w| w == wire_id)
    }

    /// An input with a driver cannot take another wire. Outputs are never full.
    pub fn is_occupied(&self) -> bool {
        self.is_input() && !self.connected_wires.is_empty()
    }

    pub(crate) fn attach_wire(&mut self, wire_id: &str) {
        if !self.is_connected_to(wire_id) {
            self.connected_wires.push(wire_id.to_string());
        }
    }

    pub(crate) fn clear_wires(&mut self) {
        self.connected_wires.clear();
    }

    pub(crate) fn detach_wire(&mut self, wire_id: &str) -> bool {
        let before = self.connected_wires.len();
        self.connected_wires.retain(|w| w != wire_id);
        before != self.connected_wires.len()
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}): {}",
            self.owner,
            self.id,
            self.direction.to_str(),
            u8::from(self.value)
        )?;

        if !self.connected_wires.is_empty() {
            write!(f, " [wires: {}]", self.connected_wires.join(", "))?;
        }

        Ok(())
    }
}

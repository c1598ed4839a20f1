//! # Component Catalogue
//!
//! Every kind of node that can be placed in a circuit, together with the
//! explicit table that maps saved-file type tags to kinds.
//!
//! ## Kinds
//!
//! | Tag | Pins |
//! |---|---|
//! | `source/toggle` | `out` |
//! | `source/clock` | `out` |
//! | `gate/not` | `in`, `out` |
//! | `gate/and`, `gate/or`, `gate/nand`, `gate/nor`, `gate/xor`, `gate/xnor` | `in0`, `in1`, `out` |
//! | `probe/display` | `in` |

pub mod clock;
pub mod gates;

use std::fmt;

use crate::error::{CircuitError, Result};
use crate::pin::PinDirection;

pub use clock::ClockSchedule;
pub use gates::Gate;

pub type PinLayout = &'static [(&'static str, PinDirection)];

const SOURCE_PINS: PinLayout = &[("out", PinDirection::Output)];
const UNARY_PINS: PinLayout = &[("in", PinDirection::Input), ("out", PinDirection::Output)];
const BINARY_PINS: PinLayout = &[
    ("in0", PinDirection::Input),
    ("in1", PinDirection::Input),
    ("out", PinDirection::Output),
];
const PROBE_PINS: PinLayout = &[("in", PinDirection::Input)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    ToggleSource,
    Clock,
    NotGate,
    AndGate,
    OrGate,
    NandGate,
    NorGate,
    XorGate,
    XnorGate,
    DisplayProbe,
}

/// Saved-file type tag for each kind. This is the only place tags are resolved.
const TYPE_TAGS: [(&str, ComponentType); 10] = [
    ("source/toggle", ComponentType::ToggleSource),
    ("source/clock", ComponentType::Clock),
    ("gate/not", ComponentType::NotGate),
    ("gate/and", ComponentType::AndGate),
    ("gate/or", ComponentType::OrGate),
    ("gate/nand", ComponentType::NandGate),
    ("gate/nor", ComponentType::NorGate),
    ("gate/xor", ComponentType::XorGate),
    ("gate/xnor", ComponentType::XnorGate),
    ("probe/display", ComponentType::DisplayProbe),
];

impl ComponentType {
    /// Palette order.
    pub const ALL: [ComponentType; 10] = [
        ComponentType::ToggleSource,
        ComponentType::Clock,
        ComponentType::NotGate,
        ComponentType::AndGate,
        ComponentType::OrGate,
        ComponentType::NandGate,
        ComponentType::NorGate,
        ComponentType::XorGate,
        ComponentType::XnorGate,
        ComponentType::DisplayProbe,
    ];

    pub fn from_tag(tag: &str) -> Result<Self> {
        TYPE_TAGS
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| CircuitError::UnknownComponentType(tag.to_string()))
    }

    pub fn tag(&self) -> &'static str {
        TYPE_TAGS
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(t, _)| *t)
            .unwrap_or_default()
    }

    /// Prefix used when allocating ids for new components, e.g. `and` for `gate/and`.
    pub fn id_prefix(&self) -> &'static str {
        let tag = self.tag();
        tag.split_once('/').map(|(_, name)| name).unwrap_or(tag)
    }

    pub fn pin_layout(&self) -> PinLayout {
        match self {
            ComponentType::ToggleSource | ComponentType::Clock => SOURCE_PINS,
            ComponentType::NotGate => UNARY_PINS,
            ComponentType::DisplayProbe => PROBE_PINS,
            _ => BINARY_PINS,
        }
    }

    /// The boolean function evaluated by combinational kinds.
    pub fn gate(&self) -> Option<Gate> {
        match self {
            ComponentType::NotGate => Some(Gate::Not),
            ComponentType::AndGate => Some(Gate::And),
            ComponentType::OrGate => Some(Gate::Or),
            ComponentType::NandGate => Some(Gate::Nand),
            ComponentType::NorGate => Some(Gate::Nor),
            ComponentType::XorGate => Some(Gate::Xor),
            ComponentType::XnorGate => Some(Gate::Xnor),
            ComponentType::ToggleSource | ComponentType::Clock | ComponentType::DisplayProbe => None,
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, ComponentType::ToggleSource | ComponentType::Clock)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ComponentType::ToggleSource => "Toggle Source",
            ComponentType::Clock => "Clock",
            ComponentType::NotGate => "NOT Gate",
            ComponentType::AndGate => "AND Gate",
            ComponentType::OrGate => "OR Gate",
            ComponentType::NandGate => "NAND Gate",
            ComponentType::NorGate => "NOR Gate",
            ComponentType::XorGate => "XOR Gate",
            ComponentType::XnorGate => "XNOR Gate",
            ComponentType::DisplayProbe => "Display",
        }
    }

    pub fn short_title(&self) -> &'static str {
        match self {
            ComponentType::ToggleSource => "Toggle",
            ComponentType::Clock => "Clock",
            ComponentType::DisplayProbe => "Display",
            gate => gate.gate().map(|g| g.symbol()).unwrap_or_default(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ComponentType::ToggleSource => "Manual binary switch.",
            ComponentType::Clock => "Outputs 1 on tick.",
            ComponentType::NotGate => "Inverts a single signal.",
            ComponentType::AndGate => "Outputs 1 when both inputs are 1.",
            ComponentType::OrGate => "Outputs 1 when any input is 1.",
            ComponentType::NandGate => "Inverse of AND output.",
            ComponentType::NorGate => "Inverse of OR output.",
            ComponentType::XorGate => "True when inputs differ.",
            ComponentType::XnorGate => "True when inputs are the same.",
            ComponentType::DisplayProbe => "Visualizes an input signal.",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

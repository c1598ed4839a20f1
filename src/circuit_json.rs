//! # Circuit Files
//!
//! Serde records for the saved-circuit JSON shape and the conversions between
//! them and a live [`Circuit`].
//!
//! ## File Format
//!
//! ```json
//! {
//!   "title": "Half adder",
//!   "components": [
//!     { "id": "toggle0", "type": "source/toggle", "label": "A",
//!       "position": { "x": 40, "y": 80 }, "active": true },
//!     { "id": "xor0", "type": "gate/xor", "label": "", "position": { "x": 200, "y": 80 } }
//!   ],
//!   "wires": [
//!     { "id": "wire0", "source": "toggle0/out", "target": "xor0/in0",
//!       "from": { "x": 70, "y": 80 }, "to": { "x": 180, "y": 70 } }
//!   ]
//! }
//! ```
//!
//! `active` is only written for toggle sources and ignored for other kinds.
//! A wire end may be `null` while it is not attached to any pin.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logic_sim::circuit::Circuit;
//!
//! let circuit = Circuit::load("configs/demo_circuit.json").expect("Could not load circuit!");
//! println!("{}", circuit.to_json().expect("Could not serialize circuit!"));
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::circuit::Circuit;
use crate::component::{Component, Position};
use crate::components::ComponentType;
use crate::error::Result;
use crate::pin::PinRef;
use crate::wire::Wire;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
    #[serde(default)]
    pub wires: Vec<WireRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRecord {
    pub id: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Position>,
}

impl ComponentRecord {
    fn from_component(component: &Component) -> Self {
        let kind = component.kind();
        ComponentRecord {
            id: component.id().to_string(),
            kind: kind.tag().to_string(),
            label: component.label.clone(),
            position: component.position,
            active: (kind == ComponentType::ToggleSource).then(|| component.is_active()),
        }
    }

    fn to_component(&self) -> Result<Component> {
        let kind = ComponentType::from_tag(&self.kind)?;
        let mut component = match kind {
            ComponentType::ToggleSource => {
                Component::toggle_source(self.id.clone(), self.active.unwrap_or(false))
            }
            _ => Component::new(self.id.clone(), kind),
        };
        component.label = self.label.clone();
        component.position = self.position;
        Ok(component)
    }
}

impl WireRecord {
    fn from_wire(wire: &Wire) -> Self {
        WireRecord {
            id: wire.id().to_string(),
            source: wire.source().map(PinRef::to_string),
            target: wire.target().map(PinRef::to_string),
            from: wire.from,
            to: wire.to,
        }
    }

    fn to_wire(&self) -> Result<Wire> {
        let parse = |path: &Option<String>| path.as_deref().map(PinRef::parse).transpose();
        let source = parse(&self.source)?;
        let target = parse(&self.target)?;
        Ok(Wire::with_ends(self.id.clone(), source, target).with_geometry(self.from, self.to))
    }
}

impl Circuit {
    /// Rebuilds a circuit, resolving every type tag and pin path.
    pub fn from_document(document: &CircuitDocument) -> Result<Self> {
        let components = document
            .components
            .iter()
            .map(ComponentRecord::to_component)
            .collect::<Result<Vec<_>>>()?;
        let wires = document
            .wires
            .iter()
            .map(WireRecord::to_wire)
            .collect::<Result<Vec<_>>>()?;

        let circuit = Circuit::from_parts(document.title.clone(), components, wires)?;

        for wire in circuit.wires().filter(|w| !w.is_connected()) {
            warn!("wire {} is not attached at both ends", wire.id());
        }
        debug!(
            "loaded circuit with {} components and {} wires",
            circuit.component_count(),
            circuit.wire_count()
        );
        Ok(circuit)
    }

    pub fn to_document(&self) -> CircuitDocument {
        CircuitDocument {
            title: self.title().map(str::to_string),
            components: self.components().map(ComponentRecord::from_component).collect(),
            wires: self.wires().map(WireRecord::from_wire).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: CircuitDocument = serde_json::from_str(json)?;
        Self::from_document(&document)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

//! # Circuit Graph
//!
//! Owns every component and wire of one circuit and keeps the links between
//! wires and pins consistent in both directions.
//!
//! ## Invariants
//!
//! - every pin a wire refers to belongs to a component of this circuit
//! - an input pin is driven by at most one wire
//! - component ids and wire ids are unique
//!
//! Structural edits go through [`Circuit`] methods. The simulation only
//! writes pin values and internal component state.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::component::{Component, Position};
use crate::components::ComponentType;
use crate::error::{CircuitError, Result};
use crate::pin::{Pin, PinDirection, PinRef};
use crate::wire::{Wire, WireEnd};

/// One wire end sitting on a pin of a given component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireAttachment {
    pub wire: String,
    pub pin: &'static str,
    pub end: WireEnd,
}

#[derive(Debug, Clone, Default)]
pub struct Circuit {
    title: Option<String>,
    components: IndexMap<String, Component>,
    wires: IndexMap<String, Wire>,
    id_counters: HashMap<String, u64>,
    revision: u64,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        let mut circuit = Self::new();
        circuit.title = Some(title.into());
        circuit
    }

    /// Builds a circuit from an initial set of components and wires. Wire
    /// ends named with [`Wire::between`] are attached to their pins here.
    pub fn from_parts(
        title: Option<String>,
        components: impl IntoIterator<Item = Component>,
        wires: impl IntoIterator<Item = Wire>,
    ) -> Result<Self> {
        let mut circuit = Circuit {
            title,
            ..Self::default()
        };
        for component in components {
            circuit.add_component(component)?;
        }
        for wire in wires {
            circuit.add_wire(wire)?;
        }
        Ok(circuit)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
        self.bump();
    }

    /// Increases on every edit and every simulation step.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    pub fn component(&self, id: &str) -> Result<&Component> {
        self.components
            .get(id)
            .ok_or_else(|| CircuitError::UnknownComponent(id.to_string()))
    }

    // Pins stay crate-private so wire links only change through the methods below
    pub(crate) fn component_mut(&mut self, id: &str) -> Result<&mut Component> {
        let component = self
            .components
            .get_mut(id)
            .ok_or_else(|| CircuitError::UnknownComponent(id.to_string()))?;
        self.revision += 1;
        Ok(component)
    }

    pub fn set_label(&mut self, id: &str, label: impl Into<String>) -> Result<()> {
        self.component_mut(id)?.label = label.into();
        Ok(())
    }

    pub fn set_position(&mut self, id: &str, position: Option<Position>) -> Result<()> {
        self.component_mut(id)?.position = position;
        Ok(())
    }

    pub fn wire(&self, id: &str) -> Result<&Wire> {
        self.wires
            .get(id)
            .ok_or_else(|| CircuitError::UnknownWire(id.to_string()))
    }

    pub fn find_pin(&self, component_id: &str, pin_id: &str) -> Result<&Pin> {
        self.component(component_id)?.pin(pin_id)
    }

    pub fn pin(&self, pin: &PinRef) -> Result<&Pin> {
        self.find_pin(&pin.component, &pin.pin)
    }

    /// Allocates `{prefix}{n}` with `n` counting up per prefix, skipping ids
    /// already taken. Numbers are never handed out twice, even after removal.
    pub fn next_id(&mut self, prefix: &str) -> String {
        let counter = self.id_counters.entry(prefix.to_string()).or_insert(0);
        loop {
            let candidate = format!("{}{}", prefix, counter);
            *counter += 1;
            if !self.components.contains_key(&candidate) && !self.wires.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    pub fn add_component(&mut self, mut component: Component) -> Result<()> {
        if self.components.contains_key(component.id()) {
            return Err(CircuitError::DuplicateId(component.id().to_string()));
        }
        // Links from another circuit mean nothing here
        for pin in component.pins_mut() {
            pin.clear_wires();
        }
        debug!("add component {} ({})", component.id(), component.kind());
        self.components.insert(component.id().to_string(), component);
        self.bump();
        Ok(())
    }

    /// Adds a fresh component of `kind` under a newly allocated id and returns the id.
    pub fn create_component(&mut self, kind: ComponentType) -> Result<String> {
        let id = self.next_id(kind.id_prefix());
        self.add_component(Component::new(id.clone(), kind))?;
        Ok(id)
    }

    /// Removes a component together with every wire attached to its pins.
    pub fn remove_component(&mut self, id: &str) -> Result<Component> {
        if !self.components.contains_key(id) {
            return Err(CircuitError::UnknownComponent(id.to_string()));
        }
        let attached: Vec<String> = self
            .wires
            .values()
            .filter(|wire| wire.touches_component(id))
            .map(|wire| wire.id().to_string())
            .collect();

        for wire_id in attached {
            self.remove_wire(&wire_id)?;
        }

        let component = self
            .components
            .shift_remove(id)
            .ok_or_else(|| CircuitError::UnknownComponent(id.to_string()))?;
        debug!("removed component {}", id);
        self.bump();
        Ok(component)
    }

    /// Adds a wire. Ends already named on the wire are attached with the same
    /// checks as [`Circuit::connect_end`]; on failure nothing is added.
    pub fn add_wire(&mut self, mut wire: Wire) -> Result<()> {
        let id = wire.id().to_string();
        if self.wires.contains_key(&id) {
            return Err(CircuitError::DuplicateId(id));
        }
        let (source, target) = wire.take_ends();
        self.wires.insert(id.clone(), wire);
        debug!("add wire {}", id);

        if let Err(e) = self.attach_ends(&id, source, target) {
            self.remove_wire(&id)?;
            return Err(e);
        }

        self.bump();
        Ok(())
    }

    fn attach_ends(&mut self, id: &str, source: Option<PinRef>, target: Option<PinRef>) -> Result<()> {
        if let Some(pin) = source {
            self.connect_end(id, WireEnd::Source, &pin)?;
        }
        if let Some(pin) = target {
            self.connect_end(id, WireEnd::Target, &pin)?;
        }
        Ok(())
    }

    /// Adds an unconnected wire under a newly allocated id and returns the id.
    pub fn create_wire(&mut self) -> Result<String> {
        let id = self.next_id("wire");
        self.add_wire(Wire::new(id.clone()))?;
        Ok(id)
    }

    /// Detaches both ends, then drops the wire.
    pub fn remove_wire(&mut self, id: &str) -> Result<Wire> {
        for end in [WireEnd::Source, WireEnd::Target] {
            self.disconnect_end(id, end)?;
        }
        let wire = self
            .wires
            .shift_remove(id)
            .ok_or_else(|| CircuitError::UnknownWire(id.to_string()))?;
        debug!("removed wire {}", id);
        self.bump();
        Ok(wire)
    }

    /// Attaches the wire end matching the pin's direction. See [`Wire::connect`].
    pub fn connect(&mut self, wire_id: &str, pin: &PinRef) -> Result<WireEnd> {
        let wire = self
            .wires
            .get_mut(wire_id)
            .ok_or_else(|| CircuitError::UnknownWire(wire_id.to_string()))?;
        let target = lookup_pin_mut(&mut self.components, pin)?;
        let end = wire.connect(target)?;
        debug!("connected {} end of {} to {}", end.to_str(), wire_id, pin);
        self.bump();
        Ok(end)
    }

    /// Attaches a specific end, rejecting pins of the wrong direction.
    pub fn connect_end(&mut self, wire_id: &str, end: WireEnd, pin: &PinRef) -> Result<()> {
        let wire = self
            .wires
            .get_mut(wire_id)
            .ok_or_else(|| CircuitError::UnknownWire(wire_id.to_string()))?;
        let target = lookup_pin_mut(&mut self.components, pin)?;
        wire.connect_end(end, target)?;
        debug!("connected {} end of {} to {}", end.to_str(), wire_id, pin);
        self.bump();
        Ok(())
    }

    /// Detaches the wire from `pin`. Returns false if they were not connected.
    pub fn disconnect(&mut self, wire_id: &str, pin: &PinRef) -> Result<bool> {
        let wire = self
            .wires
            .get_mut(wire_id)
            .ok_or_else(|| CircuitError::UnknownWire(wire_id.to_string()))?;
        let target = lookup_pin_mut(&mut self.components, pin)?;
        let changed = wire.disconnect(target);
        if changed {
            debug!("disconnected {} from {}", wire_id, pin);
            self.bump();
        }
        Ok(changed)
    }

    /// Detaches whatever pin sits on `end` and returns it.
    pub fn disconnect_end(&mut self, wire_id: &str, end: WireEnd) -> Result<Option<PinRef>> {
        let attached = self.wire(wire_id)?.end(end).cloned();
        match attached {
            Some(pin) => {
                self.disconnect(wire_id, &pin)?;
                Ok(Some(pin))
            }
            None => Ok(None),
        }
    }

    /// Pins that can still accept a wire end of the given direction: every
    /// output, and inputs with no driver yet.
    pub fn find_available_pins(&self, direction: PinDirection) -> Vec<PinRef> {
        self.components
            .values()
            .flat_map(Component::pins)
            .filter(|pin| pin.direction() == direction && !pin.is_occupied())
            .map(Pin::pin_ref)
            .collect()
    }

    /// Every wire end attached to one of the component's pins.
    pub fn connected_wires(&self, component_id: &str) -> Result<Vec<WireAttachment>> {
        let component = self.component(component_id)?;
        let mut attachments = Vec::new();
        for pin in component.pins() {
            for wire in pin.connected_wires() {
                attachments.push(WireAttachment {
                    wire: wire.clone(),
                    pin: pin.id(),
                    end: WireEnd::for_direction(pin.direction()),
                });
            }
        }
        Ok(attachments)
    }

    /// Flips a toggle source and returns its new state.
    pub fn toggle(&mut self, component_id: &str) -> Result<bool> {
        let component = self.component_mut(component_id)?;
        let active = component
            .toggle()
            .ok_or_else(|| CircuitError::NotToggleable(component_id.to_string()))?;
        debug!("toggled {} to {}", component_id, active);
        Ok(active)
    }

    pub fn has_clocks(&self) -> bool {
        self.components
            .values()
            .any(|c| c.kind() == ComponentType::Clock)
    }

    /// Drives every clock to the given phase.
    pub fn tick_clocks(&mut self, is_high: bool) {
        for component in self.components.values_mut() {
            component.tick(is_high);
        }
    }

    /// Copies source values to targets for every fully connected wire.
    ///
    /// All source values are read before any target is written, so the result
    /// does not depend on wire order.
    pub fn propagate_wires(&mut self) {
        let values: Vec<Option<bool>> = self
            .wires
            .values()
            .map(|wire| {
                wire.target()?;
                let source = wire.source()?;
                self.pin(source).ok().map(Pin::value)
            })
            .collect();

        for (wire, value) in self.wires.values_mut().zip(values) {
            let (Some(value), Some(target)) = (value, wire.target().cloned()) else {
                continue;
            };
            if let Ok(pin) = lookup_pin_mut(&mut self.components, &target) {
                wire.carry(value, pin);
            }
        }
        trace!("propagated {} wires", self.wires.len());
    }

    /// Propagates a single wire. A wire missing either end does nothing.
    pub fn propagate_wire(&mut self, wire_id: &str) -> Result<()> {
        let wire = self
            .wires
            .get_mut(wire_id)
            .ok_or_else(|| CircuitError::UnknownWire(wire_id.to_string()))?;
        let (Some(source), Some(target)) = (wire.source().cloned(), wire.target().cloned()) else {
            return Ok(());
        };
        let value = lookup_pin_mut(&mut self.components, &source)?.value();
        let pin = lookup_pin_mut(&mut self.components, &target)?;
        wire.carry(value, pin);
        self.bump();
        Ok(())
    }

    /// Runs `process` on every component.
    pub fn process_components(&mut self) {
        for component in self.components.values_mut() {
            component.process();
        }
        trace!("processed {} components", self.components.len());
    }

    /// Zeroes every pin value and wire indicator. Structure is untouched.
    pub fn reset(&mut self) {
        for component in self.components.values_mut() {
            component.reset();
        }
        for wire in self.wires.values_mut() {
            wire.reset();
        }
        self.bump();
    }

    /// Current reading of every display probe, in insertion order.
    pub fn probe_values(&self) -> Vec<(&str, u8)> {
        self.components
            .values()
            .filter_map(|c| c.value().map(|v| (c.id(), v)))
            .collect()
    }

    pub(crate) fn bump(&mut self) {
        self.revision += 1;
    }
}

fn lookup_pin_mut<'a>(
    components: &'a mut IndexMap<String, Component>,
    pin: &PinRef,
) -> Result<&'a mut Pin> {
    components
        .get_mut(&pin.component)
        .ok_or_else(|| CircuitError::UnknownComponent(pin.component.clone()))?
        .pin_mut(&pin.pin)
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title.as_deref().unwrap_or("Untitled Circuit"))?;
        for component in self.components.values() {
            writeln!(f, "  {}", component)?;
        }
        for wire in self.wires.values() {
            writeln!(f, "  {}", wire)?;
        }
        Ok(())
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::Position;
use crate::error::{CircuitError, Result};
use crate::pin::{Pin, PinDirection, PinRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireEnd {
    Source,
    Target,
}

impl WireEnd {
    /// Direction a pin must have to sit on this end.
    pub fn direction(&self) -> PinDirection {
        match self {
            WireEnd::Source => PinDirection::Output,
            WireEnd::Target => PinDirection::Input,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            WireEnd::Source => "source",
            WireEnd::Target => "target",
        }
    }

    pub fn for_direction(direction: PinDirection) -> Self {
        match direction {
            PinDirection::Output => WireEnd::Source,
            PinDirection::Input => WireEnd::Target,
        }
    }
}

/// Directed edge from one output pin to one input pin.
///
/// Either end may be empty while the wire is being dragged around the canvas;
/// only wires with both ends attached carry a signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    id: String,
    source: Option<PinRef>,
    target: Option<PinRef>,
    pub from: Option<Position>,
    pub to: Option<Position>,
    active: bool,
}

impl Wire {
    pub fn new(id: impl Into<String>) -> Self {
        Wire {
            id: id.into(),
            source: None,
            target: None,
            from: None,
            to: None,
            active: false,
        }
    }

    /// A wire with both ends named. The pins learn about it when the wire is
    /// added to a circuit.
    pub fn between(id: impl Into<String>, source: PinRef, target: PinRef) -> Self {
        Wire::with_ends(id, Some(source), Some(target))
    }

    /// Like [`Wire::between`] but either end may be left empty.
    pub fn with_ends(id: impl Into<String>, source: Option<PinRef>, target: Option<PinRef>) -> Self {
        let mut wire = Wire::new(id);
        wire.source = source;
        wire.target = target;
        wire
    }

    pub fn with_geometry(mut self, from: Option<Position>, to: Option<Position>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> Option<&PinRef> {
        self.source.as_ref()
    }

    pub fn target(&self) -> Option<&PinRef> {
        self.target.as_ref()
    }

    pub fn end(&self, end: WireEnd) -> Option<&PinRef> {
        match end {
            WireEnd::Source => self.source.as_ref(),
            WireEnd::Target => self.target.as_ref(),
        }
    }

    /// Both ends present; only such wires take part in propagation.
    pub fn is_connected(&self) -> bool {
        self.source.is_some() && self.target.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Which end, if any, is attached to `pin`.
    pub fn attached_end(&self, pin: &PinRef) -> Option<WireEnd> {
        if self.source.as_ref() == Some(pin) {
            Some(WireEnd::Source)
        } else if self.target.as_ref() == Some(pin) {
            Some(WireEnd::Target)
        } else {
            None
        }
    }

    pub fn touches_component(&self, component_id: &str) -> bool {
        [&self.source, &self.target]
            .into_iter()
            .flatten()
            .any(|pin| pin.component == component_id)
    }

    /// Attaches the end matching the pin's direction and registers this wire
    /// on the pin.
    ///
    /// Fails if that end already holds a different pin (it must be
    /// disconnected first) or if an input pin is already driven by another
    /// wire. Reconnecting to the same pin is a no-op.
    pub fn connect(&mut self, pin: &mut Pin) -> Result<WireEnd> {
        let end = WireEnd::for_direction(pin.direction());
        let pin_ref = pin.pin_ref();

        match self.end(end) {
            Some(current) if *current == pin_ref => {
                pin.attach_wire(&self.id);
                return Ok(end);
            }
            Some(current) => {
                return Err(CircuitError::invalid_connection(
                    self.id.clone(),
                    &pin_ref,
                    format!("{} end already attached to {}", end.to_str(), current),
                ));
            }
            None => {}
        }

        if let Some(driver) = pin.connected_wires().iter().find(|w| **w != self.id) {
            if pin.is_input() {
                return Err(CircuitError::invalid_connection(
                    self.id.clone(),
                    &pin_ref,
                    format!("input already driven by wire {}", driver),
                ));
            }
        }

        pin.attach_wire(&self.id);
        match end {
            WireEnd::Source => self.source = Some(pin_ref),
            WireEnd::Target => self.target = Some(pin_ref),
        }
        Ok(end)
    }

    /// Like [`Wire::connect`] but also requires the pin to fit the requested end.
    pub fn connect_end(&mut self, end: WireEnd, pin: &mut Pin) -> Result<()> {
        if pin.direction() != end.direction() {
            return Err(CircuitError::invalid_connection(
                self.id.clone(),
                pin.pin_ref(),
                format!(
                    "{} pin cannot be the {} end",
                    pin.direction().to_str(),
                    end.to_str()
                ),
            ));
        }
        self.connect(pin).map(|_| ())
    }

    /// Detaches from `pin`. Returns false, changing nothing, if the wire was
    /// not attached to it.
    pub fn disconnect(&mut self, pin: &mut Pin) -> bool {
        let pin_ref = pin.pin_ref();
        let slot = match self.attached_end(&pin_ref) {
            Some(WireEnd::Source) => &mut self.source,
            Some(WireEnd::Target) => &mut self.target,
            None => return false,
        };
        *slot = None;
        pin.detach_wire(&self.id);
        true
    }

    /// Empties both ends without touching any pin. Used when a wire is handed
    /// to a circuit, which then reattaches the ends through the pins.
    pub(crate) fn take_ends(&mut self) -> (Option<PinRef>, Option<PinRef>) {
        (self.source.take(), self.target.take())
    }

    /// Moves a signal across the wire, recording it for display.
    pub(crate) fn carry(&mut self, value: bool, target: &mut Pin) {
        target.set_value(value);
        self.active = value;
    }

    pub fn reset(&mut self) {
        self.active = false;
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = |pin: &Option<PinRef>| {
            pin.as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string())
        };
        write!(
            f,
            "{}: {} -> {} ({})",
            self.id,
            end(&self.source),
            end(&self.target),
            u8::from(self.active)
        )
    }
}

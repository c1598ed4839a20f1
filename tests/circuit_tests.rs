//! Circuit Editing Tests
//!
//! These tests exercise the structural editing API the way an editor would:
//! placing components, dragging wires between pins and deleting parts.

use logic_sim::{
    Circuit, CircuitError, Component, ComponentType, Pin, PinDirection, PinRef, Position, Wire,
    WireAttachment, WireEnd,
};

#[cfg(test)]
mod editing_tests {
    use super::*;

    #[test]
    fn test_build_circuit_by_hand() {
        let mut circuit = Circuit::with_title("Inverter");
        let source = circuit.create_component(ComponentType::ToggleSource).unwrap();
        let not = circuit.create_component(ComponentType::NotGate).unwrap();
        let probe = circuit.create_component(ComponentType::DisplayProbe).unwrap();
        assert_eq!([source.as_str(), not.as_str(), probe.as_str()], ["toggle0", "not0", "display0"]);

        let w0 = circuit.create_wire().unwrap();
        circuit.connect(&w0, &PinRef::new(&source, "out")).unwrap();
        circuit.connect(&w0, &PinRef::new(&not, "in")).unwrap();

        let w1 = circuit.create_wire().unwrap();
        assert_eq!(circuit.connect(&w1, &PinRef::new(&probe, "in")).unwrap(), WireEnd::Target);
        assert_eq!(circuit.connect(&w1, &PinRef::new(&not, "out")).unwrap(), WireEnd::Source);

        assert_eq!((w0.as_str(), w1.as_str()), ("wire0", "wire1"));
        assert!(circuit.wires().all(|w| w.is_connected()));
        assert_eq!(circuit.title(), Some("Inverter"));
    }

    #[test]
    fn test_occupied_input_is_hidden_and_rejected() {
        let mut circuit = Circuit::new();
        let a = circuit.create_component(ComponentType::ToggleSource).unwrap();
        let b = circuit.create_component(ComponentType::ToggleSource).unwrap();
        let and = circuit.create_component(ComponentType::AndGate).unwrap();
        let in0 = PinRef::new(&and, "in0");

        let first = circuit.create_wire().unwrap();
        circuit.connect(&first, &PinRef::new(&a, "out")).unwrap();
        circuit.connect(&first, &in0).unwrap();
        assert!(!circuit.find_available_pins(PinDirection::Input).contains(&in0));

        let second = circuit.create_wire().unwrap();
        circuit.connect(&second, &PinRef::new(&b, "out")).unwrap();
        let err = circuit.connect(&second, &in0).unwrap_err();
        assert!(err.is_invalid_connection());
        assert!(circuit.wire(&second).unwrap().target().is_none());

        circuit.disconnect(&first, &in0).unwrap();
        assert!(circuit.find_available_pins(PinDirection::Input).contains(&in0));
        circuit.connect(&second, &in0).unwrap();
        assert_eq!(circuit.find_pin(&and, "in0").unwrap().connected_wires(), [second]);
    }

    #[test]
    fn test_outside_wire_cannot_free_circuit_input() {
        let mut circuit = Circuit::from_parts(
            None,
            [
                Component::toggle_source("a", true),
                Component::toggle_source("b", false),
                Component::new("p", ComponentType::DisplayProbe),
            ],
            [Wire::between("w0", PinRef::new("a", "out"), PinRef::new("p", "in"))],
        )
        .unwrap();
        let p_in = PinRef::new("p", "in");

        // A wire built outside the circuit only ever sees copies of its pins
        let mut stray = Wire::between("w0", PinRef::new("a", "out"), p_in.clone());
        let mut copy: Pin = circuit.pin(&p_in).unwrap().clone();
        assert!(stray.disconnect(&mut copy));
        assert!(copy.connected_wires().is_empty());

        assert!(circuit.pin(&p_in).unwrap().is_occupied());
        assert!(!circuit.find_available_pins(PinDirection::Input).contains(&p_in));

        let second = circuit.create_wire().unwrap();
        circuit.connect(&second, &PinRef::new("b", "out")).unwrap();
        assert!(circuit.connect(&second, &p_in).unwrap_err().is_invalid_connection());
        assert_eq!(circuit.pin(&p_in).unwrap().connected_wires(), ["w0"]);
    }

    #[test]
    fn test_wrong_direction_end() {
        let mut circuit = Circuit::new();
        let probe = circuit.create_component(ComponentType::DisplayProbe).unwrap();
        let wire = circuit.create_wire().unwrap();
        let err = circuit
            .connect_end(&wire, WireEnd::Source, &PinRef::new(&probe, "in"))
            .unwrap_err();
        assert!(matches!(err, CircuitError::InvalidConnection { .. }));
    }

    #[test]
    fn test_move_component_wires() {
        let mut circuit = Circuit::from_parts(
            None,
            [
                Component::toggle_source("a", false),
                Component::new("xor", ComponentType::XorGate),
                Component::new("p", ComponentType::DisplayProbe),
            ],
            [
                Wire::between("w0", PinRef::new("a", "out"), PinRef::new("xor", "in1")),
                Wire::between("w1", PinRef::new("xor", "out"), PinRef::new("p", "in")),
            ],
        )
        .unwrap();
        circuit
            .add_wire(Wire::with_ends("w2", Some(PinRef::new("a", "out")), None))
            .unwrap();

        let attachments = circuit.connected_wires("xor").unwrap();
        assert_eq!(
            attachments,
            [
                WireAttachment {
                    wire: "w0".to_string(),
                    pin: "in1",
                    end: WireEnd::Target,
                },
                WireAttachment {
                    wire: "w1".to_string(),
                    pin: "out",
                    end: WireEnd::Source,
                },
            ]
        );
        assert_eq!(circuit.connected_wires("a").unwrap().len(), 2);
        assert!(circuit.connected_wires("ghost").unwrap_err().is_lookup());
    }

    #[test]
    fn test_delete_component_and_wire() {
        let mut circuit = Circuit::from_parts(
            None,
            [
                Component::toggle_source("a", true),
                Component::new("or", ComponentType::OrGate),
                Component::new("p", ComponentType::DisplayProbe),
            ],
            [
                Wire::between("w0", PinRef::new("a", "out"), PinRef::new("or", "in0")),
                Wire::between("w1", PinRef::new("or", "out"), PinRef::new("p", "in")),
            ],
        )
        .unwrap();

        circuit.remove_wire("w1").unwrap();
        assert!(!circuit.find_pin("p", "in").unwrap().is_occupied());
        assert!(circuit.remove_wire("w1").unwrap_err().is_lookup());

        let removed = circuit.remove_component("or").unwrap();
        assert_eq!(removed.kind(), ComponentType::OrGate);
        assert_eq!(circuit.wire_count(), 0);
        assert!(circuit.find_pin("a", "out").unwrap().connected_wires().is_empty());
        assert_eq!(circuit.component_count(), 2);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut circuit = Circuit::new();
        for kind in ComponentType::ALL {
            circuit.create_component(kind).unwrap();
        }
        let kinds: Vec<ComponentType> = circuit.components().map(|c| c.kind()).collect();
        assert_eq!(kinds, ComponentType::ALL);
    }

    #[test]
    fn test_display_lists_parts() {
        let circuit = Circuit::from_parts(
            None,
            [Component::toggle_source("a", true), Component::new("p", ComponentType::DisplayProbe)],
            [Wire::between("w0", PinRef::new("a", "out"), PinRef::new("p", "in"))],
        )
        .unwrap();
        let text = circuit.to_string();
        assert!(text.starts_with("Untitled Circuit"));
        assert!(text.contains("a (source/toggle) out=1"));
        assert!(text.contains("w0: a/out -> p/in (0)"));
    }

    #[test]
    fn test_set_label_and_position() {
        let mut circuit = Circuit::new();
        let id = circuit.create_component(ComponentType::Clock).unwrap();
        let before = circuit.revision();
        circuit.set_label(&id, "CLK").unwrap();
        circuit.set_position(&id, Some(Position::new(10.0, 20.0))).unwrap();
        let clock = circuit.component(&id).unwrap();
        assert_eq!(clock.label, "CLK");
        assert_eq!(clock.position, Some(Position::new(10.0, 20.0)));
        assert!(circuit.revision() > before);
        assert!(circuit.set_position("ghost", None).unwrap_err().is_lookup());

        circuit.set_title(Some("Clocked".to_string()));
        assert!(circuit.to_string().starts_with("Clocked"));
    }
}

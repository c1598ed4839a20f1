//! Property-based tests for gate evaluation, clock scheduling and wiring
//!
//! These tests use property-based testing to check that gate outputs follow
//! their truth tables, that evaluation is idempotent, that the clock keeps
//! its duty cycle, and that an input never gets a second driver.

use logic_sim::components::{ClockSchedule, Gate};
use logic_sim::{
    Circuit, Component, ComponentType, ImmediateScheduler, PinDirection, PinRef, SimulationConfig,
    SimulationController,
};
use proptest::prelude::*;

fn arb_gate_kind() -> impl Strategy<Value = ComponentType> {
    prop::sample::select(
        ComponentType::ALL
            .into_iter()
            .filter(|kind| kind.gate().is_some())
            .collect::<Vec<_>>(),
    )
}

fn arb_kind() -> impl Strategy<Value = ComponentType> {
    prop::sample::select(ComponentType::ALL.to_vec())
}

fn input_names(kind: ComponentType) -> Vec<&'static str> {
    kind.pin_layout()
        .iter()
        .filter(|(_, direction)| *direction == PinDirection::Input)
        .map(|(name, _)| *name)
        .collect()
}

fn reference(kind: ComponentType, a: bool, b: bool) -> bool {
    match kind {
        ComponentType::NotGate => !a,
        ComponentType::AndGate => a && b,
        ComponentType::OrGate => a || b,
        ComponentType::NandGate => !(a && b),
        ComponentType::NorGate => !(a || b),
        ComponentType::XorGate => a ^ b,
        ComponentType::XnorGate => !(a ^ b),
        other => panic!("{} is not a gate", other),
    }
}

#[cfg(test)]
mod gate_properties {
    use super::*;

    proptest! {
        #[test]
        fn test_gate_matches_truth_table(kind in arb_gate_kind(), a in any::<bool>(), b in any::<bool>()) {
            let mut gate = Component::new("g", kind);
            let inputs = input_names(kind);
            gate.set_pin_value(inputs[0], a).unwrap();
            if let Some(second) = inputs.get(1) {
                gate.set_pin_value(second, b).unwrap();
            }
            gate.process();

            prop_assert_eq!(gate.pin_value("out").unwrap(), reference(kind, a, b));
            prop_assert_eq!(gate.is_active(), reference(kind, a, b));
        }

        #[test]
        fn test_process_is_idempotent(kind in arb_kind(), values in prop::collection::vec(any::<bool>(), 2)) {
            let mut component = Component::new("c", kind);
            for (name, value) in input_names(kind).into_iter().zip(values) {
                component.set_pin_value(name, value).unwrap();
            }
            component.process();
            let first = component.clone();
            component.process();
            prop_assert_eq!(component, first);
        }

        #[test]
        fn test_truth_table_covers_all_rows(gate in prop::sample::select(vec![
            Gate::Not, Gate::And, Gate::Or, Gate::Nand, Gate::Nor, Gate::Xor, Gate::Xnor,
        ])) {
            let table = gate.truth_table();
            prop_assert_eq!(table.len(), 1 << gate.arity());
            for (inputs, out) in table {
                prop_assert_eq!(gate.eval(&inputs), out);
            }
        }
    }
}

#[cfg(test)]
mod clock_properties {
    use super::*;

    proptest! {
        #[test]
        fn test_high_steps_per_period(period in 0u32..64, offset in 0u64..1_000) {
            let clock = ClockSchedule::new(period);
            let period = u64::from(clock.period());
            let start = offset * period;
            let high = (start..start + period).filter(|step| clock.is_high(*step)).count();

            prop_assert!(clock.period() >= 4);
            prop_assert_eq!(high as u32, (clock.period() / 2).min(5));
        }

        #[test]
        fn test_high_phase_is_at_end_of_period(period in 4u32..64, step in 0u64..10_000) {
            let clock = ClockSchedule::new(period);
            let phase = step % u64::from(period);
            if clock.is_high(step) {
                prop_assert!(clock.is_high(step - phase + u64::from(period) - 1));
            } else {
                prop_assert!(!clock.is_high(step - phase));
            }
        }

        #[test]
        fn test_controller_drives_clock_phase(period in 4u32..16, steps in 1usize..40) {
            let mut circuit = Circuit::new();
            let clock = circuit.create_component(ComponentType::Clock).unwrap();
            let mut sim = SimulationController::with_scheduler(
                SimulationConfig { steps_per_clock_tick: period, ..SimulationConfig::default() },
                ImmediateScheduler,
            );
            let schedule = ClockSchedule::new(period);
            for step in 0..steps as u64 {
                sim.step(&mut circuit);
                prop_assert_eq!(
                    circuit.component(&clock).unwrap().is_active(),
                    schedule.is_high(step)
                );
            }
        }
    }
}

#[cfg(test)]
mod wiring_properties {
    use super::*;

    proptest! {
        #[test]
        fn test_input_keeps_single_driver(attempts in prop::collection::vec((0usize..3, 0usize..4), 1..20)) {
            let mut circuit = Circuit::new();
            let sources: Vec<String> = (0..3)
                .map(|_| circuit.create_component(ComponentType::ToggleSource).unwrap())
                .collect();
            let and = circuit.create_component(ComponentType::AndGate).unwrap();
            let or = circuit.create_component(ComponentType::OrGate).unwrap();
            let inputs = [
                PinRef::new(&and, "in0"),
                PinRef::new(&and, "in1"),
                PinRef::new(&or, "in0"),
                PinRef::new(&or, "in1"),
            ];

            for (source, input) in attempts {
                let wire = circuit.create_wire().unwrap();
                circuit.connect(&wire, &PinRef::new(&sources[source], "out")).unwrap();
                let available = circuit
                    .find_available_pins(PinDirection::Input)
                    .contains(&inputs[input]);
                let result = circuit.connect(&wire, &inputs[input]);
                prop_assert_eq!(result.is_ok(), available);
            }

            for input in &inputs {
                prop_assert!(circuit.pin(input).unwrap().connected_wires().len() <= 1);
            }
            let drivers = circuit.wires().filter(|w| w.target().is_some()).count();
            let occupied = inputs
                .iter()
                .filter(|p| circuit.pin(p).unwrap().is_occupied())
                .count();
            prop_assert_eq!(drivers, occupied);
        }
    }
}

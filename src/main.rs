use std::env;
use std::time::Instant;

use logic_sim::{Circuit, SimulationConfig, SimulationController};

const DEFAULT_CIRCUIT: &str = "configs/demo_circuit.json";
const DEFAULT_TICKS: u32 = 4;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // RUST_LOG picks the level, e.g. RUST_LOG=logic_sim=trace
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let circuit_path = args.first().map(String::as_str).unwrap_or(DEFAULT_CIRCUIT);
    let ticks = match args.get(1).map(|t| t.parse::<u32>()) {
        None => DEFAULT_TICKS,
        Some(Ok(ticks)) => ticks,
        Some(Err(e)) => {
            eprintln!("Invalid tick count: {}", e);
            return;
        }
    };
    let config = match args.get(2) {
        None => SimulationConfig::default(),
        Some(path) => match SimulationConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load simulation config {}: {}", path, e);
                return;
            }
        },
    };

    let mut circuit = match Circuit::load(circuit_path) {
        Ok(circuit) => circuit,
        Err(e) => {
            eprintln!("Failed to load circuit {}: {}", circuit_path, e);
            return;
        }
    };

    println!("Logic Simulator");
    println!("===============");
    print!("{}", circuit);
    println!();

    let mut simulation = SimulationController::new(config);
    let start = Instant::now();

    println!("Tick | Step | Probes");
    println!("-----|------|-------");
    for tick in 1..=ticks {
        let mut probes = String::new();
        simulation
            .tick(&mut circuit, |circuit| probes = format_probes(circuit))
            .await;
        println!("{:4} | {:4} | {}", tick, simulation.step_count(), probes);
    }

    println!();
    println!(
        "Ran {} steps in {:.2?}",
        simulation.step_count(),
        start.elapsed()
    );
}

fn format_probes(circuit: &Circuit) -> String {
    circuit
        .probe_values()
        .iter()
        .map(|(id, value)| format!("{}={}", id, value))
        .collect::<Vec<_>>()
        .join(" ")
}

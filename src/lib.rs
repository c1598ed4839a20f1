//! # Logic Simulator Library
//!
//! A digital-logic circuit model with a discrete-step signal propagation engine.
//!
//! This library provides:
//! - A circuit graph of toggle sources, clocks, boolean gates and display probes
//! - Strict wiring rules: one driver per input, unlimited fan-out per output
//! - A step engine that propagates every wire before evaluating any component
//! - Clock scheduling and paced async playback with pause/reset
//! - Loading and saving circuits in a small JSON format

pub mod circuit;
pub mod circuit_json;
pub mod component;
pub mod components;
pub mod error;
pub mod pin;
pub mod simulation;
pub mod wire;

// Re-export commonly used items for easier importing
pub use circuit::{Circuit, WireAttachment};
pub use circuit_json::CircuitDocument;
pub use component::{Component, Position};
pub use components::ComponentType;
pub use error::{CircuitError, Result};
pub use pin::{Pin, PinDirection, PinRef};
pub use simulation::{
    ImmediateScheduler, PlaybackHandle, PlaybackState, Scheduler, SimulationConfig,
    SimulationController, TokioScheduler,
};
pub use wire::{Wire, WireEnd};

//! # Simulation Controller
//!
//! Advances a [`Circuit`] in discrete steps and paces automatic playback.
//!
//! ## Step
//!
//! 1. drive every clock to the phase given by the step counter
//! 2. propagate every fully connected wire
//! 3. run `process` on every component
//! 4. count the step
//!
//! Wires are always propagated before any component is evaluated, so a
//! signal needs one step per wire hop to travel through the graph.
//!
//! ## Playback
//!
//! [`SimulationController::tick`] runs one batch of steps and
//! [`SimulationController::play`] repeats ticks until paused. Both are
//! `async` and wait on an injected [`Scheduler`] between steps; `step` itself
//! never suspends. Pausing goes through a [`PlaybackHandle`], which can be
//! cloned into the per-step callback or anywhere else on the same thread.

use std::fs;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::circuit::Circuit;
use crate::components::ClockSchedule;
use crate::error::Result;

/// Simulation pacing, loadable from JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Clock period in steps, clamped to at least 4.
    pub steps_per_clock_tick: u32,
    /// Steps per tick for circuits without a clock.
    pub steps_per_tick: u32,
    pub step_delay_ms: u64,
    pub tick_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps_per_clock_tick: 10,
            steps_per_tick: 1,
            step_delay_ms: 50,
            tick_delay_ms: 200,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn clock_schedule(&self) -> ClockSchedule {
        ClockSchedule::new(self.steps_per_clock_tick)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_delay_ms)
    }
}

/// Waiting capability used between steps and ticks.
pub trait Scheduler {
    fn delay(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Real-time pacing on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn delay(&self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}

/// Hands control back to the executor without waiting. For headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn delay(&self, _duration: Duration) -> impl Future<Output = ()> {
        tokio::task::yield_now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

/// Shared view of the controller's running flag.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    running: Arc<AtomicBool>,
}

impl PlaybackHandle {
    /// Stops playback before the next step begins.
    pub fn pause(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_playing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

// Clears the running flag when `play` ends, including when its future is dropped.
struct PlayGuard(Arc<AtomicBool>);

impl Drop for PlayGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SimulationController<S = TokioScheduler> {
    config: SimulationConfig,
    clock: ClockSchedule,
    step_count: u64,
    running: Arc<AtomicBool>,
    scheduler: S,
}

impl SimulationController<TokioScheduler> {
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_scheduler(config, TokioScheduler)
    }
}

impl Default for SimulationController<TokioScheduler> {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl<S: Scheduler> SimulationController<S> {
    pub fn with_scheduler(config: SimulationConfig, scheduler: S) -> Self {
        Self {
            clock: config.clock_schedule(),
            config,
            step_count: 0,
            running: Arc::new(AtomicBool::new(false)),
            scheduler,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Steps taken since construction or the last reset.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn state(&self) -> PlaybackState {
        if self.is_playing() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    pub fn is_playing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn handle(&self) -> PlaybackHandle {
        PlaybackHandle {
            running: self.running.clone(),
        }
    }

    /// Phase the clocks take on the next step.
    pub fn clock_is_high(&self) -> bool {
        self.clock.is_high(self.step_count)
    }

    /// Steps in one tick: the clock period when the circuit has a clock,
    /// otherwise the configured batch size.
    pub fn steps_per_tick(&self, circuit: &Circuit) -> u32 {
        if circuit.has_clocks() {
            self.clock.period()
        } else {
            self.config.steps_per_tick.max(1)
        }
    }

    /// One synchronous step. On return every pin holds its settled value for this step.
    pub fn step(&mut self, circuit: &mut Circuit) {
        if circuit.has_clocks() {
            circuit.tick_clocks(self.clock_is_high());
        }
        circuit.propagate_wires();
        circuit.process_components();
        self.step_count += 1;
        circuit.bump();
        trace!("step {}", self.step_count);
    }

    /// Runs one tick, calling `on_step` after every step and waiting
    /// `step_delay` between steps. Returns the number of steps taken.
    pub async fn tick<F>(&mut self, circuit: &mut Circuit, mut on_step: F) -> u32
    where
        F: FnMut(&mut Circuit),
    {
        self.run_tick(circuit, &mut on_step, false).await
    }

    /// Repeats ticks until paused, calling `on_step` after every step and
    /// waiting `tick_delay` between ticks.
    ///
    /// `&mut self` keeps a second `play` on the same controller from starting
    /// while one runs. If the running flag is already set on entry,
    /// this returns without stepping and leaves the flag alone.
    pub async fn play<F>(&mut self, circuit: &mut Circuit, mut on_step: F)
    where
        F: FnMut(&mut Circuit),
    {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("play requested while already playing");
            return;
        }
        let _guard = PlayGuard(self.running.clone());
        info!("playback started at step {}", self.step_count);

        while self.is_playing() {
            self.run_tick(circuit, &mut on_step, true).await;
            if !self.is_playing() {
                break;
            }
            self.scheduler.delay(self.config.tick_delay()).await;
        }
        info!("playback stopped at step {}", self.step_count);
    }

    pub fn pause(&mut self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("playback paused");
        }
    }

    /// Stops playback, zeroes the step counter and clears every pin and wire.
    pub fn reset(&mut self, circuit: &mut Circuit) {
        self.running.store(false, Ordering::SeqCst);
        self.step_count = 0;
        circuit.reset();
        info!("simulation reset");
    }

    async fn run_tick<F>(&mut self, circuit: &mut Circuit, on_step: &mut F, interruptible: bool) -> u32
    where
        F: FnMut(&mut Circuit),
    {
        let steps = self.steps_per_tick(circuit);
        let mut taken = 0;
        for i in 0..steps {
            if interruptible && !self.is_playing() {
                break;
            }
            if i > 0 {
                self.scheduler.delay(self.config.step_delay()).await;
                if interruptible && !self.is_playing() {
                    break;
                }
            }
            self.step(circuit);
            on_step(circuit);
            taken += 1;
        }
        taken
    }
}

/// Smallest clock period, in steps.
pub const MIN_STEPS_PER_CLOCK_TICK: u32 = 4;

/// Upper bound on how many steps of a period the clock stays high.
pub const MAX_HIGH_STEPS: u32 = 5;

/// Square wave locked to the simulation step counter.
///
/// The clock is high for the last `min(period / 2, 5)` steps of every period
/// and low for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSchedule {
    period: u32,
}

impl ClockSchedule {
    pub fn new(steps_per_clock_tick: u32) -> Self {
        ClockSchedule {
            period: steps_per_clock_tick.max(MIN_STEPS_PER_CLOCK_TICK),
        }
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn high_steps(&self) -> u32 {
        (self.period / 2).min(MAX_HIGH_STEPS)
    }

    pub fn is_high(&self, step: u64) -> bool {
        let phase = step % u64::from(self.period);
        phase >= u64::from(self.period - self.high_steps())
    }

    pub fn duty_cycle(&self) -> f64 {
        f64::from(self.high_steps()) / f64::from(self.period)
    }
}

impl Default for ClockSchedule {
    fn default() -> Self {
        ClockSchedule::new(10)
    }
}

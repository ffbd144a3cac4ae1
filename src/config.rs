use crate::timer::TimerMode;

pub const DEFAULT_CYCLES_PER_SECOND: u32 = 700;
pub const DEFAULT_SCALE: usize = 16;

#[derive(Debug, Clone)]
pub struct Config {
    /// Steps per wall-clock second requested from the host loop.
    pub cycles_per_second: u32,
    pub timer_mode: TimerMode,
    /// Fixed RNG seed for reproducible runs; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycles_per_second: DEFAULT_CYCLES_PER_SECOND,
            timer_mode: TimerMode::default(),
            seed: None,
        }
    }
}

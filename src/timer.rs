use std::fmt;
use std::str::FromStr;

pub const TIMER_DEC_PER_SECOND: u64 = 60;

/// Who drives the 60 Hz delay/sound countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimerMode {
    /// One decrement per executed step, whatever the step rate.
    #[default]
    PerStep,
    /// Steps never decrement; the host calls `Emulator::tick_timers` at
    /// `TIMER_DEC_PER_SECOND`.
    Host,
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "step" => Ok(Self::PerStep),
            "host" => Ok(Self::Host),
            other => Err(format!("unknown timer mode '{other}' (expected step or host)")),
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerStep => write!(f, "step"),
            Self::Host => write!(f, "host"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn get(&self) -> u8 {
        self.count
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }

    /// Counts down by one, stopping at zero. Returns whether it moved.
    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }
}

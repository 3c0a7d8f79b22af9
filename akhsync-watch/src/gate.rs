//! Cool-down gate with a single-slot dirty flag.
//!
//! ```text
//!            event                 run finished            deadline, clean
//!   Idle ─────────────▶ Running ─────────────────▶ Cooling ───────────────▶ Idle
//!                          ▲                          │
//!                          └──────────────────────────┘
//!                                deadline, dirty
//! ```
//!
//! Events that arrive while running or cooling only set the dirty flag, so
//! any number of them collapse into exactly one follow-up run.

use std::time::Duration;

use tokio::time::Instant;

/// Quiet period after every run.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Running,
    Cooling { until: Instant },
}

#[derive(Debug)]
pub struct CooldownGate {
    cooldown: Duration,
    state: GateState,
    dirty: bool,
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl CooldownGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            state: GateState::Idle,
            dirty: false,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// A change was observed. Returns `true` if a run should start now.
    pub fn on_event(&mut self, now: Instant) -> bool {
        match self.state {
            GateState::Idle => {
                self.state = GateState::Running;
                true
            }
            GateState::Cooling { until } if now >= until => {
                self.dirty = false;
                self.state = GateState::Running;
                true
            }
            GateState::Running | GateState::Cooling { .. } => {
                self.dirty = true;
                false
            }
        }
    }

    /// The current run ended (successfully or not).
    pub fn on_run_finished(&mut self, now: Instant) {
        self.state = GateState::Cooling {
            until: now + self.cooldown,
        };
    }

    /// When the cool-down ends, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            GateState::Cooling { until } => Some(until),
            _ => None,
        }
    }

    /// The cool-down deadline passed. Returns `true` if a deferred change
    /// needs a run.
    pub fn on_deadline(&mut self, now: Instant) -> bool {
        match self.state {
            GateState::Cooling { until } if now >= until => {
                if std::mem::take(&mut self.dirty) {
                    self.state = GateState::Running;
                    true
                } else {
                    self.state = GateState::Idle;
                    false
                }
            }
            _ => false,
        }
    }
}

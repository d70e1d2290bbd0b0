//! Continuous duration tracking

use serde::Serialize;

/// Tolerance for repeated floating-point accumulation of frame intervals
const TIME_EPSILON: f64 = 1e-9;

/// Timer state.
///
/// Invariant: `accumulated` is 0.0 whenever `active` is false.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TimerState {
    /// Currently accumulating
    pub active: bool,
    /// Accumulated qualifying duration (seconds)
    pub accumulated: f64,
}

/// Two-state duration accumulator for a qualifying condition.
///
/// Idle until the condition first holds; each qualifying step adds the
/// caller-supplied `dt`, starting with the step that activates it. Any
/// non-qualifying step resets to idle immediately - there is no latch:
/// once the condition breaks, the accumulated duration drops to zero
/// even if it had exceeded the threshold.
#[derive(Debug, Clone)]
pub struct ContinuousTimer {
    threshold: f64,
    state: TimerState,
}

impl ContinuousTimer {
    /// Create a timer with the given threshold (seconds)
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            state: TimerState::default(),
        }
    }

    /// Advance one step.
    ///
    /// Returns the accumulated duration after the update. Non-finite or
    /// negative `dt` contributes zero elapsed time.
    pub fn step(&mut self, qualifying: bool, dt: f64) -> f64 {
        if qualifying {
            let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
            if self.state.active {
                self.state.accumulated += dt;
            } else {
                // The condition has already held for one frame interval
                self.state.active = true;
                self.state.accumulated = dt;
            }
        } else {
            self.state.active = false;
            self.state.accumulated = 0.0;
        }
        self.state.accumulated
    }

    /// Whether the accumulated duration has reached the threshold
    pub fn threshold_met(&self) -> bool {
        self.state.accumulated >= self.threshold - TIME_EPSILON
    }

    /// Current accumulated duration (seconds)
    pub fn duration(&self) -> f64 {
        self.state.accumulated
    }

    /// Seconds left until the threshold, saturating at zero
    pub fn remaining(&self) -> f64 {
        (self.threshold - self.state.accumulated).max(0.0)
    }

    /// Whether the timer is accumulating
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Current state
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Return to idle with zero accumulated duration
    pub fn reset(&mut self) {
        self.state = TimerState::default();
    }
}

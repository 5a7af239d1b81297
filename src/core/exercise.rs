//! Exercise engine: breathing state machine driven by a single tick
//!
//! State transitions:
//! - IDLE → RUNNING: Start(technique), stage 0, breath count 0
//! - RUNNING → PAUSED: Pause (ticks are ignored while paused)
//! - PAUSED → RUNNING: Resume
//! - RUNNING/PAUSED → IDLE: Stop (run state dropped)
//!
//! Each Tick carries the elapsed time; stage boundaries are derived from
//! accumulated time, so a long tick may cross several stages.

use std::time::Duration;

use crate::types::{ExerciseEvent, ExerciseFrame, ExerciseRunState, ExerciseStatus};

/// Move to the next stage, wrapping to 0 and counting a breath on wrap
pub fn advance_stage(mut state: ExerciseRunState) -> ExerciseRunState {
    let count = state.definition().stage_count();
    state.stage_index = (state.stage_index + 1) % count;
    if state.stage_index == 0 {
        state.breath_count = state.breath_count.saturating_add(1);
    }
    state
}

/// Apply elapsed time to a running state
fn apply_tick(mut state: ExerciseRunState, dt: Duration) -> ExerciseRunState {
    if state.paused {
        return state;
    }
    let ms = u64::try_from(dt.as_millis()).unwrap_or(u64::MAX);
    state.elapsed_ms = state.elapsed_ms.saturating_add(ms);
    state.stage_elapsed_ms = state.stage_elapsed_ms.saturating_add(ms);

    // A whole cycle from any stage lands back on it with one more breath
    let cycle_ms = state.definition().cycle_secs() * 1000;
    if state.stage_elapsed_ms >= cycle_ms {
        let whole = state.stage_elapsed_ms / cycle_ms;
        let breaths = u32::try_from(whole).unwrap_or(u32::MAX);
        state.breath_count = state.breath_count.saturating_add(breaths);
        state.stage_elapsed_ms %= cycle_ms;
    }

    loop {
        let stage_ms = state.current_stage().duration_ms();
        if state.stage_elapsed_ms < stage_ms {
            break;
        }
        state.stage_elapsed_ms -= stage_ms;
        state = advance_stage(state);
    }
    state
}

/// Pure transition function: current state + event → next state.
/// `None` is the IDLE state.
pub fn transition(state: Option<ExerciseRunState>, event: ExerciseEvent) -> Option<ExerciseRunState> {
    match (state, event) {
        (_, ExerciseEvent::Start(technique)) => Some(ExerciseRunState::start(technique)),
        (_, ExerciseEvent::Stop) => None,
        (None, _) => None,
        (Some(mut s), ExerciseEvent::Pause) => {
            s.paused = true;
            Some(s)
        }
        (Some(mut s), ExerciseEvent::Resume) => {
            s.paused = false;
            Some(s)
        }
        (Some(s), ExerciseEvent::Tick(dt)) => Some(apply_tick(s, dt)),
    }
}

/// Exercise state machine holder
#[derive(Debug, Default)]
pub struct ExerciseEngine {
    state: Option<ExerciseRunState>,
    /// Number of events handled
    event_count: u64,
}

impl ExerciseEngine {
    /// Create new engine (IDLE)
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event; returns the frame to display, or `None` when idle
    pub fn handle(&mut self, event: ExerciseEvent) -> Option<ExerciseFrame> {
        self.event_count += 1;
        let before = self.status();
        self.state = transition(self.state.take(), event);
        let after = self.status();
        if before != after {
            tracing::debug!(from = %before, to = %after, "exercise status changed");
        }
        self.frame()
    }

    /// Frame for the current state without changing it
    pub fn frame(&self) -> Option<ExerciseFrame> {
        self.state.as_ref().map(ExerciseFrame::from_state)
    }

    /// Current status
    pub fn status(&self) -> ExerciseStatus {
        self.state
            .as_ref()
            .map(|s| s.status())
            .unwrap_or(ExerciseStatus::Idle)
    }

    /// Current run state, if any
    pub fn state(&self) -> Option<&ExerciseRunState> {
        self.state.as_ref()
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Reset engine to IDLE
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// =============================================================================
// TESTS
// =============================================================================

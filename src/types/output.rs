//! Output structures for terminal display

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::{ExerciseRunState, ExerciseStatus, Technique, VisualAction};

/// One repaint of the breathing exercise display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseFrame {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    pub technique: Technique,
    pub status: ExerciseStatus,
    /// Stage prompt ("Breathe In", ...)
    pub instruction: String,
    /// Seconds left in the current stage
    pub countdown: u64,
    pub action: VisualAction,
    pub stage_index: usize,
    pub breath_count: u32,
    pub elapsed_secs: u64,
}

impl ExerciseFrame {
    /// Build a frame from the current run state
    pub fn from_state(state: &ExerciseRunState) -> Self {
        let stage = state.current_stage();
        Self {
            timestamp: Utc::now(),
            technique: state.technique,
            status: state.status(),
            instruction: stage.prompt.to_string(),
            countdown: state.countdown_secs(),
            action: stage.action,
            stage_index: state.stage_index,
            breath_count: state.breath_count,
            elapsed_secs: state.elapsed_ms / 1000,
        }
    }

    /// Elapsed time as MM:SS
    pub fn elapsed_display(&self) -> String {
        format_mm_ss(self.elapsed_secs)
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let line = format!(
            "{} {:<24} {:>2}s | breaths={} | time={}",
            self.action.glyph(),
            self.instruction,
            self.countdown,
            self.breath_count,
            self.elapsed_display()
        );
        match (self.status, self.action) {
            (ExerciseStatus::Paused, _) => format!("{} (paused)", line).dimmed().to_string(),
            (_, VisualAction::Expand) => line.cyan().to_string(),
            (_, VisualAction::Hold) => line.yellow().to_string(),
            (_, VisualAction::Contract) => line.green().to_string(),
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "stage={} | instruction={} | countdown={} | breaths={} | time={} | status={}",
            self.stage_index,
            self.instruction,
            self.countdown,
            self.breath_count,
            self.elapsed_display(),
            self.status
        )
    }
}

/// Format seconds as zero-padded MM:SS
pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_ss() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(75), "01:15");
        assert_eq!(format_mm_ss(3600), "60:00");
    }

    #[test]
    fn test_frame_from_fresh_state() {
        let state = ExerciseRunState::start(Technique::FourSevenEight);
        let frame = ExerciseFrame::from_state(&state);
        assert_eq!(frame.instruction, "Breathe In Through Nose");
        assert_eq!(frame.countdown, 4);
        assert_eq!(frame.action, VisualAction::Expand);
        assert_eq!(frame.status, ExerciseStatus::Running);
    }

    #[test]
    fn test_parseable_output_format() {
        let mut state = ExerciseRunState::start(Technique::Box);
        state.elapsed_ms = 65_000;
        let formatted = ExerciseFrame::from_state(&state).to_parseable_string();
        assert!(formatted.contains("instruction=Breathe In"));
        assert!(formatted.contains("time=01:05"));
        assert!(formatted.contains("status=RUNNING"));
    }
}

//! Breathing exercise definitions and run state
//!
//! Stage durations and texts are fixed data, selected by technique.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::CompanionError;

/// What the breathing circle does during a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualAction {
    Expand,
    Hold,
    Contract,
}

impl VisualAction {
    /// Glyph for terminal display
    pub fn glyph(&self) -> &'static str {
        match self {
            VisualAction::Expand => "◯→⬤",
            VisualAction::Hold => "⬤",
            VisualAction::Contract => "⬤→◯",
        }
    }
}

/// One timed phase of a breathing exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    pub prompt: &'static str,
    pub duration_secs: u64,
    pub action: VisualAction,
}

impl Stage {
    const fn new(prompt: &'static str, duration_secs: u64, action: VisualAction) -> Self {
        Self {
            prompt,
            duration_secs,
            action,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_secs * 1000
    }
}

/// Breathing technique identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technique {
    /// 4-7-8: inhale 4, hold 7, exhale 8
    #[serde(rename = "478")]
    FourSevenEight,
    /// Box: 4/4/4/4
    #[serde(rename = "box")]
    Box,
    /// Coherent: 5/5
    #[serde(rename = "coherent")]
    Coherent,
}

impl Technique {
    pub const ALL: [Technique; 3] = [Technique::FourSevenEight, Technique::Box, Technique::Coherent];

    /// Identifier used on the command line and in persisted data
    pub fn id(&self) -> &'static str {
        match self {
            Technique::FourSevenEight => "478",
            Technique::Box => "box",
            Technique::Coherent => "coherent",
        }
    }

    /// The fixed definition for this technique
    pub fn definition(&self) -> &'static ExerciseDefinition {
        match self {
            Technique::FourSevenEight => &FOUR_SEVEN_EIGHT,
            Technique::Box => &BOX,
            Technique::Coherent => &COHERENT,
        }
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.definition().name)
    }
}

impl FromStr for Technique {
    type Err = CompanionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "478" | "4-7-8" => Ok(Technique::FourSevenEight),
            "box" => Ok(Technique::Box),
            "coherent" => Ok(Technique::Coherent),
            other => Err(CompanionError::unknown("technique", other)),
        }
    }
}

/// Ordered, immutable sequence of stages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseDefinition {
    pub technique: Technique,
    pub name: &'static str,
    pub stages: Vec<Stage>,
}

impl ExerciseDefinition {
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Length of one full breath cycle
    pub fn cycle_secs(&self) -> u64 {
        self.stages.iter().map(|s| s.duration_secs).sum()
    }
}

lazy_static! {
    static ref FOUR_SEVEN_EIGHT: ExerciseDefinition = ExerciseDefinition {
        technique: Technique::FourSevenEight,
        name: "4-7-8 Breathing",
        stages: vec![
            Stage::new("Breathe In Through Nose", 4, VisualAction::Expand),
            Stage::new("Hold Breath", 7, VisualAction::Hold),
            Stage::new("Exhale Through Mouth", 8, VisualAction::Contract),
        ],
    };

    static ref BOX: ExerciseDefinition = ExerciseDefinition {
        technique: Technique::Box,
        name: "Box Breathing",
        stages: vec![
            Stage::new("Breathe In", 4, VisualAction::Expand),
            Stage::new("Hold Breath", 4, VisualAction::Hold),
            Stage::new("Exhale Slowly", 4, VisualAction::Contract),
            Stage::new("Hold Empty", 4, VisualAction::Hold),
        ],
    };

    static ref COHERENT: ExerciseDefinition = ExerciseDefinition {
        technique: Technique::Coherent,
        name: "Coherent Breathing",
        stages: vec![
            Stage::new("Breathe In", 5, VisualAction::Expand),
            Stage::new("Exhale Slowly", 5, VisualAction::Contract),
        ],
    };
}

/// Exercise lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExerciseStatus {
    Idle,
    Running,
    Paused,
}

impl std::fmt::Display for ExerciseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExerciseStatus::Idle => "IDLE",
            ExerciseStatus::Running => "RUNNING",
            ExerciseStatus::Paused => "PAUSED",
        };
        write!(f, "{}", name)
    }
}

/// State of one running (or paused) exercise instance.
///
/// Invariant: `stage_index < definition().stage_count()` and
/// `stage_elapsed_ms < current_stage().duration_ms()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseRunState {
    pub technique: Technique,
    pub stage_index: usize,
    pub paused: bool,
    pub breath_count: u32,
    /// Total running time (excludes paused time)
    pub elapsed_ms: u64,
    /// Time spent in the current stage
    pub stage_elapsed_ms: u64,
}

impl ExerciseRunState {
    /// Fresh run at stage 0
    pub fn start(technique: Technique) -> Self {
        Self {
            technique,
            stage_index: 0,
            paused: false,
            breath_count: 0,
            elapsed_ms: 0,
            stage_elapsed_ms: 0,
        }
    }

    pub fn definition(&self) -> &'static ExerciseDefinition {
        self.technique.definition()
    }

    pub fn current_stage(&self) -> &'static Stage {
        &self.definition().stages[self.stage_index]
    }

    /// Whole seconds left in the current stage, rounded up
    pub fn countdown_secs(&self) -> u64 {
        let left = self
            .current_stage()
            .duration_ms()
            .saturating_sub(self.stage_elapsed_ms);
        left.div_ceil(1000)
    }

    pub fn status(&self) -> ExerciseStatus {
        if self.paused {
            ExerciseStatus::Paused
        } else {
            ExerciseStatus::Running
        }
    }
}

/// Inputs to the exercise state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExerciseEvent {
    Start(Technique),
    Pause,
    Resume,
    Stop,
    /// Time elapsed since the previous tick
    Tick(std::time::Duration),
}

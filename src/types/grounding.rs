//! Grounding (5-4-3-2-1) and guided practice types

use serde::{Deserialize, Serialize};

/// One sense-category prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroundingStep {
    pub sense: &'static str,
    pub prompt: &'static str,
    /// Items the user must supply before moving on
    pub required: usize,
}

/// The five fixed grounding steps
pub const GROUNDING_STEPS: [GroundingStep; 5] = [
    GroundingStep { sense: "see", prompt: "Name 5 things you can see around you", required: 5 },
    GroundingStep { sense: "touch", prompt: "Identify 4 things you can touch", required: 4 },
    GroundingStep { sense: "hear", prompt: "Notice 3 things you can hear", required: 3 },
    GroundingStep { sense: "smell", prompt: "Find 2 things you can smell", required: 2 },
    GroundingStep { sense: "taste", prompt: "Name 1 thing you can taste", required: 1 },
];

/// Progress through the grounding steps
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroundingRunState {
    pub step_index: usize,
    pub collected: Vec<String>,
}

/// What the grounding display shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum GroundingView {
    Step {
        /// 1-based step number
        number: usize,
        total: usize,
        sense: &'static str,
        prompt: &'static str,
        required: usize,
        collected: Vec<String>,
        /// Input affordance visible (count not yet met)
        can_add: bool,
        /// "next" action visible (count met)
        can_advance: bool,
    },
    Complete,
}

/// Linear guided practice progress (coping strategies)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "step", rename_all = "snake_case")]
pub enum PracticePhase {
    /// Steps listed, not yet started
    NotStarted,
    /// Index of the active step
    Active(usize),
    Complete,
}

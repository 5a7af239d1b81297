//! 5-4-3-2-1 grounding flow and the linear practice runner
//!
//! Grounding transitions:
//! - add_item: only while the current step's count is not met
//! - next: only once the count is met; clears collected items
//! - after the last step: Complete, no further transitions

use crate::types::{
    CopingStrategy, GroundingRunState, GroundingStep, GroundingView, PracticePhase, GROUNDING_STEPS,
};
use crate::CompanionError;

/// Grounding exercise state machine
#[derive(Debug, Clone, Default)]
pub struct GroundingEngine {
    state: GroundingRunState,
}

impl GroundingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_step(&self) -> Option<&'static GroundingStep> {
        GROUNDING_STEPS.get(self.state.step_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_step().is_none()
    }

    /// Record one item for the current step
    pub fn add_item(&mut self, item: &str) -> Result<GroundingView, CompanionError> {
        let item = item.trim();
        if item.is_empty() {
            return Err(CompanionError::InvalidAction("empty grounding item".into()));
        }
        let step = self
            .current_step()
            .ok_or_else(|| CompanionError::InvalidAction("grounding already complete".into()))?;
        if self.state.collected.len() >= step.required {
            return Err(CompanionError::InvalidAction(format!(
                "already have {} things you can {}",
                step.required, step.sense
            )));
        }
        self.state.collected.push(item.to_string());
        Ok(self.view())
    }

    /// Advance to the next step once the current count is met
    pub fn next(&mut self) -> Result<GroundingView, CompanionError> {
        let step = self
            .current_step()
            .ok_or_else(|| CompanionError::InvalidAction("grounding already complete".into()))?;
        if self.state.collected.len() < step.required {
            return Err(CompanionError::InvalidAction(format!(
                "{} of {} items collected",
                self.state.collected.len(),
                step.required
            )));
        }
        self.state.step_index += 1;
        self.state.collected.clear();
        tracing::debug!(step = self.state.step_index, "grounding step advanced");
        Ok(self.view())
    }

    /// Current display
    pub fn view(&self) -> GroundingView {
        match self.current_step() {
            None => GroundingView::Complete,
            Some(step) => {
                let count = self.state.collected.len();
                GroundingView::Step {
                    number: self.state.step_index + 1,
                    total: GROUNDING_STEPS.len(),
                    sense: step.sense,
                    prompt: step.prompt,
                    required: step.required,
                    collected: self.state.collected.clone(),
                    can_add: count < step.required,
                    can_advance: count >= step.required,
                }
            }
        }
    }

    pub fn state(&self) -> &GroundingRunState {
        &self.state
    }
}

/// Walks the steps of a coping strategy one at a time
#[derive(Debug, Clone)]
pub struct Practice {
    strategy: &'static CopingStrategy,
    phase: PracticePhase,
}

impl Practice {
    pub fn new(strategy: &'static CopingStrategy) -> Self {
        Self {
            strategy,
            phase: PracticePhase::NotStarted,
        }
    }

    pub fn strategy(&self) -> &'static CopingStrategy {
        self.strategy
    }

    pub fn phase(&self) -> PracticePhase {
        self.phase
    }

    /// Begin at step 0 (restarts a finished practice)
    pub fn start(&mut self) -> PracticePhase {
        self.phase = if self.strategy.steps.is_empty() {
            PracticePhase::Complete
        } else {
            PracticePhase::Active(0)
        };
        self.phase
    }

    /// Advance one step; past the last step the practice completes
    pub fn next(&mut self) -> Result<PracticePhase, CompanionError> {
        self.phase = match self.phase {
            PracticePhase::NotStarted => {
                return Err(CompanionError::InvalidAction("practice not started".into()))
            }
            PracticePhase::Complete => {
                return Err(CompanionError::InvalidAction("practice already complete".into()))
            }
            PracticePhase::Active(i) if i + 1 < self.strategy.steps.len() => PracticePhase::Active(i + 1),
            PracticePhase::Active(_) => PracticePhase::Complete,
        };
        Ok(self.phase)
    }

    /// Text of the active step
    pub fn current_step(&self) -> Option<&'static str> {
        match self.phase {
            PracticePhase::Active(i) => self.strategy.steps.get(i).copied(),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == PracticePhase::Complete
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StrategyKind;

    fn fill(engine: &mut GroundingEngine, n: usize) {
        for i in 0..n {
            engine.add_item(&format!("item {}", i)).unwrap();
        }
    }

    #[test]
    fn test_first_step_shows_input() {
        let engine = GroundingEngine::new();
        match engine.view() {
            GroundingView::Step { number, sense, can_add, can_advance, .. } => {
                assert_eq!(number, 1);
                assert_eq!(sense, "see");
                assert!(can_add);
                assert!(!can_advance);
            }
            GroundingView::Complete => panic!("expected step view"),
        }
    }

    #[test]
    fn test_count_met_exposes_next_not_input() {
        let mut engine = GroundingEngine::new();
        fill(&mut engine, 5);
        match engine.view() {
            GroundingView::Step { collected, can_add, can_advance, .. } => {
                assert_eq!(collected.len(), 5);
                assert!(!can_add);
                assert!(can_advance);
            }
            GroundingView::Complete => panic!("expected step view"),
        }
        assert!(engine.add_item("one too many").is_err());
    }

    #[test]
    fn test_next_requires_count() {
        let mut engine = GroundingEngine::new();
        fill(&mut engine, 4);
        assert!(engine.next().is_err());
        engine.add_item("lamp").unwrap();
        engine.next().unwrap();
        assert_eq!(engine.state().step_index, 1);
        assert!(engine.state().collected.is_empty());
    }

    #[test]
    fn test_blank_item_rejected() {
        let mut engine = GroundingEngine::new();
        assert!(engine.add_item("   ").is_err());
        assert!(engine.state().collected.is_empty());
    }

    #[test]
    fn test_full_run_completes() {
        let mut engine = GroundingEngine::new();
        for step in GROUNDING_STEPS.iter() {
            fill(&mut engine, step.required);
            engine.next().unwrap();
        }
        assert!(engine.is_complete());
        assert_eq!(engine.view(), GroundingView::Complete);
        assert!(engine.next().is_err());
        assert!(engine.add_item("x").is_err());
    }

    static STRATEGY: CopingStrategy = CopingStrategy {
        title: "Test",
        kind: StrategyKind::Immediate,
        steps: &["one", "two"],
        duration: "1 minute",
    };

    #[test]
    fn test_practice_linear() {
        let mut practice = Practice::new(&STRATEGY);
        assert!(practice.next().is_err());
        assert_eq!(practice.start(), PracticePhase::Active(0));
        assert_eq!(practice.current_step(), Some("one"));
        assert_eq!(practice.next().unwrap(), PracticePhase::Active(1));
        assert_eq!(practice.next().unwrap(), PracticePhase::Complete);
        assert!(practice.is_complete());
        assert!(practice.next().is_err());
    }
}

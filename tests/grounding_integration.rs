//! Integration tests for grounding and guided practices

use aurora::core::resources::{find_strategy, strategies};
use aurora::core::{GroundingEngine, Practice};
use aurora::types::{GroundingView, PracticePhase, StrategyKind, GROUNDING_STEPS};
use aurora::CompanionError;
use pretty_assertions::assert_eq;

#[test]
fn test_full_grounding_walkthrough() {
    let mut engine = GroundingEngine::new();
    for (i, step) in GROUNDING_STEPS.iter().enumerate() {
        for n in 0..step.required {
            let view = engine.add_item(&format!("{} item {}", step.sense, n)).unwrap();
            if let GroundingView::Step { number, can_add, can_advance, .. } = view {
                assert_eq!(number, i + 1);
                assert_eq!(can_add, n + 1 < step.required);
                assert_eq!(can_advance, n + 1 == step.required);
            } else {
                panic!("grounding finished early");
            }
        }
        engine.next().unwrap();
    }
    assert!(engine.is_complete());
    assert_eq!(engine.view(), GroundingView::Complete);
}

#[test]
fn test_grounding_guards() {
    let mut engine = GroundingEngine::new();
    assert!(matches!(engine.next(), Err(CompanionError::InvalidAction(_))));
    assert!(engine.add_item("   ").is_err());

    for item in ["lamp", "window", "desk", "plant", "mug"] {
        engine.add_item(item).unwrap();
    }
    // sixth item refused, count stays at five
    assert!(engine.add_item("door").is_err());
    assert_eq!(engine.state().collected.len(), 5);

    engine.next().unwrap();
    assert!(engine.state().collected.is_empty());
    assert_eq!(engine.state().step_index, 1);
}

#[test]
fn test_completed_grounding_rejects_input() {
    let mut engine = GroundingEngine::new();
    for step in GROUNDING_STEPS.iter() {
        for _ in 0..step.required {
            engine.add_item("x").unwrap();
        }
        engine.next().unwrap();
    }
    assert!(engine.add_item("late").is_err());
    assert!(engine.next().is_err());
}

#[test]
fn test_practice_each_strategy() {
    for kind in [StrategyKind::Immediate, StrategyKind::Daily] {
        for strategy in strategies(kind) {
            let mut practice = Practice::new(strategy);
            assert!(practice.next().is_err());
            assert_eq!(practice.start(), PracticePhase::Active(0));
            assert_eq!(practice.current_step(), Some(strategy.steps[0]));

            for _ in 1..strategy.steps.len() {
                practice.next().unwrap();
            }
            assert_eq!(
                practice.phase(),
                PracticePhase::Active(strategy.steps.len() - 1)
            );
            assert_eq!(practice.next().unwrap(), PracticePhase::Complete);
            assert!(practice.is_complete());
            assert!(practice.current_step().is_none());
        }
    }
}

#[test]
fn test_practice_restart() {
    let strategy = find_strategy("Gratitude Journaling").unwrap();
    let mut practice = Practice::new(strategy);
    practice.start();
    while !practice.is_complete() {
        practice.next().unwrap();
    }
    assert_eq!(practice.start(), PracticePhase::Active(0));
}

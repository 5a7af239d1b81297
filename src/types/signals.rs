//! Score structures for the emotion classifier

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::EmotionLabel;

/// Keyword scores per emotion, in enumeration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionScores {
    pub scores: Vec<(EmotionLabel, u32)>,
}

impl EmotionScores {
    /// Create zero scores
    pub fn zero() -> Self {
        Self {
            scores: EmotionLabel::ALL.iter().map(|e| (*e, 0)).collect(),
        }
    }

    /// Score for one label
    pub fn get(&self, label: EmotionLabel) -> u32 {
        self.scores
            .iter()
            .find(|(e, _)| *e == label)
            .map(|(_, s)| *s)
            .unwrap_or(0)
    }

    /// True when nothing matched
    pub fn is_empty(&self) -> bool {
        self.scores.iter().all(|(_, s)| *s == 0)
    }

    /// Label with the strictly highest score; ties keep the first
    /// in enumeration order. `None` when all scores are zero.
    pub fn best(&self) -> Option<EmotionLabel> {
        let mut best: Option<(EmotionLabel, u32)> = None;
        for (label, score) in &self.scores {
            if *score == 0 {
                continue;
            }
            match best {
                Some((_, top)) if *score <= top => {}
                _ => best = Some((*label, *score)),
            }
        }
        best.map(|(label, _)| label)
    }
}

/// Classifier result with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionReading {
    /// Chosen label (prior label when nothing matched)
    pub label: EmotionLabel,
    /// Did the text change the label source (any keyword matched)?
    pub matched: bool,
    pub scores: EmotionScores,
    /// When this was computed
    pub timestamp: DateTime<Utc>,
    /// Word count of input
    pub word_count: usize,
}

impl EmotionReading {
    pub fn new(label: EmotionLabel, matched: bool, scores: EmotionScores, word_count: usize) -> Self {
        Self {
            label,
            matched,
            scores,
            timestamp: Utc::now(),
            word_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_tie_keeps_first() {
        let mut scores = EmotionScores::zero();
        for (label, s) in scores.scores.iter_mut() {
            if matches!(label, EmotionLabel::Sad | EmotionLabel::Angry) {
                *s = 3;
            }
        }
        assert_eq!(scores.best(), Some(EmotionLabel::Sad));
    }

    #[test]
    fn test_zero_has_no_best() {
        let scores = EmotionScores::zero();
        assert!(scores.is_empty());
        assert_eq!(scores.best(), None);
    }
}

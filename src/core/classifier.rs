//! Emotion classifier: keyword scoring per emotion category
//!
//! Each keyword adds 2 for a whole-word match and 1 for a bare substring
//! match. A whole-word hit is also a substring hit, so it scores 3.
//! The strictly highest total wins; ties keep enumeration order.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{EmotionLabel, EmotionReading, EmotionScores};

/// Points for a keyword bounded by word boundaries
pub const WHOLE_WORD_POINTS: u32 = 2;

/// Points for a keyword appearing anywhere in the text
pub const SUBSTRING_POINTS: u32 = 1;

/// A keyword with its precompiled whole-word pattern
struct Keyword {
    word: &'static str,
    whole: Regex,
}

fn keywords(words: &[&'static str]) -> Vec<Keyword> {
    words
        .iter()
        .map(|w| Keyword {
            word: w,
            whole: Regex::new(&format!(r"(?i)\b{}\b", regex::escape(w)))
                .expect("keyword patterns are escaped literals"),
        })
        .collect()
}

lazy_static! {
    // =========================================================================
    // Keyword lists, one per label, in enumeration order
    // =========================================================================
    static ref LEXICON: Vec<(EmotionLabel, Vec<Keyword>)> = vec![
        (EmotionLabel::Happy, keywords(&[
            "happy", "joy", "joyful", "glad", "excited", "great", "wonderful",
            "amazing", "love", "grateful", "cheerful", "delighted", "fantastic",
            "awesome", "smile",
        ])),
        (EmotionLabel::Sad, keywords(&[
            "sad", "unhappy", "depressed", "lonely", "crying", "cry", "hopeless",
            "grief", "heartbroken", "miserable", "miss", "down", "empty",
        ])),
        (EmotionLabel::Angry, keywords(&[
            "angry", "furious", "annoyed", "frustrated", "hate", "irritated",
            "rage", "mad", "resent", "pissed",
        ])),
        (EmotionLabel::Anxious, keywords(&[
            "anxious", "anxiety", "worried", "worry", "nervous", "scared",
            "afraid", "panic", "stressed", "stress", "overwhelmed", "fear",
            "tense", "uneasy",
        ])),
        (EmotionLabel::Neutral, keywords(&[
            "okay", "fine", "alright", "normal", "meh", "whatever",
        ])),
        (EmotionLabel::Surprise, keywords(&[
            "surprised", "shocked", "wow", "unexpected", "amazed", "astonished",
            "suddenly",
        ])),
        (EmotionLabel::Disgust, keywords(&[
            "disgusted", "disgusting", "gross", "revolting", "nasty", "yuck",
            "sick of",
        ])),
    ];
}

/// Keyword-based emotion classifier
#[derive(Debug, Default, Clone, Copy)]
pub struct EmotionClassifier;

impl EmotionClassifier {
    /// Create new classifier
    pub fn new() -> Self {
        Self
    }

    /// Score text against every keyword list
    pub fn score(&self, text: &str) -> EmotionScores {
        let lower = text.to_lowercase();
        let scores = LEXICON
            .iter()
            .map(|(label, words)| {
                let total = words
                    .iter()
                    .map(|k| {
                        let mut points = 0;
                        if k.whole.is_match(&lower) {
                            points += WHOLE_WORD_POINTS;
                        }
                        if lower.contains(k.word) {
                            points += SUBSTRING_POINTS;
                        }
                        points
                    })
                    .sum();
                (*label, total)
            })
            .collect();
        EmotionScores { scores }
    }

    /// Classify text. When no keyword matches, `prior` is returned unchanged.
    pub fn classify(&self, text: &str, prior: EmotionLabel) -> EmotionReading {
        let text = text.trim();
        let word_count = text.split_whitespace().count();

        if text.is_empty() {
            return EmotionReading::new(prior, false, EmotionScores::zero(), 0);
        }

        let scores = self.score(text);
        match scores.best() {
            Some(label) => EmotionReading::new(label, true, scores, word_count),
            None => EmotionReading::new(prior, false, scores, word_count),
        }
    }

    /// Quick classify - just return the label
    pub fn quick_classify(&self, text: &str, prior: EmotionLabel) -> EmotionLabel {
        self.classify(text, prior).label
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Emotion labels

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::CompanionError;

/// The closed set of emotions the companion tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum EmotionLabel {
    Happy,
    Sad,
    Angry,
    Anxious,
    #[default]
    Neutral,
    Surprise,
    Disgust,
}

impl EmotionLabel {
    /// All labels in enumeration order (classifier tie-break order)
    pub const ALL: [EmotionLabel; 7] = [
        EmotionLabel::Happy,
        EmotionLabel::Sad,
        EmotionLabel::Angry,
        EmotionLabel::Anxious,
        EmotionLabel::Neutral,
        EmotionLabel::Surprise,
        EmotionLabel::Disgust,
    ];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "Happy",
            EmotionLabel::Sad => "Sad",
            EmotionLabel::Angry => "Angry",
            EmotionLabel::Anxious => "Anxious",
            EmotionLabel::Neutral => "Neutral",
            EmotionLabel::Surprise => "Surprise",
            EmotionLabel::Disgust => "Disgust",
        }
    }

    /// Get emoji for emotion
    pub fn icon(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "😊",
            EmotionLabel::Sad => "😢",
            EmotionLabel::Angry => "😠",
            EmotionLabel::Anxious => "😰",
            EmotionLabel::Neutral => "😐",
            EmotionLabel::Surprise => "😲",
            EmotionLabel::Disgust => "🤢",
        }
    }

    /// Value plotted on the emotion trend chart (0-100)
    pub fn chart_value(&self) -> u8 {
        match self {
            EmotionLabel::Happy => 90,
            EmotionLabel::Surprise => 70,
            EmotionLabel::Neutral => 50,
            EmotionLabel::Anxious => 40,
            EmotionLabel::Sad => 30,
            EmotionLabel::Disgust => 25,
            EmotionLabel::Angry => 20,
        }
    }

    /// Terminal color name for `colored`
    pub fn color(&self) -> colored::Color {
        use colored::Color;
        match self {
            EmotionLabel::Happy => Color::Green,
            EmotionLabel::Sad => Color::Blue,
            EmotionLabel::Angry => Color::Red,
            EmotionLabel::Anxious => Color::Yellow,
            EmotionLabel::Neutral => Color::White,
            EmotionLabel::Surprise => Color::Magenta,
            EmotionLabel::Disgust => Color::Cyan,
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EmotionLabel {
    type Err = CompanionError;

    /// Case-insensitive parse of a label name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EmotionLabel::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CompanionError::unknown("emotion", wanted))
    }
}

/// Remote peers may send lowercase or unknown labels; those decode to Neutral
impl<'de> Deserialize<'de> for EmotionLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|_| {
            tracing::debug!(label = %raw, "unknown emotion label, using Neutral");
            EmotionLabel::Neutral
        }))
    }
}

//! Emotion display state: recent-history ring and trend points

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::VecDeque;

use crate::types::EmotionLabel;
use crate::{EMOTION_HISTORY_LEN, EMOTION_TREND_LEN};

/// One history entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionEntry {
    pub label: EmotionLabel,
    pub at: DateTime<Utc>,
}

impl EmotionEntry {
    /// "Just now", "5m ago", "2h ago", "3d ago"
    pub fn relative_time(&self, now: DateTime<Utc>) -> String {
        format_relative(now - self.at)
    }
}

/// Relative time label for an age
pub fn format_relative(age: Duration) -> String {
    let minutes = age.num_minutes();
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (60 * 24))
    }
}

/// Most recent emotions, newest first
#[derive(Debug, Clone, Default)]
pub struct EmotionHistory {
    entries: VecDeque<EmotionEntry>,
}

impl EmotionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: EmotionLabel) {
        self.record_at(label, Utc::now());
    }

    pub fn record_at(&mut self, label: EmotionLabel, at: DateTime<Utc>) {
        self.entries.push_front(EmotionEntry { label, at });
        self.entries.truncate(EMOTION_HISTORY_LEN);
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &EmotionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One display line per entry
    pub fn render(&self, now: DateTime<Utc>) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("{} {} · {}", e.label.icon(), e.label, e.relative_time(now)))
            .collect()
    }
}

/// Chart points for the trend display, oldest first
#[derive(Debug, Clone, Default)]
pub struct EmotionTrend {
    points: VecDeque<(DateTime<Utc>, u8)>,
}

impl EmotionTrend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: EmotionLabel) {
        self.push_at(label, Utc::now());
    }

    pub fn push_at(&mut self, label: EmotionLabel, at: DateTime<Utc>) {
        self.points.push_back((at, label.chart_value()));
        while self.points.len() > EMOTION_TREND_LEN {
            self.points.pop_front();
        }
    }

    /// Chart values, oldest first
    pub fn values(&self) -> Vec<u8> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    /// (HH:MM label, value) pairs
    pub fn points(&self) -> Vec<(String, u8)> {
        self.points
            .iter()
            .map(|(at, v)| (at.format("%H:%M").to_string(), *v))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Single-line sparkline of the trend
    pub fn sparkline(&self) -> String {
        const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
        self.points
            .iter()
            .map(|(_, v)| BARS[((*v as usize) * (BARS.len() - 1)) / 100])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_keeps_five_newest_first() {
        let mut history = EmotionHistory::new();
        for label in EmotionLabel::ALL {
            history.record(label);
        }
        assert_eq!(history.len(), EMOTION_HISTORY_LEN);
        let labels: Vec<_> = history.entries().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                EmotionLabel::Disgust,
                EmotionLabel::Surprise,
                EmotionLabel::Neutral,
                EmotionLabel::Anxious,
                EmotionLabel::Angry,
            ]
        );
    }

    #[test]
    fn test_relative_time() {
        assert_eq!(format_relative(Duration::seconds(20)), "Just now");
        assert_eq!(format_relative(Duration::minutes(5)), "5m ago");
        assert_eq!(format_relative(Duration::minutes(125)), "2h ago");
        assert_eq!(format_relative(Duration::hours(50)), "2d ago");
    }

    #[test]
    fn test_trend_capped_at_ten() {
        let mut trend = EmotionTrend::new();
        for _ in 0..12 {
            trend.push(EmotionLabel::Sad);
        }
        trend.push(EmotionLabel::Happy);
        assert_eq!(trend.len(), EMOTION_TREND_LEN);
        assert_eq!(trend.values().last(), Some(&90));
        assert_eq!(trend.values()[0], 30);
    }

    #[test]
    fn test_sparkline_length_matches_points() {
        let mut trend = EmotionTrend::new();
        trend.push(EmotionLabel::Angry);
        trend.push(EmotionLabel::Happy);
        assert_eq!(trend.sparkline().chars().count(), 2);
    }
}

//! Static wellness content types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A link to music or video content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaResource {
    pub title: &'static str,
    pub url: &'static str,
    /// "music", "guided", "educational", "inspirational"
    pub kind: &'static str,
    pub duration: &'static str,
    pub description: &'static str,
}

/// When a coping strategy is meant to be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Immediate,
    Daily,
}

/// A step-by-step coping strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopingStrategy {
    pub title: &'static str,
    pub kind: StrategyKind,
    pub steps: &'static [&'static str],
    pub duration: &'static str,
}

/// A category of communication tips
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TipCategory {
    pub category: &'static str,
    pub tips: &'static [&'static str],
}

/// A plain-text breathing guide (shown without the animated exercise)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreathingGuide {
    pub title: &'static str,
    pub steps: &'static [&'static str],
}

/// Tabs of the resources view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceTab {
    #[default]
    Breathing,
    Media,
    Coping,
    Communication,
}

impl ResourceTab {
    pub const ALL: [ResourceTab; 4] = [
        ResourceTab::Breathing,
        ResourceTab::Media,
        ResourceTab::Coping,
        ResourceTab::Communication,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ResourceTab::Breathing => "breathing",
            ResourceTab::Media => "media",
            ResourceTab::Coping => "coping",
            ResourceTab::Communication => "communication",
        }
    }
}

impl std::str::FromStr for ResourceTab {
    type Err = crate::CompanionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ResourceTab::ALL
            .iter()
            .copied()
            .find(|t| t.id() == wanted)
            .ok_or_else(|| crate::CompanionError::unknown("tab", wanted))
    }
}

/// Persisted resource preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePrefs {
    pub last_tab: ResourceTab,
    pub timestamp: DateTime<Utc>,
}

/// One resource usage log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub tab: ResourceTab,
}

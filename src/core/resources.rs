//! Wellness resources: static catalog, tab preference and usage log

use chrono::Utc;

use crate::core::cache::{LocalCache, KEY_RESOURCE_PREFS, KEY_RESOURCE_USAGE};
use crate::types::{
    BreathingGuide, CopingStrategy, MediaResource, ResourcePrefs, ResourceTab, ResourceUsage,
    StrategyKind, Technique, TipCategory,
};
use crate::{CompanionError, RESOURCE_USAGE_CAP};

// =============================================================================
// CATALOG
// =============================================================================

/// Relaxation music and guided meditation
pub static MUSIC: [MediaResource; 3] = [
    MediaResource {
        title: "Deep Space Meditation",
        url: "https://www.youtube.com/watch?v=example1",
        kind: "music",
        duration: "30 min",
        description: "Ambient space sounds for deep relaxation",
    },
    MediaResource {
        title: "Saturn Rings Symphony",
        url: "https://www.youtube.com/watch?v=example2",
        kind: "music",
        duration: "45 min",
        description: "Orchestral music inspired by Saturn's beauty",
    },
    MediaResource {
        title: "Cosmic Breathing Guide",
        url: "https://www.youtube.com/watch?v=example3",
        kind: "guided",
        duration: "20 min",
        description: "Guided meditation with cosmic visuals",
    },
];

/// Educational and inspirational videos
pub static VIDEOS: [MediaResource; 3] = [
    MediaResource {
        title: "Grounding Techniques Demo",
        url: "https://www.youtube.com/watch?v=example4",
        kind: "educational",
        duration: "15 min",
        description: "Learn practical grounding methods",
    },
    MediaResource {
        title: "Vorak Communication Basics",
        url: "https://www.youtube.com/watch?v=example5",
        kind: "educational",
        duration: "25 min",
        description: "Understanding Vorak non-verbal communication",
    },
    MediaResource {
        title: "Colony Adaptation Stories",
        url: "https://www.youtube.com/watch?v=example6",
        kind: "inspirational",
        duration: "40 min",
        description: "Fellow colonists share their adaptation journeys",
    },
];

pub static COPING_STRATEGIES: [CopingStrategy; 4] = [
    CopingStrategy {
        title: "5-4-3-2-1 Grounding",
        kind: StrategyKind::Immediate,
        steps: &[
            "Name 5 things you can see around you",
            "Identify 4 things you can touch",
            "Notice 3 things you can hear",
            "Find 2 things you can smell",
            "Name 1 thing you can taste",
        ],
        duration: "2-3 minutes",
    },
    CopingStrategy {
        title: "Temperature Shock",
        kind: StrategyKind::Immediate,
        steps: &[
            "Hold an ice cube in your hand",
            "Splash cold water on your face",
            "Place a cold compress on your neck",
            "Focus on the physical sensation",
        ],
        duration: "1-2 minutes",
    },
    CopingStrategy {
        title: "Gratitude Journaling",
        kind: StrategyKind::Daily,
        steps: &[
            "Write down three things you're grateful for",
            "Include at least one colony-specific item",
            "Reflect on why you're grateful for each",
            "Do this every morning or evening",
        ],
        duration: "5 minutes daily",
    },
    CopingStrategy {
        title: "Virtual Earth Connection",
        kind: StrategyKind::Daily,
        steps: &[
            "Use the VR Earth simulation",
            "Visit a favorite Earth location",
            "Engage all your senses in the memory",
            "Share the experience with a friend",
        ],
        duration: "10-15 minutes",
    },
];

pub static COMMUNICATION_TIPS: [TipCategory; 3] = [
    TipCategory {
        category: "Vorak Interactions",
        tips: &[
            "Maintain respectful distance (2 meters minimum)",
            "Avoid direct eye contact - they perceive it as aggressive",
            "Use slow, deliberate hand gestures",
            "Speak in calm, measured tones",
            "Don't expect emotional reciprocity - it's cultural",
        ],
    },
    TipCategory {
        category: "Conflict Resolution",
        tips: &[
            "Use 'I feel' statements instead of accusations",
            "Take breaks when emotions run high",
            "Focus on the issue, not the person",
            "Practice active listening - repeat back what you heard",
            "Seek mediation for Vorak-human conflicts",
        ],
    },
    TipCategory {
        category: "Social Connection",
        tips: &[
            "Join colony interest groups weekly",
            "Schedule regular video calls with Earth contacts",
            "Participate in cultural exchange programs",
            "Share your adaptation journey in support groups",
            "Practice small talk with fellow colonists",
        ],
    },
];

static GUIDE_478: BreathingGuide = BreathingGuide {
    title: "4-7-8 Breathing",
    steps: &[
        "Empty your lungs completely",
        "Breathe in through your nose for 4 seconds",
        "Hold your breath for 7 seconds",
        "Exhale through your mouth for 8 seconds",
        "Repeat this cycle 4 times",
    ],
};

static GUIDE_BOX: BreathingGuide = BreathingGuide {
    title: "Box Breathing",
    steps: &[
        "Sit upright in a comfortable position",
        "Exhale completely through your mouth",
        "Inhale through your nose for 4 seconds",
        "Hold your breath for 4 seconds",
        "Exhale through your mouth for 4 seconds",
        "Hold empty for 4 seconds",
        "Repeat for 5-10 cycles",
    ],
};

static GUIDE_COHERENT: BreathingGuide = BreathingGuide {
    title: "Coherent Breathing",
    steps: &[
        "Find a comfortable seated position",
        "Breathe in through your nose for 5 seconds",
        "Breathe out through your nose for 5 seconds",
        "Maintain this 5-second rhythm",
        "Continue for 5-20 minutes",
        "Focus on smooth, even breaths",
    ],
};

/// Plain step list for a technique, shown when the animated exercise
/// cannot run
pub fn breathing_guide(technique: Technique) -> &'static BreathingGuide {
    match technique {
        Technique::FourSevenEight => &GUIDE_478,
        Technique::Box => &GUIDE_BOX,
        Technique::Coherent => &GUIDE_COHERENT,
    }
}

/// Coping strategies of one kind
pub fn strategies(kind: StrategyKind) -> impl Iterator<Item = &'static CopingStrategy> {
    COPING_STRATEGIES.iter().filter(move |s| s.kind == kind)
}

/// Case-insensitive lookup by title
pub fn find_strategy(title: &str) -> Option<&'static CopingStrategy> {
    let wanted = title.trim().to_lowercase();
    COPING_STRATEGIES
        .iter()
        .find(|s| s.title.to_lowercase() == wanted)
}

// =============================================================================
// VIEW STATE
// =============================================================================

/// Resources view with its persisted tab and usage log
#[derive(Debug, Clone)]
pub struct ResourceLibrary {
    tab: ResourceTab,
    cache: LocalCache,
}

impl ResourceLibrary {
    /// Restore the last tab (default: breathing)
    pub fn load(cache: LocalCache) -> Self {
        let tab = match cache.get::<ResourcePrefs>(KEY_RESOURCE_PREFS) {
            Some(prefs) => prefs.last_tab,
            None => {
                tracing::debug!("no saved resource preferences");
                ResourceTab::default()
            }
        };
        Self { tab, cache }
    }

    pub fn tab(&self) -> ResourceTab {
        self.tab
    }

    /// Switch tabs and persist the choice
    pub fn select_tab(&mut self, tab: ResourceTab) -> Result<(), CompanionError> {
        self.tab = tab;
        let prefs = ResourcePrefs {
            last_tab: tab,
            timestamp: Utc::now(),
        };
        self.cache.set(KEY_RESOURCE_PREFS, &prefs)
    }

    /// Record that a resource was opened from the current tab
    pub fn track_usage(&self, kind: &str, id: &str) {
        let entry = ResourceUsage {
            kind: kind.to_string(),
            id: id.to_string(),
            timestamp: Utc::now(),
            tab: self.tab,
        };
        tracing::debug!(kind, id, tab = self.tab.id(), "resource used");
        if let Err(e) = self.cache.append_capped(KEY_RESOURCE_USAGE, entry, RESOURCE_USAGE_CAP) {
            tracing::warn!(error = %e, "failed to record resource usage");
        }
    }

    pub fn usage(&self) -> Vec<ResourceUsage> {
        self.cache.get(KEY_RESOURCE_USAGE).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_persists() {
        let cache = LocalCache::in_memory();
        let mut lib = ResourceLibrary::load(cache.clone());
        assert_eq!(lib.tab(), ResourceTab::Breathing);
        lib.select_tab(ResourceTab::Coping).unwrap();
        assert_eq!(ResourceLibrary::load(cache).tab(), ResourceTab::Coping);
    }

    #[test]
    fn test_usage_capped() {
        let lib = ResourceLibrary::load(LocalCache::in_memory());
        for i in 0..(RESOURCE_USAGE_CAP + 5) {
            lib.track_usage("media", &format!("r{}", i));
        }
        let usage = lib.usage();
        assert_eq!(usage.len(), RESOURCE_USAGE_CAP);
        assert_eq!(usage[0].id, "r5");
    }

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(strategies(StrategyKind::Immediate).count(), 2);
        assert_eq!(find_strategy("temperature shock").unwrap().steps.len(), 4);
        assert_eq!(breathing_guide(Technique::Box).steps.len(), 7);
    }
}

//! Wire types for the remote chat endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::EmotionLabel;

/// POST /api/chat request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub emotion: EmotionLabel,
}

/// POST /api/chat response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub emotion: EmotionLabel,
    #[serde(default)]
    pub has_drug_mention: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// GET /api/user_insights response body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Insights {
    #[serde(default)]
    pub most_common_emotion: EmotionLabel,
    #[serde(default)]
    pub total_interactions: u64,
    #[serde(default)]
    pub recent_drug_mentions: u64,
    #[serde(default, deserialize_with = "lenient_distribution")]
    pub emotion_distribution: HashMap<EmotionLabel, u64>,
    #[serde(default)]
    pub avg_message_length: f64,
}

/// Unknown labels fold into Neutral, summing their counts
fn lenient_distribution<'de, D>(deserializer: D) -> Result<HashMap<EmotionLabel, u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = HashMap::<String, u64>::deserialize(deserializer)?;
    let mut out = HashMap::new();
    for (label, count) in raw {
        let label: EmotionLabel = label.parse().unwrap_or_default();
        *out.entry(label).or_default() += count;
    }
    Ok(out)
}

/// One entry of GET /api/conversation_history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub emotion: EmotionLabel,
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    pub ai_response: String,
    pub drug_mention: bool,
}

/// Error body returned by the endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_tolerates_missing_fields() {
        let resp: ChatResponse = serde_json::from_str(r#"{"response":"hi"}"#).unwrap();
        assert_eq!(resp.emotion, EmotionLabel::Neutral);
        assert!(!resp.has_drug_mention);
    }

    #[test]
    fn test_insights_distribution_keys() {
        let json = r#"{"most_common_emotion":"Sad","total_interactions":3,
            "recent_drug_mentions":1,"emotion_distribution":{"Sad":2,"Happy":1}}"#;
        let insights: Insights = serde_json::from_str(json).unwrap();
        assert_eq!(insights.most_common_emotion, EmotionLabel::Sad);
        assert_eq!(insights.emotion_distribution[&EmotionLabel::Sad], 2);
    }

    #[test]
    fn test_response_accepts_foreign_labels() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"response":"hi","emotion":"neutral"}"#).unwrap();
        assert_eq!(resp.emotion, EmotionLabel::Neutral);
        let resp: ChatResponse =
            serde_json::from_str(r#"{"response":"hi","emotion":"fear","has_drug_mention":false}"#)
                .unwrap();
        assert_eq!(resp.response, "hi");
        assert_eq!(resp.emotion, EmotionLabel::Neutral);
    }

    #[test]
    fn test_insights_unknown_labels_fold_into_neutral() {
        let json = r#"{"most_common_emotion":"fear","total_interactions":4,
            "emotion_distribution":{"fear":2,"neutral":1,"Sad":1}}"#;
        let insights: Insights = serde_json::from_str(json).unwrap();
        assert_eq!(insights.most_common_emotion, EmotionLabel::Neutral);
        assert_eq!(insights.emotion_distribution[&EmotionLabel::Neutral], 3);
        assert_eq!(insights.emotion_distribution[&EmotionLabel::Sad], 1);
        assert_eq!(insights.emotion_distribution.len(), 2);
    }
}

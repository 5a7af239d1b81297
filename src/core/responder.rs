//! Rule-based reply generation for the companion server
//!
//! Keyword rules are checked in order (support, thanks, greeting,
//! goodbye). Otherwise a reply is drawn at random from the pool for the
//! reported emotion; labels without a pool use the neutral one.

use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use crate::types::EmotionLabel;

/// Words that flag a substance-use mention (substring match)
pub const DRUG_KEYWORDS: [&str; 7] = [
    "drug",
    "substance",
    "addiction",
    "withdrawal",
    "relapse",
    "pill",
    "medication",
];

/// Reply used when reply generation fails
pub const DEFAULT_REPLY: &str =
    "I'm here to listen. Could you tell me more about what you're experiencing?";

lazy_static! {
    static ref KEYWORD_RULES: Vec<(Regex, &'static str)> = vec![
        (
            Regex::new(r"(?i)\b(help|struggling|hard|difficult)").expect("static pattern"),
            "I hear that you're going through a challenging time. Remember that it's okay to ask for help when you need it. Would you like to talk more about what's making things difficult?",
        ),
        (
            Regex::new(r"(?i)\b(thank|appreciate)").expect("static pattern"),
            "You're very welcome! I'm glad I can be here for you. How else can I support you today?",
        ),
        (
            Regex::new(r"(?i)\b(hello|hi|hey|greetings)\b").expect("static pattern"),
            "Hello! I'm your AI companion. I'm here to listen and support you. How are you feeling today?",
        ),
        (
            Regex::new(r"(?i)\b(bye|goodbye|see you)\b").expect("static pattern"),
            "Take care! Remember I'm here whenever you need someone to talk to. Wishing you well until we chat again!",
        ),
    ];
}

const HAPPY: [&str; 3] = [
    "It's wonderful to see you feeling happy! What's bringing you joy today?",
    "Your positive energy is contagious! Tell me more about what's making you smile.",
    "Happiness looks good on you! Want to share what's going well?",
];

const SAD: [&str; 3] = [
    "I'm here for you during this difficult time. Would you like to talk about what's bothering you?",
    "It's okay to feel sad sometimes. I'm listening if you want to share what's on your mind.",
    "I can sense you're feeling down. Remember that difficult moments don't last forever.",
];

const ANGRY: [&str; 3] = [
    "I can see you're feeling frustrated. Would it help to talk about what's upsetting you?",
    "Anger is a natural emotion. Let's work through this together - what's triggering these feelings?",
    "I'm here to help you process these strong emotions. What's causing you to feel this way?",
];

const ANXIOUS: [&str; 3] = [
    "It sounds like you're feeling anxious. Let's take a deep breath together and talk through it.",
    "Anxiety can be overwhelming. I'm here to help you work through these thoughts.",
    "Let's break this down together. What specific concerns are on your mind right now?",
];

const NEUTRAL: [&str; 3] = [
    "Thanks for checking in! How are you feeling today?",
    "I'm here to listen. What would you like to talk about?",
    "How has your day been going? I'm interested in hearing about it.",
];

/// Does the message mention substances?
pub fn has_drug_mention(text: &str) -> bool {
    let lower = text.to_lowercase();
    DRUG_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Reply pool for an emotion
pub fn replies_for(emotion: EmotionLabel) -> &'static [&'static str] {
    match emotion {
        EmotionLabel::Happy => &HAPPY,
        EmotionLabel::Sad => &SAD,
        EmotionLabel::Angry => &ANGRY,
        EmotionLabel::Anxious => &ANXIOUS,
        EmotionLabel::Neutral | EmotionLabel::Surprise | EmotionLabel::Disgust => &NEUTRAL,
    }
}

/// Stateless rule-based responder
#[derive(Debug, Default, Clone, Copy)]
pub struct Responder;

impl Responder {
    pub fn new() -> Self {
        Self
    }

    /// Fixed reply for a keyword rule, if one matches
    pub fn keyword_reply(&self, input: &str) -> Option<&'static str> {
        KEYWORD_RULES
            .iter()
            .find(|(pattern, _)| pattern.is_match(input))
            .map(|(_, reply)| *reply)
    }

    /// Generate a reply
    pub fn respond<R: Rng + ?Sized>(&self, input: &str, emotion: EmotionLabel, rng: &mut R) -> &'static str {
        if let Some(reply) = self.keyword_reply(input) {
            return reply;
        }
        replies_for(emotion)
            .choose(rng)
            .copied()
            .unwrap_or(DEFAULT_REPLY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_keyword_rules_in_order() {
        let r = Responder::new();
        let reply = r.keyword_reply("hi, I'm struggling").unwrap();
        assert!(reply.starts_with("I hear that you're going through"));
        assert!(r.keyword_reply("thanks a lot").unwrap().starts_with("You're very welcome"));
        assert!(r.keyword_reply("Hey there").unwrap().starts_with("Hello!"));
        assert!(r.keyword_reply("ok bye").unwrap().starts_with("Take care"));
    }

    #[test]
    fn test_greeting_needs_whole_word() {
        let r = Responder::new();
        assert!(r.keyword_reply("this is it").is_none());
    }

    #[test]
    fn test_emotion_pool() {
        let r = Responder::new();
        let mut rng = StdRng::seed_from_u64(7);
        let reply = r.respond("the view from the dome", EmotionLabel::Sad, &mut rng);
        assert!(SAD.contains(&reply));
        let reply = r.respond("the view from the dome", EmotionLabel::Disgust, &mut rng);
        assert!(NEUTRAL.contains(&reply));
    }

    #[test]
    fn test_drug_detection() {
        assert!(has_drug_mention("Worried about my Medication schedule"));
        assert!(has_drug_mention("pills"));
        assert!(!has_drug_mention("I had a long shift"));
    }
}

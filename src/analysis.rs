use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-point scale used for effort, reward, and priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// One study topic as emitted by the model. The pipeline never synthesizes
/// topics; the only derived field is the priority fallback below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub name: String,
    /// 0-100.
    pub confidence: u8,
    pub effort: Level,
    pub reward: Level,
    /// How often the topic appeared across the past papers.
    #[serde(default)]
    pub frequency: u32,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    /// Model-assigned priority; absent in some responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Level>,
}

impl Topic {
    /// Model-assigned priority, or the confidence-derived fallback
    /// (≥80 → High, ≥60 → Medium, else Low).
    pub fn priority(&self) -> Level {
        self.priority.unwrap_or(match self.confidence {
            80.. => Level::High,
            60..=79 => Level::Medium,
            _ => Level::Low,
        })
    }

    /// Low effort and high reward; decorated in the export.
    pub fn is_quick_win(&self) -> bool {
        self.effort == Level::Low && self.reward == Level::High
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_topics: u32,
    pub high_priority_count: u32,
    pub low_effort_high_reward: u32,
}

/// Result of one successful pipeline run. Immutable; held by the caller
/// until the next run discards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub topics: Vec<Topic>,
    pub summary: Summary,
}

impl AnalysisResult {
    /// Display order: confidence descending, stable for ties.
    pub fn topics_by_confidence(&self) -> Vec<&Topic> {
        let mut topics: Vec<&Topic> = self.topics.iter().collect();
        topics.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        topics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(name: &str, confidence: u8) -> Topic {
        Topic {
            name: name.to_string(),
            confidence,
            effort: Level::Medium,
            reward: Level::Medium,
            frequency: 1,
            key_concepts: vec![],
            priority: None,
        }
    }

    #[test]
    fn priority_derived_from_confidence() {
        assert_eq!(topic("a", 80).priority(), Level::High);
        assert_eq!(topic("a", 95).priority(), Level::High);
        assert_eq!(topic("a", 79).priority(), Level::Medium);
        assert_eq!(topic("a", 60).priority(), Level::Medium);
        assert_eq!(topic("a", 59).priority(), Level::Low);
        assert_eq!(topic("a", 0).priority(), Level::Low);
    }

    #[test]
    fn explicit_priority_wins_over_derivation() {
        let mut t = topic("a", 95);
        t.priority = Some(Level::Low);
        assert_eq!(t.priority(), Level::Low);
    }

    #[test]
    fn quick_win_requires_low_effort_and_high_reward() {
        let mut t = topic("a", 50);
        assert!(!t.is_quick_win());
        t.effort = Level::Low;
        t.reward = Level::High;
        assert!(t.is_quick_win());
    }

    #[test]
    fn topics_sorted_by_confidence_descending() {
        let result = AnalysisResult {
            topics: vec![topic("mid", 60), topic("top", 90), topic("low", 30)],
            summary: Summary {
                total_topics: 3,
                high_priority_count: 1,
                low_effort_high_reward: 0,
            },
        };
        let names: Vec<&str> = result
            .topics_by_confidence()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["top", "mid", "low"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let result = AnalysisResult {
            topics: vec![topic("first", 70), topic("second", 70)],
            summary: Summary {
                total_topics: 2,
                high_priority_count: 0,
                low_effort_high_reward: 0,
            },
        };
        let names: Vec<&str> = result
            .topics_by_confidence()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn topic_deserializes_from_camel_case_wire_shape() {
        let json = r#"{
            "name": "Thermodynamics",
            "confidence": 85,
            "effort": "Low",
            "reward": "High",
            "frequency": 4,
            "keyConcepts": ["entropy", "enthalpy"],
            "priority": "High"
        }"#;
        let t: Topic = serde_json::from_str(json).unwrap();
        assert_eq!(t.name, "Thermodynamics");
        assert_eq!(t.effort, Level::Low);
        assert_eq!(t.key_concepts, vec!["entropy", "enthalpy"]);
        assert_eq!(t.priority, Some(Level::High));
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"name": "X", "confidence": 50, "effort": "Low", "reward": "Low"}"#;
        let t: Topic = serde_json::from_str(json).unwrap();
        assert_eq!(t.frequency, 0);
        assert!(t.key_concepts.is_empty());
        assert!(t.priority.is_none());
    }
}

//! Learner profiles and conceptual domains carried inside a [`Context`](crate::context::Context).
//!
//! Neither record influences the ethical verdicts. They feed the plan
//! synthesizer so actions can be phrased for a specific learner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mastery at or above which a concept counts as learned.
pub const MASTERY_THRESHOLD: f64 = 0.7;

/// What is known about one learner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearnerProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub needs: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    /// Concept → mastery in `[0, 1]`.
    #[serde(default)]
    pub mastery: BTreeMap<String, f64>,
}

impl LearnerProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_strength(mut self, strength: impl Into<String>) -> Self {
        self.strengths.push(strength.into());
        self
    }

    pub fn with_need(mut self, need: impl Into<String>) -> Self {
        self.needs.push(need.into());
        self
    }

    pub fn with_interest(mut self, interest: impl Into<String>) -> Self {
        self.interests.push(interest.into());
        self
    }

    pub fn with_mastery(mut self, concept: impl Into<String>, level: f64) -> Self {
        self.mastery.insert(concept.into(), level.clamp(0.0, 1.0));
        self
    }

    /// The name if given, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Mastery of a concept; unknown concepts count as unlearned.
    pub fn mastery_of(&self, concept: &str) -> f64 {
        self.mastery.get(concept).copied().unwrap_or(0.0)
    }

    pub fn has_mastered(&self, concept: &str) -> bool {
        self.mastery_of(concept) >= MASTERY_THRESHOLD
    }
}

/// `concept` cannot be learned before `requires`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prerequisite {
    pub concept: String,
    pub requires: String,
}

/// A body of concepts with prerequisite ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptualDomain {
    pub name: String,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<Prerequisite>,
}

impl ConceptualDomain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concepts.push(concept.into());
        self
    }

    pub fn with_prerequisite(
        mut self,
        concept: impl Into<String>,
        requires: impl Into<String>,
    ) -> Self {
        self.prerequisites.push(Prerequisite {
            concept: concept.into(),
            requires: requires.into(),
        });
        self
    }

    pub fn prerequisites_of<'a>(&'a self, concept: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.prerequisites
            .iter()
            .filter(move |p| p.concept == concept)
            .map(|p| p.requires.as_str())
    }

    /// Concepts the learner has not mastered but is ready for, in domain order.
    pub fn next_concepts(&self, learner: &LearnerProfile) -> Vec<&str> {
        self.concepts
            .iter()
            .map(String::as_str)
            .filter(|c| !learner.has_mastered(c))
            .filter(|c| self.prerequisites_of(c).all(|r| learner.has_mastered(r)))
            .collect()
    }
}

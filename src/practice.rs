//! Practices: the actions, policies, or system features under evaluation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;
use crate::error::{PracticeError, PracticeResult};

/// Words that make a description harder to pin down.
const HEDGES: &[&str] = &[
    "maybe",
    "perhaps",
    "possibly",
    "sometimes",
    "occasionally",
    "might",
    "could",
    "somewhat",
    "various",
    "flexible",
    "as needed",
    "as appropriate",
    "where appropriate",
    "if possible",
    "etc",
];

/// Descriptions longer than this many words start losing confidence.
const CONCISE_WORDS: usize = 20;

/// Clarity ceiling for a practice with effects or tags.
const STRUCTURED_CLARITY: f64 = 0.95;
/// Clarity ceiling for a bare description.
const UNSTRUCTURED_CLARITY: f64 = 0.88;
/// Clarity lost per hedge word.
const HEDGE_PENALTY: f64 = 0.1;
/// Clarity lost per word beyond [`CONCISE_WORDS`].
const VERBOSITY_PENALTY: f64 = 0.01;
/// Clarity never drops below this.
const MIN_CLARITY: f64 = 0.2;

/// Normalized key for a stakeholder class.
pub(crate) fn stakeholder_key(name: &str) -> String {
    name.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// How an effect lands on the stakeholder it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// The stakeholder gains something.
    Benefit,
    /// The stakeholder bears a burden.
    Cost,
    /// The stakeholder is used to produce something for others.
    Instrumental,
}

impl EffectKind {
    /// Costs and instrumental use are both burdens.
    pub fn is_burden(&self) -> bool {
        matches!(self, EffectKind::Cost | EffectKind::Instrumental)
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectKind::Benefit => write!(f, "benefit"),
            EffectKind::Cost => write!(f, "cost"),
            EffectKind::Instrumental => write!(f, "instrumental"),
        }
    }
}

/// A described effect of the practice on one stakeholder class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeholderEffect {
    pub stakeholder: String,
    pub kind: EffectKind,
    pub description: String,
    /// Why a burden is acceptable, if the proposer states a reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

impl StakeholderEffect {
    pub fn new(
        stakeholder: impl Into<String>,
        kind: EffectKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            stakeholder: stakeholder.into(),
            kind,
            description: description.into(),
            justification: None,
        }
    }

    pub fn benefit(stakeholder: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(stakeholder, EffectKind::Benefit, description)
    }

    pub fn cost(stakeholder: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(stakeholder, EffectKind::Cost, description)
    }

    pub fn instrumental(stakeholder: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(stakeholder, EffectKind::Instrumental, description)
    }

    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = Some(justification.into());
        self
    }

    /// Whether a non-blank justification was given.
    pub fn is_justified(&self) -> bool {
        self.justification
            .as_deref()
            .is_some_and(|j| !j.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Practice
// ---------------------------------------------------------------------------

/// Structured tags attached to a practice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticeTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default)]
    pub stakeholders: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl PracticeTags {
    pub fn is_empty(&self) -> bool {
        self.domain.is_none() && self.stakeholders.is_empty() && self.labels.is_empty()
    }
}

/// A described action, policy, or feature submitted for evaluation.
///
/// The engine only ever borrows a practice; it is never modified once
/// submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Practice {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub tags: PracticeTags,
    #[serde(default)]
    pub effects: Vec<StakeholderEffect>,
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
}

/// Measured vagueness of a practice description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    pub word_count: usize,
    pub hedges: Vec<&'static str>,
}

impl Practice {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            tags: PracticeTags::default(),
            effects: Vec::new(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.tags.domain = Some(domain.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.tags.labels.push(label.into());
        self
    }

    pub fn with_stakeholder(mut self, stakeholder: impl Into<String>) -> Self {
        self.tags.stakeholders.push(stakeholder.into());
        self
    }

    pub fn with_effect(mut self, effect: StakeholderEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Check the fields every evaluation depends on.
    pub fn validate(&self) -> PracticeResult<()> {
        let malformed = |field: &str, reason: &str| PracticeError::Malformed {
            id: self.id.clone(),
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(malformed("id", "must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(malformed("description", "must not be empty"));
        }
        for (i, effect) in self.effects.iter().enumerate() {
            if effect.stakeholder.trim().is_empty() {
                return Err(malformed(&format!("effects[{i}].stakeholder"), "must not be empty"));
            }
        }
        for (name, value) in &self.parameters {
            if !value.is_finite() {
                return Err(malformed(&format!("parameters.{name}"), "must be a finite number"));
            }
        }
        Ok(())
    }

    /// Effects landing on `stakeholder` (case-insensitive).
    pub fn effects_for<'a>(
        &'a self,
        stakeholder: &str,
    ) -> impl Iterator<Item = &'a StakeholderEffect> + 'a {
        let key = stakeholder_key(stakeholder);
        self.effects
            .iter()
            .filter(move |e| stakeholder_key(&e.stakeholder) == key)
    }

    /// Every stakeholder named by an effect or a tag, normalized, sorted, deduplicated.
    pub fn affected_stakeholders(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .effects
            .iter()
            .map(|e| stakeholder_key(&e.stakeholder))
            .chain(self.tags.stakeholders.iter().map(|s| stakeholder_key(s)))
            .collect();
        all.sort();
        all.dedup();
        all
    }

    pub fn ambiguity(&self) -> Ambiguity {
        let lower = self.description.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'')
            .filter(|w| !w.is_empty())
            .collect();
        let padded = format!(" {} ", words.join(" "));
        let hedges = HEDGES
            .iter()
            .copied()
            .filter(|h| padded.contains(&format!(" {h} ")))
            .collect();
        Ambiguity {
            word_count: words.len(),
            hedges,
        }
    }

    /// How precisely the description can be read.
    ///
    /// Short, hedge-free, structured descriptions score highest.
    pub fn clarity(&self) -> Confidence {
        let ambiguity = self.ambiguity();
        let structured = !self.effects.is_empty() || !self.tags.is_empty();

        let mut score = if structured {
            STRUCTURED_CLARITY
        } else {
            UNSTRUCTURED_CLARITY
        };
        score -= HEDGE_PENALTY * ambiguity.hedges.len() as f64;
        score -= VERBOSITY_PENALTY * ambiguity.word_count.saturating_sub(CONCISE_WORDS) as f64;
        Confidence::new(score.clamp(MIN_CLARITY, STRUCTURED_CLARITY))
    }
}

//! The situational frame a practice is evaluated in.
//!
//! A context is owned by the caller and only ever read by the engine. Its
//! named fields are marked `evidenced` or `assumed`; only evidenced fields can
//! support a claim inside the epistemic boundary.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::learner::{ConceptualDomain, LearnerProfile};
use crate::practice::stakeholder_key;
use crate::principle::PrincipleWeights;

/// Whether a context field was observed or merely supposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStatus {
    Evidenced,
    Assumed,
}

impl fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceStatus::Evidenced => write!(f, "evidenced"),
            EvidenceStatus::Assumed => write!(f, "assumed"),
        }
    }
}

/// A named piece of situational data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextField {
    #[serde(default)]
    pub value: String,
    pub status: EvidenceStatus,
}

/// Situational data supplied alongside a practice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Stakeholder classes whose endorsement matters.
    #[serde(default)]
    pub stakeholders: Vec<String>,
    /// Per-call emphasis. Falls back to the engine's configured weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<PrincipleWeights>,
    #[serde(default)]
    pub fields: BTreeMap<String, ContextField>,
    /// Open questions about the situation that nobody has settled yet.
    #[serde(default)]
    pub ambiguities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learner: Option<LearnerProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<ConceptualDomain>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stakeholder(mut self, stakeholder: impl Into<String>) -> Self {
        self.stakeholders.push(stakeholder.into());
        self
    }

    pub fn with_stakeholders<I, S>(mut self, stakeholders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stakeholders
            .extend(stakeholders.into_iter().map(Into::into));
        self
    }

    pub fn with_emphasis(mut self, weights: PrincipleWeights) -> Self {
        self.emphasis = Some(weights);
        self
    }

    /// Record an observed field.
    pub fn evidenced(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(
            name.into(),
            ContextField {
                value: value.into(),
                status: EvidenceStatus::Evidenced,
            },
        );
        self
    }

    /// Record a supposed field.
    pub fn assumed(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(
            name.into(),
            ContextField {
                value: value.into(),
                status: EvidenceStatus::Assumed,
            },
        );
        self
    }

    pub fn with_ambiguity(mut self, ambiguity: impl Into<String>) -> Self {
        self.ambiguities.push(ambiguity.into());
        self
    }

    pub fn with_learner(mut self, learner: LearnerProfile) -> Self {
        self.learner = Some(learner);
        self
    }

    pub fn with_domain(mut self, domain: ConceptualDomain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Status of a field, `None` when undeclared.
    pub fn field_status(&self, name: &str) -> Option<EvidenceStatus> {
        self.fields.get(name).map(|f| f.status)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Names of fields marked assumed, in name order.
    pub fn assumed_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, f)| f.status == EvidenceStatus::Assumed)
            .map(|(name, _)| name.as_str())
    }

    /// Declared stakeholders, normalized and deduplicated in first-seen order.
    pub fn stakeholder_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::with_capacity(self.stakeholders.len());
        for key in self.stakeholders.iter().map(|s| stakeholder_key(s)) {
            if !key.is_empty() && !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn declares_stakeholder(&self, stakeholder: &str) -> bool {
        let key = stakeholder_key(stakeholder);
        self.stakeholders.iter().any(|s| stakeholder_key(s) == key)
    }

    /// Explicit ambiguities plus every assumed field.
    pub fn unresolved_ambiguities(&self) -> usize {
        self.ambiguities.len() + self.assumed_fields().count()
    }
}

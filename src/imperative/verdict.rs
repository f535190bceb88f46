//! Verdicts: the output of a single imperative evaluator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::boundary::KnowledgeClaim;
use crate::confidence::Confidence;
use crate::principle::{Imperative, Principle};

use super::error::EvaluatorError;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Aligned,
    Violates,
    Indeterminate,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Aligned, Outcome::Violates, Outcome::Indeterminate];

    /// Aligned or violates.
    pub fn is_definite(&self) -> bool {
        !matches!(self, Outcome::Indeterminate)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Aligned => write!(f, "aligned"),
            Outcome::Violates => write!(f, "violates"),
            Outcome::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

// ---------------------------------------------------------------------------
// Causes and adjustments
// ---------------------------------------------------------------------------

/// Why a verdict is indeterminate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndeterminacyCause {
    InsufficientContext { missing: Vec<String> },
    /// Claims the verdict relied on fall outside the epistemic boundary.
    OutOfBoundary { claims: Vec<String> },
    /// No principle of the imperative could be grounded.
    Unassessed { principles: Vec<Principle> },
    /// Instrumental and respecting signals were both present.
    MixedEffects {
        instrumental: Vec<String>,
        respecting: Vec<String>,
    },
    EvaluatorFailed { message: String },
}

impl IndeterminacyCause {
    pub fn describe(&self) -> String {
        match self {
            Self::InsufficientContext { missing } => {
                format!("insufficient context: missing {}", missing.join(", "))
            }
            Self::OutOfBoundary { claims } => {
                format!("relies on claims outside the evidence: {}", claims.join("; "))
            }
            Self::Unassessed { principles } => {
                let names: Vec<&str> = principles.iter().map(Principle::as_str).collect();
                format!("no indicator grounded {}", names.join(", "))
            }
            Self::MixedEffects {
                instrumental,
                respecting,
            } => format!(
                "mixed signals: instrumental ({}) against respecting ({})",
                instrumental.join(", "),
                respecting.join(", ")
            ),
            Self::EvaluatorFailed { message } => format!("evaluator failed: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdjustmentReason {
    /// Lenient-mode penalty for one out-of-boundary claim.
    OutOfBoundary { claim: String },
    UnresolvedAmbiguity { count: usize },
}

impl fmt::Display for AdjustmentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBoundary { claim } => write!(f, "out-of-boundary claim {claim}"),
            Self::UnresolvedAmbiguity { count } => {
                write!(f, "{count} unresolved ambiguit{}", if *count == 1 { "y" } else { "ies" })
            }
        }
    }
}

/// A named multiplicative change to a verdict's confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAdjustment {
    pub reason: AdjustmentReason,
    pub factor: f64,
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// One imperative's judgement of a practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub imperative: Imperative,
    pub outcome: Outcome,
    pub confidence: Confidence,
    pub rationale: String,
    /// Evidence speaking for the practice.
    #[serde(default)]
    pub supporting: Vec<String>,
    /// Evidence speaking against it.
    #[serde(default)]
    pub negative: Vec<String>,
    #[serde(default)]
    pub remedies: Vec<String>,
    #[serde(default)]
    pub claims: Vec<KnowledgeClaim>,
    /// Principles of this imperative nothing could be grounded for.
    #[serde(default)]
    pub unassessed: Vec<Principle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<IndeterminacyCause>,
    #[serde(default)]
    pub adjustments: Vec<ConfidenceAdjustment>,
}

impl Verdict {
    /// The indeterminate verdict standing in for a failed evaluator.
    pub fn from_error(error: &EvaluatorError) -> Self {
        Self {
            imperative: error.imperative(),
            outcome: Outcome::Indeterminate,
            confidence: Confidence::ZERO,
            rationale: error.to_string(),
            supporting: Vec::new(),
            negative: Vec::new(),
            remedies: Vec::new(),
            claims: Vec::new(),
            unassessed: Vec::new(),
            cause: Some(error.to_cause()),
            adjustments: Vec::new(),
        }
    }

    pub fn is_indeterminate(&self) -> bool {
        self.outcome == Outcome::Indeterminate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_verdict_is_indeterminate_with_cause() {
        let err = EvaluatorError::insufficient(
            Imperative::KingdomOfEnds,
            vec!["declared stakeholders".into()],
        );
        let verdict = Verdict::from_error(&err);
        assert_eq!(verdict.imperative, Imperative::KingdomOfEnds);
        assert!(verdict.is_indeterminate());
        assert_eq!(verdict.confidence, Confidence::ZERO);
        assert_eq!(
            verdict.cause,
            Some(IndeterminacyCause::InsufficientContext {
                missing: vec!["declared stakeholders".into()]
            })
        );
        assert!(verdict.rationale.contains("declared stakeholders"));
    }

    #[test]
    fn cause_descriptions_name_their_data() {
        let cause = IndeterminacyCause::Unassessed {
            principles: vec![Principle::Universality, Principle::Transparency],
        };
        assert_eq!(cause.describe(), "no indicator grounded universality, transparency");
    }

    #[test]
    fn ambiguity_reason_pluralizes() {
        assert_eq!(
            AdjustmentReason::UnresolvedAmbiguity { count: 1 }.to_string(),
            "1 unresolved ambiguity"
        );
        assert_eq!(
            AdjustmentReason::UnresolvedAmbiguity { count: 3 }.to_string(),
            "3 unresolved ambiguities"
        );
    }
}

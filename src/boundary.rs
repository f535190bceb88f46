//! Epistemic boundary tracking: what the engine may claim to know.
//!
//! A claim sits inside the boundary only when every piece of data behind it
//! comes from the submitted practice or from a context field marked
//! evidenced. Assumed or undeclared fields, and principles nothing could be
//! grounded for, fall outside. The gate that acts on this lives in
//! [`crate::imperative::gate`] and is shared by all evaluators.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;
use crate::context::{Context, EvidenceStatus};
use crate::schematism::IndicatorMatch;

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

/// Where the data behind a claim came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ClaimSource {
    /// The submitted practice (description, tags, effects).
    Practice,
    /// A named context field.
    Field(String),
}

/// Why a claim falls outside the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BoundaryReason {
    AssumedField { field: String },
    UndeclaredField { field: String },
    /// No indicator could be grounded, so nothing backs the claim.
    Unassessed,
}

impl fmt::Display for BoundaryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryReason::AssumedField { field } => write!(f, "field '{field}' is assumed"),
            BoundaryReason::UndeclaredField { field } => {
                write!(f, "field '{field}' is not in the context")
            }
            BoundaryReason::Unassessed => write!(f, "no indicator could be grounded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flag", rename_all = "snake_case")]
pub enum BoundaryFlag {
    Within,
    Outside { reason: BoundaryReason },
}

/// Something the engine asserts about a practice or learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeClaim {
    pub subject: String,
    pub assertion: String,
    pub confidence: Confidence,
    pub boundary: BoundaryFlag,
    pub sources: Vec<ClaimSource>,
}

impl KnowledgeClaim {
    pub fn is_within(&self) -> bool {
        matches!(self.boundary, BoundaryFlag::Within)
    }

    /// One-line description used in rationales and caveats.
    pub fn summary(&self) -> String {
        match &self.boundary {
            BoundaryFlag::Within => format!("{}: {}", self.subject, self.assertion),
            BoundaryFlag::Outside { reason } => {
                format!("{}: {} ({reason})", self.subject, self.assertion)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// EpistemicBoundary
// ---------------------------------------------------------------------------

/// Classifies claims against one context. Built fresh per evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EpistemicBoundary<'a> {
    context: &'a Context,
}

impl<'a> EpistemicBoundary<'a> {
    pub fn new(context: &'a Context) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// Flag for a claim resting on `sources`. No sources means unassessed.
    pub fn classify(&self, sources: &[ClaimSource]) -> BoundaryFlag {
        if sources.is_empty() {
            return BoundaryFlag::Outside {
                reason: BoundaryReason::Unassessed,
            };
        }
        for source in sources {
            if let ClaimSource::Field(field) = source {
                match self.context.field_status(field) {
                    Some(EvidenceStatus::Evidenced) => {}
                    Some(EvidenceStatus::Assumed) => {
                        return BoundaryFlag::Outside {
                            reason: BoundaryReason::AssumedField {
                                field: field.clone(),
                            },
                        };
                    }
                    None => {
                        return BoundaryFlag::Outside {
                            reason: BoundaryReason::UndeclaredField {
                                field: field.clone(),
                            },
                        };
                    }
                }
            }
        }
        BoundaryFlag::Within
    }

    pub fn claim(
        &self,
        subject: impl Into<String>,
        assertion: impl Into<String>,
        confidence: Confidence,
        sources: Vec<ClaimSource>,
    ) -> KnowledgeClaim {
        let boundary = self.classify(&sources);
        KnowledgeClaim {
            subject: subject.into(),
            assertion: assertion.into(),
            confidence,
            boundary,
            sources,
        }
    }

    /// The claim an indicator match makes.
    pub fn claim_for(&self, m: &IndicatorMatch, confidence: Confidence) -> KnowledgeClaim {
        self.claim(m.subject(), m.describe(), confidence, m.sources())
    }

    /// A claim recording that nothing could be grounded for `subject`.
    pub fn unassessed(&self, subject: impl Into<String>) -> KnowledgeClaim {
        self.claim(
            subject,
            "no indicator predicate matched",
            Confidence::ZERO,
            Vec::new(),
        )
    }

    /// Re-check a claim against this context, ignoring its stored flag.
    pub fn within_boundary(&self, claim: &KnowledgeClaim) -> bool {
        matches!(self.classify(&claim.sources), BoundaryFlag::Within)
    }
}

// ---------------------------------------------------------------------------
// BoundaryReport
// ---------------------------------------------------------------------------

/// Every claim behind a plan, split by boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryReport {
    pub known: Vec<KnowledgeClaim>,
    pub unknown: Vec<KnowledgeClaim>,
}

impl BoundaryReport {
    /// Split claims by their flag, dropping repeats of the same subject and assertion.
    pub fn from_claims<'c>(claims: impl IntoIterator<Item = &'c KnowledgeClaim>) -> Self {
        let mut report = Self::default();
        for claim in claims {
            let bucket = if claim.is_within() {
                &mut report.known
            } else {
                &mut report.unknown
            };
            let seen = bucket
                .iter()
                .any(|c| c.subject == claim.subject && c.assertion == claim.assertion);
            if !seen {
                bucket.push(claim.clone());
            }
        }
        report
    }

    pub fn is_fully_evidenced(&self) -> bool {
        self.unknown.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        Context::new()
            .evidenced("participation_clause", "students vote")
            .assumed("attendance", "high")
    }

    #[test]
    fn practice_sourced_claims_are_within() {
        let context = context();
        let boundary = EpistemicBoundary::new(&context);
        let claim = boundary.claim("s", "a", Confidence::ONE, vec![ClaimSource::Practice]);
        assert!(claim.is_within());
        assert!(boundary.within_boundary(&claim));
    }

    #[test]
    fn evidenced_field_is_within() {
        let context = context();
        let boundary = EpistemicBoundary::new(&context);
        let flag = boundary.classify(&[
            ClaimSource::Practice,
            ClaimSource::Field("participation_clause".into()),
        ]);
        assert_eq!(flag, BoundaryFlag::Within);
    }

    #[test]
    fn assumed_field_is_outside() {
        let context = context();
        let boundary = EpistemicBoundary::new(&context);
        let flag = boundary.classify(&[
            ClaimSource::Practice,
            ClaimSource::Field("attendance".into()),
        ]);
        assert_eq!(
            flag,
            BoundaryFlag::Outside {
                reason: BoundaryReason::AssumedField {
                    field: "attendance".into()
                }
            }
        );
    }

    #[test]
    fn undeclared_field_is_outside() {
        let context = context();
        let boundary = EpistemicBoundary::new(&context);
        let claim = boundary.claim(
            "s",
            "a",
            Confidence::ONE,
            vec![ClaimSource::Field("rubric".into())],
        );
        assert!(!claim.is_within());
        assert!(claim.summary().contains("not in the context"));
    }

    #[test]
    fn unassessed_claims_are_outside() {
        let context = context();
        let boundary = EpistemicBoundary::new(&context);
        let claim = boundary.unassessed("universal-law");
        assert!(!boundary.within_boundary(&claim));
        assert_eq!(claim.confidence, Confidence::ZERO);
    }

    #[test]
    fn within_boundary_ignores_a_forged_flag() {
        let context = context();
        let boundary = EpistemicBoundary::new(&context);
        let mut claim = boundary.claim(
            "s",
            "a",
            Confidence::ONE,
            vec![ClaimSource::Field("attendance".into())],
        );
        claim.boundary = BoundaryFlag::Within;
        assert!(!boundary.within_boundary(&claim));
    }

    #[test]
    fn report_splits_and_deduplicates() {
        let context = context();
        let boundary = EpistemicBoundary::new(&context);
        let known = boundary.claim("a", "x", Confidence::ONE, vec![ClaimSource::Practice]);
        let unknown = boundary.unassessed("b");
        let report = BoundaryReport::from_claims([&known, &known, &unknown]);
        assert_eq!(report.known.len(), 1);
        assert_eq!(report.unknown.len(), 1);
        assert!(!report.is_fully_evidenced());
    }
}

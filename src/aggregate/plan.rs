//! The aggregated plan and its prioritized actions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::boundary::{BoundaryReport, ClaimSource};
use crate::confidence::{Confidence, ConfidenceLevel};
use crate::context::{Context, EvidenceStatus};
use crate::imperative::{IndeterminacyCause, Outcome, Verdict};
use crate::principle::{Imperative, Principle, PrincipleWeights};
use crate::schematism::SchematismBridge;

/// Principles considered when personalizing a plan.
const PERSONALIZE_TOP: usize = 3;

/// Next concepts suggested from the learner's domain.
const NEXT_CONCEPTS: usize = 2;

// ---------------------------------------------------------------------------
// Scores and resolution
// ---------------------------------------------------------------------------

/// Weighted score per outcome: Σ imperative weight × confidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeScores {
    pub aligned: f64,
    pub violates: f64,
    pub indeterminate: f64,
}

impl OutcomeScores {
    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Aligned => self.aligned,
            Outcome::Violates => self.violates,
            Outcome::Indeterminate => self.indeterminate,
        }
    }

    pub(crate) fn add(&mut self, outcome: Outcome, score: f64) {
        match outcome {
            Outcome::Aligned => self.aligned += score,
            Outcome::Violates => self.violates += score,
            Outcome::Indeterminate => self.indeterminate += score,
        }
    }
}

/// Which rule settled the overall verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionRule {
    /// Humanity-as-End found a violation; nothing outweighs it.
    DignityPrecedence,
    Unanimous,
    /// Kingdom-of-Ends or Universal-Law violates and carries weight.
    StandingViolation,
    WeightedMajority,
    /// Scores tied and the highest-precedence imperative decided.
    PrecedenceTieBreak,
}

impl ResolutionRule {
    /// Contested resolutions are subject to the confidence threshold.
    pub fn is_contested(&self) -> bool {
        matches!(
            self,
            Self::StandingViolation | Self::WeightedMajority | Self::PrecedenceTieBreak
        )
    }
}

impl fmt::Display for ResolutionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DignityPrecedence => write!(f, "dignity precedence"),
            Self::Unanimous => write!(f, "unanimity"),
            Self::StandingViolation => write!(f, "standing violation"),
            Self::WeightedMajority => write!(f, "weighted majority"),
            Self::PrecedenceTieBreak => write!(f, "precedence tie-break"),
        }
    }
}

// ---------------------------------------------------------------------------
// Caveats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaveatKind {
    /// An imperative could not reach a definite verdict.
    IndeterminatePillar,
    /// A verdict's confidence was lowered by a named adjustment.
    ConfidenceAdjusted,
    /// A contested overall verdict fell below the threshold.
    BelowThreshold,
}

/// Explains one downgrade or adjustment behind a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caveat {
    pub kind: CaveatKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imperative: Option<Imperative>,
    pub message: String,
}

impl fmt::Display for Caveat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.imperative {
            Some(imperative) => write!(f, "[{imperative}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Fix a violation.
    Remedy,
    /// Supply the evidence an indeterminate pillar lacked.
    GatherEvidence,
    /// Adapt the practice to the learner.
    Personalize,
    /// Keep what already upholds a pillar.
    Reinforce,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Remedy => write!(f, "remedy"),
            ActionKind::GatherEvidence => write!(f, "gather evidence"),
            ActionKind::Personalize => write!(f, "personalize"),
            ActionKind::Reinforce => write!(f, "reinforce"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedAction {
    /// 1-based, highest priority first.
    pub rank: usize,
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imperative: Option<Imperative>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principle: Option<Principle>,
    pub description: String,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// AggregatedPlan
// ---------------------------------------------------------------------------

/// The engine's answer for one practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPlan {
    pub practice_id: String,
    pub overall_verdict: Outcome,
    pub confidence: Confidence,
    pub rule: ResolutionRule,
    /// One verdict per imperative, in precedence order.
    pub verdicts: Vec<Verdict>,
    pub scores: OutcomeScores,
    /// Imperatives whose verdict differs from the winning outcome.
    pub dissent: Vec<Imperative>,
    pub caveats: Vec<Caveat>,
    pub actions: Vec<PrioritizedAction>,
    pub boundary: BoundaryReport,
}

impl AggregatedPlan {
    pub fn verdict(&self, imperative: Imperative) -> Option<&Verdict> {
        self.verdicts.iter().find(|v| v.imperative == imperative)
    }

    pub fn level(&self) -> ConfidenceLevel {
        self.confidence.level()
    }

    pub fn actions_of(&self, kind: ActionKind) -> impl Iterator<Item = &PrioritizedAction> {
        self.actions.iter().filter(move |a| a.kind == kind)
    }
}

/// One caveat per indeterminate verdict and per confidence adjustment.
pub(crate) fn verdict_caveats(verdicts: &[Verdict]) -> Vec<Caveat> {
    let mut caveats = Vec::new();
    for verdict in verdicts {
        if verdict.is_indeterminate() {
            let message = match &verdict.cause {
                Some(cause) => format!("indeterminate: {}", cause.describe()),
                None => format!("indeterminate: {}", verdict.rationale),
            };
            caveats.push(Caveat {
                kind: CaveatKind::IndeterminatePillar,
                imperative: Some(verdict.imperative),
                message,
            });
        }
        for adjustment in &verdict.adjustments {
            caveats.push(Caveat {
                kind: CaveatKind::ConfidenceAdjusted,
                imperative: Some(verdict.imperative),
                message: format!(
                    "confidence multiplied by {:.3} for {}",
                    adjustment.factor, adjustment.reason
                ),
            });
        }
    }
    caveats
}

/// Rank remedies, evidence requests, personalization, and reinforcement.
pub(crate) fn prioritize(
    verdicts: &[Verdict],
    overall: Outcome,
    weights: &PrincipleWeights,
    context: &Context,
    bridge: &SchematismBridge,
) -> Vec<PrioritizedAction> {
    let mut actions: Vec<PrioritizedAction> = Vec::new();
    let mut push = |kind: ActionKind,
                    imperative: Option<Imperative>,
                    principle: Option<Principle>,
                    description: String,
                    score: f64| {
        if !actions
            .iter()
            .any(|a| a.kind == kind && a.description == description)
        {
            actions.push(PrioritizedAction {
                rank: 0,
                kind,
                imperative,
                principle,
                description,
                score,
            });
        }
    };

    for verdict in verdicts {
        let imperative = verdict.imperative;
        let weight = weights.imperative_weight(imperative);
        match verdict.outcome {
            Outcome::Violates => {
                for remedy in &verdict.remedies {
                    push(ActionKind::Remedy, Some(imperative), None, remedy.clone(), 3.0 + weight);
                }
            }
            Outcome::Indeterminate => {
                for request in evidence_requests(verdict, context) {
                    push(ActionKind::GatherEvidence, Some(imperative), None, request, 2.0 + weight);
                }
            }
            Outcome::Aligned => {
                let description = match verdict.supporting.first() {
                    Some(evidence) => format!("Keep what upholds {imperative}: {evidence}"),
                    None => format!("Keep the practice's {imperative} standing under review"),
                };
                push(ActionKind::Reinforce, Some(imperative), None, description, 0.5 * weight);
            }
        }
    }

    if overall != Outcome::Violates {
        if let Some(learner) = &context.learner {
            let domain = context.domain.as_ref();
            for principle in weights.ranked().into_iter().take(PERSONALIZE_TOP) {
                for example in bridge.exemplify(principle, learner, domain) {
                    push(
                        ActionKind::Personalize,
                        None,
                        Some(principle),
                        example,
                        weights.get(principle),
                    );
                }
            }
            if let Some(domain) = domain {
                for concept in domain.next_concepts(learner).into_iter().take(NEXT_CONCEPTS) {
                    push(
                        ActionKind::Personalize,
                        None,
                        Some(Principle::Beneficence),
                        format!("Introduce {concept} next for {}", learner.display_name()),
                        weights.get(Principle::Beneficence),
                    );
                }
            }
        }
    }

    actions.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, action) in actions.iter_mut().enumerate() {
        action.rank = i + 1;
    }
    actions
}

/// What would let an indeterminate verdict become definite.
fn evidence_requests(verdict: &Verdict, context: &Context) -> Vec<String> {
    let mut requests = Vec::new();
    match &verdict.cause {
        Some(IndeterminacyCause::InsufficientContext { missing }) => {
            requests.extend(missing.iter().map(|m| format!("Provide {m}")));
        }
        Some(IndeterminacyCause::OutOfBoundary { .. }) => {
            for claim in verdict.claims.iter().filter(|c| !c.is_within()) {
                for source in &claim.sources {
                    if let ClaimSource::Field(field) = source {
                        let request = match context.field_status(field) {
                            Some(EvidenceStatus::Assumed) => {
                                format!("Evidence the assumed context field '{field}'")
                            }
                            _ => format!("Supply the context field '{field}'"),
                        };
                        if !requests.contains(&request) {
                            requests.push(request);
                        }
                    }
                }
            }
        }
        Some(IndeterminacyCause::Unassessed { principles }) => {
            requests.extend(
                principles
                    .iter()
                    .map(|p| format!("Describe how the practice bears on {p}")),
            );
        }
        Some(IndeterminacyCause::MixedEffects { .. }) => {
            requests.push(
                "Clarify whether the stakeholders used by the practice share in what it produces"
                    .to_string(),
            );
        }
        Some(IndeterminacyCause::EvaluatorFailed { message }) => {
            requests.push(format!("Re-run the {} evaluation ({message})", verdict.imperative));
        }
        None => {}
    }
    if requests.is_empty() {
        requests.push(format!(
            "Gather more evidence for {}",
            verdict.imperative
        ));
    }
    requests
}

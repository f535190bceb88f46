//! The three imperative evaluators and the boundary gate they share.
//!
//! Every evaluator follows the same path: ground its principles through the
//! schematism bridge, judge the grounded evidence ([`Evaluator::assess`]),
//! then pass the judgement through [`gate`], which applies the epistemic
//! boundary and ambiguity decay. Evaluators never see or touch each other.

pub mod error;
pub mod humanity;
pub mod kingdom;
pub mod universal_law;
pub mod verdict;

use tracing::debug;

use crate::boundary::{EpistemicBoundary, KnowledgeClaim};
use crate::confidence::{Confidence, decay};
use crate::config::{BoundaryStrictness, EngineConfig};
use crate::context::Context;
use crate::practice::Practice;
use crate::principle::Imperative;
use crate::schematism::{Grounding, IndicatorMatch, SchematismBridge};

pub use error::{EvaluatorError, EvaluatorResult};
pub use humanity::HumanityEvaluator;
pub use kingdom::KingdomEvaluator;
pub use universal_law::{UniversalChecks, UniversalLawEvaluator};
pub use verdict::{AdjustmentReason, ConfidenceAdjustment, IndeterminacyCause, Outcome, Verdict};

/// Highest confidence a verdict keeps after strict gating withholds it.
pub const WITHHELD_CEILING: f64 = 0.5;

/// Read-only surroundings of one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationEnv<'a> {
    pub bridge: &'a SchematismBridge,
    pub config: &'a EngineConfig,
}

impl<'a> EvaluationEnv<'a> {
    pub fn new(bridge: &'a SchematismBridge, config: &'a EngineConfig) -> Self {
        Self { bridge, config }
    }
}

/// An evaluator's judgement before boundary gating.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub outcome: Outcome,
    pub confidence: Confidence,
    pub rationale: String,
    pub supporting: Vec<String>,
    pub negative: Vec<String>,
    pub remedies: Vec<String>,
    pub cause: Option<IndeterminacyCause>,
}

impl Assessment {
    pub fn new(outcome: Outcome, confidence: Confidence, rationale: impl Into<String>) -> Self {
        Self {
            outcome,
            confidence,
            rationale: rationale.into(),
            supporting: Vec::new(),
            negative: Vec::new(),
            remedies: Vec::new(),
            cause: None,
        }
    }
}

/// One formulation of the categorical imperative.
pub trait Evaluator: Send + Sync {
    fn imperative(&self) -> Imperative;

    /// Judge the grounded evidence. Missing stakeholder or effect data is an
    /// error, never a guess.
    fn assess(
        &self,
        practice: &Practice,
        context: &Context,
        grounding: &Grounding,
    ) -> EvaluatorResult<Assessment>;

    /// Ground, assess, and gate.
    fn evaluate(
        &self,
        practice: &Practice,
        context: &Context,
        env: &EvaluationEnv<'_>,
    ) -> EvaluatorResult<Verdict> {
        let imperative = self.imperative();
        let grounding = env
            .bridge
            .ground_all(imperative.principles(), practice, context);
        let assessment = self.assess(practice, context, &grounding)?;
        Ok(gate(
            imperative,
            assessment,
            &grounding,
            &EpistemicBoundary::new(context),
            env.config,
        ))
    }
}

/// Apply the epistemic boundary and ambiguity decay to an assessment.
///
/// Strict mode withholds any definite outcome that rests on a claim outside
/// the boundary, or whose principles are all unassessed. Lenient mode keeps
/// the outcome and multiplies confidence by the configured penalty once per
/// such claim. Either way, unresolved ambiguities in the context then decay
/// the confidence.
pub fn gate(
    imperative: Imperative,
    assessment: Assessment,
    grounding: &Grounding,
    boundary: &EpistemicBoundary<'_>,
    config: &EngineConfig,
) -> Verdict {
    let Assessment {
        mut outcome,
        mut confidence,
        mut rationale,
        supporting,
        negative,
        remedies,
        mut cause,
    } = assessment;

    let mut claims: Vec<KnowledgeClaim> = grounding
        .matches()
        .map(|m| boundary.claim_for(m, confidence))
        .collect();
    if grounding.is_unassessed() {
        claims.push(boundary.unassessed(imperative.as_str()));
    }
    let outside: Vec<String> = claims
        .iter()
        .filter(|c| !boundary.within_boundary(c))
        .map(KnowledgeClaim::summary)
        .collect();

    let mut adjustments = Vec::new();
    if !outside.is_empty() {
        match config.strictness {
            BoundaryStrictness::Strict if outcome.is_definite() => {
                let withheld = if grounding.is_unassessed() {
                    IndeterminacyCause::Unassessed {
                        principles: grounding.unassessed_principles(),
                    }
                } else {
                    IndeterminacyCause::OutOfBoundary {
                        claims: outside.clone(),
                    }
                };
                debug!(%imperative, was = %outcome, claims = outside.len(), "strict boundary withheld verdict");
                rationale = format!("{rationale} Withheld: {}.", withheld.describe());
                outcome = Outcome::Indeterminate;
                confidence = confidence.cap(WITHHELD_CEILING);
                cause = Some(withheld);
            }
            BoundaryStrictness::Strict => {}
            BoundaryStrictness::Lenient => {
                let factor = config.boundary_penalty;
                for claim in outside {
                    confidence = confidence.scale(factor);
                    adjustments.push(ConfidenceAdjustment {
                        reason: AdjustmentReason::OutOfBoundary { claim },
                        factor,
                    });
                }
                debug!(%imperative, penalties = adjustments.len(), "lenient boundary penalties applied");
            }
        }
    }

    let unresolved = boundary.context().unresolved_ambiguities();
    if unresolved > 0 && config.ambiguity_decay > 0.0 {
        let decayed = decay(confidence, unresolved, config.ambiguity_decay);
        adjustments.push(ConfidenceAdjustment {
            reason: AdjustmentReason::UnresolvedAmbiguity { count: unresolved },
            factor: (1.0 - config.ambiguity_decay).powi(unresolved.min(i32::MAX as usize) as i32),
        });
        confidence = decayed;
    }

    for claim in claims.iter_mut().filter(|c| !c.sources.is_empty()) {
        claim.confidence = confidence;
    }

    Verdict {
        imperative,
        outcome,
        confidence,
        rationale,
        supporting,
        negative,
        remedies,
        claims,
        unassessed: grounding.unassessed_principles(),
        cause,
        adjustments,
    }
}

// ---------------------------------------------------------------------------
// Shared helpers for evaluators
// ---------------------------------------------------------------------------

pub(crate) fn describe_all<'a>(matches: impl IntoIterator<Item = &'a IndicatorMatch>) -> Vec<String> {
    let mut out = Vec::new();
    for m in matches {
        push_unique(&mut out, m.describe());
    }
    out
}

pub(crate) fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

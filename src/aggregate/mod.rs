//! Aggregation: three verdicts in, one prioritized plan out.
//!
//! The aggregator is a small state machine, `Collecting → Weighing →
//! Resolved`, run once per evaluation and consumed on resolution.
//!
//! Resolution rules, first match wins:
//!
//! 1. **Dignity precedence**: Humanity-as-End violates ⇒ violates, whatever
//!    the weights.
//! 2. **Unanimity**: all three outcomes agree.
//! 3. **Standing violation**: Kingdom-of-Ends or Universal-Law violates and
//!    nothing reconciled it. Only a zero weight on that imperative lets
//!    aligned verdicts outvote it.
//! 4. **Weighted majority**: highest Σ weight × confidence; ties go to the
//!    outcome of the highest-precedence imperative.
//!
//! The resolution's confidence combines only the verdicts that agree with
//! the resolved outcome. Contested results (rules 3 and 4) whose confidence
//! falls below the configured threshold become indeterminate.

pub mod plan;

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::boundary::BoundaryReport;
use crate::confidence::{Confidence, combine};
use crate::context::Context;
use crate::error::{AggregateError, AggregateResult};
use crate::imperative::{EvaluatorResult, Outcome, Verdict};
use crate::practice::Practice;
use crate::principle::{Imperative, PrincipleWeights};
use crate::schematism::SchematismBridge;

pub use plan::{
    ActionKind, AggregatedPlan, Caveat, CaveatKind, OutcomeScores, PrioritizedAction,
    ResolutionRule,
};

/// Scores closer than this are a tie.
const TIE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorState {
    Collecting,
    Weighing,
    Resolved,
}

impl fmt::Display for AggregatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregatorState::Collecting => write!(f, "collecting"),
            AggregatorState::Weighing => write!(f, "weighing"),
            AggregatorState::Resolved => write!(f, "resolved"),
        }
    }
}

/// Overall outcome before the threshold check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub rule: ResolutionRule,
    pub confidence: Confidence,
}

/// Combines one verdict per imperative into an [`AggregatedPlan`].
#[derive(Debug, Clone)]
pub struct Aggregator {
    weights: PrincipleWeights,
    threshold: f64,
    state: AggregatorState,
    verdicts: BTreeMap<Imperative, Verdict>,
}

impl Aggregator {
    pub fn new(weights: PrincipleWeights, threshold: f64) -> Self {
        Self {
            weights,
            threshold,
            state: AggregatorState::Collecting,
            verdicts: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> AggregatorState {
        self.state
    }

    fn expect_state(&self, expected: AggregatorState, action: &str) -> AggregateResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(AggregateError::InvalidTransition {
                action: action.to_string(),
                state: self.state.to_string(),
            })
        }
    }

    fn transition(&mut self, to: AggregatorState) {
        debug!(from = %self.state, %to, "aggregator transition");
        self.state = to;
    }

    /// Accept one evaluator result. Errors become indeterminate verdicts.
    pub fn collect(&mut self, result: EvaluatorResult<Verdict>) -> AggregateResult<()> {
        self.expect_state(AggregatorState::Collecting, "collect")?;
        let verdict = match result {
            Ok(verdict) => verdict,
            Err(err) => {
                warn!(imperative = %err.imperative(), error = %err, "evaluator degraded to indeterminate");
                Verdict::from_error(&err)
            }
        };
        let imperative = verdict.imperative;
        if self.verdicts.contains_key(&imperative) {
            return Err(AggregateError::DuplicateVerdict { imperative });
        }
        self.verdicts.insert(imperative, verdict);
        Ok(())
    }

    /// Barrier: requires all three verdicts, then scores each outcome.
    pub fn weigh(&mut self) -> AggregateResult<OutcomeScores> {
        self.expect_state(AggregatorState::Collecting, "weigh")?;
        if let Some(imperative) = Imperative::PRECEDENCE
            .into_iter()
            .find(|i| !self.verdicts.contains_key(i))
        {
            return Err(AggregateError::MissingVerdict { imperative });
        }
        self.transition(AggregatorState::Weighing);
        Ok(self.scores())
    }

    fn scores(&self) -> OutcomeScores {
        let mut scores = OutcomeScores::default();
        for verdict in self.verdicts.values() {
            let weight = self.weights.imperative_weight(verdict.imperative);
            scores.add(verdict.outcome, weight * verdict.confidence.get());
        }
        scores
    }

    /// Verdicts in precedence order.
    fn ordered(&self) -> Vec<&Verdict> {
        Imperative::PRECEDENCE
            .iter()
            .filter_map(|i| self.verdicts.get(i))
            .collect()
    }

    /// Weighted combination of the verdicts that reached `outcome`.
    fn agreeing_confidence(&self, ordered: &[&Verdict], outcome: Outcome) -> Confidence {
        combine(
            &ordered
                .iter()
                .filter(|v| v.outcome == outcome)
                .map(|v| (v.confidence, self.weights.imperative_weight(v.imperative)))
                .collect::<Vec<_>>(),
        )
    }

    fn resolved(&self, ordered: &[&Verdict], outcome: Outcome, rule: ResolutionRule) -> Resolution {
        Resolution {
            outcome,
            rule,
            confidence: self.agreeing_confidence(ordered, outcome),
        }
    }

    /// Apply the resolution rules to the weighed verdicts.
    pub fn resolution(&self) -> AggregateResult<Resolution> {
        self.expect_state(AggregatorState::Weighing, "resolve")?;
        let ordered = self.ordered();

        let humanity_violates = ordered
            .iter()
            .any(|v| v.imperative == Imperative::HumanityAsEnd && v.outcome == Outcome::Violates);
        if humanity_violates {
            return Ok(self.resolved(&ordered, Outcome::Violates, ResolutionRule::DignityPrecedence));
        }

        let first = ordered[0].outcome;
        if ordered.iter().all(|v| v.outcome == first) {
            return Ok(self.resolved(&ordered, first, ResolutionRule::Unanimous));
        }

        let standing = ordered.iter().any(|v| {
            v.outcome == Outcome::Violates && self.weights.imperative_weight(v.imperative) > 0.0
        });
        if standing {
            return Ok(self.resolved(&ordered, Outcome::Violates, ResolutionRule::StandingViolation));
        }

        let scores = self.scores();
        let best = Outcome::ALL
            .iter()
            .map(|o| scores.get(*o))
            .fold(f64::NEG_INFINITY, f64::max);
        let tied: Vec<Outcome> = Outcome::ALL
            .into_iter()
            .filter(|o| best - scores.get(*o) <= TIE_EPSILON)
            .collect();

        let (outcome, rule) = if let [only] = tied.as_slice() {
            (*only, ResolutionRule::WeightedMajority)
        } else {
            // Highest-precedence imperative whose outcome is among the tied.
            let outcome = ordered
                .iter()
                .map(|v| v.outcome)
                .find(|o| tied.contains(o))
                .unwrap_or(first);
            (outcome, ResolutionRule::PrecedenceTieBreak)
        };
        Ok(self.resolved(&ordered, outcome, rule))
    }

    /// Resolve and synthesize the plan. Consumes the aggregator.
    pub fn resolve(
        mut self,
        practice: &Practice,
        context: &Context,
        bridge: &SchematismBridge,
    ) -> AggregateResult<AggregatedPlan> {
        let resolution = self.resolution()?;
        self.transition(AggregatorState::Resolved);

        let scores = self.scores();
        let verdicts: Vec<Verdict> = self.ordered().into_iter().cloned().collect();
        let mut caveats = plan::verdict_caveats(&verdicts);

        let mut overall = resolution.outcome;
        if resolution.rule.is_contested()
            && overall.is_definite()
            && resolution.confidence.get() < self.threshold
        {
            debug!(
                practice = %practice.id,
                was = %overall,
                confidence = resolution.confidence.get(),
                threshold = self.threshold,
                "contested verdict below threshold"
            );
            caveats.push(Caveat {
                kind: CaveatKind::BelowThreshold,
                imperative: None,
                message: format!(
                    "{} verdict '{}' downgraded: combined confidence {} is below the threshold {:.2}",
                    resolution.rule, overall, resolution.confidence, self.threshold
                ),
            });
            overall = Outcome::Indeterminate;
        }

        let dissent = verdicts
            .iter()
            .filter(|v| v.outcome != resolution.outcome)
            .map(|v| v.imperative)
            .collect();
        let actions = plan::prioritize(&verdicts, overall, &self.weights, context, bridge);
        let boundary = BoundaryReport::from_claims(verdicts.iter().flat_map(|v| &v.claims));

        Ok(AggregatedPlan {
            practice_id: practice.id.clone(),
            overall_verdict: overall,
            confidence: resolution.confidence,
            rule: resolution.rule,
            verdicts,
            scores,
            dissent,
            caveats,
            actions,
            boundary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imperative::EvaluatorError;
    use crate::principle::Principle;

    fn verdict(imperative: Imperative, outcome: Outcome, confidence: f64) -> Verdict {
        Verdict {
            imperative,
            outcome,
            confidence: Confidence::new(confidence),
            rationale: String::new(),
            supporting: Vec::new(),
            negative: Vec::new(),
            remedies: vec![format!("fix {imperative}")],
            claims: Vec::new(),
            unassessed: Vec::new(),
            cause: None,
            adjustments: Vec::new(),
        }
    }

    fn weighed(weights: PrincipleWeights, outcomes: [(Outcome, f64); 3]) -> Aggregator {
        let mut aggregator = Aggregator::new(weights, 0.75);
        for (imperative, (outcome, confidence)) in Imperative::PRECEDENCE.into_iter().zip(outcomes) {
            aggregator
                .collect(Ok(verdict(imperative, outcome, confidence)))
                .unwrap();
        }
        aggregator.weigh().unwrap();
        aggregator
    }

    fn plan(aggregator: Aggregator) -> AggregatedPlan {
        aggregator
            .resolve(
                &Practice::new("p", "d"),
                &Context::new(),
                &SchematismBridge::standard().unwrap(),
            )
            .unwrap()
    }

    // PRECEDENCE order: humanity, kingdom, universal law.

    #[test]
    fn humanity_violation_wins_under_any_weights() {
        let weightings = [
            PrincipleWeights::default(),
            PrincipleWeights::uniform(0.0),
            PrincipleWeights::uniform(1.0),
            PrincipleWeights::uniform(1.0)
                .with(Principle::Humanity, 0.0)
                .with(Principle::Dignity, 0.0)
                .with(Principle::Autonomy, 0.0),
        ];
        for weights in weightings {
            let plan = plan(weighed(
                weights,
                [
                    (Outcome::Violates, 0.3),
                    (Outcome::Aligned, 0.95),
                    (Outcome::Aligned, 0.95),
                ],
            ));
            assert_eq!(plan.overall_verdict, Outcome::Violates);
            assert_eq!(plan.rule, ResolutionRule::DignityPrecedence);
            assert_eq!(
                plan.dissent,
                vec![Imperative::KingdomOfEnds, Imperative::UniversalLaw]
            );
        }
    }

    #[test]
    fn unanimity_keeps_outcome_and_bounds_confidence() {
        let plan = plan(weighed(
            PrincipleWeights::default(),
            [
                (Outcome::Aligned, 0.9),
                (Outcome::Aligned, 0.8),
                (Outcome::Aligned, 0.85),
            ],
        ));
        assert_eq!(plan.overall_verdict, Outcome::Aligned);
        assert_eq!(plan.rule, ResolutionRule::Unanimous);
        assert!(plan.confidence.get() >= 0.8);
        assert!(plan.caveats.is_empty());
    }

    #[test]
    fn lone_universal_law_violation_stands() {
        let plan = plan(weighed(
            PrincipleWeights::default(),
            [
                (Outcome::Aligned, 0.95),
                (Outcome::Aligned, 0.95),
                (Outcome::Violates, 0.9),
            ],
        ));
        assert_eq!(plan.rule, ResolutionRule::StandingViolation);
        assert_eq!(plan.overall_verdict, Outcome::Violates);
        assert_eq!(plan.confidence, Confidence::new(0.9));
        assert_eq!(
            plan.dissent,
            vec![Imperative::HumanityAsEnd, Imperative::KingdomOfEnds]
        );
        assert_eq!(plan.actions[0].kind, ActionKind::Remedy);
    }

    #[test]
    fn withheld_pillar_does_not_drag_agreeing_violations() {
        let plan = plan(weighed(
            PrincipleWeights::default(),
            [
                (Outcome::Indeterminate, 0.5),
                (Outcome::Violates, 0.95),
                (Outcome::Violates, 0.95),
            ],
        ));
        assert_eq!(plan.rule, ResolutionRule::StandingViolation);
        assert_eq!(plan.overall_verdict, Outcome::Violates);
        assert_eq!(plan.confidence, Confidence::new(0.95));
        assert!(
            plan.caveats
                .iter()
                .all(|c| c.kind != CaveatKind::BelowThreshold)
        );
    }

    #[test]
    fn weak_standing_violation_is_indeterminate() {
        let plan = plan(weighed(
            PrincipleWeights::default(),
            [
                (Outcome::Aligned, 0.9),
                (Outcome::Aligned, 0.9),
                (Outcome::Violates, 0.2),
            ],
        ));
        assert_eq!(plan.rule, ResolutionRule::StandingViolation);
        assert_eq!(plan.overall_verdict, Outcome::Indeterminate);
        assert_eq!(plan.caveats.len(), 1);
        assert_eq!(plan.caveats[0].kind, CaveatKind::BelowThreshold);
        assert_eq!(plan.actions_of(ActionKind::Remedy).count(), 1);
    }

    #[test]
    fn zero_weight_lets_aligned_outvote_a_violation() {
        let weights = PrincipleWeights::default()
            .with(Principle::Universality, 0.0)
            .with(Principle::Transparency, 0.0);
        let plan = plan(weighed(
            weights,
            [
                (Outcome::Aligned, 0.95),
                (Outcome::Aligned, 0.95),
                (Outcome::Violates, 0.9),
            ],
        ));
        assert_eq!(plan.rule, ResolutionRule::WeightedMajority);
        assert_eq!(plan.overall_verdict, Outcome::Aligned);
        assert_eq!(plan.dissent, vec![Imperative::UniversalLaw]);
    }

    #[test]
    fn weighted_majority_below_threshold_is_indeterminate() {
        let plan = plan(weighed(
            PrincipleWeights::default(),
            [
                (Outcome::Aligned, 0.6),
                (Outcome::Indeterminate, 0.5),
                (Outcome::Aligned, 0.7),
            ],
        ));
        assert_eq!(plan.rule, ResolutionRule::WeightedMajority);
        assert_eq!(plan.overall_verdict, Outcome::Indeterminate);
        assert_eq!(plan.dissent, vec![Imperative::KingdomOfEnds]);
        let kinds: Vec<CaveatKind> = plan.caveats.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![CaveatKind::IndeterminatePillar, CaveatKind::BelowThreshold]
        );
    }

    #[test]
    fn confident_weighted_majority_ignores_the_withheld_pillar() {
        let plan = plan(weighed(
            PrincipleWeights::default(),
            [
                (Outcome::Aligned, 0.95),
                (Outcome::Indeterminate, 0.5),
                (Outcome::Aligned, 0.95),
            ],
        ));
        assert_eq!(plan.rule, ResolutionRule::WeightedMajority);
        assert_eq!(plan.overall_verdict, Outcome::Aligned);
        assert_eq!(plan.confidence, Confidence::new(0.95));
    }

    #[test]
    fn ties_go_to_the_higher_precedence_imperative() {
        let aggregator = weighed(
            PrincipleWeights::uniform(1.0),
            [
                (Outcome::Aligned, 0.8),
                (Outcome::Indeterminate, 0.4),
                (Outcome::Indeterminate, 0.4),
            ],
        );
        let resolution = aggregator.resolution().unwrap();
        assert_eq!(resolution.rule, ResolutionRule::PrecedenceTieBreak);
        // Humanity-as-End outranks the other two.
        assert_eq!(resolution.outcome, Outcome::Aligned);
        assert_eq!(resolution.confidence, Confidence::new(0.8));

        let plan = plan(aggregator);
        assert!((plan.scores.aligned - plan.scores.indeterminate).abs() < 1e-12);
        assert_eq!(plan.overall_verdict, Outcome::Aligned);
    }

    #[test]
    fn errors_become_indeterminate_with_cause() {
        let mut aggregator = Aggregator::new(PrincipleWeights::default(), 0.75);
        for imperative in Imperative::PRECEDENCE {
            aggregator
                .collect(Err(EvaluatorError::insufficient(
                    imperative,
                    vec!["stakeholder effects".into()],
                )))
                .unwrap();
        }
        aggregator.weigh().unwrap();
        let plan = plan(aggregator);
        assert_eq!(plan.overall_verdict, Outcome::Indeterminate);
        assert_eq!(plan.rule, ResolutionRule::Unanimous);
        assert_eq!(plan.caveats.len(), 3);
        assert!(
            plan.caveats
                .iter()
                .all(|c| c.kind == CaveatKind::IndeterminatePillar)
        );
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].kind, ActionKind::GatherEvidence);
        assert_eq!(plan.actions[0].description, "Provide stakeholder effects");
    }

    #[test]
    fn state_machine_rejects_out_of_order_calls() {
        let mut aggregator = Aggregator::new(PrincipleWeights::default(), 0.75);
        assert_eq!(aggregator.state(), AggregatorState::Collecting);
        assert!(matches!(
            aggregator.resolution(),
            Err(AggregateError::InvalidTransition { .. })
        ));

        aggregator
            .collect(Ok(verdict(Imperative::UniversalLaw, Outcome::Aligned, 0.9)))
            .unwrap();
        assert!(matches!(
            aggregator.collect(Ok(verdict(Imperative::UniversalLaw, Outcome::Aligned, 0.9))),
            Err(AggregateError::DuplicateVerdict { .. })
        ));
        assert!(matches!(
            aggregator.weigh(),
            Err(AggregateError::MissingVerdict {
                imperative: Imperative::HumanityAsEnd
            })
        ));

        aggregator
            .collect(Ok(verdict(Imperative::HumanityAsEnd, Outcome::Aligned, 0.9)))
            .unwrap();
        aggregator
            .collect(Ok(verdict(Imperative::KingdomOfEnds, Outcome::Aligned, 0.9)))
            .unwrap();
        aggregator.weigh().unwrap();
        assert_eq!(aggregator.state(), AggregatorState::Weighing);
        assert!(matches!(
            aggregator.collect(Ok(verdict(Imperative::KingdomOfEnds, Outcome::Aligned, 0.9))),
            Err(AggregateError::InvalidTransition { .. })
        ));
        assert!(matches!(
            aggregator.weigh(),
            Err(AggregateError::InvalidTransition { .. })
        ));
    }
}

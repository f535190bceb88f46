//! Kingdom-of-Ends: could every declared stakeholder class endorse the practice?

use crate::context::Context;
use crate::practice::{EffectKind, Practice};
use crate::principle::Imperative;
use crate::schematism::{Facet, Grounding, Polarity};

use super::{
    Assessment, Evaluator, EvaluatorError, EvaluatorResult, Outcome, describe_all, push_unique,
};

/// Confidence lost per affected stakeholder the context never declared.
const UNDECLARED_PENALTY: f64 = 0.05;

#[derive(Debug, Clone, Copy, Default)]
pub struct KingdomEvaluator;

impl KingdomEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Stakeholders bearing a burden with neither a reciprocal benefit nor a
    /// stated justification.
    pub fn asymmetric(practice: &Practice, stakeholders: &[String]) -> Vec<String> {
        stakeholders
            .iter()
            .filter(|s| {
                let mut burdens = practice.effects_for(s).filter(|e| e.kind.is_burden());
                let benefits = practice
                    .effects_for(s)
                    .any(|e| e.kind == EffectKind::Benefit);
                !benefits && burdens.any(|e| !e.is_justified())
            })
            .cloned()
            .collect()
    }
}

impl Evaluator for KingdomEvaluator {
    fn imperative(&self) -> Imperative {
        Imperative::KingdomOfEnds
    }

    fn assess(
        &self,
        practice: &Practice,
        context: &Context,
        grounding: &Grounding,
    ) -> EvaluatorResult<Assessment> {
        let declared = context.stakeholder_keys();

        let mut missing = Vec::new();
        if declared.is_empty() {
            missing.push("declared stakeholders".to_string());
        }
        if practice.effects.is_empty() {
            missing.push("stakeholder effects".to_string());
        } else {
            for stakeholder in &declared {
                if practice.effects_for(stakeholder).next().is_none() {
                    missing.push(format!("effects on {stakeholder}"));
                }
            }
        }
        if !missing.is_empty() {
            return Err(EvaluatorError::insufficient(Imperative::KingdomOfEnds, missing));
        }

        let mut everyone = declared.clone();
        let undeclared: Vec<String> = practice
            .affected_stakeholders()
            .into_iter()
            .filter(|s| !declared.contains(s))
            .collect();
        everyone.extend(undeclared.iter().cloned());

        let asymmetric = Self::asymmetric(practice, &everyone);
        let exclusion: Vec<_> = grounding.with_facet(Facet::Exclusion).collect();

        let factor = (1.0 - UNDECLARED_PENALTY * undeclared.len() as f64).max(0.5);
        let confidence = practice.clarity().scale(factor);

        let mut assessment = if asymmetric.is_empty() && exclusion.is_empty() {
            Assessment::new(
                Outcome::Aligned,
                confidence,
                format!(
                    "Every stakeholder class ({}) could endorse the practice.",
                    everyone.join(", ")
                ),
            )
        } else {
            let mut reasons = Vec::new();
            if !asymmetric.is_empty() {
                reasons.push(format!(
                    "{} bear costs with no reciprocal benefit or stated justification",
                    asymmetric.join(", ")
                ));
            }
            if !exclusion.is_empty() {
                reasons.push("a stakeholder class is explicitly excluded".to_string());
            }
            Assessment::new(
                Outcome::Violates,
                confidence,
                format!("Not every stakeholder could endorse it: {}.", reasons.join("; ")),
            )
        };

        assessment.supporting = describe_all(
            grounding
                .matches()
                .filter(|m| m.polarity() == Polarity::Upholds),
        );
        assessment.negative = describe_all(exclusion.iter().copied());
        for stakeholder in &asymmetric {
            assessment.negative.push(format!("unreciprocated burden on {stakeholder}"));
            push_unique(
                &mut assessment.remedies,
                format!("Give {stakeholder} a reciprocal benefit or state why their burden is justified"),
            );
        }
        for m in &exclusion {
            push_unique(
                &mut assessment.remedies,
                format!("Open the practice to the class excluded by \"{}\"", m.excerpt),
            );
        }

        Ok(assessment)
    }
}

//! Universal-Law: could every actor adopt the practice without it defeating itself?

use crate::confidence::Confidence;
use crate::context::Context;
use crate::practice::Practice;
use crate::principle::Imperative;
use crate::schematism::{Facet, Grounding, IndicatorMatch, Polarity};

use super::{Assessment, Evaluator, EvaluatorResult, Outcome, describe_all, push_unique};

/// Results of simulating universal adoption.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniversalChecks {
    /// The maxim cannot hold for everyone at once (a forced curve).
    pub contradiction: Vec<IndicatorMatch>,
    /// The maxim depends on someone being exempt.
    pub exemption: Vec<IndicatorMatch>,
    /// Universal adoption destroys a precondition (trust, disclosure).
    pub erosion: Vec<IndicatorMatch>,
}

impl UniversalChecks {
    pub fn passed(&self) -> bool {
        self.contradiction.is_empty() && self.exemption.is_empty() && self.erosion.is_empty()
    }

    fn failures(&self) -> impl Iterator<Item = &IndicatorMatch> {
        self.contradiction
            .iter()
            .chain(&self.exemption)
            .chain(&self.erosion)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalLawEvaluator;

impl UniversalLawEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Run the three universalization checks over a grounding.
    pub fn simulate(grounding: &Grounding) -> UniversalChecks {
        UniversalChecks {
            contradiction: grounding.with_facet(Facet::Contradiction).cloned().collect(),
            exemption: grounding.with_facet(Facet::Exemption).cloned().collect(),
            erosion: grounding.with_facet(Facet::Erosion).cloned().collect(),
        }
    }
}

impl Evaluator for UniversalLawEvaluator {
    fn imperative(&self) -> Imperative {
        Imperative::UniversalLaw
    }

    fn assess(
        &self,
        practice: &Practice,
        _context: &Context,
        grounding: &Grounding,
    ) -> EvaluatorResult<Assessment> {
        // Only the practice text is read; an empty grounding is gated as unassessed.
        let checks = Self::simulate(grounding);
        let confidence: Confidence = practice.clarity();

        let mut assessment = if checks.passed() {
            Assessment::new(
                Outcome::Aligned,
                confidence,
                "Universal adoption neither contradicts the practice, relies on an exemption, \
                 nor erodes its own preconditions.",
            )
        } else {
            let mut failed = Vec::new();
            if !checks.contradiction.is_empty() {
                failed.push("self-contradiction");
            }
            if !checks.exemption.is_empty() {
                failed.push("dependence on exemption");
            }
            if !checks.erosion.is_empty() {
                failed.push("erosion of its preconditions");
            }
            Assessment::new(
                Outcome::Violates,
                confidence,
                format!("Universalized, the practice fails: {}.", failed.join(", ")),
            )
        };

        assessment.supporting = describe_all(
            grounding
                .matches()
                .filter(|m| m.polarity() == Polarity::Upholds),
        );
        assessment.negative = describe_all(checks.failures());

        for m in &checks.contradiction {
            push_unique(
                &mut assessment.remedies,
                format!(
                    "Replace the {} with criterion-referenced standards every learner can meet at once",
                    m.excerpt
                ),
            );
        }
        for m in &checks.exemption {
            push_unique(
                &mut assessment.remedies,
                format!("Remove the exemption ({}) so one rule binds every participant", m.excerpt),
            );
        }
        for m in &checks.erosion {
            push_unique(
                &mut assessment.remedies,
                format!(
                    "Drop the {} element; adopted by everyone it destroys the trust the practice needs",
                    m.excerpt
                ),
            );
        }

        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schematism::SchematismBridge;
    use crate::practice::StakeholderEffect;

    fn assess(practice: &Practice) -> EvaluatorResult<Assessment> {
        let bridge = SchematismBridge::standard().unwrap();
        let context = Context::new();
        let grounding =
            bridge.ground_all(Imperative::UniversalLaw.principles(), practice, &context);
        UniversalLawEvaluator.assess(practice, &context, &grounding)
    }

    #[test]
    fn forced_curve_is_self_contradictory() {
        let practice = Practice::new("curve", "grade students strictly on a forced curve")
            .with_effect(StakeholderEffect::cost("students", "half must receive low grades"));
        let assessment = assess(&practice).unwrap();
        assert_eq!(assessment.outcome, Outcome::Violates);
        assert!(assessment.rationale.contains("self-contradiction"));
        assert!(assessment.remedies[0].contains("forced curve"));
    }

    #[test]
    fn exemption_and_erosion_fail() {
        let exempt = Practice::new("e", "late penalties, except for privileged students")
            .with_effect(StakeholderEffect::cost("students", "lose marks"));
        assert_eq!(assess(&exempt).unwrap().outcome, Outcome::Violates);

        let covert = Practice::new("c", "covert monitoring of student chats")
            .with_effect(StakeholderEffect::cost("students", "privacy loss"));
        let assessment = assess(&covert).unwrap();
        assert_eq!(assessment.outcome, Outcome::Violates);
        assert!(assessment.rationale.contains("erosion"));
    }

    #[test]
    fn shared_criteria_are_aligned() {
        let practice = Practice::new("rubric", "publish one rubric and apply the same criteria to all students")
            .with_effect(StakeholderEffect::benefit("students", "know what is expected"));
        let assessment = assess(&practice).unwrap();
        assert_eq!(assessment.outcome, Outcome::Aligned);
        assert!(!assessment.supporting.is_empty());
        assert!(assessment.remedies.is_empty());
    }

    #[test]
    fn description_alone_is_enough() {
        let assessment = assess(&Practice::new("p", "grade students strictly on a forced curve")).unwrap();
        assert_eq!(assessment.outcome, Outcome::Violates);
        assert_eq!(assessment.confidence, Practice::new("q", "x").clarity());
    }

    #[test]
    fn hedged_descriptions_get_lower_confidence() {
        let crisp = Practice::new("a", "grade on a forced curve")
            .with_effect(StakeholderEffect::cost("students", "x"));
        let hedged = Practice::new("b", "maybe grade on a forced curve sometimes, as needed")
            .with_effect(StakeholderEffect::cost("students", "x"));
        assert!(assess(&hedged).unwrap().confidence < assess(&crisp).unwrap().confidence);
    }
}

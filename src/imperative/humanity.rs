//! Humanity-as-End: is any stakeholder treated merely as a means?
//!
//! Signals are judged per stakeholder. A benefit returned to one class never
//! offsets instrumental use of another. Signals found in the description or
//! the context fields name nobody and are judged against the practice as a whole.

use std::collections::BTreeMap;

use crate::context::Context;
use crate::practice::Practice;
use crate::principle::Imperative;
use crate::schematism::{Facet, Grounding, IndicatorMatch};

use super::{
    Assessment, Evaluator, EvaluatorError, EvaluatorResult, IndeterminacyCause, Outcome,
    describe_all, push_unique,
};

/// Confidence ceiling when instrumental and respecting signals coexist.
pub const MIXED_CEILING: f64 = 0.6;

/// Confidence factor when neither kind of signal was found.
const SILENT_FACTOR: f64 = 0.7;

/// Disrespecting and respecting signals aimed at one stakeholder, or at
/// nobody in particular under the `None` key.
#[derive(Debug, Default)]
struct Treatment<'g> {
    disrespect: Vec<&'g IndicatorMatch>,
    respect: Vec<&'g IndicatorMatch>,
}

fn treatments(grounding: &Grounding) -> BTreeMap<Option<&str>, Treatment<'_>> {
    let mut by_stakeholder: BTreeMap<Option<&str>, Treatment<'_>> = BTreeMap::new();
    for m in grounding.matches() {
        let treatment = by_stakeholder.entry(m.stakeholder()).or_default();
        match m.facet {
            Facet::Instrumental | Facet::Degradation => treatment.disrespect.push(m),
            Facet::Respect => treatment.respect.push(m),
            _ => {}
        }
    }
    by_stakeholder
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HumanityEvaluator;

impl HumanityEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Share of declared stakeholders the practice describes effects for.
    fn coverage(practice: &Practice, context: &Context) -> f64 {
        let declared = context.stakeholder_keys();
        if declared.is_empty() {
            return 1.0;
        }
        let covered = declared
            .iter()
            .filter(|s| practice.effects_for(s).next().is_some())
            .count();
        covered as f64 / declared.len() as f64
    }
}

impl Evaluator for HumanityEvaluator {
    fn imperative(&self) -> Imperative {
        Imperative::HumanityAsEnd
    }

    fn assess(
        &self,
        practice: &Practice,
        context: &Context,
        grounding: &Grounding,
    ) -> EvaluatorResult<Assessment> {
        if practice.effects.is_empty() {
            return Err(EvaluatorError::insufficient(
                Imperative::HumanityAsEnd,
                vec!["stakeholder effects".to_string()],
            ));
        }

        let treatments = treatments(grounding);
        let disrespect: Vec<&IndicatorMatch> = treatments
            .values()
            .flat_map(|t| t.disrespect.iter().copied())
            .collect();
        let respect: Vec<&IndicatorMatch> = treatments
            .values()
            .flat_map(|t| t.respect.iter().copied())
            .collect();

        // A named stakeholder needs respect of its own; unnamed signals
        // are offset by any respect at all.
        let mut used_as_means = Vec::new();
        let mut mixed = false;
        for (&stakeholder, treatment) in &treatments {
            if treatment.disrespect.is_empty() {
                continue;
            }
            let respected = match stakeholder {
                Some(_) => !treatment.respect.is_empty(),
                None => !respect.is_empty(),
            };
            if respected {
                mixed = true;
            } else {
                used_as_means.push(stakeholder.unwrap_or("unnamed stakeholders"));
            }
        }

        let confidence = practice
            .clarity()
            .scale(0.5 + 0.5 * Self::coverage(practice, context));

        let mut assessment = match (used_as_means.is_empty(), mixed, respect.is_empty()) {
            (false, _, _) => Assessment::new(
                Outcome::Violates,
                confidence,
                format!(
                    "The practice uses {} as instruments without any sign of respect for \
                     them as ends.",
                    used_as_means.join(", ")
                ),
            ),
            (true, true, _) => {
                let mut assessment = Assessment::new(
                    Outcome::Indeterminate,
                    confidence.cap(MIXED_CEILING),
                    "Instrumental and dignity-respecting signals are both present.",
                );
                assessment.cause = Some(IndeterminacyCause::MixedEffects {
                    instrumental: describe_all(disrespect.iter().copied()),
                    respecting: describe_all(respect.iter().copied()),
                });
                assessment
            }
            (true, false, false) => Assessment::new(
                Outcome::Aligned,
                confidence,
                "Stakeholders are treated as ends: their voice, agency, or benefit is part of the practice.",
            ),
            (true, false, true) => Assessment::new(
                Outcome::Aligned,
                confidence.scale(SILENT_FACTOR),
                "No sign of instrumental treatment, though no explicit respect either.",
            ),
        };

        assessment.supporting = describe_all(respect.iter().copied());
        assessment.negative = describe_all(disrespect.iter().copied());

        for m in &disrespect {
            let remedy = match (m.facet, m.stakeholder()) {
                (Facet::Degradation, _) => {
                    format!("Remove the degrading element ({})", m.excerpt)
                }
                (_, Some(stakeholder)) => format!(
                    "Return a direct benefit to {stakeholder} or stop using them as a means"
                ),
                (_, None) => format!(
                    "Rework \"{}\" so affected stakeholders share in what the practice produces",
                    m.excerpt
                ),
            };
            push_unique(&mut assessment.remedies, remedy);
        }

        Ok(assessment)
    }
}

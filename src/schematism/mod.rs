//! Schematism bridge: grounding abstract principles in concrete practice data.
//!
//! The bridge holds a table of indicator predicates per principle. Grounding a
//! principle runs its indicators over the normalized practice text, the
//! stakeholder effects, and the context fields. An instance with no matches
//! means the principle is unassessed, which the boundary gate treats as
//! out of boundary rather than as approval.

pub mod indicator;
pub mod table;

use tracing::trace;
use unicode_normalization::UnicodeNormalization;

use crate::context::Context;
use crate::error::ConfigResult;
use crate::learner::{ConceptualDomain, LearnerProfile};
use crate::practice::{Practice, stakeholder_key};
use crate::principle::Principle;

pub use indicator::{Facet, Indicator, IndicatorMatch, Locus, Matcher, Polarity};
pub use table::{Exemplar, PARTICIPATION_CLAUSE, standard_exemplars, standard_indicators};

/// NFKC-normalize and lower-case text before matching.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

// ---------------------------------------------------------------------------
// Grounded instances
// ---------------------------------------------------------------------------

/// Every indicator match for one principle.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedInstance {
    pub principle: Principle,
    pub matches: Vec<IndicatorMatch>,
}

impl GroundedInstance {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn with_facet(&self, facet: Facet) -> impl Iterator<Item = &IndicatorMatch> {
        self.matches.iter().filter(move |m| m.facet == facet)
    }
}

/// The grounded instances behind one imperative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grounding {
    pub instances: Vec<GroundedInstance>,
}

impl Grounding {
    pub fn instance(&self, principle: Principle) -> Option<&GroundedInstance> {
        self.instances.iter().find(|i| i.principle == principle)
    }

    pub fn matches(&self) -> impl Iterator<Item = &IndicatorMatch> {
        self.instances.iter().flat_map(|i| i.matches.iter())
    }

    pub fn with_facet(&self, facet: Facet) -> impl Iterator<Item = &IndicatorMatch> {
        self.matches().filter(move |m| m.facet == facet)
    }

    pub fn has_facet(&self, facet: Facet) -> bool {
        self.with_facet(facet).next().is_some()
    }

    /// No principle produced a single match.
    pub fn is_unassessed(&self) -> bool {
        self.instances.iter().all(GroundedInstance::is_empty)
    }

    pub fn unassessed_principles(&self) -> Vec<Principle> {
        self.instances
            .iter()
            .filter(|i| i.is_empty())
            .map(|i| i.principle)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SchematismBridge
// ---------------------------------------------------------------------------

/// Normalized texts of one practice, computed once per grounding pass.
struct PracticeText {
    description: String,
    effects: Vec<String>,
}

impl PracticeText {
    fn of(practice: &Practice) -> Self {
        Self {
            description: normalize(&practice.description),
            effects: practice
                .effects
                .iter()
                .map(|e| normalize(&e.description))
                .collect(),
        }
    }
}

/// Table-driven mapping from principles to indicators and exemplars.
#[derive(Debug, Clone)]
pub struct SchematismBridge {
    indicators: Vec<Indicator>,
    exemplars: Vec<Exemplar>,
}

impl SchematismBridge {
    pub fn new(indicators: Vec<Indicator>, exemplars: Vec<Exemplar>) -> Self {
        Self {
            indicators,
            exemplars,
        }
    }

    /// The built-in tables.
    pub fn standard() -> ConfigResult<Self> {
        Ok(Self::new(standard_indicators()?, standard_exemplars()))
    }

    pub fn with_indicator(mut self, indicator: Indicator) -> Self {
        self.indicators.push(indicator);
        self
    }

    pub fn with_exemplar(mut self, exemplar: Exemplar) -> Self {
        self.exemplars.push(exemplar);
        self
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn indicators_for(&self, principle: Principle) -> impl Iterator<Item = &Indicator> {
        self.indicators
            .iter()
            .filter(move |i| i.principle == principle)
    }

    /// Ground one principle in a practice and its context.
    pub fn ground(
        &self,
        principle: Principle,
        practice: &Practice,
        context: &Context,
    ) -> GroundedInstance {
        self.ground_with(principle, practice, &PracticeText::of(practice), context)
    }

    /// Ground several principles, normalizing the practice text once.
    pub fn ground_all(
        &self,
        principles: &[Principle],
        practice: &Practice,
        context: &Context,
    ) -> Grounding {
        let text = PracticeText::of(practice);
        Grounding {
            instances: principles
                .iter()
                .map(|p| self.ground_with(*p, practice, &text, context))
                .collect(),
        }
    }

    fn ground_with(
        &self,
        principle: Principle,
        practice: &Practice,
        text: &PracticeText,
        context: &Context,
    ) -> GroundedInstance {
        let mut matches = Vec::new();
        for indicator in self.indicators_for(principle) {
            let hit = |locus: Locus, excerpt: &str| IndicatorMatch {
                indicator: indicator.name.clone(),
                principle,
                facet: indicator.facet,
                locus,
                excerpt: excerpt.to_string(),
                field: indicator.field.clone(),
            };

            match &indicator.matcher {
                Matcher::Text(regex) => {
                    if let Some(m) = regex.find(&text.description) {
                        matches.push(hit(Locus::Description, m.as_str()));
                    }
                    for (index, (effect, effect_text)) in
                        practice.effects.iter().zip(&text.effects).enumerate()
                    {
                        if let Some(m) = regex.find(effect_text) {
                            let locus = Locus::Effect {
                                stakeholder: stakeholder_key(&effect.stakeholder),
                                index,
                            };
                            matches.push(hit(locus, m.as_str()));
                        }
                    }
                }
                Matcher::Effect(kind) => {
                    for (index, effect) in practice.effects.iter().enumerate() {
                        if effect.kind == *kind {
                            let locus = Locus::Effect {
                                stakeholder: stakeholder_key(&effect.stakeholder),
                                index,
                            };
                            matches.push(hit(locus, &effect.description));
                        }
                    }
                }
                Matcher::Field(name) => {
                    if let Some(field) = context.fields.get(name) {
                        matches.push(hit(Locus::Field { name: name.clone() }, &field.value));
                    }
                }
            }
        }

        trace!(%principle, practice = %practice.id, matches = matches.len(), "grounded principle");
        GroundedInstance { principle, matches }
    }

    /// Concrete, learner-specific examples of a principle.
    ///
    /// Templates whose placeholders cannot all be filled from the learner and
    /// domain are skipped.
    pub fn exemplify(
        &self,
        principle: Principle,
        learner: &LearnerProfile,
        domain: Option<&ConceptualDomain>,
    ) -> Vec<String> {
        let concept = domain.and_then(|d| d.next_concepts(learner).first().copied());
        let values: [(&str, Option<&str>); 6] = [
            ("{learner}", Some(learner.display_name())),
            ("{interest}", learner.interests.first().map(String::as_str)),
            ("{strength}", learner.strengths.first().map(String::as_str)),
            ("{need}", learner.needs.first().map(String::as_str)),
            ("{domain}", domain.map(|d| d.name.as_str())),
            ("{concept}", concept),
        ];

        self.exemplars
            .iter()
            .filter(|e| e.principle == principle)
            .filter_map(|e| fill(&e.template, &values))
            .collect()
    }
}

fn fill(template: &str, values: &[(&str, Option<&str>)]) -> Option<String> {
    let mut out = template.to_string();
    for &(placeholder, value) in values {
        if out.contains(placeholder) {
            out = out.replace(placeholder, value?);
        }
    }
    Some(out)
}

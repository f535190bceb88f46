//! The built-in indicator and exemplar tables.
//!
//! These rows are a starting vocabulary for classroom practices. Adding a
//! principle's indicators here is all it takes for the evaluators to see
//! them; no evaluator code changes.

use crate::error::ConfigResult;
use crate::practice::EffectKind;
use crate::principle::Principle;

use super::indicator::{Facet, Indicator};

/// Load-bearing context field for participation-based autonomy claims.
pub const PARTICIPATION_CLAUSE: &str = "participation_clause";

/// A template used to render a concrete, learner-specific example.
///
/// Placeholders: `{learner}`, `{interest}`, `{strength}`, `{need}`,
/// `{domain}`, `{concept}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exemplar {
    pub principle: Principle,
    pub template: String,
}

impl Exemplar {
    pub fn new(principle: Principle, template: impl Into<String>) -> Self {
        Self {
            principle,
            template: template.into(),
        }
    }
}

/// Text rows: `(name, principle, facet, pattern, load-bearing field)`.
const TEXT_ROWS: &[(&str, Principle, Facet, &str, Option<&str>)] = &[
    // ── Universality ──
    (
        "zero-sum-ranking",
        Principle::Universality,
        Facet::Contradiction,
        r"forced[- ]curve|grad(?:e|ed|ing) on a curve|bell curve|norm[- ]referenced|fixed (?:share|percentage|proportion|quota)|zero[- ]sum|rank(?:ed|ing|s)? against (?:\w+ )?(?:each other|one another|peers|classmates)",
        None,
    ),
    (
        "privileged-exemption",
        Principle::Universality,
        Facet::Exemption,
        r"\bexempt|except for (?:\w+ )?(?:privileged|selected|favou?red|certain)|special treatment|privileged (?:few|students|group)|loophole|rules? (?:do not|don't) apply to",
        None,
    ),
    (
        "trust-erosion",
        Principle::Universality,
        Facet::Erosion,
        r"decei?v|deception|\blie\b|\blying\b|\bcheat|plagiar|fabricat|falsif|manipulat|game the system",
        None,
    ),
    (
        "shared-standard",
        Principle::Universality,
        Facet::Support,
        r"\b(?:all|every|each) (?:students?|learners?|pupils?|participants?|members?)\b|\beveryone\b|collaborat|co-?creat|\bshared\b|consistent|mutual|reciprocal|same (?:rules|criteria|standards|expectations)",
        None,
    ),
    // ── Transparency ──
    (
        "concealment",
        Principle::Transparency,
        Facet::Erosion,
        r"covert|\bsecret|hidden|undisclosed|without (?:their |the )?(?:knowledge|consent)",
        None,
    ),
    (
        "open-criteria",
        Principle::Transparency,
        Facet::Support,
        r"transparen|publish|rubric|disclos|\binformed\b|clear criteria",
        None,
    ),
    // ── Humanity ──
    (
        "mere-means",
        Principle::Humanity,
        Facet::Instrumental,
        r"(?:used|treated|exploited) (?:only|solely|merely|purely) (?:as|to|for)|\bas (?:a )?(?:mere )?means\b|(?:only|solely|merely|purely) (?:to|for) (?:produce|generate|boost|raise|inflate|improve) (?:the )?(?:institution(?:al|'s)? |school(?:'s)? )?(?:metrics?|rankings?|ratings?|statistics|reputation|numbers)|no benefit (?:is )?returned|data (?:is |are )?(?:harvested|mined|sold)",
        None,
    ),
    (
        "ends-in-themselves",
        Principle::Humanity,
        Facet::Respect,
        r"dignity|\brespect|as ends|well-?being|flourish",
        None,
    ),
    // ── Dignity ──
    (
        "degradation",
        Principle::Dignity,
        Facet::Degradation,
        r"humiliat|\bshame|\bshaming|public(?:ly)? rank(?:ing)? of grades|public(?:ly)? post(?:ed|ing)? grades|degrad|belittl|ridicul",
        None,
    ),
    (
        "voice-and-recognition",
        Principle::Dignity,
        Facet::Respect,
        r"\bvoice\b|listen(?:s|ed|ing)? to|consent|agency|ownership|recogni[sz]",
        None,
    ),
    // ── Autonomy ──
    (
        "participation",
        Principle::Autonomy,
        Facet::Respect,
        r"co-?creat|student voice|\bchoices?\b|\bchoose\b|participat|collaborat|self-direct|negotiat",
        Some(PARTICIPATION_CLAUSE),
    ),
    (
        "coercion",
        Principle::Autonomy,
        Facet::Instrumental,
        r"forced to|compel|coerc|mandatory (?:participation|disclosure)|no (?:opt-?out|choice)",
        None,
    ),
    // ── Beneficence ──
    (
        "growth",
        Principle::Beneficence,
        Facet::Support,
        r"\bsupport|\bhelp|improv|growth|\blearn(?:s|ing)?\b|feedback|scaffold|mentor",
        None,
    ),
    // ── Justice ──
    (
        "fair-terms",
        Principle::Justice,
        Facet::Support,
        r"\bfair|equit|impartial|\bequal|same rules|co-?creat|collaborat|\bshared\b|together",
        None,
    ),
    (
        "exclusion",
        Principle::Justice,
        Facet::Exclusion,
        r"exclud|shut out|barred from|den(?:y|ied|ies) access|only (?:for |open to )?(?:the )?(?:top|best|wealthy|gifted|privileged)",
        None,
    ),
    // ── Inclusivity ──
    (
        "access",
        Principle::Inclusivity,
        Facet::Support,
        r"inclus|accessib|accommodat|divers|universal design|every learner|all learners|differentiat",
        None,
    ),
    (
        "segregation",
        Principle::Inclusivity,
        Facet::Exclusion,
        r"segregat|tracked into|streamed into|not (?:open|available) to",
        None,
    ),
];

/// The built-in indicator table.
pub fn standard_indicators() -> ConfigResult<Vec<Indicator>> {
    let mut indicators = Vec::with_capacity(TEXT_ROWS.len() + 12);
    for &(name, principle, facet, pattern, field) in TEXT_ROWS {
        let mut indicator = Indicator::text(name, principle, facet, pattern)?;
        if let Some(field) = field {
            indicator = indicator.requires_field(field);
        }
        indicators.push(indicator);
    }

    indicators.extend([
        Indicator::effect(
            "instrumental-effect",
            Principle::Humanity,
            Facet::Instrumental,
            EffectKind::Instrumental,
        ),
        Indicator::effect(
            "benefit-effect",
            Principle::Humanity,
            Facet::Respect,
            EffectKind::Benefit,
        ),
        Indicator::effect(
            "benefit-effect",
            Principle::Beneficence,
            Facet::Support,
            EffectKind::Benefit,
        ),
        Indicator::effect("cost-effect", Principle::Justice, Facet::Burden, EffectKind::Cost),
        Indicator::effect(
            "instrumental-effect",
            Principle::Justice,
            Facet::Burden,
            EffectKind::Instrumental,
        ),
        Indicator::field(
            "published-criteria",
            Principle::Transparency,
            Facet::Support,
            "published_criteria",
        ),
        Indicator::field(
            "consent-record",
            Principle::Dignity,
            Facet::Respect,
            "consent_record",
        ),
        Indicator::field(
            "participation-clause",
            Principle::Autonomy,
            Facet::Respect,
            PARTICIPATION_CLAUSE,
        ),
        Indicator::field(
            "learning-outcomes",
            Principle::Beneficence,
            Facet::Support,
            "learning_outcomes",
        ),
        Indicator::field(
            "accessibility-plan",
            Principle::Inclusivity,
            Facet::Support,
            "accessibility_plan",
        ),
    ]);

    Ok(indicators)
}

/// The built-in exemplar templates.
pub fn standard_exemplars() -> Vec<Exemplar> {
    vec![
        Exemplar::new(
            Principle::Autonomy,
            "Let {learner} choose among activities about {interest}",
        ),
        Exemplar::new(
            Principle::Autonomy,
            "Invite {learner} to set one personal goal for {concept}",
        ),
        Exemplar::new(
            Principle::Dignity,
            "Recognize {learner}'s strength in {strength} in front of peers",
        ),
        Exemplar::new(
            Principle::Humanity,
            "Ask {learner} what they want to get out of {domain}",
        ),
        Exemplar::new(
            Principle::Beneficence,
            "Scaffold {need} for {learner} with targeted support",
        ),
        Exemplar::new(
            Principle::Beneficence,
            "Give {learner} formative feedback on {concept} before grading",
        ),
        Exemplar::new(
            Principle::Inclusivity,
            "Adapt materials in {domain} for {need}",
        ),
        Exemplar::new(
            Principle::Justice,
            "Apply the same transparent criteria to {learner} as to peers in {domain}",
        ),
        Exemplar::new(
            Principle::Universality,
            "Hold {learner} to the classroom norms everyone in {domain} agreed on",
        ),
        Exemplar::new(
            Principle::Transparency,
            "Share the rubric for {concept} with {learner} in advance",
        ),
    ]
}

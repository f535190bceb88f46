//! End-to-end tests for the reasoning engine.
//!
//! These run whole practices through grounding, the three evaluators, boundary
//! gating, and aggregation, checking the plans a caller would receive.

use car_education::aggregate::{ActionKind, CaveatKind, ResolutionRule};
use car_education::config::{BoundaryStrictness, EngineConfig};
use car_education::context::Context;
use car_education::engine::{Engine, EvaluationRequest};
use car_education::error::CarError;
use car_education::history::VerdictLedger;
use car_education::imperative::{IndeterminacyCause, Outcome};
use car_education::learner::{ConceptualDomain, LearnerProfile};
use car_education::practice::{Practice, StakeholderEffect};
use car_education::principle::{Imperative, Principle, PrincipleWeights};

fn test_engine() -> Engine {
    Engine::new(EngineConfig::default()).unwrap()
}

fn forced_curve() -> (Practice, Context) {
    let practice = Practice::new("forced-curve", "grade students strictly on a forced curve")
        .with_effect(StakeholderEffect::instrumental(
            "students",
            "students are ranked against their peers solely to produce institutional ranking metrics",
        ));
    let context = Context::new().with_stakeholder("students");
    (practice, context)
}

fn plain_forced_curve() -> Practice {
    Practice::new("forced-curve", "grade students strictly on a forced curve")
}

fn co_created_norms() -> Practice {
    Practice::new(
        "co-created-norms",
        "collaboratively co-create classroom norms with students",
    )
    .with_effect(StakeholderEffect::benefit(
        "students",
        "students gain a voice in the rules that govern them",
    ))
    .with_effect(StakeholderEffect::benefit(
        "teachers",
        "teachers gain shared ownership of classroom climate",
    ))
}

fn evidenced_participation() -> Context {
    Context::new()
        .with_stakeholders(["students", "teachers"])
        .evidenced(
            "participation_clause",
            "every student votes on the norms in the first week",
        )
}

#[test]
fn forced_curve_violates_universal_law() {
    let (practice, context) = forced_curve();
    let plan = test_engine().evaluate(&practice, &context).unwrap();

    let universal = plan.verdict(Imperative::UniversalLaw).unwrap();
    assert_eq!(universal.outcome, Outcome::Violates);
    assert!(!universal.remedies.is_empty());

    assert_eq!(plan.overall_verdict, Outcome::Violates);
    assert_eq!(plan.rule, ResolutionRule::DignityPrecedence);
    assert_eq!(
        plan.actions.first().map(|a| a.kind),
        Some(ActionKind::Remedy)
    );
}

#[test]
fn forced_curve_from_description_alone_violates() {
    let context = Context::new().with_stakeholder("students");
    let plan = test_engine().evaluate(&plain_forced_curve(), &context).unwrap();

    assert_eq!(
        plan.verdict(Imperative::UniversalLaw).unwrap().outcome,
        Outcome::Violates
    );
    assert_eq!(plan.overall_verdict, Outcome::Violates);
    assert_eq!(plan.rule, ResolutionRule::StandingViolation);
}

#[test]
fn withheld_humanity_does_not_downgrade_agreeing_violations() {
    let practice = plain_forced_curve().with_effect(StakeholderEffect::cost(
        "students",
        "half of the class must receive low grades",
    ));
    let context = Context::new().with_stakeholder("students");
    let plan = test_engine().evaluate(&practice, &context).unwrap();

    let humanity = plan.verdict(Imperative::HumanityAsEnd).unwrap();
    assert_eq!(humanity.outcome, Outcome::Indeterminate);
    assert!(humanity.confidence.get() <= 0.5);
    assert_eq!(
        plan.verdict(Imperative::KingdomOfEnds).unwrap().outcome,
        Outcome::Violates
    );

    assert_eq!(plan.overall_verdict, Outcome::Violates);
    assert_eq!(plan.rule, ResolutionRule::StandingViolation);
    assert!(plan.confidence.get() >= 0.75, "confidence {}", plan.confidence);
    assert_eq!(plan.dissent, vec![Imperative::HumanityAsEnd]);
    assert!(
        plan.caveats
            .iter()
            .all(|c| c.kind != CaveatKind::BelowThreshold)
    );
}

#[test]
fn aligned_pillars_do_not_outvote_universal_law() {
    let practice = plain_forced_curve().with_effect(StakeholderEffect::benefit(
        "students",
        "a clear signal of relative standing",
    ));
    let context = Context::new().with_stakeholder("students");
    let plan = test_engine().evaluate(&practice, &context).unwrap();

    assert_eq!(
        plan.verdict(Imperative::HumanityAsEnd).unwrap().outcome,
        Outcome::Aligned
    );
    assert_eq!(
        plan.verdict(Imperative::UniversalLaw).unwrap().outcome,
        Outcome::Violates
    );
    assert_eq!(plan.overall_verdict, Outcome::Violates);
    assert_eq!(plan.rule, ResolutionRule::StandingViolation);
    assert!(plan.actions_of(ActionKind::Remedy).count() >= 1);
}

#[test]
fn benefit_to_administrators_does_not_excuse_using_students() {
    let practice = Practice::new("league", "publish school league tables")
        .with_effect(StakeholderEffect::instrumental(
            "students",
            "test scores are harvested to raise the school league position",
        ))
        .with_effect(StakeholderEffect::benefit(
            "administrators",
            "a higher league position",
        ));
    let context = Context::new().with_stakeholders(["students", "administrators"]);
    let plan = test_engine().evaluate(&practice, &context).unwrap();

    assert_eq!(
        plan.verdict(Imperative::HumanityAsEnd).unwrap().outcome,
        Outcome::Violates
    );
    assert_eq!(plan.overall_verdict, Outcome::Violates);
    assert_eq!(plan.rule, ResolutionRule::DignityPrecedence);
}

#[test]
fn co_created_norms_are_aligned_everywhere() {
    let plan = test_engine()
        .evaluate(&co_created_norms(), &evidenced_participation())
        .unwrap();

    for verdict in &plan.verdicts {
        assert_eq!(
            verdict.outcome,
            Outcome::Aligned,
            "{} was {}: {}",
            verdict.imperative,
            verdict.outcome,
            verdict.rationale
        );
    }
    assert_eq!(plan.overall_verdict, Outcome::Aligned);
    assert_eq!(plan.rule, ResolutionRule::Unanimous);
    assert!(plan.confidence.get() >= 0.8, "confidence {}", plan.confidence);
    assert!(plan.caveats.is_empty());
    assert!(plan.boundary.is_fully_evidenced());

    let lowest = plan
        .verdicts
        .iter()
        .map(|v| v.confidence)
        .fold(plan.confidence, |a, b| a.min(b));
    assert!(plan.confidence >= lowest);
}

#[test]
fn missing_effects_make_everything_indeterminate() {
    let practice = Practice::new("assemblies", "hold weekly assemblies");
    let context = Context::new().with_stakeholder("students");
    let plan = test_engine().evaluate(&practice, &context).unwrap();

    assert!(plan.verdicts.iter().all(|v| v.outcome == Outcome::Indeterminate));
    for imperative in [Imperative::HumanityAsEnd, Imperative::KingdomOfEnds] {
        assert!(matches!(
            plan.verdict(imperative).unwrap().cause,
            Some(IndeterminacyCause::InsufficientContext { .. })
        ));
    }
    // Universal-Law reads only the description, which grounds nothing here.
    assert!(matches!(
        plan.verdict(Imperative::UniversalLaw).unwrap().cause,
        Some(IndeterminacyCause::Unassessed { .. })
    ));
    assert_eq!(plan.overall_verdict, Outcome::Indeterminate);
    assert_eq!(plan.caveats.len(), 3);
    assert!(
        plan.caveats
            .iter()
            .all(|c| c.kind == CaveatKind::IndeterminatePillar)
    );
}

#[test]
fn assumed_participation_clause_withholds_humanity() {
    let context = Context::new()
        .with_stakeholders(["students", "teachers"])
        .assumed("participation_clause", "students probably get a say");
    let plan = test_engine().evaluate(&co_created_norms(), &context).unwrap();

    let humanity = plan.verdict(Imperative::HumanityAsEnd).unwrap();
    assert_eq!(humanity.outcome, Outcome::Indeterminate);
    assert!(matches!(
        humanity.cause,
        Some(IndeterminacyCause::OutOfBoundary { .. })
    ));
    assert!(!plan.boundary.unknown.is_empty());
    assert!(
        plan.actions_of(ActionKind::GatherEvidence)
            .any(|a| a.description.contains("participation_clause"))
    );
}

#[test]
fn lenient_mode_penalizes_instead_of_withholding() {
    let engine = Engine::new(EngineConfig {
        strictness: BoundaryStrictness::Lenient,
        ..EngineConfig::default()
    })
    .unwrap();
    let context = Context::new()
        .with_stakeholders(["students", "teachers"])
        .assumed("participation_clause", "students probably get a say");
    let plan = engine.evaluate(&co_created_norms(), &context).unwrap();

    let humanity = plan.verdict(Imperative::HumanityAsEnd).unwrap();
    assert_eq!(humanity.outcome, Outcome::Aligned);
    assert!(humanity.confidence.get() < 0.95);
    assert!(
        plan.caveats
            .iter()
            .any(|c| c.kind == CaveatKind::ConfidenceAdjusted)
    );
}

#[test]
fn humanity_violation_overrides_any_emphasis() {
    let (practice, context) = forced_curve();
    let context = context.with_emphasis(
        PrincipleWeights::uniform(1.0)
            .with(Principle::Humanity, 0.0)
            .with(Principle::Dignity, 0.0)
            .with(Principle::Autonomy, 0.0),
    );
    let plan = test_engine().evaluate(&practice, &context).unwrap();
    assert_eq!(plan.overall_verdict, Outcome::Violates);
    assert_eq!(plan.rule, ResolutionRule::DignityPrecedence);
}

#[test]
fn identical_inputs_give_identical_plans() {
    let engine = test_engine();
    let practice = co_created_norms();
    let context = evidenced_participation().with_ambiguity("class size unknown");
    let first = engine.evaluate(&practice, &context).unwrap();
    let second = engine.evaluate(&practice, &context).unwrap();
    assert_eq!(first, second);
}

#[test]
fn parallel_and_sequential_agree() {
    let sequential = Engine::new(EngineConfig {
        parallel: false,
        ..EngineConfig::default()
    })
    .unwrap();
    let (practice, context) = forced_curve();
    assert_eq!(
        test_engine().evaluate(&practice, &context).unwrap(),
        sequential.evaluate(&practice, &context).unwrap()
    );
}

#[test]
fn malformed_practice_is_an_error() {
    let practice = Practice::new("", "no id");
    assert!(matches!(
        test_engine().evaluate(&practice, &Context::new()),
        Err(CarError::Practice(_))
    ));
}

#[test]
fn batch_keeps_request_order() {
    let (curve, curve_context) = forced_curve();
    let requests = vec![
        EvaluationRequest::new(curve, curve_context),
        EvaluationRequest::new(Practice::new("", "broken"), Context::new()),
        EvaluationRequest::new(co_created_norms(), evidenced_participation()),
    ];
    let results = test_engine().evaluate_batch(&requests);
    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().unwrap().overall_verdict,
        Outcome::Violates
    );
    assert!(results[1].is_err());
    assert_eq!(
        results[2].as_ref().unwrap().overall_verdict,
        Outcome::Aligned
    );
}

#[test]
fn learner_profile_personalizes_aligned_plans_only() {
    let learner = LearnerProfile::new("l1")
        .with_name("Ada")
        .with_interest("astronomy")
        .with_strength("drawing")
        .with_need("reading support");
    let domain = ConceptualDomain::new("fractions")
        .with_concept("part-whole")
        .with_concept("equivalence")
        .with_prerequisite("equivalence", "part-whole");

    let context = evidenced_participation()
        .with_learner(learner.clone())
        .with_domain(domain.clone());
    let plan = test_engine().evaluate(&co_created_norms(), &context).unwrap();
    let personal: Vec<_> = plan.actions_of(ActionKind::Personalize).collect();
    assert!(!personal.is_empty());
    assert!(
        personal
            .iter()
            .any(|a| a.description == "Introduce part-whole next for Ada")
    );
    for (i, action) in plan.actions.iter().enumerate() {
        assert_eq!(action.rank, i + 1);
    }

    let (curve, curve_context) = forced_curve();
    let curve_context = curve_context.with_learner(learner).with_domain(domain);
    let plan = test_engine().evaluate(&curve, &curve_context).unwrap();
    assert_eq!(plan.actions_of(ActionKind::Personalize).count(), 0);
}

#[test]
fn ledger_tracks_re_evaluation() {
    let engine = test_engine();
    let mut ledger = VerdictLedger::new();

    let without = Context::new()
        .with_stakeholders(["students", "teachers"])
        .assumed("participation_clause", "unclear");
    ledger.record(&engine.evaluate(&co_created_norms(), &without).unwrap());
    ledger.record(
        &engine
            .evaluate(&co_created_norms(), &evidenced_participation())
            .unwrap(),
    );

    assert_eq!(ledger.for_practice("co-created-norms").count(), 2);
    let latest = ledger.latest("co-created-norms").unwrap();
    assert_eq!(latest.sequence, 2);
    assert_eq!(latest.overall, Outcome::Aligned);
}

#[test]
fn requests_and_plans_use_json() {
    let request: EvaluationRequest = serde_json::from_str(
        r#"{
            "practice": {
                "id": "curve",
                "description": "grade students on a forced curve",
                "effects": [
                    {"stakeholder": "students", "kind": "cost", "description": "half receive low grades"}
                ]
            },
            "context": {"stakeholders": ["students"]}
        }"#,
    )
    .unwrap();
    let plan = test_engine()
        .evaluate(&request.practice, &request.context)
        .unwrap();

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["practice_id"], "curve");
    assert_eq!(json["verdicts"].as_array().unwrap().len(), 3);
    assert_eq!(json["verdicts"][2]["imperative"], "universal_law");
    assert_eq!(json["verdicts"][2]["outcome"], "violates");
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use car_education::config::EngineConfig;
use car_education::context::Context;
use car_education::engine::{Engine, EvaluationRequest};
use car_education::practice::{Practice, StakeholderEffect};

fn forced_curve() -> EvaluationRequest {
    EvaluationRequest::new(
        Practice::new("forced-curve", "grade students strictly on a forced curve").with_effect(
            StakeholderEffect::instrumental(
                "students",
                "students are ranked against their peers solely to produce institutional ranking metrics",
            ),
        ),
        Context::new().with_stakeholder("students"),
    )
}

fn co_created_norms() -> EvaluationRequest {
    EvaluationRequest::new(
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
        )),
        Context::new()
            .with_stakeholders(["students", "teachers"])
            .evidenced("participation_clause", "norms are voted on in week one"),
    )
}

fn bench_evaluate(c: &mut Criterion) {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let sequential = Engine::new(EngineConfig {
        parallel: false,
        ..EngineConfig::default()
    })
    .unwrap();

    let curve = forced_curve();
    c.bench_function("evaluate_forced_curve", |bench| {
        bench.iter(|| black_box(engine.evaluate(&curve.practice, &curve.context)))
    });

    let norms = co_created_norms();
    c.bench_function("evaluate_co_created_norms", |bench| {
        bench.iter(|| black_box(engine.evaluate(&norms.practice, &norms.context)))
    });
    c.bench_function("evaluate_co_created_norms_sequential", |bench| {
        bench.iter(|| black_box(sequential.evaluate(&norms.practice, &norms.context)))
    });
}

fn bench_batch(c: &mut Criterion) {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let requests: Vec<EvaluationRequest> = (0..64)
        .map(|i| if i % 2 == 0 { forced_curve() } else { co_created_norms() })
        .collect();

    c.bench_function("evaluate_batch_64", |bench| {
        bench.iter(|| black_box(engine.evaluate_batch(&requests)))
    });
}

criterion_group!(benches, bench_evaluate, bench_batch);
criterion_main!(benches);

//! Plain-text rendering of plans and verdicts.
//!
//! A thin formatter only. Richer narration is left to consumers, which can
//! work from the serialized [`AggregatedPlan`] instead.

use crate::aggregate::AggregatedPlan;
use crate::imperative::Verdict;

/// Render one verdict: outcome, confidence band, rationale, evidence, remedies.
pub fn render_verdict(verdict: &Verdict) -> String {
    let mut lines = Vec::new();
    verdict_lines(verdict, &mut lines);
    lines.join("\n")
}

fn verdict_lines(verdict: &Verdict, lines: &mut Vec<String>) {
    lines.push(format!(
        "{}: {} (confidence {}, {})",
        verdict.imperative,
        verdict.outcome,
        verdict.confidence,
        verdict.confidence.level()
    ));
    lines.push(format!("  {}", verdict.rationale));
    lines.extend(verdict.supporting.iter().map(|item| format!("  + {item}")));
    lines.extend(verdict.negative.iter().map(|item| format!("  - {item}")));
    if !verdict.unassessed.is_empty() {
        let names: Vec<&str> = verdict.unassessed.iter().map(|p| p.as_str()).collect();
        lines.push(format!("  unassessed: {}", names.join(", ")));
    }
    lines.extend(
        verdict
            .adjustments
            .iter()
            .map(|a| format!("  adjusted x{:.3}: {}", a.factor, a.reason)),
    );
    lines.extend(verdict.remedies.iter().map(|remedy| format!("  remedy: {remedy}")));
}

/// Render a whole plan, verdicts first, then caveats and ranked actions.
pub fn render_plan(plan: &AggregatedPlan) -> String {
    let mut lines = vec![
        format!("Practice {}", plan.practice_id),
        format!(
            "Overall: {} (confidence {}, {}) by {}",
            plan.overall_verdict,
            plan.confidence,
            plan.level(),
            plan.rule
        ),
    ];
    if !plan.dissent.is_empty() {
        let names: Vec<&str> = plan.dissent.iter().map(|i| i.as_str()).collect();
        lines.push(format!("Dissent: {}", names.join(", ")));
    }

    lines.push(String::new());
    for verdict in &plan.verdicts {
        verdict_lines(verdict, &mut lines);
    }

    if !plan.caveats.is_empty() {
        lines.push(String::new());
        lines.push("Caveats:".to_string());
        lines.extend(plan.caveats.iter().map(|caveat| format!("  * {caveat}")));
    }

    if !plan.actions.is_empty() {
        lines.push(String::new());
        lines.push("Actions:".to_string());
        lines.extend(
            plan.actions
                .iter()
                .map(|a| format!("  {}. [{}] {}", a.rank, a.kind, a.description)),
        );
    }

    if !plan.boundary.unknown.is_empty() {
        lines.push(String::new());
        lines.push("Outside the evidence:".to_string());
        lines.extend(
            plan.boundary
                .unknown
                .iter()
                .map(|claim| format!("  ? {}", claim.summary())),
        );
    }
    lines.join("\n")
}

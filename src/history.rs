//! Caller-owned, append-only history of evaluated plans.
//!
//! The engine never holds a ledger. Callers record the plans they want to
//! keep and query how a practice's standing changed across re-evaluations.

use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregatedPlan, ResolutionRule};
use crate::confidence::Confidence;
use crate::imperative::Outcome;
use crate::principle::Imperative;

/// One imperative's outcome as recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictSummary {
    pub imperative: Imperative,
    pub outcome: Outcome,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Strictly increasing across the ledger, starting at 1.
    pub sequence: u64,
    pub practice_id: String,
    pub overall: Outcome,
    pub confidence: Confidence,
    pub rule: ResolutionRule,
    pub verdicts: Vec<VerdictSummary>,
    pub caveats: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerdictLedger {
    entries: Vec<LedgerEntry>,
    next_sequence: u64,
}

impl VerdictLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a summary of `plan` and return its sequence number.
    pub fn record(&mut self, plan: &AggregatedPlan) -> u64 {
        self.next_sequence += 1;
        let sequence = self.next_sequence;
        self.entries.push(LedgerEntry {
            sequence,
            practice_id: plan.practice_id.clone(),
            overall: plan.overall_verdict,
            confidence: plan.confidence,
            rule: plan.rule,
            verdicts: plan
                .verdicts
                .iter()
                .map(|v| VerdictSummary {
                    imperative: v.imperative,
                    outcome: v.outcome,
                    confidence: v.confidence,
                })
                .collect(),
            caveats: plan.caveats.len(),
        });
        sequence
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn for_practice<'a>(&'a self, practice_id: &'a str) -> impl Iterator<Item = &'a LedgerEntry> {
        self.entries
            .iter()
            .filter(move |e| e.practice_id == practice_id)
    }

    pub fn latest(&self, practice_id: &str) -> Option<&LedgerEntry> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.practice_id == practice_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryReport;
    use crate::aggregate::OutcomeScores;

    fn plan(id: &str, overall: Outcome) -> AggregatedPlan {
        AggregatedPlan {
            practice_id: id.to_string(),
            overall_verdict: overall,
            confidence: Confidence::new(0.8),
            rule: ResolutionRule::Unanimous,
            verdicts: Vec::new(),
            scores: OutcomeScores::default(),
            dissent: Vec::new(),
            caveats: Vec::new(),
            actions: Vec::new(),
            boundary: BoundaryReport::default(),
        }
    }

    #[test]
    fn sequences_increase() {
        let mut ledger = VerdictLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.record(&plan("a", Outcome::Violates)), 1);
        assert_eq!(ledger.record(&plan("b", Outcome::Aligned)), 2);
        assert_eq!(ledger.record(&plan("a", Outcome::Aligned)), 3);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn latest_tracks_re_evaluation() {
        let mut ledger = VerdictLedger::new();
        ledger.record(&plan("curve", Outcome::Violates));
        ledger.record(&plan("other", Outcome::Aligned));
        ledger.record(&plan("curve", Outcome::Indeterminate));

        assert_eq!(ledger.for_practice("curve").count(), 2);
        let latest = ledger.latest("curve").unwrap();
        assert_eq!(latest.sequence, 3);
        assert_eq!(latest.overall, Outcome::Indeterminate);
        assert!(ledger.latest("missing").is_none());
    }
}

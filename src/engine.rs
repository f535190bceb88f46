//! Engine facade: top-level API for the critical reasoning engine.
//!
//! The `Engine` is built once from an [`EngineConfig`], validated eagerly, and
//! is immutable afterwards. Each evaluation borrows a practice and a context,
//! runs the three imperative evaluators, and aggregates their verdicts.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregate::{AggregatedPlan, Aggregator};
use crate::config::EngineConfig;
use crate::context::Context;
use crate::error::CarResult;
use crate::imperative::{
    EvaluationEnv, Evaluator, HumanityEvaluator, KingdomEvaluator, UniversalLawEvaluator, Verdict,
};
use crate::practice::Practice;
use crate::principle::{Imperative, PrincipleWeights};
use crate::schematism::SchematismBridge;

/// A practice and the context to evaluate it in, as read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub practice: Practice,
    #[serde(default)]
    pub context: Context,
}

impl EvaluationRequest {
    pub fn new(practice: Practice, context: Context) -> Self {
        Self { practice, context }
    }
}

/// The critical reasoning engine.
///
/// Cheap to clone; clones share the same schematism tables.
#[derive(Debug, Clone)]
pub struct Engine {
    config: Arc<EngineConfig>,
    bridge: Arc<SchematismBridge>,
    universal: UniversalLawEvaluator,
    humanity: HumanityEvaluator,
    kingdom: KingdomEvaluator,
}

impl Engine {
    /// Create an engine with the built-in schematism tables.
    pub fn new(config: EngineConfig) -> CarResult<Self> {
        let bridge = SchematismBridge::standard()?;
        Self::with_bridge(config, bridge)
    }

    /// Create an engine with custom schematism tables.
    pub fn with_bridge(config: EngineConfig, bridge: SchematismBridge) -> CarResult<Self> {
        config.validate()?;
        info!(
            strictness = %config.strictness,
            threshold = config.confidence_threshold,
            parallel = config.parallel,
            indicators = bridge.indicators().len(),
            "initializing reasoning engine"
        );
        Ok(Self {
            config: Arc::new(config),
            bridge: Arc::new(bridge),
            universal: UniversalLawEvaluator,
            humanity: HumanityEvaluator,
            kingdom: KingdomEvaluator,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bridge(&self) -> &SchematismBridge {
        &self.bridge
    }

    pub fn evaluator(&self, imperative: Imperative) -> &dyn Evaluator {
        match imperative {
            Imperative::UniversalLaw => &self.universal,
            Imperative::HumanityAsEnd => &self.humanity,
            Imperative::KingdomOfEnds => &self.kingdom,
        }
    }

    /// Weights for one evaluation: the context's emphasis if given, else the configured weights.
    fn effective_weights(&self, context: &Context) -> CarResult<PrincipleWeights> {
        match &context.emphasis {
            Some(emphasis) => {
                emphasis.validate()?;
                Ok(emphasis.clone())
            }
            None => Ok(self.config.weights.clone()),
        }
    }

    /// Evaluate a practice against all three imperatives and aggregate.
    ///
    /// A malformed practice or invalid emphasis is an error. Evaluator
    /// failures are not: they become indeterminate verdicts with caveats.
    pub fn evaluate(&self, practice: &Practice, context: &Context) -> CarResult<AggregatedPlan> {
        practice.validate()?;
        let weights = self.effective_weights(context)?;
        let env = EvaluationEnv::new(&self.bridge, &self.config);

        let run = |evaluator: &dyn Evaluator| evaluator.evaluate(practice, context, &env);
        let (humanity, (kingdom, universal)) = if self.config.parallel {
            rayon::join(
                || run(&self.humanity),
                || rayon::join(|| run(&self.kingdom), || run(&self.universal)),
            )
        } else {
            (
                run(&self.humanity),
                (run(&self.kingdom), run(&self.universal)),
            )
        };

        let mut aggregator = Aggregator::new(weights, self.config.confidence_threshold);
        aggregator.collect(humanity)?;
        aggregator.collect(kingdom)?;
        aggregator.collect(universal)?;
        aggregator.weigh()?;
        let plan = aggregator.resolve(practice, context, &self.bridge)?;

        debug!(
            practice = %practice.id,
            overall = %plan.overall_verdict,
            confidence = %plan.confidence,
            rule = %plan.rule,
            caveats = plan.caveats.len(),
            "evaluated practice"
        );
        Ok(plan)
    }

    /// Run a single imperative, surfacing its error instead of degrading it.
    pub fn evaluate_imperative(
        &self,
        imperative: Imperative,
        practice: &Practice,
        context: &Context,
    ) -> CarResult<Verdict> {
        practice.validate()?;
        let env = EvaluationEnv::new(&self.bridge, &self.config);
        Ok(self
            .evaluator(imperative)
            .evaluate(practice, context, &env)?)
    }

    /// Evaluate many requests, in parallel when configured.
    ///
    /// Results keep the order of `requests`.
    pub fn evaluate_batch(&self, requests: &[EvaluationRequest]) -> Vec<CarResult<AggregatedPlan>> {
        if self.config.parallel {
            requests
                .par_iter()
                .map(|r| self.evaluate(&r.practice, &r.context))
                .collect()
        } else {
            requests
                .iter()
                .map(|r| self.evaluate(&r.practice, &r.context))
                .collect()
        }
    }
}

//! Confidence model: bounded certainty scores, combination, and decay.
//!
//! Confidences combine through a weighted geometric mean rather than an
//! arithmetic one, so a single shaky pillar drags the combined result down
//! sharply. Decay only ever lowers a score; the way back up is re-evaluation
//! with a richer context.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// A certainty score clamped to `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    pub const ZERO: Confidence = Confidence(0.0);
    pub const ONE: Confidence = Confidence(1.0);

    /// Create a confidence, clamping into range. NaN becomes zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Multiply by `factor` (clamped).
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.0 * factor)
    }

    /// Never exceed `ceiling`.
    pub fn cap(self, ceiling: f64) -> Self {
        Self::new(self.0.min(ceiling))
    }

    pub fn min(self, other: Confidence) -> Self {
        if other.0 < self.0 { other } else { self }
    }

    pub fn level(self) -> ConfidenceLevel {
        ConfidenceLevel::from_value(self.0)
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ConfidenceLevel
// ---------------------------------------------------------------------------

/// Enumerated band for a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Below 0.25.
    Speculative,
    /// 0.25 to 0.5.
    Low,
    /// 0.5 to 0.75.
    Moderate,
    /// 0.75 to 0.9.
    High,
    /// 0.9 and above.
    Certain,
}

impl ConfidenceLevel {
    pub fn from_value(value: f64) -> Self {
        if value >= 0.9 {
            Self::Certain
        } else if value >= 0.75 {
            Self::High
        } else if value >= 0.5 {
            Self::Moderate
        } else if value >= 0.25 {
            Self::Low
        } else {
            Self::Speculative
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Speculative => write!(f, "speculative"),
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
            Self::Certain => write!(f, "certain"),
        }
    }
}

// ---------------------------------------------------------------------------
// Combination and decay
// ---------------------------------------------------------------------------

/// Weighted geometric mean of `(confidence, weight)` pairs.
///
/// `exp(Σ wᵢ·ln cᵢ / Σ wᵢ)`. Negative weights count as zero; when every weight
/// is zero the inputs are treated as equally weighted. Any contributing input
/// of zero yields zero. The result always lies between the smallest and the
/// largest contributing input.
pub fn combine(inputs: &[(Confidence, f64)]) -> Confidence {
    if inputs.is_empty() {
        return Confidence::ZERO;
    }

    let total: f64 = inputs.iter().map(|(_, w)| w.max(0.0)).sum();
    let uniform = total <= f64::EPSILON;

    let mut log_sum = 0.0;
    let mut weight_sum = 0.0;
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;

    for &(confidence, weight) in inputs {
        let weight = if uniform { 1.0 } else { weight.max(0.0) };
        if weight == 0.0 {
            continue;
        }
        let c = confidence.get();
        if c <= 0.0 {
            return Confidence::ZERO;
        }
        log_sum += weight * c.ln();
        weight_sum += weight;
        lo = lo.min(c);
        hi = hi.max(c);
    }

    let mean = (log_sum / weight_sum).exp();
    Confidence::new(mean.clamp(lo, hi))
}

/// Lower `confidence` once per unresolved ambiguity: `c · (1 - rate)ⁿ`.
pub fn decay(confidence: Confidence, unresolved: usize, rate: f64) -> Confidence {
    if unresolved == 0 {
        return confidence;
    }
    let rate = rate.clamp(0.0, 1.0);
    let n = unresolved.min(i32::MAX as usize) as i32;
    confidence.scale((1.0 - rate).powi(n))
}

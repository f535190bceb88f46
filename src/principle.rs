//! Ethical principles and the three imperative formulations that test them.
//!
//! Principles are the abstract vocabulary (autonomy, dignity, ...). Each
//! [`Imperative`] grounds a fixed subset of them and is weighted by the mean
//! emphasis of that subset.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

// ---------------------------------------------------------------------------
// Principle
// ---------------------------------------------------------------------------

/// An abstract ethical principle that can carry emphasis and be grounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Principle {
    Autonomy,
    Dignity,
    Universality,
    Humanity,
    Beneficence,
    Justice,
    Transparency,
    Inclusivity,
}

impl Principle {
    /// Every principle, in declaration order.
    pub const ALL: [Principle; 8] = [
        Principle::Autonomy,
        Principle::Dignity,
        Principle::Universality,
        Principle::Humanity,
        Principle::Beneficence,
        Principle::Justice,
        Principle::Transparency,
        Principle::Inclusivity,
    ];

    /// Stable lower-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Principle::Autonomy => "autonomy",
            Principle::Dignity => "dignity",
            Principle::Universality => "universality",
            Principle::Humanity => "humanity",
            Principle::Beneficence => "beneficence",
            Principle::Justice => "justice",
            Principle::Transparency => "transparency",
            Principle::Inclusivity => "inclusivity",
        }
    }

    /// Parse from a label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|p| p.as_str() == lower)
    }
}

impl fmt::Display for Principle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Imperative
// ---------------------------------------------------------------------------

/// The three formulations of the categorical imperative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Imperative {
    /// Could the practice be adopted by every actor without defeating itself?
    UniversalLaw,
    /// Does the practice treat every stakeholder as an end, never merely as a means?
    HumanityAsEnd,
    /// Could every stakeholder class endorse the practice under full information?
    KingdomOfEnds,
}

impl Imperative {
    /// Precedence order, highest first. Dignity violations are never
    /// overridden by universalizability arguments.
    pub const PRECEDENCE: [Imperative; 3] = [
        Imperative::HumanityAsEnd,
        Imperative::KingdomOfEnds,
        Imperative::UniversalLaw,
    ];

    /// Rank in [`Self::PRECEDENCE`]; lower is stronger.
    pub fn precedence_rank(&self) -> usize {
        match self {
            Imperative::HumanityAsEnd => 0,
            Imperative::KingdomOfEnds => 1,
            Imperative::UniversalLaw => 2,
        }
    }

    /// The principles this formulation grounds before judging.
    pub fn principles(&self) -> &'static [Principle] {
        match self {
            Imperative::UniversalLaw => &[Principle::Universality, Principle::Transparency],
            Imperative::HumanityAsEnd => {
                &[Principle::Humanity, Principle::Dignity, Principle::Autonomy]
            }
            Imperative::KingdomOfEnds => {
                &[Principle::Justice, Principle::Inclusivity, Principle::Beneficence]
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Imperative::UniversalLaw => "universal-law",
            Imperative::HumanityAsEnd => "humanity-as-end",
            Imperative::KingdomOfEnds => "kingdom-of-ends",
        }
    }
}

impl fmt::Display for Imperative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PrincipleWeights
// ---------------------------------------------------------------------------

/// Emphasis per principle, each in `[0.0, 1.0]`.
///
/// Weights change how strongly a verdict counts during weighing and how much
/// it pulls the combined confidence. They never change the dignity override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrincipleWeights {
    pub autonomy: f64,
    pub dignity: f64,
    pub universality: f64,
    pub humanity: f64,
    pub beneficence: f64,
    pub justice: f64,
    pub transparency: f64,
    pub inclusivity: f64,
}

impl Default for PrincipleWeights {
    fn default() -> Self {
        Self {
            autonomy: 0.8,
            dignity: 1.0,
            universality: 0.9,
            humanity: 1.0,
            beneficence: 0.7,
            justice: 0.9,
            transparency: 0.6,
            inclusivity: 0.8,
        }
    }
}

impl PrincipleWeights {
    /// The same weight for every principle.
    pub fn uniform(weight: f64) -> Self {
        Self {
            autonomy: weight,
            dignity: weight,
            universality: weight,
            humanity: weight,
            beneficence: weight,
            justice: weight,
            transparency: weight,
            inclusivity: weight,
        }
    }

    pub fn get(&self, principle: Principle) -> f64 {
        match principle {
            Principle::Autonomy => self.autonomy,
            Principle::Dignity => self.dignity,
            Principle::Universality => self.universality,
            Principle::Humanity => self.humanity,
            Principle::Beneficence => self.beneficence,
            Principle::Justice => self.justice,
            Principle::Transparency => self.transparency,
            Principle::Inclusivity => self.inclusivity,
        }
    }

    pub fn set(&mut self, principle: Principle, weight: f64) {
        let slot = match principle {
            Principle::Autonomy => &mut self.autonomy,
            Principle::Dignity => &mut self.dignity,
            Principle::Universality => &mut self.universality,
            Principle::Humanity => &mut self.humanity,
            Principle::Beneficence => &mut self.beneficence,
            Principle::Justice => &mut self.justice,
            Principle::Transparency => &mut self.transparency,
            Principle::Inclusivity => &mut self.inclusivity,
        };
        *slot = weight;
    }

    /// Builder-style [`Self::set`].
    pub fn with(mut self, principle: Principle, weight: f64) -> Self {
        self.set(principle, weight);
        self
    }

    /// Weight of an imperative: the mean weight of the principles it grounds.
    pub fn imperative_weight(&self, imperative: Imperative) -> f64 {
        let principles = imperative.principles();
        principles.iter().map(|p| self.get(*p)).sum::<f64>() / principles.len() as f64
    }

    /// Principles sorted by descending weight; ties keep declaration order.
    pub fn ranked(&self) -> Vec<Principle> {
        let mut ranked = Principle::ALL.to_vec();
        ranked.sort_by(|a, b| {
            self.get(*b)
                .partial_cmp(&self.get(*a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    /// Reject any weight outside `[0, 1]` (including NaN).
    pub fn validate(&self) -> ConfigResult<()> {
        for principle in Principle::ALL {
            let value = self.get(principle);
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidWeight { principle, value });
            }
        }
        Ok(())
    }
}

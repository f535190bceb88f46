//! Indicator predicates and the matches they produce.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::boundary::ClaimSource;
use crate::error::{ConfigError, ConfigResult};
use crate::practice::EffectKind;
use crate::principle::Principle;

// ---------------------------------------------------------------------------
// Facets
// ---------------------------------------------------------------------------

/// Which aspect of a principle an indicator bears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    /// The maxim defeats itself when everyone follows it.
    Contradiction,
    /// The maxim only works while someone is exempt.
    Exemption,
    /// Universal adoption erodes the preconditions the practice relies on.
    Erosion,
    /// A stakeholder is used purely as a tool.
    Instrumental,
    /// A stakeholder is shamed or degraded.
    Degradation,
    /// A stakeholder class is shut out.
    Exclusion,
    /// A stakeholder carries a cost.
    Burden,
    /// Agency, voice, or dignity is honoured.
    Respect,
    /// The practice actively serves the principle.
    Support,
}

/// Whether a facet speaks for or against its principle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Upholds,
    Undermines,
}

impl Facet {
    pub fn polarity(&self) -> Polarity {
        match self {
            Facet::Respect | Facet::Support => Polarity::Upholds,
            _ => Polarity::Undermines,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Contradiction => "contradiction",
            Facet::Exemption => "exemption",
            Facet::Erosion => "erosion",
            Facet::Instrumental => "instrumental",
            Facet::Degradation => "degradation",
            Facet::Exclusion => "exclusion",
            Facet::Burden => "burden",
            Facet::Respect => "respect",
            Facet::Support => "support",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Indicator
// ---------------------------------------------------------------------------

/// How an indicator recognizes its signal.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Pattern over the normalized description and effect texts.
    Text(Regex),
    /// Any stakeholder effect of this kind.
    Effect(EffectKind),
    /// Presence of a named context field, whatever its evidence status.
    Field(String),
}

/// One row of the schematism table.
#[derive(Debug, Clone)]
pub struct Indicator {
    pub name: String,
    pub principle: Principle,
    pub facet: Facet,
    pub matcher: Matcher,
    /// Context field a match leans on. Its evidence status decides the
    /// boundary of every claim this indicator makes.
    pub field: Option<String>,
}

impl Indicator {
    /// A text indicator. Patterns match case-insensitively.
    pub fn text(
        name: impl Into<String>,
        principle: Principle,
        facet: Facet,
        pattern: &str,
    ) -> ConfigResult<Self> {
        let name = name.into();
        let regex =
            Regex::new(&format!("(?i){pattern}")).map_err(|e| ConfigError::InvalidIndicator {
                name: name.clone(),
                message: e.to_string(),
            })?;
        Ok(Self {
            name,
            principle,
            facet,
            matcher: Matcher::Text(regex),
            field: None,
        })
    }

    pub fn effect(
        name: impl Into<String>,
        principle: Principle,
        facet: Facet,
        kind: EffectKind,
    ) -> Self {
        Self {
            name: name.into(),
            principle,
            facet,
            matcher: Matcher::Effect(kind),
            field: None,
        }
    }

    pub fn field(
        name: impl Into<String>,
        principle: Principle,
        facet: Facet,
        field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            principle,
            facet,
            matcher: Matcher::Field(field.into()),
            field: None,
        }
    }

    /// Mark a context field as load-bearing for this indicator.
    pub fn requires_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

/// Where in the input a match was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "in", rename_all = "snake_case")]
pub enum Locus {
    Description,
    Effect { stakeholder: String, index: usize },
    Field { name: String },
}

/// A fired indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorMatch {
    pub indicator: String,
    pub principle: Principle,
    pub facet: Facet,
    pub locus: Locus,
    /// The matched text, or the effect/field that triggered a structural match.
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IndicatorMatch {
    pub fn polarity(&self) -> Polarity {
        self.facet.polarity()
    }

    /// Who or what the match is about.
    pub fn subject(&self) -> String {
        match &self.locus {
            Locus::Description => format!("{} (description)", self.principle),
            Locus::Effect { stakeholder, .. } => format!("{} ({stakeholder})", self.principle),
            Locus::Field { name } => format!("{} (field {name})", self.principle),
        }
    }

    pub fn describe(&self) -> String {
        format!("{} via {}: \"{}\"", self.facet, self.indicator, self.excerpt)
    }

    /// Data the match rests on.
    pub fn sources(&self) -> Vec<ClaimSource> {
        match &self.locus {
            Locus::Field { name } => vec![ClaimSource::Field(name.clone())],
            Locus::Description | Locus::Effect { .. } => {
                let mut sources = vec![ClaimSource::Practice];
                if let Some(field) = &self.field {
                    sources.push(ClaimSource::Field(field.clone()));
                }
                sources
            }
        }
    }

    /// Stakeholder named by an effect locus.
    pub fn stakeholder(&self) -> Option<&str> {
        match &self.locus {
            Locus::Effect { stakeholder, .. } => Some(stakeholder),
            _ => None,
        }
    }
}

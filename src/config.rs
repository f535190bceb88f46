//! Engine configuration: weights, thresholds, and boundary handling.
//!
//! One immutable [`EngineConfig`] is accepted at construction and shared
//! read-only by every evaluation. It is validated eagerly; an invalid value
//! is a construction error, never a silent clamp.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::principle::PrincipleWeights;

/// What the boundary gate does with claims outside the evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryStrictness {
    /// Out-of-boundary reliance forces an indeterminate verdict.
    #[default]
    Strict,
    /// Out-of-boundary reliance multiplies confidence by `boundary_penalty`.
    Lenient,
}

impl fmt::Display for BoundaryStrictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryStrictness::Strict => write!(f, "strict"),
            BoundaryStrictness::Lenient => write!(f, "lenient"),
        }
    }
}

/// Configuration for the reasoning engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Contested resolutions below this combined confidence become indeterminate.
    pub confidence_threshold: f64,
    pub strictness: BoundaryStrictness,
    /// Lenient-mode factor per out-of-boundary claim, in `(0, 1]`.
    pub boundary_penalty: f64,
    /// Per-ambiguity decay rate, in `[0, 1)`.
    pub ambiguity_decay: f64,
    /// Run the three evaluators on the rayon pool.
    pub parallel: bool,
    // Tables serialize after plain keys; keep this field last.
    /// Per-principle emphasis.
    pub weights: PrincipleWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.75,
            strictness: BoundaryStrictness::Strict,
            boundary_penalty: 0.8,
            ambiguity_decay: 0.1,
            parallel: true,
            weights: PrincipleWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.weights.validate()?;
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.confidence_threshold,
            });
        }
        if !(self.boundary_penalty > 0.0 && self.boundary_penalty <= 1.0) {
            return Err(ConfigError::InvalidPenalty {
                value: self.boundary_penalty,
            });
        }
        if !(0.0..1.0).contains(&self.ambiguity_decay) {
            return Err(ConfigError::InvalidDecayRate {
                value: self.ambiguity_decay,
            });
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Self::parse(content, "<inline>")
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })
    }

    /// Write as TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = self.to_toml_string()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

//! Evaluator errors. Never fatal: the aggregator turns them into
//! indeterminate verdicts.

use miette::Diagnostic;
use thiserror::Error;

use crate::principle::Imperative;

use super::verdict::IndeterminacyCause;

#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum EvaluatorError {
    #[error("insufficient context for {imperative}: missing {list}", list = .missing.join(", "))]
    #[diagnostic(
        code(car::evaluator::insufficient_context),
        help(
            "Describe the practice's effects on each stakeholder class and declare \
             the stakeholders in the context. The evaluator does not guess missing data."
        )
    )]
    InsufficientContext {
        imperative: Imperative,
        missing: Vec<String>,
    },

    #[error("{imperative} evaluator failed: {message}")]
    #[diagnostic(code(car::evaluator::failed))]
    Failed {
        imperative: Imperative,
        message: String,
    },
}

impl EvaluatorError {
    pub fn insufficient(imperative: Imperative, missing: Vec<String>) -> Self {
        Self::InsufficientContext {
            imperative,
            missing,
        }
    }

    pub fn imperative(&self) -> Imperative {
        match self {
            Self::InsufficientContext { imperative, .. } | Self::Failed { imperative, .. } => {
                *imperative
            }
        }
    }

    /// The indeterminacy cause an error verdict carries.
    pub fn to_cause(&self) -> IndeterminacyCause {
        match self {
            Self::InsufficientContext { missing, .. } => IndeterminacyCause::InsufficientContext {
                missing: missing.clone(),
            },
            Self::Failed { message, .. } => IndeterminacyCause::EvaluatorFailed {
                message: message.clone(),
            },
        }
    }
}

pub type EvaluatorResult<T> = std::result::Result<T, EvaluatorError>;

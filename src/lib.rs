// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # car-education
//!
//! A critical reasoning engine that evaluates educational practices against
//! three formulations of the categorical imperative, while keeping track of
//! what it actually knows.
//!
//! ## Architecture
//!
//! - **Schematism bridge** (`schematism`): table-driven grounding of abstract
//!   principles in practice text, stakeholder effects, and context fields
//! - **Imperative evaluators** (`imperative`): Universal-Law, Humanity-as-End,
//!   Kingdom-of-Ends, all gated by one shared boundary check
//! - **Epistemic boundary** (`boundary`): evidenced vs. assumed knowledge
//! - **Confidence model** (`confidence`): weighted geometric combination and decay
//! - **Aggregator** (`aggregate`): dignity precedence, unanimity, weighted
//!   majority, and a prioritized action plan
//!
//! ## Library usage
//!
//! ```no_run
//! use car_education::config::EngineConfig;
//! use car_education::context::Context;
//! use car_education::engine::Engine;
//! use car_education::practice::{Practice, StakeholderEffect};
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! let practice = Practice::new("norms", "collaboratively co-create classroom norms with students")
//!     .with_effect(StakeholderEffect::benefit("students", "students gain a voice in the rules"));
//! let context = Context::new()
//!     .with_stakeholder("students")
//!     .evidenced("participation_clause", "norms are voted on in week one");
//! let plan = engine.evaluate(&practice, &context).unwrap();
//! println!("{}", car_education::explain::render_plan(&plan));
//! ```

pub mod aggregate;
pub mod boundary;
pub mod confidence;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod explain;
pub mod history;
pub mod imperative;
pub mod learner;
pub mod practice;
pub mod principle;
pub mod schematism;

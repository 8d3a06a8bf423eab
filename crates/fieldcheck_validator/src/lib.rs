//! # fieldcheck validator
//!
//! Validation engine for request inputs.
//!
//! This crate turns loosely-typed route schemas into checks and runs them:
//!
//! - **Rule compiler** ([`compile`]): raw schema entry to [`fieldcheck_core::FieldRule`]
//! - **Field evaluator** ([`SectionEvaluator`]): runs the rules of one
//!   section, coercing inputs in place
//! - **Orchestrator** ([`RequestValidator`]): validates all sections of a
//!   request and aggregates messages
//!
//! ## Example
//!
//! ```rust
//! use fieldcheck_core::{Params, Request, RuleBuilder, SectionSchema, ValidationBuilder};
//! use fieldcheck_validator::RequestValidator;
//!
//! let validation = ValidationBuilder::new()
//!     .body(
//!         SectionSchema::new()
//!             .field("name", RuleBuilder::new("string").required(true).build())
//!             .field("age", RuleBuilder::new("number").max(150.0).build()),
//!     )
//!     .build();
//!
//! let mut request = Request::new()
//!     .with_validation(validation)
//!     .with_body(Params::from([("age", "12")]));
//!
//! let err = RequestValidator::new().check(&mut request).unwrap_err();
//! assert_eq!(err.message, "Body: Param name is required");
//! ```

pub mod checks;
pub mod coerce;
pub mod compiler;
pub mod engine;
pub mod evaluator;

pub use checks::TypeCheck;
pub use compiler::compile;
pub use engine::*;
pub use evaluator::*;

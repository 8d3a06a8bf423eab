//! # fieldcheck core
//!
//! Core data structures for the fieldcheck request validator.
//!
//! This crate holds the vocabulary shared by the rule compiler, the field
//! evaluator and the orchestrator:
//!
//! - **Value / Params**: untyped input values and ordered input maps
//! - **RawRule / SectionSchema / RouteValidation**: loosely-typed schemas as
//!   written by route authors
//! - **FieldRule**: the compiled, strongly-typed constraint set of one field
//! - **ErrorRecord / ValidationReport**: what validation produces
//!
//! ## Example
//!
//! ```rust
//! use fieldcheck_core::{Params, Request, RuleBuilder, SectionSchema, ValidationBuilder};
//!
//! let validation = ValidationBuilder::new()
//!     .url(
//!         SectionSchema::new()
//!             .field("id", RuleBuilder::new("numeric").required(true).build()),
//!     )
//!     .build();
//!
//! let request = Request::new()
//!     .with_validation(validation)
//!     .with_params(Params::from([("id", "42")]));
//!
//! assert_eq!(request.params.len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod report;
pub mod rule;
pub mod schema;
pub mod value;

pub use builder::*;
pub use error::*;
pub use report::*;
pub use rule::*;
pub use schema::*;
pub use value::*;

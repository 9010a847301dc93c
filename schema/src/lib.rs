//! @ai:module:intent Search-space schema for autotuning benchmarks
//! @ai:module:layer domain
//! @ai:module:public_api value, parameter, metric, expr, constraint, space, definition, output, error
//! @ai:module:stateless true
//!
//! # catbench schema
//!
//! Typed parameters, metrics, objectives and constraints assembled into an
//! immutable [`SearchSpace`]. Constraints are compiled once from a small
//! expression language and can be re-evaluated selectively when only a few
//! parameters change.
//!
//! ## Example
//!
//! ```rust
//! use catbench_schema::{Configuration, Constraint, Parameter, SearchSpace, Value};
//! use std::collections::BTreeSet;
//!
//! let space = SearchSpace::builder()
//!     .params(vec![
//!         Parameter::int_exponential("tuned_gs0", (1, 1024), 2, Some(64)).unwrap(),
//!         Parameter::int_exponential("tuned_ls0", (1, 1024), 2, Some(8)).unwrap(),
//!     ])
//!     .constraints(vec![
//!         Constraint::new("tuned_gs0 % tuned_ls0 == 0", &["tuned_gs0", "tuned_ls0"]).unwrap(),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! let mut config: Configuration = space.default_configuration();
//! assert!(space.check(&config).unwrap().passed());
//!
//! config.insert("tuned_ls0".into(), Value::Int(128));
//! let changed: BTreeSet<String> = ["tuned_ls0".to_string()].into();
//! assert!(!space.recheck(&config, &changed).unwrap().passed());
//! ```

pub mod constraint;
pub mod definition;
pub mod error;
pub mod expr;
pub mod metric;
pub mod output;
pub mod parameter;
pub mod space;
pub mod value;

pub use constraint::Constraint;
pub use definition::ProblemDefinition;
pub use error::{Error, Result};
pub use expr::{EvalError, Expression, ParseError};
pub use metric::{Metric, Objective};
pub use output::{format_check_result, format_definition, to_json, OutputFormat};
pub use parameter::{is_identifier, Domain, Parameter};
pub use space::{build_search_space, CheckResult, SearchSpace, SearchSpaceBuilder, Violation};
pub use value::{Configuration, Value};

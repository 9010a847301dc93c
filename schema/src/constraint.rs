//! @ai:module:intent Boolean constraints over a declared subset of parameters
//! @ai:module:layer domain
//! @ai:module:public_api Constraint
//! @ai:module:depends_on expr, value, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::expr::Expression;
use crate::value::Configuration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// @ai:intent A compiled predicate plus the parameter names it depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConstraintSpec", into = "ConstraintSpec")]
pub struct Constraint {
    expression: Expression,
    dependent_params: BTreeSet<String>,
}

impl Constraint {
    /// @ai:intent Compile a constraint with an explicit dependency set
    /// @ai:pre every name the expression reads appears in dependent_params
    /// @ai:post the expression is parsed exactly once
    /// @ai:effects pure
    pub fn new(expression: &str, dependent_params: &[&str]) -> Result<Self> {
        let declared = dependent_params.iter().map(|s| s.to_string()).collect();
        Self::with_dependencies(expression, declared)
    }

    /// @ai:intent Compile a constraint, deriving its dependencies from the expression
    /// @ai:effects pure
    pub fn inferred(expression: &str) -> Result<Self> {
        let compiled = compile(expression)?;
        let dependent_params = compiled.names();
        Ok(Self {
            expression: compiled,
            dependent_params,
        })
    }

    fn with_dependencies(expression: &str, dependent_params: BTreeSet<String>) -> Result<Self> {
        let compiled = compile(expression)?;

        if let Some(undeclared) = compiled
            .names()
            .into_iter()
            .find(|name| !dependent_params.contains(name))
        {
            return Err(Error::schema(
                expression,
                format!("reads `{}` which is not listed in its dependent parameters", undeclared),
            ));
        }

        Ok(Self {
            expression: compiled,
            dependent_params,
        })
    }

    pub fn expression(&self) -> &str {
        self.expression.source()
    }

    pub fn dependent_params(&self) -> &BTreeSet<String> {
        &self.dependent_params
    }

    /// @ai:intent Evaluate the constraint against a fully bound configuration
    /// @ai:post Err when a read name is unbound or mistyped, never a silent false
    /// @ai:effects pure
    pub fn is_satisfied(&self, config: &Configuration) -> Result<bool> {
        self.expression
            .evaluate(config)
            .map_err(|e| Error::ConstraintEvaluation {
                expression: self.expression().to_string(),
                message: e.message,
            })
    }

    /// @ai:intent Whether any of the changed parameters feeds this constraint
    /// @ai:example ({"tuned_ls0"}) on `tuned_gs0 % tuned_ls0 == 0` -> true
    /// @ai:example ({"iterations"}) on `tuned_gs0 % tuned_ls0 == 0` -> false
    /// @ai:effects pure
    pub fn affected_by(&self, changed: &BTreeSet<String>) -> bool {
        !self.dependent_params.is_disjoint(changed)
    }
}

fn compile(expression: &str) -> Result<Expression> {
    Expression::parse(expression)
        .map_err(|e| Error::schema(expression, format!("syntax error: {}", e)))
}

/// @ai:intent Serialized form; dependencies are inferred when omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConstraintSpec {
    expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dependent_params: Option<Vec<String>>,
}

impl TryFrom<ConstraintSpec> for Constraint {
    type Error = Error;

    fn try_from(spec: ConstraintSpec) -> Result<Self> {
        match spec.dependent_params {
            Some(declared) => {
                Constraint::with_dependencies(&spec.expression, declared.into_iter().collect())
            }
            None => Constraint::inferred(&spec.expression),
        }
    }
}

impl From<Constraint> for ConstraintSpec {
    fn from(constraint: Constraint) -> Self {
        ConstraintSpec {
            expression: constraint.expression.source().to_string(),
            dependent_params: Some(constraint.dependent_params.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn changed(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_affected_by_intersection() {
        let c = Constraint::new("tuned_gs0 % tuned_ls0 == 0", &["tuned_gs0", "tuned_ls0"]).unwrap();
        assert!(c.affected_by(&changed(&["tuned_ls0", "iterations"])));
        assert!(!c.affected_by(&changed(&["iterations", "timeouts"])));
        assert!(!c.affected_by(&changed(&[])));
    }

    #[test]
    fn test_undeclared_name_rejected() {
        let err = Constraint::new("unroll_factor < chunk_size", &["unroll_factor"]).unwrap_err();
        assert!(err.to_string().contains("chunk_size"));
    }

    #[test]
    fn test_declared_superset_allowed() {
        let c = Constraint::new("omp_num_threads % 2 == 0", &["omp_num_threads", "omp_dynamic"])
            .unwrap();
        assert!(c.affected_by(&changed(&["omp_dynamic"])));
    }

    #[test]
    fn test_syntax_error_is_schema_error() {
        let err = Constraint::new("a <", &["a"]).unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
    }

    #[test]
    fn test_inferred_dependencies() {
        let c = Constraint::inferred("(permutation[0] == 4) | (chunk > 2)").unwrap();
        assert_eq!(c.dependent_params(), &changed(&["chunk", "permutation"]));
    }

    #[test]
    fn test_missing_binding_is_error_not_false() {
        let c = Constraint::new("a < b", &["a", "b"]).unwrap();
        let cfg: Configuration = [("a".to_string(), Value::Int(1))].into_iter().collect();
        assert!(matches!(
            c.is_satisfied(&cfg),
            Err(Error::ConstraintEvaluation { .. })
        ));
    }

    #[test]
    fn test_deserialize_without_dependencies() {
        let c: Constraint =
            serde_json::from_str(r#"{"expression": "tuned_ls0 * tuned_ls1 <= 1024"}"#).unwrap();
        assert_eq!(c.dependent_params(), &changed(&["tuned_ls0", "tuned_ls1"]));
    }
}

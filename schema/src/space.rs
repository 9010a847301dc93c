//! @ai:module:intent Assemble and validate search spaces; check configurations against them
//! @ai:module:layer application
//! @ai:module:public_api SearchSpace, SearchSpaceBuilder, build_search_space, CheckResult, Violation
//! @ai:module:depends_on parameter, metric, constraint, value, error
//! @ai:module:stateless true
//! @ai:module:thread_safe true

use crate::constraint::Constraint;
use crate::error::{Error, Result};
use crate::metric::{Metric, Objective};
use crate::parameter::Parameter;
use crate::value::Configuration;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// @ai:intent Immutable schema of one benchmark: what is tuned, measured, and allowed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SearchSpaceSpec", into = "SearchSpaceSpec")]
pub struct SearchSpace {
    params: Vec<Parameter>,
    metrics: Vec<Metric>,
    objectives: Vec<Objective>,
    constraints: Vec<Constraint>,
    fidelity_params: Vec<Parameter>,
}

/// @ai:intent A constraint that a configuration failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Position of the constraint in the search space.
    pub index: usize,
    pub expression: String,
    pub dependent_params: Vec<String>,
}

/// @ai:intent Outcome of checking a configuration's constraints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CheckResult {
    pub constraints_checked: usize,
    pub constraints_total: usize,
    pub violations: Vec<Violation>,
}

impl CheckResult {
    /// @ai:intent Check if every evaluated constraint held
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// @ai:intent Validate cross-entity invariants and assemble a search space
/// @ai:pre names are unique per namespace; objectives and constraints reference declared entities
/// @ai:post the returned space is immutable
/// @ai:effects pure
pub fn build_search_space(
    params: Vec<Parameter>,
    metrics: Vec<Metric>,
    objectives: Vec<Objective>,
    constraints: Vec<Constraint>,
    fidelity_params: Vec<Parameter>,
) -> Result<SearchSpace> {
    let param_names = unique_names(params.iter().map(Parameter::name))
        .map_err(Error::DuplicateParameter)?;
    unique_names(fidelity_params.iter().map(Parameter::name))
        .map_err(Error::DuplicateParameter)?;
    unique_names(metrics.iter().map(|m| m.name.as_str())).map_err(Error::DuplicateMetric)?;

    let mut objective_names = HashSet::new();
    for objective in &objectives {
        if !metrics.contains(&objective.metric) {
            return Err(Error::UnknownMetric {
                objective: objective.name.clone(),
                metric: objective.metric.name.clone(),
            });
        }
        if !objective_names.insert(objective.name.as_str()) {
            return Err(Error::DuplicateObjective(objective.name.clone()));
        }
    }

    for constraint in &constraints {
        if let Some(unknown) = constraint
            .dependent_params()
            .iter()
            .find(|name| !param_names.contains(name.as_str()))
        {
            return Err(Error::UnknownParameter {
                constraint: constraint.expression().to_string(),
                parameter: unknown.clone(),
            });
        }
    }

    Ok(SearchSpace {
        params,
        metrics,
        objectives,
        constraints,
        fidelity_params,
    })
}

fn unique_names<'a>(
    names: impl Iterator<Item = &'a str>,
) -> std::result::Result<HashSet<&'a str>, String> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(name.to_string());
        }
    }
    Ok(seen)
}

impl SearchSpace {
    /// @ai:intent Start assembling a search space
    pub fn builder() -> SearchSpaceBuilder {
        SearchSpaceBuilder::default()
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn fidelity_params(&self) -> &[Parameter] {
        &self.fidelity_params
    }

    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name() == name)
    }

    pub fn fidelity_param(&self, name: &str) -> Option<&Parameter> {
        self.fidelity_params.iter().find(|p| p.name() == name)
    }

    pub fn objective(&self, name: &str) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.name == name)
    }

    /// @ai:intent Number of unconstrained tuned configurations, None if unbounded or too large
    /// @ai:effects pure
    pub fn size(&self) -> Option<u64> {
        self.params
            .iter()
            .try_fold(1u64, |acc, p| acc.checked_mul(p.domain().cardinality()?))
    }

    /// @ai:intent Defaults of every tuned parameter that declares one
    /// @ai:effects pure
    pub fn default_configuration(&self) -> Configuration {
        defaults_of(&self.params)
    }

    /// @ai:intent Defaults of every fidelity parameter that declares one
    /// @ai:effects pure
    pub fn default_fidelity(&self) -> Configuration {
        defaults_of(&self.fidelity_params)
    }

    /// @ai:intent Require exactly one in-domain value per tuned parameter
    /// @ai:effects pure
    pub fn validate_configuration(&self, config: &Configuration) -> Result<()> {
        if let Some(unknown) = config.keys().find(|name| self.param(name).is_none()) {
            return Err(Error::InvalidConfiguration(format!(
                "unknown parameter `{}`",
                unknown
            )));
        }

        for param in &self.params {
            let value = config.get(param.name()).ok_or_else(|| {
                Error::InvalidConfiguration(format!("missing value for `{}`", param.name()))
            })?;
            param.validate_value(value)?;
        }

        Ok(())
    }

    /// @ai:intent Complete a partial fidelity mapping from defaults and validate it
    /// @ai:post every fidelity parameter is bound to an in-domain value
    /// @ai:effects pure
    pub fn resolve_fidelity(&self, partial: &Configuration) -> Result<Configuration> {
        if let Some(unknown) = partial.keys().find(|name| self.fidelity_param(name).is_none()) {
            return Err(Error::InvalidConfiguration(format!(
                "unknown fidelity parameter `{}`",
                unknown
            )));
        }

        let mut resolved = Configuration::new();
        for param in &self.fidelity_params {
            let value = partial
                .get(param.name())
                .or_else(|| param.default())
                .ok_or_else(|| {
                    Error::InvalidConfiguration(format!(
                        "missing value for fidelity parameter `{}`",
                        param.name()
                    ))
                })?;
            param.validate_value(value)?;
            resolved.insert(param.name().to_string(), value.clone());
        }

        Ok(resolved)
    }

    /// @ai:intent Constraints whose inputs intersect the changed parameter names
    /// @ai:effects pure
    pub fn constraints_affected_by<'a>(
        &'a self,
        changed: &'a BTreeSet<String>,
    ) -> impl Iterator<Item = &'a Constraint> + 'a {
        self.constraints.iter().filter(move |c| c.affected_by(changed))
    }

    /// @ai:intent Validate a configuration and evaluate every constraint
    /// @ai:effects pure
    pub fn check(&self, config: &Configuration) -> Result<CheckResult> {
        self.validate_configuration(config)?;
        self.evaluate(config, |_| true)
    }

    /// @ai:intent Re-validate only what a change of the named parameters can affect
    /// @ai:pre config was complete and valid before the change
    /// @ai:post constraints not reading any changed parameter are skipped
    /// @ai:effects pure
    pub fn recheck(
        &self,
        config: &Configuration,
        changed: &BTreeSet<String>,
    ) -> Result<CheckResult> {
        for name in changed {
            match self.param(name) {
                Some(param) => {
                    let value = config.get(name).ok_or_else(|| {
                        Error::InvalidConfiguration(format!("missing value for `{}`", name))
                    })?;
                    param.validate_value(value)?;
                }
                // Fidelity parameters never feed constraints.
                None if self.fidelity_param(name).is_some() => {}
                None => {
                    return Err(Error::InvalidConfiguration(format!(
                        "unknown parameter `{}`",
                        name
                    )))
                }
            }
        }

        self.evaluate(config, |c| c.affected_by(changed))
    }

    fn evaluate(
        &self,
        config: &Configuration,
        selected: impl Fn(&Constraint) -> bool,
    ) -> Result<CheckResult> {
        let mut result = CheckResult {
            constraints_total: self.constraints.len(),
            ..Default::default()
        };

        for (index, constraint) in self.constraints.iter().enumerate() {
            if !selected(constraint) {
                continue;
            }
            result.constraints_checked += 1;
            if !constraint.is_satisfied(config)? {
                result.violations.push(Violation {
                    index,
                    expression: constraint.expression().to_string(),
                    dependent_params: constraint.dependent_params().iter().cloned().collect(),
                });
            }
        }

        Ok(result)
    }
}

fn defaults_of(params: &[Parameter]) -> Configuration {
    params
        .iter()
        .filter_map(|p| p.default().map(|v| (p.name().to_string(), v.clone())))
        .collect()
}

/// @ai:intent Incremental assembly of a search space from shared tables
#[derive(Debug, Clone, Default)]
pub struct SearchSpaceBuilder {
    params: Vec<Parameter>,
    metrics: Vec<Metric>,
    objectives: Vec<Objective>,
    constraints: Vec<Constraint>,
    fidelity_params: Vec<Parameter>,
}

impl SearchSpaceBuilder {
    pub fn params(mut self, params: impl IntoIterator<Item = Parameter>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn metrics(mut self, metrics: impl IntoIterator<Item = Metric>) -> Self {
        self.metrics.extend(metrics);
        self
    }

    pub fn objectives(mut self, objectives: impl IntoIterator<Item = Objective>) -> Self {
        self.objectives.extend(objectives);
        self
    }

    pub fn constraints(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    pub fn fidelity_params(mut self, params: impl IntoIterator<Item = Parameter>) -> Self {
        self.fidelity_params.extend(params);
        self
    }

    /// @ai:intent Validate and freeze the collected entities
    pub fn build(self) -> Result<SearchSpace> {
        build_search_space(
            self.params,
            self.metrics,
            self.objectives,
            self.constraints,
            self.fidelity_params,
        )
    }
}

/// @ai:intent Serialized form of a search space
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SearchSpaceSpec {
    params: Vec<Parameter>,
    #[serde(default)]
    metrics: Vec<Metric>,
    #[serde(default)]
    objectives: Vec<Objective>,
    #[serde(default)]
    constraints: Vec<Constraint>,
    #[serde(default)]
    fidelity_params: Vec<Parameter>,
}

impl TryFrom<SearchSpaceSpec> for SearchSpace {
    type Error = Error;

    fn try_from(spec: SearchSpaceSpec) -> Result<Self> {
        build_search_space(
            spec.params,
            spec.metrics,
            spec.objectives,
            spec.constraints,
            spec.fidelity_params,
        )
    }
}

impl From<SearchSpace> for SearchSpaceSpec {
    fn from(space: SearchSpace) -> Self {
        SearchSpaceSpec {
            params: space.params,
            metrics: space.metrics,
            objectives: space.objectives,
            constraints: space.constraints,
            fidelity_params: space.fidelity_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn metrics() -> Vec<Metric> {
        vec![
            Metric::new("compute_time", 0, true),
            Metric::new("energy", 1, true),
        ]
    }

    fn params() -> Vec<Parameter> {
        vec![
            Parameter::int_exponential("tuned_gs0", (1, 1024), 2, Some(16)).unwrap(),
            Parameter::int_exponential("tuned_ls0", (1, 1024), 2, Some(4)).unwrap(),
            Parameter::integer("tile", (1, 64), Some(8)).unwrap(),
        ]
    }

    fn fidelity() -> Vec<Parameter> {
        vec![
            Parameter::integer("iterations", (1, 500), Some(10)).unwrap(),
            Parameter::real("timeouts", (1.0, 60000.0), Some(60000.0)).unwrap(),
        ]
    }

    fn space() -> SearchSpace {
        let metrics = metrics();
        SearchSpace::builder()
            .params(params())
            .objectives(vec![Objective::new("compute_time", &metrics[0], true)])
            .metrics(metrics)
            .constraints(vec![
                Constraint::new("tuned_gs0 % tuned_ls0 == 0", &["tuned_gs0", "tuned_ls0"]).unwrap(),
                Constraint::new("tile % 2 == 0", &["tile"]).unwrap(),
            ])
            .fidelity_params(fidelity())
            .build()
            .unwrap()
    }

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let mut duplicated = params();
        duplicated.push(Parameter::integer("tile", (1, 4), None).unwrap());
        let err = build_search_space(duplicated, metrics(), vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::DuplicateParameter(name) if name == "tile"));
    }

    #[test]
    fn test_duplicate_fidelity_parameter_rejected() {
        let mut duplicated = fidelity();
        duplicated.push(Parameter::integer("iterations", (1, 4), None).unwrap());
        let err = build_search_space(params(), metrics(), vec![], vec![], duplicated).unwrap_err();
        assert!(matches!(err, Error::DuplicateParameter(name) if name == "iterations"));
    }

    #[test]
    fn test_fidelity_namespace_is_separate() {
        let overlapping = vec![Parameter::integer("tile", (1, 4), Some(1)).unwrap()];
        assert!(build_search_space(params(), metrics(), vec![], vec![], overlapping).is_ok());
    }

    #[test]
    fn test_duplicate_metric_rejected() {
        let mut duplicated = metrics();
        duplicated.push(Metric::new("energy", 2, true));
        let err = build_search_space(params(), duplicated, vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::DuplicateMetric(name) if name == "energy"));
    }

    #[test]
    fn test_unknown_metric_rejected() {
        let stray = Metric::new("cpuEnergy", 3, true);
        let objectives = vec![Objective::new("cpuEnergy", &stray, true)];
        let err = build_search_space(params(), metrics(), objectives, vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::UnknownMetric { metric, .. } if metric == "cpuEnergy"));
    }

    #[test]
    fn test_metric_with_same_name_but_other_shape_rejected() {
        let lookalike = Metric::new("energy", 7, false);
        let objectives = vec![Objective::new("energy", &lookalike, true)];
        let err = build_search_space(params(), metrics(), objectives, vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::UnknownMetric { metric, .. } if metric == "energy"));

        let objectives = vec![Objective::new("energy", &metrics()[1], true)];
        assert!(build_search_space(params(), metrics(), objectives, vec![], vec![]).is_ok());
    }

    #[test]
    fn test_constraint_on_fidelity_parameter_rejected() {
        let constraints = vec![Constraint::new("iterations > 5", &["iterations"]).unwrap()];
        let err =
            build_search_space(params(), metrics(), vec![], constraints, fidelity()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownParameter { parameter, .. } if parameter == "iterations"
        ));
    }

    #[test]
    fn test_default_configuration_passes() {
        let space = space();
        let result = space.check(&space.default_configuration()).unwrap();
        assert!(result.passed());
        assert_eq!(result.constraints_checked, 2);
    }

    #[test]
    fn test_check_reports_violations() {
        let space = space();
        let mut cfg = space.default_configuration();
        cfg.insert("tuned_ls0".to_string(), Value::Int(32));
        let result = space.check(&cfg).unwrap();
        assert_eq!(
            result.violations,
            vec![Violation {
                index: 0,
                expression: "tuned_gs0 % tuned_ls0 == 0".to_string(),
                dependent_params: vec!["tuned_gs0".to_string(), "tuned_ls0".to_string()],
            }]
        );
    }

    #[test]
    fn test_check_rejects_incomplete_or_out_of_domain() {
        let space = space();
        let mut cfg = space.default_configuration();
        cfg.remove("tile");
        assert!(matches!(space.check(&cfg), Err(Error::InvalidConfiguration(_))));

        let mut cfg = space.default_configuration();
        cfg.insert("tuned_gs0".to_string(), Value::Int(24));
        assert!(matches!(space.check(&cfg), Err(Error::InvalidConfiguration(_))));

        let mut cfg = space.default_configuration();
        cfg.insert("bogus".to_string(), Value::Int(1));
        assert!(matches!(space.check(&cfg), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_recheck_only_affected_constraints() {
        let space = space();
        let mut cfg = space.default_configuration();
        cfg.insert("tile".to_string(), Value::Int(3));

        let result = space.recheck(&cfg, &names(&["tuned_ls0"])).unwrap();
        assert_eq!(result.constraints_checked, 1);
        assert!(result.passed());

        let result = space.recheck(&cfg, &names(&["tile"])).unwrap();
        assert_eq!(result.constraints_checked, 1);
        assert!(!result.passed());
    }

    #[test]
    fn test_recheck_fidelity_sweep_skips_everything() {
        let space = space();
        let cfg = space.default_configuration();
        let result = space.recheck(&cfg, &names(&["iterations", "timeouts"])).unwrap();
        assert_eq!(result.constraints_checked, 0);
        assert_eq!(space.constraints_affected_by(&names(&["iterations"])).count(), 0);
    }

    #[test]
    fn test_resolve_fidelity_fills_defaults() {
        let space = space();
        let partial: Configuration = [("iterations".to_string(), Value::Int(100))]
            .into_iter()
            .collect();
        let resolved = space.resolve_fidelity(&partial).unwrap();
        assert_eq!(resolved["iterations"], Value::Int(100));
        assert_eq!(resolved["timeouts"], Value::Real(60000.0));

        let bad: Configuration = [("iterations".to_string(), Value::Int(0))]
            .into_iter()
            .collect();
        assert!(space.resolve_fidelity(&bad).is_err());
    }

    #[test]
    fn test_size_of_space() {
        // 11 * 11 * 64
        assert_eq!(space().size(), Some(7744));
    }

    #[test]
    fn test_json_round_trip_revalidates() {
        let space = space();
        let json = serde_json::to_string(&space).unwrap();
        let back: SearchSpace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, space);

        let broken = json.replace("\"tuned_ls0\"", "\"tuned_gs0\"");
        assert!(serde_json::from_str::<SearchSpace>(&broken).is_err());
    }
}

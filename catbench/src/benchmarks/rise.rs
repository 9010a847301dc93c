//! @ai:module:intent Tables shared by the RISE/ELEVATE GPU code-generation benchmarks
//! @ai:module:layer domain
//! @ai:module:public_api METRICS, OBJECTIVES, fidelity_params, definition
//! @ai:module:stateless true

use crate::error::Result;
use catbench_schema::{Constraint, Metric, Objective, Parameter, ProblemDefinition, SearchSpace};
use std::sync::LazyLock;

pub static METRICS: LazyLock<Vec<Metric>> = LazyLock::new(|| {
    vec![
        Metric::new("compute_time", 0, true),
        Metric::new("cpuEnergy", 1, true),
        Metric::new("energy", 2, true),
    ]
});

pub static OBJECTIVES: LazyLock<Vec<Objective>> = LazyLock::new(|| {
    METRICS
        .iter()
        .map(|metric| Objective::new(&metric.name, metric, true))
        .collect()
});

/// @ai:intent Measurement effort knobs of the RISE harness
/// @ai:effects pure
pub fn fidelity_params() -> Result<Vec<Parameter>> {
    Ok(vec![
        Parameter::integer("iterations", (1, 500), Some(10))?,
        Parameter::real("timeouts", (1.0, 60000.0), Some(60000.0))?,
    ])
}

/// @ai:intent Assemble a RISE benchmark from its kernel-specific parameters and constraints
/// @ai:effects pure
pub fn definition(
    name: &str,
    params: Vec<Parameter>,
    constraints: Vec<Constraint>,
) -> Result<ProblemDefinition> {
    let space = SearchSpace::builder()
        .params(params)
        .metrics(METRICS.iter().cloned())
        .objectives(OBJECTIVES.iter().cloned())
        .constraints(constraints)
        .fidelity_params(fidelity_params()?)
        .build()?;
    Ok(ProblemDefinition::new(name, space)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_metric_is_minimized() {
        assert_eq!(OBJECTIVES.len(), 3);
        assert!(OBJECTIVES.iter().all(|o| o.minimize));
        assert_eq!(OBJECTIVES[1].metric.name, "cpuEnergy");
        assert_eq!(OBJECTIVES[1].metric, METRICS[1]);
    }
}

//! @ai:module:intent Tables shared by the sparse tensor algebra (TACO) benchmarks
//! @ai:module:layer domain
//! @ai:module:public_api METRICS, OBJECTIVES, common_params, fidelity_params, definition
//! @ai:module:stateless true

use crate::error::Result;
use catbench_schema::{
    Constraint, Metric, Objective, Parameter, ProblemDefinition, SearchSpace, Value,
};
use std::sync::LazyLock;

/// Maximum OpenMP thread count tuned on the reference machines.
pub const MAX_THREADS: i64 = 20;

pub static METRICS: LazyLock<Vec<Metric>> = LazyLock::new(|| {
    vec![
        Metric::new("compute_time", 0, true),
        Metric::new("compute_times", 1, false),
        Metric::new("energy", 2, true),
    ]
});

pub static OBJECTIVES: LazyLock<Vec<Objective>> = LazyLock::new(|| {
    vec![
        Objective::new("compute_time", &METRICS[0], true),
        Objective::new("energy", &METRICS[2], true),
    ]
});

/// @ai:intent OpenMP scheduling knobs and loop-order permutation present in every TACO kernel
/// @ai:effects pure
pub fn common_params() -> Result<Vec<Parameter>> {
    Ok(vec![
        Parameter::integer("omp_num_threads", (2, MAX_THREADS), Some(16))?,
        Parameter::categorical(
            "omp_scheduling_type",
            vec![Value::Int(0), Value::Int(1), Value::Int(2)],
            Some(Value::Int(0)),
        )?,
        Parameter::categorical(
            "omp_monotonic",
            vec![Value::Int(0), Value::Int(1)],
            Some(Value::Int(0)),
        )?,
        Parameter::categorical(
            "omp_dynamic",
            vec![Value::Int(0), Value::Int(1)],
            Some(Value::Int(0)),
        )?,
        Parameter::permutation("permutation", 5, Some(vec![1, 0, 2, 3, 4]))?,
    ])
}

/// @ai:intent Measurement effort knobs of the TACO harness
/// @ai:effects pure
pub fn fidelity_params() -> Result<Vec<Parameter>> {
    Ok(vec![
        Parameter::integer("iterations", (1, 500), Some(10))?,
        Parameter::integer("repeats", (1, 100), Some(5))?,
        Parameter::real("wait_between_repeats", (0.0, 1000.0), Some(0.0))?,
        Parameter::real("wait_after_run", (0.0, 1000.0), Some(10.0))?,
    ])
}

/// @ai:intent Assemble a TACO benchmark from its kernel-specific parameters and constraints
/// @ai:post the common parameters follow the kernel-specific ones
/// @ai:effects pure
pub fn definition(
    name: &str,
    kernel_params: Vec<Parameter>,
    constraints: Vec<Constraint>,
) -> Result<ProblemDefinition> {
    let space = SearchSpace::builder()
        .params(kernel_params)
        .params(common_params()?)
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
    fn test_objectives_reference_shared_metrics() {
        let names: Vec<&str> = OBJECTIVES.iter().map(|o| o.metric.name.as_str()).collect();
        assert_eq!(names, vec!["compute_time", "energy"]);
        assert!(!METRICS[1].singular);
        assert_eq!(OBJECTIVES[1].metric, METRICS[2]);
    }

    #[test]
    fn test_permutation_default_membership() {
        let params = common_params().unwrap();
        let permutation = params.iter().find(|p| p.name() == "permutation").unwrap();
        assert!(permutation.contains(&Value::Sequence(vec![1, 0, 2, 3, 4])));
        assert!(!permutation.contains(&Value::Sequence(vec![1, 0, 2, 3, 3])));
        assert!(!permutation.contains(&Value::Sequence(vec![0, 1, 2, 3])));
    }
}

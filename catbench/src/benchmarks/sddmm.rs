//! @ai:module:intent Sampled dense-dense matrix multiplication (SDDMM) schedule space

use super::{constraints, pow2, taco};
use crate::error::Result;
use catbench_schema::ProblemDefinition;

pub fn definition() -> Result<ProblemDefinition> {
    let params = pow2(&[
        ("chunk_size", 1, 256, Some(16)),
        ("unroll_factor", 1, 64, Some(2)),
        ("omp_chunk_size", 1, 256, Some(2)),
    ])?;

    let constraints = constraints(&[
        ("omp_num_threads % 2 == 0", &["omp_num_threads"]),
        ("unroll_factor < chunk_size", &["unroll_factor", "chunk_size"]),
        (
            "((permutation[2] < permutation[4]) and (permutation[0] < permutation[2]) \
              and (permutation[1] < permutation[2])) or \
             ((permutation[4] < permutation[2]) and (permutation[0] < permutation[4]) \
              and (permutation[1] < permutation[4]))",
            &["permutation"],
        ),
    ])?;

    taco::definition("sddmm", params, constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catbench_schema::Value;

    #[test]
    fn test_loop_order_constraint() {
        let def = definition().unwrap();
        let space = def.search_space();
        let mut cfg = space.default_configuration();
        assert!(space.check(&cfg).unwrap().passed());

        cfg.insert("permutation".to_string(), Value::Sequence(vec![2, 0, 1, 3, 4]));
        let result = space.check(&cfg).unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].index, 2);
    }

    #[test]
    fn test_odd_thread_count_rejected() {
        let def = definition().unwrap();
        let space = def.search_space();
        let mut cfg = space.default_configuration();
        cfg.insert("omp_num_threads".to_string(), Value::Int(7));
        assert!(!space.check(&cfg).unwrap().passed());
    }
}

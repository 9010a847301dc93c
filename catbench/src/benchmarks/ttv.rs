//! @ai:module:intent Tensor times vector (TTV) schedule space

use super::{constraints, pow2, taco};
use crate::error::Result;
use catbench_schema::ProblemDefinition;

pub fn definition() -> Result<ProblemDefinition> {
    let params = pow2(&[
        ("chunk_size_i", 2, 256, Some(16)),
        ("chunk_size_fpos", 2, 256, Some(2)),
        ("chunk_size_k", 2, 256, Some(2)),
        ("omp_chunk_size", 1, 32, Some(2)),
    ])?;

    let constraints = constraints(&[(
        "(permutation[0] == 4) | ((permutation[0] == 0) & (permutation[1] == 1)) | \
         ((permutation[0] == 1) & (permutation[1] == 0)) | \
         ((permutation[0] == 0) & (permutation[1] == 4)) | \
         ((permutation[0] == 1) & (permutation[1] == 4))",
        &["permutation"],
    )])?;

    taco::definition("ttv", params, constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catbench_schema::Value;

    #[test]
    fn test_outer_loop_orders() {
        let def = definition().unwrap();
        let space = def.search_space();
        let mut cfg = space.default_configuration();

        for (order, feasible) in [
            (vec![4, 0, 1, 2, 3], true),
            (vec![0, 4, 1, 2, 3], true),
            (vec![2, 0, 1, 3, 4], false),
            (vec![0, 2, 1, 3, 4], false),
        ] {
            cfg.insert("permutation".to_string(), Value::Sequence(order.clone()));
            assert_eq!(space.check(&cfg).unwrap().passed(), feasible, "{:?}", order);
        }
    }
}

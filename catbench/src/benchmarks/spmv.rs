//! @ai:module:intent Sparse matrix times vector (SpMV) schedule space

use super::{constraints, pow2, taco};
use crate::error::Result;
use catbench_schema::ProblemDefinition;

pub fn definition() -> Result<ProblemDefinition> {
    let params = pow2(&[
        ("chunk_size", 1, 1024, Some(16)),
        ("chunk_size2", 1, 64, Some(2)),
        ("chunk_size3", 1, 64, Some(2)),
        ("omp_chunk_size", 1, 256, Some(2)),
    ])?;

    // The innermost loop stays fixed.
    let constraints = constraints(&[("permutation[4] == 4", &["permutation"])])?;

    taco::definition("spmv", params, constraints)
}

//! @ai:module:intent Sparse matrix times dense matrix (SpMM) schedule space
//! @ai:module:layer domain

use super::{constraints, pow2, taco};
use crate::error::Result;
use catbench_schema::ProblemDefinition;

/// @ai:intent Build the SpMM benchmark definition
/// @ai:effects pure
pub fn definition() -> Result<ProblemDefinition> {
    let params = pow2(&[
        ("chunk_size", 1, 1024, Some(16)),
        ("unroll_factor", 1, 64, Some(8)),
        ("omp_chunk_size", 1, 256, Some(2)),
    ])?;

    let constraints = constraints(&[(
        "unroll_factor < chunk_size",
        &["unroll_factor", "chunk_size"],
    )])?;

    taco::definition("spmm", params, constraints)
}

//! @ai:module:intent Matricized tensor times Khatri-Rao product (MTTKRP) schedule space

use super::{constraints, pow2, taco};
use crate::error::Result;
use catbench_schema::ProblemDefinition;

/// @ai:intent Build the MTTKRP benchmark definition
/// @ai:post the three kernel knobs carry no default
pub fn definition() -> Result<ProblemDefinition> {
    let params = pow2(&[
        ("chunk_size", 1, 1024, None),
        ("unroll_factor", 1, 1024, None),
        ("omp_chunk_size", 1, 256, None),
    ])?;

    let constraints = constraints(&[(
        "unroll_factor < chunk_size",
        &["unroll_factor", "chunk_size"],
    )])?;

    taco::definition("mttkrp", params, constraints)
}

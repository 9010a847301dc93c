//! @ai:module:intent Stencil kernel space

use super::{constraints, pow2, rise};
use crate::error::Result;
use catbench_schema::ProblemDefinition;

pub fn definition() -> Result<ProblemDefinition> {
    let params = pow2(&[
        ("tuned_gs0", 1, 1024, Some(16)),
        ("tuned_gs1", 1, 1024, Some(64)),
        ("tuned_ls0", 1, 1024, Some(2)),
        ("tuned_ls1", 1, 1024, Some(32)),
    ])?;

    let constraints = constraints(&[
        ("tuned_gs0 % tuned_ls0 == 0", &["tuned_gs0", "tuned_ls0"]),
        ("tuned_gs1 % tuned_ls1 == 0", &["tuned_gs1", "tuned_ls1"]),
        ("tuned_ls0 * tuned_ls1 <= 1024", &["tuned_ls0", "tuned_ls1"]),
    ])?;

    rise::definition("stencil", params, constraints)
}

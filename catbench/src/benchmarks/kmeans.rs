//! @ai:module:intent K-means clustering kernel space

use super::{constraints, pow2, rise};
use crate::error::Result;
use catbench_schema::ProblemDefinition;

pub fn definition() -> Result<ProblemDefinition> {
    let params = pow2(&[
        ("tuned_gs0", 1, 1024, Some(256)),
        ("tuned_gs1", 1, 1024, Some(1024)),
        ("tuned_ls0", 1, 1024, Some(1)),
        ("tuned_ls1", 1, 1024, Some(8)),
    ])?;

    let constraints = constraints(&[
        ("tuned_gs0 % tuned_ls0 == 0", &["tuned_gs0", "tuned_ls0"]),
        ("tuned_gs1 % tuned_ls1 == 0", &["tuned_gs1", "tuned_ls1"]),
        ("tuned_ls0 * tuned_ls1 <= 1024", &["tuned_ls0", "tuned_ls1"]),
    ])?;

    rise::definition("kmeans", params, constraints)
}

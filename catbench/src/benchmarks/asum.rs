//! @ai:module:intent Absolute-sum reduction (asum) kernel space

use super::{constraints, pow2, rise};
use crate::error::Result;
use catbench_schema::ProblemDefinition;

pub fn definition() -> Result<ProblemDefinition> {
    let params = pow2(&[
        ("tuned_sp0", 1, 16_777_216, Some(4096)),
        ("tuned_gs0", 1, 1024, Some(16)),
        ("tuned_stride", 1, 16_777_216, Some(2)),
        ("tuned_sp1", 256, 16_777_216, Some(1024)),
        ("tuned_ls0", 1, 1024, Some(16)),
    ])?;

    let constraints = constraints(&[
        ("tuned_sp0 % tuned_sp1 == 0", &["tuned_sp0", "tuned_sp1"]),
        ("tuned_sp0 >= tuned_sp1", &["tuned_sp0", "tuned_sp1"]),
        (
            "tuned_sp0 >= tuned_sp1 * tuned_stride",
            &["tuned_sp0", "tuned_sp1", "tuned_stride"],
        ),
        ("tuned_gs0 % tuned_ls0 == 0", &["tuned_gs0", "tuned_ls0"]),
    ])?;

    rise::definition("asum", params, constraints)
}

//! @ai:module:intent Vector scaling (scal) kernel space
//! @ai:module:layer domain

use super::{constraints, pow2, rise};
use crate::error::Result;
use catbench_schema::ProblemDefinition;

/// Elements in the scaled vector.
const DATA_SIZE: i64 = 33_554_432;

/// @ai:intent Build the scal benchmark definition
/// @ai:post reciprocal terms such as `1 / (tuned_s1 * tuned_vec)` evaluate with real division
pub fn definition() -> Result<ProblemDefinition> {
    let params = pow2(&[
        ("tuned_ls1", 1, 1024, Some(1)),
        ("tuned_gs0", 1, 1024, Some(8)),
        ("tuned_s0", 1, DATA_SIZE, Some(2048)),
        ("tuned_vec", 2, 16, Some(2)),
        ("tuned_gs1", 1, 1024, Some(128)),
        ("tuned_ls0", 1, 1024, Some(8)),
        ("tuned_s1", 1, DATA_SIZE, Some(16)),
    ])?;

    let data_size_bound = format!(
        "{} * tuned_s1 * tuned_vec * (1 / (tuned_s1 * tuned_vec)) >= 1",
        DATA_SIZE
    );

    let constraints = constraints(&[
        ("tuned_gs0 % tuned_ls0 == 0", &["tuned_gs0", "tuned_ls0"]),
        ("tuned_gs1 % tuned_ls1 == 0", &["tuned_gs1", "tuned_ls1"]),
        ("tuned_ls0 * tuned_ls1 <= 1024", &["tuned_ls0", "tuned_ls1"]),
        (
            "(tuned_s0 % (tuned_s1 * tuned_vec) == 0) and \
             ((tuned_s0 * (1 / (tuned_s1 * tuned_vec))) >= 1) and \
             ((tuned_s0 * tuned_s1 * (1 / (tuned_s1 * tuned_vec))) >= 1) and \
             ((tuned_s0 * tuned_s1) >= 0) and \
             ((tuned_s0 * tuned_s1) % (tuned_s1 * tuned_vec) == 0) and \
             ((tuned_s0 * tuned_s1 * tuned_vec * (1 / (tuned_s1 * tuned_vec))) >= 1)",
            &["tuned_s0", "tuned_s1", "tuned_vec"],
        ),
        (data_size_bound.as_str(), &["tuned_s1", "tuned_vec"]),
    ])?;

    rise::definition("scal", params, constraints)
}

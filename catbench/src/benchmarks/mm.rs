//! @ai:module:intent Dense matrix multiplication kernel space
//! @ai:module:layer domain

use super::{constraints, pow2, rise};
use crate::error::Result;
use catbench_schema::ProblemDefinition;

/// @ai:intent Build the matrix multiplication benchmark definition
/// @ai:post the last three constraints bound shared-memory use to 48 KiB
pub fn definition() -> Result<ProblemDefinition> {
    let params = pow2(&[
        ("tuned_v3", 4, 1024, Some(8)),
        ("tuned_v4", 1, 1024, Some(16)),
        ("tuned_v5", 4, 1024, Some(16)),
        ("tuned_v6", 4, 1024, Some(64)),
        ("tuned_v7", 4, 1024, Some(8)),
        ("tuned_v8", 1, 1024, Some(16)),
        ("tuned_ls0", 1, 1024, Some(32)),
        ("tuned_ls1", 1, 1024, Some(16)),
        ("tuned_gs0", 1, 1024, Some(1024)),
        ("tuned_gs1", 1, 1024, Some(16)),
    ])?;

    let constraints = constraints(&[
        ("tuned_v7 % tuned_v3 == 0", &["tuned_v7", "tuned_v3"]),
        ("tuned_v5 % tuned_v4 == 0", &["tuned_v5", "tuned_v4"]),
        ("tuned_v5 * tuned_v8 % tuned_v6 == 0", &["tuned_v5", "tuned_v8", "tuned_v6"]),
        ("tuned_gs0 % tuned_ls0 == 0", &["tuned_gs0", "tuned_ls0"]),
        (
            "(tuned_gs1 % tuned_ls1 == 0) and (tuned_ls0 * tuned_ls1 <= 1024)",
            &["tuned_gs1", "tuned_ls1", "tuned_ls0"],
        ),
        ("49152 - tuned_v5 * 1 * 4 - tuned_v5 * 1 * 4 - 4 * 1 * 1 >= 0", &["tuned_v5"]),
        (
            "49152 - tuned_v5 * tuned_v7 * 4 - tuned_v5 * 1 * 4 - 4 * tuned_v7 * 1 >= 0",
            &["tuned_v5", "tuned_v7"],
        ),
        (
            "49152 - tuned_v5 * tuned_v7 * 4 - tuned_v5 * tuned_v8 * 4 \
             - 4 * tuned_v7 * tuned_v8 >= 0",
            &["tuned_v5", "tuned_v7", "tuned_v8"],
        ),
    ])?;

    rise::definition("mm", params, constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catbench_schema::Value;

    #[test]
    fn test_shared_memory_bound() {
        let def = definition().unwrap();
        let space = def.search_space();
        let mut cfg = space.default_configuration();
        cfg.insert("tuned_v5".to_string(), Value::Int(1024));
        cfg.insert("tuned_v7".to_string(), Value::Int(1024));
        let violated: Vec<usize> = space
            .check(&cfg)
            .unwrap()
            .violations
            .iter()
            .map(|v| v.index)
            .collect();
        assert_eq!(violated, vec![6, 7]);
    }
}

//! @ai:module:intent Harris corner detection kernel space

use super::{constraints, pow2, rise};
use crate::error::Result;
use catbench_schema::{Parameter, ProblemDefinition};

pub fn definition() -> Result<ProblemDefinition> {
    let mut params = pow2(&[
        ("tuned_ls0", 1, 1024, Some(1)),
        ("tuned_ls1", 1, 1024, Some(1)),
        ("tuned_gs0", 1, 1024, Some(64)),
        ("tuned_gs1", 1, 1024, Some(32)),
    ])?;
    params.push(Parameter::integer("tuned_tileX", (1, 1024), Some(38))?);
    params.push(Parameter::integer("tuned_tileY", (1, 1024), Some(26))?);
    params.extend(pow2(&[("tuned_vec", 2, 4, Some(2))])?);

    let constraints = constraints(&[
        ("tuned_gs0 % tuned_ls0 == 0", &["tuned_gs0", "tuned_ls0"]),
        ("tuned_gs1 % tuned_ls1 == 0", &["tuned_gs1", "tuned_ls1"]),
        ("(tuned_tileX + 4) % tuned_vec == 0", &["tuned_tileX", "tuned_vec"]),
        ("(tuned_tileX * tuned_tileY) <= 1024", &["tuned_tileX", "tuned_tileY"]),
        ("(tuned_ls0 * tuned_ls1) <= 1024", &["tuned_ls0", "tuned_ls1"]),
        ("(tuned_tileX == 1) or (tuned_tileX % 2 == 0)", &["tuned_tileX"]),
        ("(tuned_tileY == 1) or (tuned_tileY % 2 == 0)", &["tuned_tileY"]),
        (
            "(tuned_tileY != 1) or ((tuned_tileX != 1024) and (tuned_tileX != 1022))",
            &["tuned_tileX", "tuned_tileY"],
        ),
    ])?;

    rise::definition("harris", params, constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catbench_schema::Value;

    #[test]
    fn test_tile_shapes() {
        let def = definition().unwrap();
        let space = def.search_space();
        let mut cfg = space.default_configuration();

        cfg.insert("tuned_tileX".to_string(), Value::Int(1022));
        cfg.insert("tuned_tileY".to_string(), Value::Int(1));
        let violated: Vec<usize> = space
            .check(&cfg)
            .unwrap()
            .violations
            .iter()
            .map(|v| v.index)
            .collect();
        assert_eq!(violated, vec![7]);

        cfg.insert("tuned_tileX".to_string(), Value::Int(37));
        cfg.insert("tuned_tileY".to_string(), Value::Int(2));
        let violated: Vec<usize> = space
            .check(&cfg)
            .unwrap()
            .violations
            .iter()
            .map(|v| v.index)
            .collect();
        assert_eq!(violated, vec![2, 5]);
    }
}

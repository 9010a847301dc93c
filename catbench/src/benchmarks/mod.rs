//! @ai:module:intent Built-in benchmark definitions grouped by family
//! @ai:module:layer domain
//! @ai:module:public_api BenchmarkFamily, BuiltinBenchmark, Builder, BUILTIN
//! @ai:module:stateless true

pub mod rise;
pub mod taco;

mod asum;
mod harris;
mod kmeans;
mod mm;
mod mttkrp;
mod scal;
mod sddmm;
mod spmm;
mod spmv;
mod stencil;
mod ttv;

use crate::error::Result;
use catbench_schema::{Constraint, Parameter, ProblemDefinition};
use serde::{Deserialize, Serialize};
use std::fmt;

/// @ai:intent Benchmark suites sharing metrics, fidelity knobs and dispatch defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkFamily {
    /// Sparse tensor algebra kernels compiled with TACO.
    Taco,
    /// GPU kernels generated with RISE/ELEVATE.
    Rise,
}

impl BenchmarkFamily {
    pub fn name(self) -> &'static str {
        match self {
            BenchmarkFamily::Taco => "taco",
            BenchmarkFamily::Rise => "rise",
        }
    }

    /// @ai:intent Objectives enabled when a request names none
    /// @ai:effects pure
    pub fn default_objectives(self) -> &'static [&'static str] {
        match self {
            BenchmarkFamily::Taco => &["compute_time"],
            BenchmarkFamily::Rise => &["compute_time", "energy"],
        }
    }

    /// @ai:intent Dataset used when a request names none
    /// @ai:effects pure
    pub fn default_dataset(self) -> &'static str {
        match self {
            BenchmarkFamily::Taco => "2630",
            BenchmarkFamily::Rise => "rtxtitan",
        }
    }
}

impl fmt::Display for BenchmarkFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Zero-argument constructor of one benchmark definition.
pub type Builder = fn() -> Result<ProblemDefinition>;

/// @ai:intent A compiled-in benchmark and the family that supplies its defaults
#[derive(Debug, Clone, Copy)]
pub struct BuiltinBenchmark {
    pub name: &'static str,
    pub family: BenchmarkFamily,
    pub build: Builder,
}

const fn builtin(name: &'static str, family: BenchmarkFamily, build: Builder) -> BuiltinBenchmark {
    BuiltinBenchmark { name, family, build }
}

pub const BUILTIN: &[BuiltinBenchmark] = &[
    builtin("spmm", BenchmarkFamily::Taco, spmm::definition),
    builtin("spmv", BenchmarkFamily::Taco, spmv::definition),
    builtin("sddmm", BenchmarkFamily::Taco, sddmm::definition),
    builtin("mttkrp", BenchmarkFamily::Taco, mttkrp::definition),
    builtin("ttv", BenchmarkFamily::Taco, ttv::definition),
    builtin("asum", BenchmarkFamily::Rise, asum::definition),
    builtin("harris", BenchmarkFamily::Rise, harris::definition),
    builtin("kmeans", BenchmarkFamily::Rise, kmeans::definition),
    builtin("mm", BenchmarkFamily::Rise, mm::definition),
    builtin("scal", BenchmarkFamily::Rise, scal::definition),
    builtin("stencil", BenchmarkFamily::Rise, stencil::definition),
];

/// Base-2 knobs from `(name, lo, hi, default)` rows.
pub(crate) fn pow2(rows: &[(&str, i64, i64, Option<i64>)]) -> Result<Vec<Parameter>> {
    rows.iter()
        .map(|&(name, lo, hi, default)| Ok(Parameter::int_exponential(name, (lo, hi), 2, default)?))
        .collect()
}

/// Constraints from `(expression, dependent_params)` rows.
pub(crate) fn constraints(rows: &[(&str, &[&str])]) -> Result<Vec<Constraint>> {
    rows.iter()
        .map(|&(expression, deps)| Ok(Constraint::new(expression, deps)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_names_are_unique_and_lowercase() {
        let names: HashSet<&str> = BUILTIN.iter().map(|b| b.name).collect();
        assert_eq!(names.len(), BUILTIN.len());
        assert!(BUILTIN.iter().all(|b| b.name == b.name.to_lowercase()));
    }

    #[test]
    fn test_every_builtin_builds_under_its_name() {
        for benchmark in BUILTIN {
            let definition = (benchmark.build)().unwrap();
            assert_eq!(definition.name(), benchmark.name);
        }
    }

    #[test]
    fn test_family_defaults_name_existing_objectives() {
        for benchmark in BUILTIN {
            let definition = (benchmark.build)().unwrap();
            for objective in benchmark.family.default_objectives() {
                assert!(
                    definition.search_space().objective(objective).is_some(),
                    "{} lacks default objective {}",
                    benchmark.name,
                    objective
                );
            }
        }
    }

    #[test]
    fn test_pow2_rejects_off_step_default() {
        assert!(pow2(&[("tuned_ls0", 1, 1024, Some(16))]).is_ok());
        assert!(pow2(&[("tuned_ls0", 1, 1024, Some(24))]).is_err());
    }

    #[test]
    fn test_family_serde_is_lowercase() {
        let family: BenchmarkFamily = serde_json::from_str("\"rise\"").unwrap();
        assert_eq!(family, BenchmarkFamily::Rise);
        assert_eq!(serde_json::to_string(&BenchmarkFamily::Taco).unwrap(), "\"taco\"");
    }
}

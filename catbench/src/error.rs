//! @ai:module:intent Error types for benchmark registration, dispatch and definition loading
//! @ai:module:layer application
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for the catbench application crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown benchmark: {0}")]
    UnknownBenchmark(String),

    #[error("Benchmark already registered: {0}")]
    DuplicateBenchmark(String),

    #[error("Benchmark `{benchmark}` has no objective `{objective}`")]
    UnknownObjective { benchmark: String, objective: String },

    #[error("At least one objective must be enabled for `{0}`")]
    EmptyObjectives(String),

    #[error(transparent)]
    Schema(#[from] catbench_schema::Error),

    #[error("Invalid definition file {path}: {message}")]
    DefinitionFile { path: PathBuf, message: String },
}

impl Error {
    /// @ai:intent Whether the error rejects the caller's request rather than reporting a fault
    /// @ai:effects pure
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::UnknownBenchmark(_) | Error::UnknownObjective { .. } | Error::EmptyObjectives(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_errors_are_rejections() {
        assert!(Error::UnknownBenchmark("blur".to_string()).is_rejection());
        assert!(Error::EmptyObjectives("asum".to_string()).is_rejection());
        assert!(Error::UnknownObjective {
            benchmark: "spmm".to_string(),
            objective: "cpuEnergy".to_string(),
        }
        .is_rejection());

        assert!(!Error::DuplicateBenchmark("spmm".to_string()).is_rejection());
        assert!(!Error::DefinitionFile {
            path: PathBuf::from("blur.toml"),
            message: "missing field `name`".to_string(),
        }
        .is_rejection());
    }
}

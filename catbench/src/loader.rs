//! @ai:module:intent TOML loader for benchmark definitions kept outside the binary
//! @ai:module:layer infrastructure
//! @ai:module:public_api DefinitionLoader, LoadedDefinition, LoadReport
//! @ai:module:depends_on registry, benchmarks, error
//! @ai:module:stateless true

use crate::benchmarks::BenchmarkFamily;
use crate::error::{Error, Result};
use crate::registry::Registry;
use catbench_schema::{ProblemDefinition, SearchSpace};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent On-disk shape of one definition file
#[derive(Debug, Deserialize)]
struct DefinitionFile {
    name: String,
    family: BenchmarkFamily,
    search_space: SearchSpace,
}

/// @ai:intent A validated definition and where it came from
#[derive(Debug, Clone)]
pub struct LoadedDefinition {
    pub path: PathBuf,
    pub family: BenchmarkFamily,
    pub definition: ProblemDefinition,
}

/// @ai:intent Outcome of loading a directory: valid definitions plus per-file failures
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<LoadedDefinition>,
    pub failures: Vec<(PathBuf, String)>,
}

impl LoadReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// @ai:intent Loads benchmark definitions from TOML files
/// @ai:effects pure (stateless)
#[derive(Debug, Default, Clone, Copy)]
pub struct DefinitionLoader;

impl DefinitionLoader {
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Parse and validate a single definition file
    /// @ai:pre path points to a TOML file
    /// @ai:effects fs:read
    pub fn load_file(&self, path: &Path) -> Result<LoadedDefinition> {
        let file_error = |message: String| Error::DefinitionFile {
            path: path.to_path_buf(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        let file: DefinitionFile = toml::from_str(&content).map_err(|e| file_error(e.to_string()))?;
        let definition = ProblemDefinition::new(&file.name, file.search_space)
            .map_err(|e| file_error(e.to_string()))?;

        Ok(LoadedDefinition {
            path: path.to_path_buf(),
            family: file.family,
            definition,
        })
    }

    /// @ai:intent Find all TOML files below a directory, or the path itself if it is a file
    /// @ai:effects fs:read
    pub fn find_definition_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "toml")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();
        files
    }

    /// @ai:intent Load every definition below a directory, collecting failures instead of stopping
    /// @ai:effects fs:read
    pub fn load_dir(&self, root: &Path) -> LoadReport {
        let mut report = LoadReport::default();

        for path in self.find_definition_files(root) {
            match self.load_file(&path) {
                Ok(loaded) => report.loaded.push(loaded),
                Err(e) => report.failures.push((path, e.to_string())),
            }
        }

        report
    }

    /// @ai:intent Register every valid definition below a directory
    /// @ai:post invalid files are skipped with a warning; name clashes abort
    /// @ai:effects fs:read
    pub fn register_dir(&self, registry: &mut Registry, root: &Path) -> Result<usize> {
        let report = self.load_dir(root);

        for (path, message) in &report.failures {
            tracing::warn!("Skipping invalid definition file {}: {}", path.display(), message);
        }

        let count = report.loaded.len();
        for loaded in report.loaded {
            tracing::info!(
                "Loaded {} from {}",
                loaded.definition.name(),
                loaded.path.display()
            );
            registry.register(loaded.definition, loaded.family)?;
        }

        Ok(count)
    }
}

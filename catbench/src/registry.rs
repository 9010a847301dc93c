//! @ai:module:intent Map benchmark names to lazily built definitions and resolve dispatch defaults
//! @ai:module:layer application
//! @ai:module:public_api Registry, ResolveOptions, ResolvedRequest, DEFAULT_PORT, LOCAL_SERVER
//! @ai:module:depends_on benchmarks, error
//! @ai:module:thread_safe true

use crate::benchmarks::{BenchmarkFamily, Builder, BUILTIN};
use crate::error::{Error, Result};
use catbench_schema::{ProblemDefinition, SearchSpace};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

/// Port the serving layer binds when none is requested.
pub const DEFAULT_PORT: u16 = 50050;

/// The single endpoint used when no servers are named.
pub const LOCAL_SERVER: &str = "localhost";

struct Entry {
    family: BenchmarkFamily,
    build: Option<Builder>,
    definition: OnceLock<Arc<ProblemDefinition>>,
}

/// @ai:intent Name-keyed catalogue of benchmark definitions
/// @ai:effects pure
#[derive(Default)]
pub struct Registry {
    entries: BTreeMap<String, Entry>,
}

/// @ai:intent Caller choices for a dispatch request; None means use the benchmark's default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    pub enable_model: bool,
    pub dataset: Option<String>,
    pub enabled_objectives: Option<Vec<String>>,
    pub server_addresses: Option<Vec<String>>,
    pub enable_tabular: bool,
    pub enable_download: bool,
    pub port: u16,
}

impl Default for ResolveOptions {
    /// Library callers get the surrogate model unless they opt out; the CLI opts out.
    fn default() -> Self {
        Self {
            enable_model: true,
            dataset: None,
            enabled_objectives: None,
            server_addresses: None,
            enable_tabular: true,
            enable_download: true,
            port: DEFAULT_PORT,
        }
    }
}

/// @ai:intent Fully defaulted request handed to the execution runtime
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRequest {
    pub benchmark_name: String,
    pub family: BenchmarkFamily,
    pub definition: Arc<ProblemDefinition>,
    pub dataset: String,
    pub enabled_objectives: Vec<String>,
    pub enable_tabular: bool,
    pub enable_model: bool,
    pub enable_download: bool,
    pub server_addresses: Vec<String>,
    pub port: u16,
}

impl ResolvedRequest {
    pub fn search_space(&self) -> &SearchSpace {
        self.definition.search_space()
    }

    /// @ai:intent Whether the server list departs from the single local endpoint
    pub fn is_remote(&self) -> bool {
        is_remote(&self.server_addresses)
    }
}

fn is_remote(servers: &[String]) -> bool {
    !(servers.len() == 1 && servers[0] == LOCAL_SERVER)
}

fn canonical(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Registry {
    /// @ai:intent Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Create a registry holding every compiled-in benchmark, none built yet
    /// @ai:post definitions are constructed on first lookup
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|b| {
                let entry = Entry {
                    family: b.family,
                    build: Some(b.build),
                    definition: OnceLock::new(),
                };
                (b.name.to_string(), entry)
            })
            .collect();
        Self { entries }
    }

    /// @ai:intent Add an already built definition under its own name
    /// @ai:pre no benchmark of the same name is registered
    pub fn register(
        &mut self,
        definition: ProblemDefinition,
        family: BenchmarkFamily,
    ) -> Result<()> {
        let name = definition.name().to_string();
        if self.entries.contains_key(&name) {
            return Err(Error::DuplicateBenchmark(name));
        }

        tracing::debug!("Registering benchmark {} ({})", name, family);
        self.entries.insert(
            name,
            Entry {
                family,
                build: None,
                definition: OnceLock::from(Arc::new(definition)),
            },
        );
        Ok(())
    }

    /// @ai:intent Registered benchmark names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&canonical(name))
    }

    fn entry(&self, name: &str) -> Result<(String, &Entry)> {
        let key = canonical(name);
        match self.entries.get(&key) {
            Some(entry) => Ok((key, entry)),
            None => Err(Error::UnknownBenchmark(name.to_string())),
        }
    }

    /// @ai:intent Family that supplies a benchmark's dispatch defaults
    pub fn family(&self, name: &str) -> Result<BenchmarkFamily> {
        Ok(self.entry(name)?.1.family)
    }

    /// @ai:intent Look up a definition, building it on first use
    /// @ai:post repeated calls return the same shared instance
    pub fn definition(&self, name: &str) -> Result<Arc<ProblemDefinition>> {
        let (key, entry) = self.entry(name)?;
        if let Some(definition) = entry.definition.get() {
            return Ok(Arc::clone(definition));
        }

        let build = entry.build.ok_or_else(|| Error::UnknownBenchmark(key.clone()))?;
        tracing::debug!("Building definition for {}", key);
        let built = Arc::new(build()?);
        Ok(Arc::clone(entry.definition.get_or_init(|| built)))
    }

    /// @ai:intent Apply the default-resolution policy to a dispatch request
    /// @ai:pre name is registered (case-insensitive)
    /// @ai:post remote execution implies enable_model == false
    pub fn resolve(&self, name: &str, options: &ResolveOptions) -> Result<ResolvedRequest> {
        let family = self.family(name)?;
        let definition = self.definition(name)?;
        let benchmark_name = definition.name().to_string();

        let requested = options.enabled_objectives.clone().unwrap_or_else(|| {
            family
                .default_objectives()
                .iter()
                .map(|o| o.to_string())
                .collect()
        });
        let enabled_objectives = select_objectives(&definition, &requested)?;

        // A list given by the caller is kept verbatim, even when empty.
        let server_addresses = options
            .server_addresses
            .clone()
            .unwrap_or_else(|| vec![LOCAL_SERVER.to_string()]);

        let mut enable_model = options.enable_model;
        if enable_model && is_remote(&server_addresses) {
            tracing::warn!(
                "Disabling model for {}: execution is delegated to {:?}",
                benchmark_name,
                server_addresses
            );
            enable_model = false;
        }

        let dataset = options
            .dataset
            .clone()
            .unwrap_or_else(|| family.default_dataset().to_string());

        tracing::info!(
            "Resolved {} ({}) dataset={} objectives={:?}",
            benchmark_name,
            family,
            dataset,
            enabled_objectives
        );

        Ok(ResolvedRequest {
            benchmark_name,
            family,
            definition,
            dataset,
            enabled_objectives,
            enable_tabular: options.enable_tabular,
            enable_model,
            enable_download: options.enable_download,
            server_addresses,
            port: options.port,
        })
    }
}

fn select_objectives(definition: &ProblemDefinition, requested: &[String]) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Err(Error::EmptyObjectives(definition.name().to_string()));
    }

    let mut selected: Vec<String> = Vec::with_capacity(requested.len());
    for objective in requested {
        if definition.search_space().objective(objective).is_none() {
            return Err(Error::UnknownObjective {
                benchmark: definition.name().to_string(),
                objective: objective.clone(),
            });
        }
        if !selected.contains(objective) {
            selected.push(objective.clone());
        }
    }
    Ok(selected)
}

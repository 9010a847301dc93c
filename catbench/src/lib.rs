//! @ai:module:intent catbench benchmark catalogue and request dispatcher
//! @ai:module:layer application
//! @ai:module:public_api benchmarks, registry, config, loader, error

pub mod benchmarks;
pub mod config;
pub mod error;
pub mod loader;
pub mod registry;

pub use benchmarks::{BenchmarkFamily, BuiltinBenchmark, BUILTIN};
pub use config::{CatbenchConfig, DispatchConfig, PathConfig};
pub use error::{Error, Result};
pub use loader::{DefinitionLoader, LoadReport, LoadedDefinition};
pub use registry::{Registry, ResolveOptions, ResolvedRequest, DEFAULT_PORT, LOCAL_SERVER};

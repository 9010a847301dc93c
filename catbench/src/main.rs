//! @ai:module:intent CLI for resolving, inspecting and checking catbench benchmarks
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use catbench::{CatbenchConfig, DefinitionLoader, Registry, ResolvedRequest};
use catbench_schema::{output, Configuration, OutputFormat};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "catbench")]
#[command(author, version, about = "Autotuning benchmark search spaces and request dispatch")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a benchmark request with its dispatch defaults
    Resolve {
        /// Benchmark name (case-insensitive)
        #[arg(long)]
        benchmark: Option<String>,

        /// Dataset identifier
        #[arg(long)]
        dataset: Option<String>,

        /// Execution servers (comma-separated)
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        servers: Option<Vec<String>>,

        /// Objectives to enable (comma-separated); defaults per benchmark family
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        objectives: Option<Vec<String>>,

        /// Answer queries from a surrogate model
        #[arg(long = "enable_model")]
        enable_model: Option<bool>,

        /// Answer queries from the tabular dataset when possible
        #[arg(long = "enable_tabular")]
        enable_tabular: Option<bool>,

        /// Download missing datasets
        #[arg(long = "enable_download")]
        enable_download: Option<bool>,

        /// Port of the serving layer
        #[arg(long = "interopt_port")]
        interopt_port: Option<u16>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory of extra definition files
        #[arg(long)]
        definitions: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json-pretty")]
        format: Format,
    },

    /// List registered benchmarks
    List {
        /// Directory of extra definition files
        #[arg(long)]
        definitions: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show a benchmark's search space
    Show {
        /// Benchmark name (case-insensitive)
        benchmark: String,

        /// Directory of extra definition files
        #[arg(long)]
        definitions: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Check a configuration against a benchmark's constraints
    Check {
        /// Benchmark name (case-insensitive)
        benchmark: String,

        /// JSON file mapping parameter names to values
        configuration: PathBuf,

        /// JSON file with (partial) fidelity values
        #[arg(long)]
        fidelity: Option<PathBuf>,

        /// Only re-evaluate constraints reading these parameters (comma-separated)
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        changed: Option<Vec<String>>,

        /// Directory of extra definition files
        #[arg(long)]
        definitions: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Validate definition files
    Validate {
        /// Definition file or directory
        path: PathBuf,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "catbench.toml")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

struct ResolveArgs {
    benchmark: Option<String>,
    dataset: Option<String>,
    servers: Option<Vec<String>>,
    objectives: Option<Vec<String>>,
    enable_model: Option<bool>,
    enable_tabular: Option<bool>,
    enable_download: Option<bool>,
    interopt_port: Option<u16>,
    config: Option<PathBuf>,
    definitions: Option<PathBuf>,
}

#[derive(Serialize)]
struct BenchmarkSummary {
    name: String,
    family: String,
    params: usize,
    constraints: usize,
    objectives: Vec<String>,
}

#[derive(Serialize)]
struct CheckReport {
    benchmark: String,
    result: catbench_schema::CheckResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    fidelity: Option<Configuration>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("catbench=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            benchmark,
            dataset,
            servers,
            objectives,
            enable_model,
            enable_tabular,
            enable_download,
            interopt_port,
            config,
            definitions,
            format,
        } => resolve(
            ResolveArgs {
                benchmark,
                dataset,
                servers,
                objectives,
                enable_model,
                enable_tabular,
                enable_download,
                interopt_port,
                config,
                definitions,
            },
            format.into(),
        ),
        Commands::List {
            definitions,
            format,
        } => list(definitions.as_deref(), format.into()),
        Commands::Show {
            benchmark,
            definitions,
            format,
        } => show(&benchmark, definitions.as_deref(), format.into()),
        Commands::Check {
            benchmark,
            configuration,
            fidelity,
            changed,
            definitions,
            format,
        } => check(
            &benchmark,
            &configuration,
            fidelity.as_deref(),
            changed,
            definitions.as_deref(),
            format.into(),
        ),
        Commands::Validate { path } => validate(&path),
        Commands::Init { output } => init_config(&output),
    }
}

/// @ai:intent Build the registry from built-ins plus an optional definitions directory
/// @ai:effects fs:read
fn build_registry(definitions: Option<&Path>) -> Result<Registry> {
    let mut registry = Registry::builtin();
    if let Some(dir) = definitions {
        let count = DefinitionLoader::new().register_dir(&mut registry, dir)?;
        tracing::info!("Registered {} definitions from {}", count, dir.display());
    }
    Ok(registry)
}

/// @ai:intent Resolve a request, command-line flags taking precedence over the config file
/// @ai:effects fs:read
fn resolve(args: ResolveArgs, format: OutputFormat) -> Result<ExitCode> {
    let config = match &args.config {
        Some(path) => CatbenchConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => CatbenchConfig::default(),
    };

    let mut dispatch = config.dispatch;
    if let Some(benchmark) = args.benchmark {
        dispatch.benchmark = benchmark;
    }
    if let Some(dataset) = args.dataset {
        dispatch.dataset = dataset;
    }
    if let Some(servers) = args.servers {
        dispatch.servers = servers;
    }
    if args.objectives.is_some() {
        dispatch.objectives = args.objectives;
    }
    if let Some(enable_model) = args.enable_model {
        dispatch.enable_model = enable_model;
    }
    if let Some(enable_tabular) = args.enable_tabular {
        dispatch.enable_tabular = enable_tabular;
    }
    if let Some(enable_download) = args.enable_download {
        dispatch.enable_download = enable_download;
    }
    if let Some(port) = args.interopt_port {
        dispatch.interopt_port = port;
    }

    let definitions = args.definitions.or(config.paths.definitions_dir);
    let registry = build_registry(definitions.as_deref())?;

    match registry.resolve(&dispatch.benchmark, &dispatch.resolve_options()) {
        Ok(request) => {
            println!("{}", format_request(&request, format));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_rejection() => Ok(reject(&e)),
        Err(e) => Err(e.into()),
    }
}

/// @ai:intent Report a refused request on stderr
/// @ai:post exit code 1, distinct from the 2 used for faults
fn reject(error: &catbench::Error) -> ExitCode {
    eprintln!("{} {}", "error:".red().bold(), error);
    ExitCode::from(1)
}

fn format_request(request: &ResolvedRequest, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => output::to_json(request, false),
        OutputFormat::JsonPretty => output::to_json(request, true),
        OutputFormat::Text => {
            let mut text = String::new();
            text.push_str(&format!(
                "{} ({})\n",
                request.benchmark_name.bold(),
                request.family
            ));
            text.push_str(&format!("  dataset:    {}\n", request.dataset));
            text.push_str(&format!("  objectives: {}\n", request.enabled_objectives.join(", ")));
            text.push_str(&format!("  servers:    {}\n", request.server_addresses.join(", ")));
            text.push_str(&format!(
                "  model: {}  tabular: {}  download: {}\n",
                request.enable_model, request.enable_tabular, request.enable_download
            ));
            text.push_str(&format!("  port:       {}\n", request.port));
            text
        }
    }
}

/// @ai:intent Print the registered benchmarks and their families
/// @ai:effects fs:read
fn list(definitions: Option<&Path>, format: OutputFormat) -> Result<ExitCode> {
    let registry = build_registry(definitions)?;

    let mut summaries = Vec::with_capacity(registry.len());
    for name in registry.names() {
        let definition = registry.definition(name)?;
        let space = definition.search_space();
        summaries.push(BenchmarkSummary {
            name: name.to_string(),
            family: registry.family(name)?.to_string(),
            params: space.params().len(),
            constraints: space.constraints().len(),
            objectives: space.objectives().iter().map(|o| o.name.clone()).collect(),
        });
    }

    match format {
        OutputFormat::Json => println!("{}", output::to_json(&summaries, false)),
        OutputFormat::JsonPretty => println!("{}", output::to_json(&summaries, true)),
        OutputFormat::Text => {
            println!("Found {} benchmarks:\n", summaries.len());
            for summary in &summaries {
                println!(
                    "  {:<10} {:<5} {:>2} params {:>2} constraints  {}",
                    summary.name.bold(),
                    summary.family,
                    summary.params,
                    summary.constraints,
                    summary.objectives.join(", ").dimmed()
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// @ai:intent Render one benchmark's search space
/// @ai:effects fs:read
fn show(benchmark: &str, definitions: Option<&Path>, format: OutputFormat) -> Result<ExitCode> {
    let registry = build_registry(definitions)?;
    let definition = match registry.definition(benchmark) {
        Ok(definition) => definition,
        Err(e) if e.is_rejection() => return Ok(reject(&e)),
        Err(e) => return Err(e.into()),
    };
    println!("{}", output::format_definition(&definition, format));
    Ok(ExitCode::SUCCESS)
}

fn read_configuration(path: &Path) -> Result<Configuration> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// @ai:intent Validate a configuration file and evaluate its constraints
/// @ai:post exit 0 when feasible, 1 on violated constraints
/// @ai:effects fs:read
fn check(
    benchmark: &str,
    configuration: &Path,
    fidelity: Option<&Path>,
    changed: Option<Vec<String>>,
    definitions: Option<&Path>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let registry = build_registry(definitions)?;
    let definition = match registry.definition(benchmark) {
        Ok(definition) => definition,
        Err(e) if e.is_rejection() => return Ok(reject(&e)),
        Err(e) => return Err(e.into()),
    };
    let space = definition.search_space();

    let config = read_configuration(configuration)?;
    let result = match changed {
        Some(names) => {
            let changed: BTreeSet<String> = names.into_iter().collect();
            space.recheck(&config, &changed)?
        }
        None => space.check(&config)?,
    };

    let fidelity = match fidelity {
        Some(path) => Some(space.resolve_fidelity(&read_configuration(path)?)?),
        None => None,
    };

    let passed = result.passed();
    match format {
        OutputFormat::Text => {
            print!("{}", output::format_check_result(&result, format));
            if let Some(fidelity) = &fidelity {
                println!("Fidelity:");
                for (name, value) in fidelity {
                    println!("  {} = {}", name, value);
                }
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let report = CheckReport {
                benchmark: definition.name().to_string(),
                result,
                fidelity,
            };
            println!("{}", output::to_json(&report, format == OutputFormat::JsonPretty));
        }
    }

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// @ai:intent Load every definition file below a path and report problems
/// @ai:effects fs:read
fn validate(path: &Path) -> Result<ExitCode> {
    let report = DefinitionLoader::new().load_dir(path);

    for loaded in &report.loaded {
        println!(
            "{} {} ({}) - {}",
            "OK".green().bold(),
            loaded.definition.name(),
            loaded.family,
            loaded.path.display().to_string().dimmed()
        );
    }
    for (file, message) in &report.failures {
        println!(
            "{} {} - {}",
            "ERROR".red().bold(),
            file.display().to_string().dimmed(),
            message
        );
    }

    println!(
        "\nValidated {} files, {} invalid",
        report.loaded.len() + report.failures.len(),
        report.failures.len()
    );

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// @ai:intent Write a default configuration file
/// @ai:effects fs:write
fn init_config(output: &Path) -> Result<ExitCode> {
    let config = CatbenchConfig::default();
    config.save(output)?;
    tracing::info!("Created default configuration at {}", output.display());
    Ok(ExitCode::SUCCESS)
}

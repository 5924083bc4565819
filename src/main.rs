//! api-compat: API compatibility checker for assembly surface snapshots
//!
//! Compares the public surface an implementation ships against the
//! contract callers compiled against and reports breaking differences.

#![allow(clippy::struct_excessive_bools, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use api_compat::{
    cli,
    config::{AppConfig, ComparePaths, ConfigPreset, OutputFormat},
    pipeline::exit_codes,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "api-compat")]
#[command(version)]
#[command(about = "API compatibility checker for assembly surface snapshots", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No incompatible differences (or --no-fail-on-incompatible)
    1  Incompatible differences found
    2  Baseline validation failed (unused entries)
    3  Error occurred

EXAMPLES:
    # Check a new build against the shipped reference surface
    api-compat compare ref/Widgets.json lib/Widgets.json

    # Accept known breaks recorded in an earlier report
    api-compat compare ref.json lib.json --baseline compat-baseline.txt

    # Refresh the baseline
    api-compat compare ref.json lib.json -O compat-baseline.txt --no-fail-on-incompatible")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments for the `compare` subcommand
#[derive(Parser)]
struct CompareArgs {
    /// Snapshot of the contract (the surface callers compiled against)
    contract: PathBuf,

    /// Snapshot of the implementation (the surface being shipped)
    implementation: PathBuf,

    /// Start from a named preset (default, strict, lenient)
    #[arg(long)]
    preset: Option<String>,

    /// Output format
    #[arg(short, long)]
    output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Baseline file of accepted differences. Can be specified multiple times.
    #[arg(long = "baseline", value_name = "PATH")]
    baseline: Vec<PathBuf>,

    /// Fail when a baseline entry matches no difference
    #[arg(long)]
    validate_baseline: bool,

    /// Run optional rules as well
    #[arg(long)]
    enforce_optional_rules: bool,

    /// Tolerate one-sided default interface members
    #[arg(long)]
    allow_default_interface_methods: bool,

    /// Skip a rule by name. Can be specified multiple times.
    #[arg(long = "disable-rule", value_name = "RULE")]
    disable_rule: Vec<String>,

    /// Exclude an attribute type from comparison (`*` and `?` allowed)
    #[arg(long = "exclude-attribute", value_name = "PATTERN")]
    exclude_attribute: Vec<String>,

    /// File listing excluded attribute types, one per line
    #[arg(long)]
    exclude_attributes_file: Option<PathBuf>,

    /// Treat a namespace as moved: OLD=NEW. Can be specified multiple times.
    #[arg(long = "remap-namespace", value_name = "OLD=NEW", value_parser = parse_remap)]
    remap_namespace: Vec<(String, String)>,

    /// Label for the contract side in messages
    #[arg(long)]
    contract_label: Option<String>,

    /// Label for the implementation side in messages
    #[arg(long)]
    implementation_label: Option<String>,

    /// Also report compatible differences such as added attributes
    #[arg(long)]
    include_compatible: bool,

    /// Exit 0 even when incompatible differences remain
    #[arg(long)]
    no_fail_on_incompatible: bool,

    /// Evaluate on a single thread
    #[arg(long)]
    no_parallel: bool,
}

/// Arguments for the `list-rules` subcommand
#[derive(Parser)]
struct ListRulesArgs {
    /// Include optional rules
    #[arg(long)]
    all: bool,

    /// Skip a rule by name. Can be specified multiple times.
    #[arg(long = "disable-rule", value_name = "RULE")]
    disable_rule: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare an implementation snapshot against a contract snapshot
    Compare(CompareArgs),

    /// List the rules that would run
    ListRules(ListRulesArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the JSON schema of the config file
    ConfigSchema {
        /// Output file path (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .api-compat.yaml in the current directory
    Init,
}

fn parse_remap(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
            Ok((from.trim().to_string(), to.trim().to_string()))
        }
        _ => Err(format!("expected OLD=NEW, got '{value}'")),
    }
}

/// CLI flags as a config layer to merge over the file config.
fn compare_overrides(args: &CompareArgs, quiet: bool) -> Result<AppConfig> {
    let base = match &args.preset {
        Some(name) => {
            let preset = ConfigPreset::from_name(name).with_context(|| {
                format!("unknown preset '{name}' (expected default, strict or lenient)")
            })?;
            AppConfig::from_preset(preset)
        }
        None => AppConfig::default(),
    };

    let mut config = base;
    config.rules.enforce_optional_rules |= args.enforce_optional_rules;
    config.rules.allow_default_interface_methods |= args.allow_default_interface_methods;
    config.rules.disabled_rules.extend(args.disable_rule.iter().cloned());

    if let Some(label) = &args.contract_label {
        config.operands.contract.clone_from(label);
    }
    if let Some(label) = &args.implementation_label {
        config.operands.implementation.clone_from(label);
    }

    config.filters.baseline_files.extend(args.baseline.iter().cloned());
    config.filters.validate_baseline |= args.validate_baseline;
    config.filters.exclude_attributes.extend(args.exclude_attribute.iter().cloned());
    if args.exclude_attributes_file.is_some() {
        config.filters.exclude_attributes_file.clone_from(&args.exclude_attributes_file);
    }
    config.filters.namespace_remap.extend(args.remap_namespace.iter().cloned());

    config.behavior.include_compatible |= args.include_compatible;
    config.behavior.fail_on_incompatible &= !args.no_fail_on_incompatible;
    config.behavior.parallel &= !args.no_parallel;
    config.behavior.quiet |= quiet;

    if let Some(format) = args.output {
        config.output.format = format;
    }
    if args.output_file.is_some() {
        config.output.file.clone_from(&args.output_file);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    match cli.command {
        Commands::Compare(args) => {
            let overrides = compare_overrides(&args, cli.quiet)?;
            let (config, loaded_from) =
                AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
            if let Some(path) = &loaded_from {
                tracing::debug!("Using config file {}", path.display());
            }

            let paths = ComparePaths {
                implementation: args.implementation,
                contract: args.contract,
            };

            match cli::run_compare(&config, &paths) {
                Ok(exit_code) => {
                    if exit_code != exit_codes::SUCCESS {
                        std::process::exit(exit_code);
                    }
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("{e:#}");
                    std::process::exit(exit_codes::ERROR);
                }
            }
        }

        Commands::ListRules(args) => {
            let overrides = AppConfig::builder()
                .enforce_optional_rules(args.all)
                .build();
            let (mut config, _) =
                AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);
            config.rules.disabled_rules.extend(args.disable_rule);
            cli::run_list_rules(&config)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "api-compat", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = api_compat::config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    api_compat::config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir().ok().map(|p| p.display().to_string()),
                    dirs::config_dir().map(|p| p.join("api-compat").display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in api_compat::config::file::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match api_compat::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".api-compat.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = api_compat::config::generate_full_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}

//! archsim CLI — analytical performance, power and efficiency estimates
//! for processor configurations.

mod commands;
mod manifest;
mod source;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use manifest::StudyManifest;
use source::ConfigSource;

#[derive(Parser)]
#[command(name = "archsim", version, about = "Analytical processor/memory configuration estimates")]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new study directory
    Init {
        /// Study name
        name: String,
    },
    /// Evaluate one configuration
    Simulate {
        /// Start from a built-in preset (see `archsim preset list`)
        #[arg(long)]
        preset: Option<String>,
        /// Configuration file (.arch.toml) layered over the preset
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override a single key, e.g. --set l2_cache_size_kb=256
        #[arg(long = "set", value_name = "KEY=VALUE")]
        sets: Vec<String>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate several configurations side by side
    Compare {
        /// Presets, study configs (configs/NAME.arch.toml) or file paths
        names: Vec<String>,
        /// Rank by a result metric (e.g. efficiency_index, amat_ns)
        #[arg(long)]
        sort_by: Option<String>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Inspect built-in presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Check a configuration file for unrealistic values
    Validate {
        /// Configuration file (.arch.toml)
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// List built-in presets
    List,
    /// Show a preset
    Show {
        /// Preset id
        id: String,
        /// Output format (text, toml, json)
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&name),

        Commands::Simulate {
            preset,
            config,
            sets,
            format,
            output,
        } => {
            let (manifest, _) = load_manifest_optional(&cwd)?;
            let source = ConfigSource {
                preset: preset.as_deref(),
                file: config.as_deref(),
                assignments: &sets,
            };
            commands::simulate::run(
                manifest.as_ref(),
                &source,
                format.as_deref(),
                output.as_deref(),
            )
        }

        Commands::Compare {
            names,
            sort_by,
            format,
        } => {
            let (manifest, study_dir) = load_manifest_optional(&cwd)?;
            let study_dir = study_dir.unwrap_or(cwd);
            commands::compare::run(
                &study_dir,
                manifest.as_ref(),
                &names,
                sort_by.as_deref(),
                format.as_deref(),
            )
        }

        Commands::Preset { action } => match action {
            PresetAction::List => commands::preset::list(),
            PresetAction::Show { id, format } => commands::preset::show(&id, format.as_deref()),
        },

        Commands::Validate { file } => commands::validate::run(&file),
    }
}

/// Try to load a study manifest from the current directory upward.
/// Returns (None, None) if not found.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<StudyManifest>, Option<PathBuf>)> {
    match StudyManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => {
            log::debug!("using study manifest in {}", dir.display());
            Ok((Some(manifest), Some(dir)))
        }
        None => Ok((None, None)),
    }
}

//! sproutfile - materialize declarative directory trees onto disk.
//!
//! Usage:
//!   sprout apply <MANIFEST> [--root DIR]   Create the tree described by a manifest
//!   sprout plan <MANIFEST> [--root DIR]    Show what apply would do
//!   sprout preset <NAME> [--root DIR]      Create a built-in tree
//!   sprout --help                          Show help

mod preset;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

use sproutfile_core::{ExistingFilePolicy, Manifest, MaterializeConfig, Tree};
use sproutfile_ops::{Materializer, Plan};

use crate::preset::Preset;

#[derive(Parser)]
#[command(
    name = "sproutfile",
    version,
    about = "Materialize declarative directory trees onto disk",
    long_about = "sproutfile turns a TOML or JSON description of directories and files \
                  into the real thing.\n\n\
                  Tables are directories, strings are file contents. Existing \
                  directories are reused, so re-running converges."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the tree described by a manifest
    Apply {
        /// Manifest file (.toml or .json)
        manifest: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Show what `apply` would do without touching the filesystem
    Plan {
        /// Manifest file (.toml or .json)
        manifest: PathBuf,

        #[command(flatten)]
        options: RunOptions,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a built-in tree
    Preset {
        /// Preset to materialize
        name: Preset,

        #[command(flatten)]
        options: RunOptions,

        /// Only show the plan
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Args)]
struct RunOptions {
    /// Directory to materialize into (created if missing)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// What to do with files that already exist
    #[arg(short, long, value_enum, default_value_t = ExistingArg::Overwrite)]
    existing: ExistingArg,

    /// Fail instead of creating missing parents of the root
    #[arg(long)]
    no_parents: bool,

    /// Flush each written file to disk before closing it
    #[arg(long)]
    sync: bool,
}

impl RunOptions {
    fn config(&self) -> MaterializeConfig {
        MaterializeConfig {
            existing_files: self.existing.into(),
            create_parents: !self.no_parents,
            sync_files: self.sync,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExistingArg {
    /// Rewrite existing files with the declared content
    Overwrite,
    /// Leave existing files untouched
    Keep,
    /// Abort when a file already exists
    Fail,
}

impl From<ExistingArg> for ExistingFilePolicy {
    fn from(arg: ExistingArg) -> Self {
        match arg {
            ExistingArg::Overwrite => Self::Overwrite,
            ExistingArg::Keep => Self::Keep,
            ExistingArg::Fail => Self::Fail,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match cli.command {
        Command::Apply { manifest, options } => {
            let tree = load_tree(&manifest, &options.root)?;
            run_apply(&tree, options.config())?;
        }
        Command::Plan {
            manifest,
            options,
            format,
        } => {
            let tree = load_tree(&manifest, &options.root)?;
            run_plan(&tree, options.config(), format)?;
        }
        Command::Preset {
            name,
            options,
            dry_run,
        } => {
            let tree = name
                .manifest()
                .context("Built-in preset is invalid")?
                .into_tree(&options.root);
            if dry_run {
                run_plan(&tree, options.config(), OutputFormat::Text)?;
            } else {
                run_apply(&tree, options.config())?;
            }
        }
    }

    Ok(())
}

fn setup_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}

/// Load a manifest and pair it with the root directory.
fn load_tree(manifest: &Path, root: &Path) -> Result<Tree> {
    let manifest = Manifest::load(manifest)
        .wrap_err_with(|| format!("Failed to load manifest {}", manifest.display()))?;
    let tree = manifest.into_tree(root);
    debug!(stats = ?tree.stats(), "Loaded tree");
    Ok(tree)
}

/// Materialize a tree and print a completion message.
fn run_apply(tree: &Tree, config: MaterializeConfig) -> Result<()> {
    let stats = tree.stats();
    eprintln!(
        "Materializing {} directories and {} files into {}...",
        stats.directories,
        stats.files,
        tree.base().display()
    );

    let report = Materializer::with_config(config)
        .materialize(tree)
        .wrap_err("Materialization failed")?;

    println!(
        "{} ({} written)",
        report.summary(),
        format_size(report.bytes_written)
    );

    Ok(())
}

/// Print the plan for a tree. Fails if the plan contains conflicts.
fn run_plan(tree: &Tree, config: MaterializeConfig, format: OutputFormat) -> Result<()> {
    let plan = Materializer::with_config(config)
        .plan(tree)
        .wrap_err("Planning failed")?;

    match format {
        OutputFormat::Text => print_plan(&plan),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
    }

    let conflicts = plan.conflicts().count();
    if conflicts > 0 {
        bail!("{} conflict(s) would abort materialization", conflicts);
    }

    Ok(())
}

fn print_plan(plan: &Plan) {
    println!();
    println!("{}", "─".repeat(70));
    println!(" Plan for {}", plan.base.display());
    println!("{}", "─".repeat(70));
    println!();

    for step in &plan.actions {
        let size = if step.bytes > 0 {
            format_size(step.bytes)
        } else {
            String::new()
        };
        println!(
            "   {:<40} {:>10}  {}",
            step.action.to_string(),
            size,
            step.path.display()
        );
    }

    println!();
    println!(
        " {} steps, {} would change the filesystem",
        plan.len(),
        plan.change_count()
    );
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

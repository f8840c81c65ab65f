use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use procparams_core::{
    FieldMask, FieldPath, LoadReport, LoadStatus, OwnedPartialProfile, ParameterSet,
};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "pp3")]
#[command(version, about = "Inspect, upgrade and combine processing profiles", long_about = None)]
struct Cli {
    /// Log load/save details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a profile and report schema version, migrations and fallbacks
    Check {
        #[arg(value_name = "PROFILE")]
        profile: PathBuf,

        /// Fail if any value fell back to its default
        #[arg(long)]
        strict: bool,
    },

    /// Rewrite a profile in the current schema and canonical order
    Normalize {
        #[arg(value_name = "PROFILE")]
        profile: PathBuf,

        /// Output file (defaults to rewriting PROFILE in place)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Store file references relative to the output directory
        #[arg(long)]
        relative: bool,
    },

    /// Layer partial profiles, in order, onto a base profile
    Merge {
        /// Full profile the partials are applied to
        #[arg(value_name = "BASE")]
        base: PathBuf,

        /// Partial profiles; only the values they contain are applied
        #[arg(value_name = "PARTIAL", required = true)]
        partials: Vec<PathBuf>,

        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,

        /// Also apply rank, color label and trash flag from the partials
        #[arg(long)]
        with_general: bool,

        #[arg(long)]
        relative: bool,
    },

    /// List the settings that differ between two profiles
    Diff {
        #[arg(value_name = "OLD")]
        old: PathBuf,

        #[arg(value_name = "NEW")]
        new: PathBuf,

        /// Save the differing settings of NEW as a partial profile
        #[arg(long, value_name = "FILE")]
        write_partial: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("warning: {err:#}");
    }

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Check { profile, strict } => {
            let (_, report) = load_full(&profile)?;
            print!("{}", describe_report(&profile, &report));
            if strict && !report.is_complete() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Normalize {
            profile,
            out,
            relative,
        } => {
            let (params, report) = load_full(&profile)?;
            let dest = out.unwrap_or_else(|| profile.clone());
            params
                .save(&dest, None, relative)
                .with_context(|| format!("failed to write {}", dest.display()))?;
            println!(
                "{} -> {} (schema {} -> {})",
                profile.display(),
                dest.display(),
                report.file_schema_version,
                params.schema_version
            );
        }

        Commands::Merge {
            base,
            partials,
            out,
            with_general,
            relative,
        } => {
            let (base_params, _) = load_full(&base)?;
            let layers = partials
                .iter()
                .map(|path| load_partial(path))
                .collect::<Result<Vec<_>>>()?;
            let merged = merge_layers(base_params, &layers, with_general);
            merged
                .save(&out, None, relative)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("merged {} layer(s) into {}", layers.len(), out.display());
        }

        Commands::Diff {
            old,
            new,
            write_partial,
        } => {
            let (old_params, _) = load_full(&old)?;
            let (new_params, _) = load_full(&new)?;
            let changed = old_params.changed_fields(&new_params);
            for line in describe_changes(&changed) {
                println!("{line}");
            }
            if let Some(dest) = write_partial {
                let mask = FieldMask::from_changes(changed.iter().copied());
                new_params
                    .save_partial(&dest, None, false, &mask)
                    .with_context(|| format!("failed to write {}", dest.display()))?;
            }
            if !changed.is_empty() {
                return Ok(ExitCode::from(1));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn load_full(path: &Path) -> Result<(ParameterSet, LoadReport)> {
    let mut params = ParameterSet::default();
    let report = params
        .load(path, None)
        .with_context(|| format!("failed to load {}", path.display()))?;
    debug!(path = %path.display(), status = ?report.status, "profile ready");
    Ok((params, report))
}

fn load_partial(path: &Path) -> Result<OwnedPartialProfile> {
    let (profile, _) = OwnedPartialProfile::load(path)
        .with_context(|| format!("failed to load partial profile {}", path.display()))?;
    Ok(profile)
}

/// Apply `layers` to `base` in order. Later layers win.
fn merge_layers(
    mut base: ParameterSet,
    layers: &[OwnedPartialProfile],
    with_general: bool,
) -> ParameterSet {
    for layer in layers {
        if with_general {
            layer.apply_to(&mut base);
        } else {
            let mut layer = layer.clone();
            layer.clear_general();
            layer.apply_to(&mut base);
        }
    }
    base
}

fn describe_report(path: &Path, report: &LoadReport) -> String {
    let mut out = format!("{}\n", path.display());
    out.push_str(&format!("  schema version: {}", report.file_schema_version));
    if report.newer_schema() {
        out.push_str(" (newer than supported, unknown settings ignored)");
    }
    out.push('\n');

    let status = match report.status {
        LoadStatus::Complete => "complete",
        LoadStatus::PartialDefaults => "partial, some values defaulted",
    };
    out.push_str(&format!("  status: {status}\n"));

    for rule in &report.migrations_applied {
        out.push_str(&format!("  migrated: {rule}\n"));
    }
    for field in &report.fallbacks {
        out.push_str(&format!("  defaulted: {field}\n"));
    }
    out
}

fn describe_changes(changed: &[FieldPath]) -> Vec<String> {
    changed
        .iter()
        .map(|field| format!("[{}] {}", field.section, field.key))
        .collect()
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! panelcam - batch STEP-to-MPR conversion
//!
//! Documents are independent, so batch conversion fans out one worker
//! per input file; nothing inside the pipeline itself is parallel.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use panelcam_model::Tolerances;
use panelcam_mpr::{parse_program, MprGenerator};
use panelcam_step::{report::cut_list, StepExtractor};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "panelcam", version, about = "STEP to MPR converter for panel drilling")]
struct Cli {
    /// JSON file overriding the default classification tolerances
    #[arg(long, global = true)]
    tolerances: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert STEP files into one .mpr program per part
    Convert {
        /// Input STEP files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory for the generated programs
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Also write a cut-list text report per input
        #[arg(long)]
        report: bool,
    },
    /// Extract a STEP file and print the part/accessory model as JSON
    Inspect {
        input: PathBuf,
    },
    /// Parse an MPR program and print the part model as JSON
    Parse {
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let tolerances = load_tolerances(cli.tolerances.as_deref())?;

    match cli.command {
        Command::Convert {
            inputs,
            out_dir,
            report,
        } => convert(&inputs, &out_dir, report, tolerances),
        Command::Inspect { input } => inspect(&input, tolerances),
        Command::Parse { input } => parse_mpr(&input),
    }
}

fn load_tolerances(path: Option<&Path>) -> Result<Tolerances> {
    match path {
        Some(p) => {
            let text = fs::read_to_string(p)
                .with_context(|| format!("reading tolerances from {}", p.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing tolerances from {}", p.display()))
        }
        None => Ok(Tolerances::default()),
    }
}

fn convert(inputs: &[PathBuf], out_dir: &Path, report: bool, tolerances: Tolerances) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let extractor = StepExtractor::with_tolerances(tolerances);
    let generator = MprGenerator::with_tolerances(tolerances);

    let failures: usize = inputs
        .par_iter()
        .map(|input| match convert_one(input, out_dir, report, &extractor, &generator) {
            Ok(count) => {
                info!(input = %input.display(), programs = count, "converted");
                0
            }
            Err(err) => {
                error!(input = %input.display(), %err, "conversion failed");
                1
            }
        })
        .sum();

    if failures > 0 {
        anyhow::bail!("{failures} of {} inputs failed", inputs.len());
    }
    Ok(())
}

fn convert_one(
    input: &Path,
    out_dir: &Path,
    report: bool,
    extractor: &StepExtractor,
    generator: &MprGenerator,
) -> Result<usize> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let extraction = extractor
        .extract(&content)
        .with_context(|| format!("extracting {}", input.display()))?;

    let mut written = 0;
    let mut used: Vec<String> = Vec::new();
    for part in &extraction.parts {
        let base = sanitize(&part.name);
        let mut name = base.clone();
        let mut n = 1;
        while used.contains(&name) {
            n += 1;
            name = format!("{base}_{n}");
        }
        used.push(name.clone());

        let path = out_dir.join(format!("{name}.mpr"));
        fs::write(&path, generator.generate(part))
            .with_context(|| format!("writing {}", path.display()))?;
        written += 1;
    }

    if report {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("project");
        let path = out_dir.join(format!("{stem}_cutlist.txt"));
        fs::write(&path, cut_list(&extraction.parts, &extraction.accessories, stem))
            .with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(written)
}

fn inspect(input: &Path, tolerances: Tolerances) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let extraction = StepExtractor::with_tolerances(tolerances).extract(&content)?;
    println!("{}", serde_json::to_string_pretty(&extraction)?);
    Ok(())
}

fn parse_mpr(input: &Path) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let mut part = parse_program(&content)?;
    if let Some(stem) = input.file_stem().and_then(|s| s.to_str()) {
        part.name = stem.to_string();
    }
    println!("{}", serde_json::to_string_pretty(&part)?);
    Ok(())
}

/// File-system-safe part name
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "part".to_string()
    } else {
        trimmed.to_string()
    }
}

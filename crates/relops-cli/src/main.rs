//! relops CLI: run a single relational operator described by a YAML job.

mod job;

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use relops_core::config::ExecConfig;
use relops_io::JsonlWriter;
use tracing_subscriber::EnvFilter;

use crate::job::{load_job, prepare};

#[derive(Parser)]
#[command(name = "relops")]
#[command(about = "Projection, selection, aggregation and join over typed CSV stores", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a job and write the result as NDJSON
    Run {
        /// Path to the job YAML file
        #[arg(short, long)]
        job: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Aggregate result policy: float or legacy (overrides env and job)
        #[arg(long)]
        result_policy: Option<String>,
    },

    /// Load inputs and plan the job without executing it
    Validate {
        /// Path to the job YAML file
        #[arg(short, long)]
        job: PathBuf,
    },

    /// Show the planned output schema for a job
    Explain {
        /// Path to the job YAML file
        #[arg(short, long)]
        job: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            job,
            output,
            result_policy,
        } => run_job(&job, output.as_deref(), result_policy.as_deref()),
        Commands::Validate { job } => validate_job(&job).map(|()| {
            println!("✓ Job is valid");
        }),
        Commands::Explain { job } => explain_job(&job),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn base_dir(job_path: &Path) -> &Path {
    job_path.parent().unwrap_or_else(|| Path::new("."))
}

fn run_job(
    job_path: &Path,
    output: Option<&Path>,
    result_policy: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut job = load_job(job_path)?;
    // CLI flag beats the job file, which beats the environment.
    if let Some(policy) = result_policy {
        job.config.result_policy = Some(policy.to_string());
    }
    let prepared = prepare(&job, base_dir(job_path), ExecConfig::from_env()?)?;
    let (out, _stats) = prepared.execute()?;

    match output {
        Some(path) => JsonlWriter::to_path(path)?.write_store(&out)?,
        None => JsonlWriter::to_writer(io::stdout().lock()).write_store(&out)?,
    }
    Ok(())
}

fn validate_job(job_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let job = load_job(job_path)?;
    prepare(&job, base_dir(job_path), ExecConfig::from_env()?)?;
    Ok(())
}

fn explain_job(job_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let job = load_job(job_path)?;
    let prepared = prepare(&job, base_dir(job_path), ExecConfig::from_env()?)?;

    println!("Job Plan");
    println!("========");
    println!();
    println!("Operator: {}", prepared.operator.name());
    for (path, input) in job.inputs.iter().zip(&prepared.inputs) {
        println!("Input: {} ({} rows)", path.display(), input.records().len());
    }
    if !prepared.plan.hash_keys.is_empty() {
        println!("Hash keys: {}", prepared.plan.hash_keys.join(", "));
    }
    println!();
    println!("Output schema:");
    for field in &prepared.plan.output_schema.fields {
        println!("  {}: {}", field.name, field.data_type);
    }
    Ok(())
}

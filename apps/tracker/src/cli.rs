use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::{info, warn};

use tracker::config::Config;
use tracker::jobs::{JobPhase, JobsClient, PollSnapshot, Poller, ResultDocument};
use tracker::normalizer::{build_view_model, ViewModel, ViewModelSection};

#[derive(Parser, Debug)]
#[command(
    name = "tracker",
    about = "Watch resume processing jobs and print their normalized result",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll a job until it completes or fails, then print its sections
    Watch(WatchArgs),
    /// Upload a resume, then watch the job it starts
    Submit(SubmitArgs),
    /// Normalize a saved result document without contacting the backend
    Normalize(NormalizeArgs),
}

#[derive(Args, Debug)]
struct BackendArgs {
    /// Override TRACKER_API_URL
    #[arg(long)]
    api_url: Option<String>,
    /// Override POLL_INTERVAL_MS
    #[arg(long)]
    interval_ms: Option<u64>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct WatchArgs {
    job_id: String,
    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    file: PathBuf,
    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(Args, Debug)]
struct NormalizeArgs {
    /// JSON file holding a `GET /jobs/{id}/result` response
    file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

pub async fn run() -> Result<()> {
    match Cli::parse().command {
        Command::Watch(args) => {
            let (config, client) = connect(&args.backend)?;
            watch(client, &config, args.job_id, args.backend.format).await
        }
        Command::Submit(args) => {
            let (config, client) = connect(&args.backend)?;
            let receipt = client
                .upload(&args.file)
                .await
                .with_context(|| format!("Failed to upload {}", args.file.display()))?;
            info!(job_id = %receipt.job_id, "upload accepted");
            watch(client, &config, receipt.job_id, args.backend.format).await
        }
        Command::Normalize(args) => {
            let raw = tokio::fs::read_to_string(&args.file)
                .await
                .with_context(|| format!("Failed to read {}", args.file.display()))?;
            let value: Value = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not valid JSON", args.file.display()))?;
            let view_model = build_view_model(&ResultDocument::from_value(value));
            print_view_model(&view_model, args.format)
        }
    }
}

fn connect(args: &BackendArgs) -> Result<(Config, JobsClient)> {
    let config = Config::from_env()?.with_overrides(args.api_url.clone(), args.interval_ms);
    let client = JobsClient::new(&config.api_url, config.http_timeout)
        .context("Failed to build HTTP client")?;
    Ok((config, client))
}

async fn watch(
    client: JobsClient,
    config: &Config,
    job_id: String,
    format: OutputFormat,
) -> Result<()> {
    let poller = Poller::new(client, config.poll_interval);
    let handle = poller.subscribe(job_id.clone());
    let mut changes = handle.changes();
    let mut last_status = None;
    let mut last_error = None;

    let snapshot: PollSnapshot = loop {
        let snapshot = changes.borrow_and_update().clone();
        let status = snapshot.job.as_ref().map(|j| j.status);
        if status != last_status {
            if let Some(status) = status {
                info!(job_id = %job_id, status = status.as_str(), "job status changed");
            }
            last_status = status;
        }
        if snapshot.error != last_error {
            if let Some(error) = &snapshot.error {
                warn!(job_id = %job_id, error = %error, "fetch failed; still polling");
            }
            last_error = snapshot.error.clone();
        }
        if snapshot.is_closed() {
            break snapshot;
        }

        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break handle.snapshot();
                }
            }
            _ = tokio::signal::ctrl_c() => {
                poller.unsubscribe(&handle);
                bail!("Interrupted while watching job {job_id}");
            }
        }
    };

    match snapshot.phase() {
        JobPhase::Completed {
            result: Some(document),
        } => print_view_model(&build_view_model(document), format),
        JobPhase::Failed { error } => bail!(
            "Job {job_id} failed: {}",
            error.unwrap_or("no error reported")
        ),
        _ => bail!("Job {job_id} stopped before a result was available"),
    }
}

fn print_view_model(view_model: &ViewModel, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(view_model)?,
        OutputFormat::Text => render_text(view_model),
    };
    println!("{rendered}");
    Ok(())
}

fn render_text(view_model: &ViewModel) -> String {
    let mut out = String::new();
    for section in &view_model.sections {
        render_section(&mut out, section);
    }
    if !view_model.review.is_empty() {
        out.push_str("\n# Review\n");
        for section in &view_model.review {
            render_section(&mut out, section);
        }
    }
    out
}

fn render_section(out: &mut String, section: &ViewModelSection) {
    let _ = writeln!(out, "== {} ==", section.title);
    if section.is_empty {
        out.push_str("  (no data)\n");
        return;
    }
    for item in &section.items {
        let fields = item
            .fields
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join(" | ");
        let badges = item
            .badges
            .iter()
            .map(|b| format!(" [{}]", b.bucket.style_token()))
            .collect::<String>();
        let _ = writeln!(out, "  - {fields}{badges}");
    }
}

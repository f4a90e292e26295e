use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::ProgressBar;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;

use dealscope_client::{AnalysisClient, ClientOptions};
use dealscope_core::orchestrator::{run_submission, SubmissionUpdate};
use dealscope_core::render::{derive, Rendered};
use dealscope_core::{Orchestrator, Session, StagedFile};
use dealscope_reporting::ExportFormat;

/// Dealscope - analyze startup pitch documents against a remote analysis service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Documents to analyze
    files: Vec<PathBuf>,

    /// Analysis service endpoint (falls back to DEALSCOPE_API_URL)
    #[arg(long)]
    endpoint: Option<String>,

    /// Business sector hint, e.g. "fintech"
    #[arg(long)]
    sector: Option<String>,

    /// Funding stage hint, e.g. "Seed"
    #[arg(long)]
    stage: Option<String>,

    /// Output format: text, markdown, or json
    #[arg(long, default_value = "text")]
    format: String,

    /// Also write the report to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Health probe timeout in seconds
    #[arg(long, default_value_t = 10)]
    health_timeout: u64,

    /// Overall analyze deadline in seconds (unbounded if omitted)
    #[arg(long)]
    analyze_timeout: Option<u64>,

    /// Fetch a stored analysis by id instead of submitting
    #[arg(long, value_name = "ID")]
    fetch_analysis: Option<String>,

    /// Print sector benchmarks for --sector/--stage instead of submitting
    #[arg(long)]
    benchmarks: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let endpoint = args
        .endpoint
        .clone()
        .or_else(|| std::env::var("DEALSCOPE_API_URL").ok())
        .context("no endpoint given; pass --endpoint or set DEALSCOPE_API_URL")?;
    let format = ExportFormat::from_name(&args.format)
        .with_context(|| format!("unknown format {:?} (expected text, markdown, or json)", args.format))?;

    let options = ClientOptions {
        health_timeout: Duration::from_secs(args.health_timeout),
        analyze_timeout: args.analyze_timeout.map(Duration::from_secs),
    };
    let client = AnalysisClient::new(&endpoint, options)?;

    let mut session = Session::default();
    session.connection.begin_probe(&endpoint)?;
    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(format!("Testing connection to {}...", client.base_url()));
    let health = client.health().await;
    session.connection.complete_probe(health.is_ok());
    spinner.finish_and_clear();
    if let Err(e) = health {
        bail!("connection failed: {e}");
    }
    status_line(&args, &format!("Connected to {}", client.base_url()));

    if let Some(id) = &args.fetch_analysis {
        let report = client.fetch_analysis(id).await?;
        let rendered = derive(&report);
        print!("{}", dealscope_reporting::render(&rendered, format)?);
        return Ok(());
    }
    if args.benchmarks {
        let sector = args.sector.as_deref().context("--benchmarks requires --sector")?;
        let stage = args.stage.as_deref().context("--benchmarks requires --stage")?;
        let benchmarks = client.sector_benchmarks(sector, stage).await?;
        println!("{}", serde_json::to_string_pretty(&benchmarks)?);
        return Ok(());
    }

    if args.files.is_empty() {
        bail!("no files to analyze");
    }
    let mut candidates = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let content =
            std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        candidates.push(StagedFile::new(name, bytes::Bytes::from(content)));
    }
    let staged = session.staging.add(candidates);
    if staged < args.files.len() {
        warn_line(
            &args,
            &format!(
                "{} duplicate file name(s) dropped; {} staged",
                args.files.len() - staged,
                staged
            ),
        );
    }

    let mut orchestrator = Orchestrator::default();
    let submission = orchestrator.begin(&session, args.sector.clone(), args.stage.clone())?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let task_client = client.clone();
    let task = tokio::spawn(async move {
        run_submission(&task_client, &submission, |event| {
            let _ = tx.send(event);
        })
        .await;
    });

    let progress = ProgressBar::new_spinner();
    progress.enable_steady_tick(Duration::from_millis(120));
    let mut failure: Option<String> = None;
    while let Some(event) = rx.recv().await {
        match orchestrator.handle_event(event, Instant::now()) {
            Some(SubmissionUpdate::Progress) => {
                if let Some(entry) = orchestrator.progress().last() {
                    progress.set_message(entry.clone());
                }
            }
            Some(SubmissionUpdate::Failed { message }) => {
                failure = Some(message);
                break;
            }
            Some(SubmissionUpdate::AwaitingReveal) => break,
            None => {}
        }
    }
    let _ = task.await;
    progress.finish_and_clear();

    if let Some(message) = failure {
        error_line(&args, &format!("Analysis failed: {message}"));
        std::process::exit(1);
    }

    // Batch mode: no progress view to protect, so skip the reveal pacing.
    let report = orchestrator
        .take_reveal()
        .context("submission ended without a result")?;
    let rendered = derive(&report);
    print!("{}", dealscope_reporting::render(&rendered, format)?);
    if let Some(path) = &args.output {
        dealscope_reporting::write_report(path, &rendered, format)?;
        status_line(&args, &format!("Report written to {}", path.display()));
    }
    if matches!(rendered, Rendered::ServiceError(_)) {
        std::process::exit(1);
    }
    Ok(())
}

fn status_line(args: &Args, message: &str) {
    if args.no_color {
        eprintln!("{message}");
    } else {
        eprintln!("{}", message.green());
    }
}

fn warn_line(args: &Args, message: &str) {
    if args.no_color {
        eprintln!("{message}");
    } else {
        eprintln!("{}", message.yellow());
    }
}

fn error_line(args: &Args, message: &str) {
    if args.no_color {
        eprintln!("{message}");
    } else {
        eprintln!("{}", message.red());
    }
}

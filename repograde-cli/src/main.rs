#![deny(missing_docs)]
//! RepoGrade command-line interface.
//!
//! Sends repositories to a RepoGrade server for scoring and renders the results.

mod client;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use client::{DEFAULT_SERVER_URL, ServiceClient};
#[cfg(not(test))]
use client::ReqwestServiceClient;
use repograde_core::{
    AnalysisStatus, CheckStatus, RepoReport, render_analysis_markdown, render_json, score_band,
};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "repograde", version, about = "RepoGrade CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(&["file", "url"])
))]
struct RepoSourceArgs {
    /// File containing repository URLs (one per line).
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Single GitHub repository URL.
    #[arg(long)]
    url: Option<String>,
}

#[derive(Args, Clone)]
struct ServerArgs {
    /// Base URL of the RepoGrade server.
    #[arg(long, env = "REPOGRADE_API_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze repositories from a URL or a file of URLs.
    Analyze {
        #[command(flatten)]
        source: RepoSourceArgs,
        #[command(flatten)]
        server: ServerArgs,
        /// Narrative model key forwarded as `x-api-key`.
        #[arg(long, env = "REPOGRADE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Maximum number of concurrent analyses.
        #[arg(short = 'j', long, default_value_t = 4)]
        concurrency: usize,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Check that the server is reachable.
    Health {
        #[command(flatten)]
        server: ServerArgs,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            source,
            server,
            api_key,
            concurrency,
            report,
        } => {
            let source = resolve_source_args(&source)?;
            let client = Arc::new(ReqwestServiceClient::new(&server.server_url)?);
            run_analyze(source, client, api_key, concurrency, report).await?
        }
        Commands::Health { server } => {
            let client = ReqwestServiceClient::new(&server.server_url)?;
            let status = client.health().await?;
            println!("{}: {status}", server.server_url.trim());
        }
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

enum BatchSource {
    File(PathBuf),
    Url(String),
}

async fn run_analyze<C>(
    source: BatchSource,
    client: Arc<C>,
    api_key: Option<String>,
    concurrency: usize,
    report: OutputArgs,
) -> CliResult<()>
where
    C: ServiceClient + Send + Sync + 'static,
{
    let urls = load_repo_targets(source).await?;
    if urls.is_empty() {
        println!("No repositories found to analyze.");
        return Ok(());
    }

    let concurrency = if concurrency == 0 { 1 } else { concurrency };
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    for (index, url) in urls.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let client = client.clone();
        let api_key = api_key.clone();
        tasks.spawn(async move {
            let _permit = permit;
            (index, analyze_target(client.as_ref(), url, api_key.as_deref()).await)
        });
    }

    let mut indexed = Vec::new();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(entry) => indexed.push(entry),
            Err(err) => indexed.push((usize::MAX, report_from_task_error(err))),
        }
    }
    indexed.sort_by_key(|(index, _)| *index);
    let reports: Vec<RepoReport> = indexed.into_iter().map(|(_, report)| report).collect();

    emit_analysis_reports(&reports, &report).await?;

    Ok(())
}

async fn analyze_target<C: ServiceClient + ?Sized>(
    client: &C,
    url: String,
    api_key: Option<&str>,
) -> RepoReport {
    match client.analyze(&url, api_key).await {
        Ok(analysis) => RepoReport::analyzed(url, analysis),
        Err(err) => RepoReport::failed(url, err.to_string()),
    }
}

fn report_from_task_error(error: tokio::task::JoinError) -> RepoReport {
    RepoReport::failed("unknown".to_string(), error.to_string())
}

fn resolve_source_args(source: &RepoSourceArgs) -> CliResult<BatchSource> {
    if let Some(file) = source.file.clone() {
        return Ok(BatchSource::File(file));
    }
    if let Some(url) = source.url.clone() {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err("url cannot be empty".into());
        }
        return Ok(BatchSource::Url(trimmed.to_string()));
    }
    Err("no repository source provided".into())
}

async fn load_repo_urls(path: &Path) -> CliResult<Vec<String>> {
    let contents = tokio::fs::read_to_string(path).await?;
    let urls = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    Ok(urls)
}

async fn load_repo_targets(source: BatchSource) -> CliResult<Vec<String>> {
    match source {
        BatchSource::File(file) => load_repo_urls(&file).await,
        BatchSource::Url(url) => Ok(vec![url]),
    }
}

async fn emit_analysis_reports(reports: &[RepoReport], output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_analysis_text(reports),
        OutputFormat::Markdown => render_analysis_markdown(reports),
        OutputFormat::Json => render_json(reports)?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_analysis_text(reports: &[RepoReport]) -> String {
    let mut output = String::new();
    for report in reports {
        let _ = writeln!(output, "Source: {}", report.source);
        match &report.status {
            AnalysisStatus::Analyzed => {
                let _ = writeln!(output, "Status: analyzed");
            }
            AnalysisStatus::Failed(error) => {
                let _ = writeln!(output, "Status: failed ({error})");
                let _ = writeln!(output);
                continue;
            }
            AnalysisStatus::Pending => {
                let _ = writeln!(output, "Status: pending");
                let _ = writeln!(output);
                continue;
            }
        }

        let Some(analysis) = &report.analysis else {
            let _ = writeln!(output);
            continue;
        };
        let _ = writeln!(output, "Repository: {}", analysis.repository);
        let _ = writeln!(
            output,
            "Score: {}/100 ({})",
            analysis.score,
            score_band(analysis.score)
        );
        append_text_list(&mut output, "Summary", &analysis.summary);
        append_text_list(&mut output, "Roadmap", &analysis.roadmap);

        let _ = writeln!(output, "Checklist:");
        for item in &analysis.checklist {
            let label = match item.status {
                CheckStatus::Pass => "PASS",
                CheckStatus::Fail => "FAIL",
            };
            let _ = writeln!(output, "- [{label}] {}", item.item);
        }

        append_text_list(&mut output, "Tips", &analysis.tips);
        if let Some(detail) = &analysis.detailed_report {
            let _ = writeln!(output, "Detailed report:\n{detail}");
        }
        let _ = writeln!(output);
    }
    output
}

fn append_text_list(output: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        let _ = writeln!(output, "{title}: none");
        return;
    }
    let _ = writeln!(output, "{title}:");
    for item in items {
        let _ = writeln!(output, "- {item}");
    }
}

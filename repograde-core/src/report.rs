//! Report formatting utilities for RepoGrade outputs.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::domain::{AnalysisResponse, CheckStatus, ChecklistItem};

/// Status of a single repository analysis in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Analysis has not run yet.
    Pending,
    /// Analysis completed.
    Analyzed,
    /// Analysis failed with an error message.
    Failed(String),
}

/// Batch entry pairing a repository reference with its analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoReport {
    /// Repository reference as supplied by the user.
    pub source: String,
    /// Analysis status.
    pub status: AnalysisStatus,
    /// Analysis payload when successful.
    pub analysis: Option<AnalysisResponse>,
}

impl RepoReport {
    /// Create a pending report for a repository.
    pub fn new(source: String) -> Self {
        Self {
            source,
            status: AnalysisStatus::Pending,
            analysis: None,
        }
    }

    /// Create a report for a completed analysis.
    pub fn analyzed(source: String, analysis: AnalysisResponse) -> Self {
        Self {
            source,
            status: AnalysisStatus::Analyzed,
            analysis: Some(analysis),
        }
    }

    /// Create a report for a failed repository.
    pub fn failed(source: String, error: impl Into<String>) -> Self {
        Self {
            source,
            status: AnalysisStatus::Failed(error.into()),
            analysis: None,
        }
    }
}

/// Qualitative band for a score, used in human-readable output.
pub fn score_band(score: u8) -> &'static str {
    match score {
        90..=u8::MAX => "Elite",
        70..=89 => "Advanced",
        40..=69 => "Intermediate",
        _ => "Beginner",
    }
}

/// Render a list of analysis reports as Markdown.
pub fn render_analysis_markdown(reports: &[RepoReport]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# RepoGrade Analysis Report\n");
    for report in reports {
        let _ = writeln!(output, "## {}\n", report.source);
        append_status(&mut output, &report.status);
        if let Some(analysis) = &report.analysis {
            let _ = writeln!(
                output,
                "**Score:** {}/100 ({})\n",
                analysis.score,
                score_band(analysis.score)
            );
            append_list(&mut output, "Summary", &analysis.summary, "Nothing noteworthy.");
            append_list(&mut output, "Roadmap", &analysis.roadmap, "No improvements needed.");
            append_checklist(&mut output, &analysis.checklist);
            append_list(&mut output, "Tips", &analysis.tips, "No tips.");
            if let Some(detail) = &analysis.detailed_report {
                let _ = writeln!(output, "### Detailed report\n\n{detail}\n");
            }
        }
    }
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

fn append_status(output: &mut String, status: &AnalysisStatus) {
    match status {
        AnalysisStatus::Analyzed => {
            let _ = writeln!(output, "- Status: analyzed\n");
        }
        AnalysisStatus::Pending => {
            let _ = writeln!(output, "- Status: pending\n");
        }
        AnalysisStatus::Failed(error) => {
            let _ = writeln!(output, "- Status: failed ({error})\n");
        }
    }
}

fn append_checklist(output: &mut String, checklist: &[ChecklistItem]) {
    let _ = writeln!(output, "### Checklist");
    for item in checklist {
        let mark = match item.status {
            CheckStatus::Pass => "x",
            CheckStatus::Fail => " ",
        };
        let _ = writeln!(output, "- [{mark}] {}", item.item);
    }
    let _ = writeln!(output);
}

fn append_list(output: &mut String, title: &str, items: &[String], empty_message: &str) {
    if items.is_empty() {
        let _ = writeln!(output, "### {title}\n{empty_message}\n");
        return;
    }
    let _ = writeln!(output, "### {title}");
    for item in items {
        let _ = writeln!(output, "- {item}");
    }
    let _ = writeln!(output);
}

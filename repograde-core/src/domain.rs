//! Domain entities for RepoGrade.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Branch assumed when the hosting API omits `default_branch`.
pub const FALLBACK_BRANCH: &str = "main";

/// Language names to their size in bytes, in the order the API listed them.
pub type LanguageHistogram = IndexMap<String, u64>;

/// Repository metadata snapshot fetched once per analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    /// Full repository name (`owner/name`).
    #[serde(default)]
    pub full_name: String,
    /// Free-form project description.
    #[serde(default)]
    pub description: Option<String>,
    /// Default branch name.
    #[serde(default)]
    pub default_branch: Option<String>,
}

impl RepositoryMetadata {
    /// Default branch, falling back to `main` when the API omits it.
    pub fn branch(&self) -> &str {
        self.default_branch
            .as_deref()
            .filter(|branch| !branch.trim().is_empty())
            .unwrap_or(FALLBACK_BRANCH)
    }
}

/// Kind of a file tree entry as reported by the hosting API.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    #[serde(rename = "blob")]
    File,
    /// Directory.
    #[serde(rename = "tree")]
    Directory,
    /// Git submodule.
    #[serde(rename = "commit")]
    Submodule,
    /// Anything else.
    #[default]
    #[serde(other)]
    Unknown,
}

/// One entry of the recursive repository tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTreeEntry {
    /// Slash-separated path relative to the repository root.
    #[serde(default)]
    pub path: Option<String>,
    /// Entry kind.
    #[serde(rename = "type", default)]
    pub kind: EntryKind,
}

impl FileTreeEntry {
    /// Build a file entry for the given path.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            kind: EntryKind::File,
        }
    }

    /// Build a directory entry for the given path.
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            kind: EntryKind::Directory,
        }
    }
}

/// A commit record; only the count matters to scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash.
    #[serde(default)]
    pub sha: String,
}

/// A branch record; only the count matters to scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name.
    #[serde(default)]
    pub name: String,
}

/// Raw repository facts gathered for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryFacts {
    /// Repository metadata.
    pub metadata: RepositoryMetadata,
    /// Recursive file tree of the default branch.
    pub tree: Vec<FileTreeEntry>,
    /// First page of commits.
    pub commits: Vec<Commit>,
    /// Branch list.
    pub branches: Vec<Branch>,
    /// Language byte histogram.
    pub languages: LanguageHistogram,
}

/// Outcome of a checklist item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The check passed.
    Pass,
    /// The check failed.
    Fail,
}

impl CheckStatus {
    /// Map a boolean outcome to a status.
    pub fn from_passed(passed: bool) -> Self {
        if passed { Self::Pass } else { Self::Fail }
    }

    /// Stable lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "fail",
        }
    }
}

/// A single pass/fail checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChecklistItem {
    /// Human-readable check name.
    pub item: String,
    /// Check outcome.
    pub status: CheckStatus,
}

/// Output of the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    /// Heuristic score, 0-100.
    pub score: u8,
    /// Positive observations.
    pub summary: Vec<String>,
    /// Improvements for failed scoring factors.
    pub roadmap: Vec<String>,
    /// The six checklist entries in fixed order.
    pub checklist: Vec<ChecklistItem>,
    /// Advisory tips independent of the score.
    pub tips: Vec<String>,
    /// Narrative audit, when one was requested.
    pub detailed_report: Option<String>,
}

/// Response payload for a repository analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    /// Repository identifier (`owner/name`).
    pub repository: String,
    /// Heuristic score, 0-100.
    pub score: u8,
    /// Positive observations.
    pub summary: Vec<String>,
    /// Improvements for failed scoring factors.
    pub roadmap: Vec<String>,
    /// The six checklist entries in fixed order.
    pub checklist: Vec<ChecklistItem>,
    /// Advisory tips.
    pub tips: Vec<String>,
    /// Narrative audit, null when no credential was supplied.
    pub detailed_report: Option<String>,
}

impl AnalysisResponse {
    /// Combine a repository identifier with a scoring result.
    pub fn new(repository: impl Into<String>, result: AnalysisResult) -> Self {
        Self {
            repository: repository.into(),
            score: result.score,
            summary: result.summary,
            roadmap: result.roadmap,
            checklist: result.checklist,
            tips: result.tips,
            detailed_report: result.detailed_report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_entries_decode_github_shape() {
        let json = r#"[
            {"path": "src", "type": "tree", "sha": "a"},
            {"path": "src/main.rs", "type": "blob", "size": 10},
            {"path": "vendor/lib", "type": "commit"},
            {"type": "blob"},
            {"path": "odd", "type": "symlink"}
        ]"#;
        let entries: Vec<FileTreeEntry> = serde_json::from_str(json).expect("decode");
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[1], FileTreeEntry::file("src/main.rs"));
        assert_eq!(entries[2].kind, EntryKind::Submodule);
        assert_eq!(entries[3].path, None);
        assert_eq!(entries[4].kind, EntryKind::Unknown);
    }

    #[test]
    fn metadata_branch_falls_back_to_main() {
        let metadata: RepositoryMetadata =
            serde_json::from_str(r#"{"full_name": "octo/demo", "description": null}"#)
                .expect("decode");
        assert_eq!(metadata.branch(), "main");

        let metadata = RepositoryMetadata {
            default_branch: Some("trunk".to_string()),
            ..metadata
        };
        assert_eq!(metadata.branch(), "trunk");
    }

    #[test]
    fn check_status_serializes_lowercase() {
        let item = ChecklistItem {
            item: "License".to_string(),
            status: CheckStatus::from_passed(false),
        };
        let value = serde_json::to_value(&item).expect("serialize");
        assert_eq!(value["status"], "fail");
        assert_eq!(CheckStatus::Pass.as_str(), "pass");
    }

    #[test]
    fn response_keeps_null_detailed_report() {
        let result = AnalysisResult {
            score: 40,
            summary: vec![],
            roadmap: vec![],
            checklist: vec![],
            tips: vec![],
            detailed_report: None,
        };
        let response = AnalysisResponse::new("octo/demo", result);
        let value = serde_json::to_value(&response).expect("serialize");
        assert_eq!(value["repository"], "octo/demo");
        assert!(value["detailed_report"].is_null());
    }
}

#![deny(missing_docs)]
//! RepoGrade core library.
//!
//! This crate contains the domain types, repository reference parsing and the
//! deterministic scoring engine that power the RepoGrade service and CLI.

pub mod domain;
pub mod error;
pub mod prompt;
pub mod reference;
pub mod report;
pub mod scoring;
pub mod tips;

pub use domain::{
    AnalysisResponse, AnalysisResult, Branch, CheckStatus, ChecklistItem, Commit, EntryKind,
    FileTreeEntry, LanguageHistogram, RepositoryFacts, RepositoryMetadata,
};
pub use error::{RepoGradeError, Result};
pub use prompt::{MAX_PROMPT_FILES, build_audit_prompt, prompt_file_list, render_checklist_lines};
pub use reference::RepoRef;
pub use report::{AnalysisStatus, RepoReport, render_analysis_markdown, render_json, score_band};
pub use scoring::{TreeSignals, primary_language, score_repository};

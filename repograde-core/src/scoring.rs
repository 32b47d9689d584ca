//! Heuristic repository scoring.
//!
//! Five factors worth 20 points each feed the numeric score. Each factor adds
//! exactly one line to either the summary or the roadmap. The six-item
//! checklist and the tips reuse the same tree signals but never move the score.

use crate::domain::{
    AnalysisResult, CheckStatus, ChecklistItem, FileTreeEntry, LanguageHistogram,
    RepositoryFacts,
};
use crate::tips::{hygiene_tips, language_tips};

/// Points awarded by a fully satisfied factor.
pub const FACTOR_WEIGHT: u32 = 20;
/// Upper bound of the score.
pub const MAX_SCORE: u32 = 100;

const HEALTHY_COMMITS: usize = 30;
const MODERATE_COMMITS: usize = 10;
const MIN_TREE_ENTRIES: usize = 20;

const SECRET_SUFFIXES: &[&str] = &[
    ".env",
    "id_rsa",
    "id_dsa",
    ".pem",
    "secrets.json",
    "credentials.json",
];

const COMMUNITY_FILES: &[&str] = &[
    "contributing.md",
    "code_of_conduct.md",
    "pull_request_template.md",
];

/// Facts derived from a single pass over the file tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSignals {
    /// Some path starts with `readme`.
    pub has_readme: bool,
    /// Some path contains `test` or `spec`.
    pub has_tests: bool,
    /// Some path contains `license` or `copying`.
    pub has_license: bool,
    /// Some path contains `.gitignore`.
    pub has_gitignore: bool,
    /// Some path is exactly one of the community files.
    pub has_community_files: bool,
    /// Paths that look like committed secrets, in tree order.
    pub exposed_secrets: Vec<String>,
    /// Total number of tree entries, including ones without a path.
    pub entry_count: usize,
    lowered_paths: Vec<String>,
}

impl TreeSignals {
    /// Collect all signals from the tree. Entries without a path are skipped.
    pub fn from_entries(tree: &[FileTreeEntry]) -> Self {
        let mut signals = Self {
            entry_count: tree.len(),
            ..Self::default()
        };

        for path in tree.iter().filter_map(|entry| entry.path.as_deref()) {
            let lowered = path.to_lowercase();
            signals.has_readme |= lowered.starts_with("readme");
            signals.has_tests |= lowered.contains("test") || lowered.contains("spec");
            signals.has_license |= lowered.contains("license") || lowered.contains("copying");
            signals.has_gitignore |= lowered.contains(".gitignore");
            signals.has_community_files |= COMMUNITY_FILES.contains(&lowered.as_str());
            if SECRET_SUFFIXES.iter().any(|suffix| path.ends_with(suffix)) {
                signals.exposed_secrets.push(path.to_string());
            }
            signals.lowered_paths.push(lowered);
        }

        signals
    }

    /// Whether any file is named exactly `name` (case-insensitive), at any depth.
    pub fn contains_file(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.lowered_paths.iter().any(|path| {
            path == &name
                || path
                    .strip_suffix(name.as_str())
                    .is_some_and(|parent| parent.ends_with('/'))
        })
    }

    /// Build the six-item checklist in its fixed order.
    pub fn checklist(&self) -> Vec<ChecklistItem> {
        [
            ("License", self.has_license),
            (".gitignore", self.has_gitignore),
            ("README", self.has_readme),
            ("Tests", self.has_tests),
            ("No exposed secrets", self.exposed_secrets.is_empty()),
            ("Community standards", self.has_community_files),
        ]
        .into_iter()
        .map(|(item, passed)| ChecklistItem {
            item: item.to_string(),
            status: CheckStatus::from_passed(passed),
        })
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FactorOutcome {
    Awarded { points: u32, note: &'static str },
    Missed { advice: &'static str },
}

fn documentation(signals: &TreeSignals) -> FactorOutcome {
    if signals.has_readme {
        FactorOutcome::Awarded {
            points: FACTOR_WEIGHT,
            note: "README documentation is present.",
        }
    } else {
        FactorOutcome::Missed {
            advice: "Add a detailed README with a project overview, setup steps, and usage examples.",
        }
    }
}

fn testing(signals: &TreeSignals) -> FactorOutcome {
    if signals.has_tests {
        FactorOutcome::Awarded {
            points: FACTOR_WEIGHT,
            note: "Test files detected in the repository.",
        }
    } else {
        FactorOutcome::Missed {
            advice: "Add automated tests (pytest, jest, JUnit) that cover the core logic.",
        }
    }
}

fn commit_activity(commit_count: usize) -> FactorOutcome {
    if commit_count >= HEALTHY_COMMITS {
        FactorOutcome::Awarded {
            points: FACTOR_WEIGHT,
            note: "Healthy commit history with frequent updates.",
        }
    } else if commit_count >= MODERATE_COMMITS {
        FactorOutcome::Awarded {
            points: FACTOR_WEIGHT / 2,
            note: "Moderate commit activity.",
        }
    } else {
        FactorOutcome::Missed {
            advice: "Commit more consistently with small, meaningful commits.",
        }
    }
}

fn branching(branch_count: usize) -> FactorOutcome {
    if branch_count > 1 {
        FactorOutcome::Awarded {
            points: FACTOR_WEIGHT,
            note: "Uses multiple branches, indicating a feature-branch workflow.",
        }
    } else {
        FactorOutcome::Missed {
            advice: "Use feature branches and pull requests instead of working on a single branch.",
        }
    }
}

fn structure(entry_count: usize) -> FactorOutcome {
    if entry_count >= MIN_TREE_ENTRIES {
        FactorOutcome::Awarded {
            points: FACTOR_WEIGHT,
            note: "Well-structured project with a substantial file tree.",
        }
    } else {
        FactorOutcome::Missed {
            advice: "Organize the project into a clearer folder and module structure.",
        }
    }
}

/// The histogram key with the most bytes. Ties keep the key listed first.
pub fn primary_language(languages: &LanguageHistogram) -> Option<&str> {
    let mut best: Option<(&str, u64)> = None;
    for (language, bytes) in languages {
        match best {
            Some((_, top)) if *bytes <= top => {}
            _ => best = Some((language.as_str(), *bytes)),
        }
    }
    best.map(|(language, _)| language)
}

/// Score repository facts. Pure and deterministic; never fails.
pub fn score_repository(facts: &RepositoryFacts) -> AnalysisResult {
    let signals = TreeSignals::from_entries(&facts.tree);
    let outcomes = [
        documentation(&signals),
        testing(&signals),
        commit_activity(facts.commits.len()),
        branching(facts.branches.len()),
        structure(signals.entry_count),
    ];

    let mut total = 0u32;
    let mut summary = Vec::new();
    let mut roadmap = Vec::new();
    for outcome in outcomes {
        match outcome {
            FactorOutcome::Awarded { points, note } => {
                total += points;
                summary.push(note.to_string());
            }
            FactorOutcome::Missed { advice } => roadmap.push(advice.to_string()),
        }
    }

    let language = primary_language(&facts.languages);
    if let Some(language) = language {
        summary.push(format!("Primary language: {language}"));
    }

    let mut tips = language_tips(language, &signals);
    tips.extend(hygiene_tips(&signals));

    AnalysisResult {
        score: total.min(MAX_SCORE) as u8,
        summary,
        roadmap,
        checklist: signals.checklist(),
        tips,
        detailed_report: None,
    }
}

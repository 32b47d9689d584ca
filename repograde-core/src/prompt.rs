//! Prompt construction for the narrative audit.

use std::fmt::Write;

use crate::domain::{ChecklistItem, FileTreeEntry, RepositoryMetadata};

/// Maximum number of file paths included in a prompt.
pub const MAX_PROMPT_FILES: usize = 200;

/// First [`MAX_PROMPT_FILES`] paths of the tree, skipping entries without one.
pub fn prompt_file_list(tree: &[FileTreeEntry]) -> Vec<&str> {
    tree.iter()
        .filter_map(|entry| entry.path.as_deref())
        .take(MAX_PROMPT_FILES)
        .collect()
}

/// Render the checklist as `- Item: STATUS` lines.
pub fn render_checklist_lines(checklist: &[ChecklistItem]) -> String {
    checklist
        .iter()
        .map(|item| format!("- {}: {}", item.item, item.status.as_str().to_uppercase()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the audit prompt sent to the language model.
pub fn build_audit_prompt(
    metadata: &RepositoryMetadata,
    tree: &[FileTreeEntry],
    checklist: &[ChecklistItem],
) -> String {
    let name = if metadata.full_name.trim().is_empty() {
        "Unknown Repository"
    } else {
        metadata.full_name.as_str()
    };
    let description = metadata
        .description
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or("No description provided.");
    let files = serde_json::to_string_pretty(&prompt_file_list(tree))
        .unwrap_or_else(|_| "[]".to_string());

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are a principal software architect auditing the GitHub repository '{name}'.\n"
    );
    let _ = writeln!(prompt, "Project description: {description}\n");
    let _ = writeln!(prompt, "File structure (partial):\n{files}\n");
    let _ = writeln!(
        prompt,
        "Automated checks:\n{}\n",
        render_checklist_lines(checklist)
    );
    let _ = writeln!(
        prompt,
        "Write a Markdown \"Deep Analysis Report\" with these sections:\n\
         1. Executive Summary: what the project does, who it is for, and its core technologies (two paragraphs).\n\
         2. Architectural Assessment: how the code is organised and whether the structure is modular.\n\
         3. Code Quality & Hygiene Audit: concrete praise or critique grounded in the checks and file names.\n\
         4. Strategic Recommendations: high-level next steps for the maintainers.\n"
    );
    let _ = write!(
        prompt,
        "Be specific and constructive, cite real file names, and avoid generic advice."
    );
    prompt
}

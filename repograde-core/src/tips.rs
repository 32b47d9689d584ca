//! Advisory tips keyed by primary language plus repository hygiene.

use crate::scoring::TreeSignals;

/// A tip emitted when its predicate holds for the repository tree.
struct TipRule {
    applies: fn(&TreeSignals) -> bool,
    message: &'static str,
}

impl TipRule {
    const fn always(message: &'static str) -> Self {
        Self::when(unconditional, message)
    }

    const fn when(applies: fn(&TreeSignals) -> bool, message: &'static str) -> Self {
        Self { applies, message }
    }
}

fn unconditional(_: &TreeSignals) -> bool {
    true
}

fn lacks_python_manifest(signals: &TreeSignals) -> bool {
    !["requirements.txt", "pyproject.toml", "setup.py", "pipfile"]
        .iter()
        .any(|name| signals.contains_file(name))
}

fn lacks_package_manifest(signals: &TreeSignals) -> bool {
    !signals.contains_file("package.json")
}

const PYTHON: &[TipRule] = &[
    TipRule::when(
        lacks_python_manifest,
        "Add a requirements.txt or pyproject.toml so dependencies are reproducible.",
    ),
    TipRule::always("Format code automatically with Black or Ruff."),
    TipRule::always("Add type hints and check them with mypy."),
];

const TYPESCRIPT: &[TipRule] = &[
    TipRule::when(
        lacks_package_manifest,
        "Add a package.json to declare dependencies and scripts.",
    ),
    TipRule::always("Set up ESLint and Prettier to keep linting and formatting consistent."),
];

const JAVASCRIPT: &[TipRule] = &[
    TipRule::when(
        lacks_package_manifest,
        "Add a package.json to declare dependencies and scripts.",
    ),
    TipRule::always("Set up ESLint and Prettier to keep linting and formatting consistent."),
    TipRule::always("Consider migrating to TypeScript for static type checking."),
];

const JAVA: &[TipRule] = &[
    TipRule::always("Enforce a consistent code style with Checkstyle or Spotless."),
    TipRule::always("Automate builds and dependency management with Maven or Gradle."),
];

const LANGUAGE_RULES: &[(&str, &[TipRule])] = &[
    ("Python", PYTHON),
    ("TypeScript", TYPESCRIPT),
    ("JavaScript", JAVASCRIPT),
    ("Java", JAVA),
];

/// Tips for the primary language. Unknown or missing languages yield none.
pub fn language_tips(language: Option<&str>, signals: &TreeSignals) -> Vec<String> {
    let Some(language) = language else {
        return Vec::new();
    };
    LANGUAGE_RULES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(language))
        .map(|(_, rules)| {
            rules
                .iter()
                .filter(|rule| (rule.applies)(signals))
                .map(|rule| rule.message.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Cross-cutting tips driven by the checklist outcome.
pub fn hygiene_tips(signals: &TreeSignals) -> Vec<String> {
    let mut tips = Vec::new();
    if !signals.has_license {
        tips.push("Add a LICENSE file so others know how they may use the code.".to_string());
    }
    if !signals.has_gitignore {
        tips.push(
            "Add a .gitignore to keep build output and local files out of version control."
                .to_string(),
        );
    }
    if !signals.exposed_secrets.is_empty() {
        tips.push(format!(
            "URGENT: remove committed secret files and rotate their credentials: {}",
            signals.exposed_secrets.join(", ")
        ));
    }
    if !signals.has_community_files {
        tips.push(
            "Add CONTRIBUTING.md, CODE_OF_CONDUCT.md, or PULL_REQUEST_TEMPLATE.md to guide contributors."
                .to_string(),
        );
    }
    tips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileTreeEntry;

    fn signals(paths: &[&str]) -> TreeSignals {
        let entries: Vec<FileTreeEntry> = paths.iter().map(|path| FileTreeEntry::file(*path)).collect();
        TreeSignals::from_entries(&entries)
    }

    #[test]
    fn python_tips_skip_manifest_when_present() {
        let without = language_tips(Some("Python"), &signals(&["app.py"]));
        assert_eq!(without.len(), 3);
        assert!(without[0].contains("requirements.txt"));

        let with = language_tips(Some("Python"), &signals(&["app.py", "pyproject.toml"]));
        assert_eq!(with.len(), 2);
        assert!(with.iter().any(|tip| tip.contains("mypy")));
    }

    #[test]
    fn typescript_does_not_suggest_migration() {
        let tips = language_tips(Some("TypeScript"), &signals(&["package.json"]));
        assert_eq!(tips.len(), 1);
        assert!(tips[0].contains("ESLint"));
    }

    #[test]
    fn javascript_suggests_typescript() {
        let tips = language_tips(Some("JavaScript"), &signals(&["web/package.json"]));
        assert_eq!(tips.len(), 2);
        assert!(tips[1].contains("TypeScript"));
    }

    #[test]
    fn java_tips_are_unconditional() {
        let tips = language_tips(Some("Java"), &signals(&["pom.xml"]));
        assert_eq!(tips.len(), 2);
        assert!(tips[1].contains("Gradle"));
    }

    #[test]
    fn unknown_or_missing_language_yields_nothing() {
        assert!(language_tips(Some("Haskell"), &signals(&[])).is_empty());
        assert!(language_tips(None, &signals(&[])).is_empty());
    }

    #[test]
    fn hygiene_tips_follow_checklist_order() {
        let tips = hygiene_tips(&signals(&["id_rsa"]));
        assert_eq!(tips.len(), 4);
        assert!(tips[0].contains("LICENSE"));
        assert!(tips[1].contains(".gitignore"));
        assert!(tips[2].starts_with("URGENT"));
        assert!(tips[2].ends_with("id_rsa"));
        assert!(tips[3].contains("CONTRIBUTING.md"));
    }

    #[test]
    fn healthy_repository_gets_no_hygiene_tips() {
        let tips = hygiene_tips(&signals(&[
            "LICENSE",
            ".gitignore",
            "code_of_conduct.md",
        ]));
        assert!(tips.is_empty());
    }
}

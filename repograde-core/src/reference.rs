//! Parsing of GitHub repository references.

use std::fmt;

use crate::error::{RepoGradeError, Result};

const HOST: &str = "github.com/";

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Account or organisation owning the repository.
    pub owner: String,
    /// Repository name without any `.git` suffix.
    pub name: String,
}

impl RepoRef {
    /// Parse a repository URL such as `https://github.com/owner/repo.git`.
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = || RepoGradeError::InvalidReference(reference.trim().to_string());
        let trimmed = reference.trim();
        let trimmed = trimmed
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);
        let without_www = without_scheme
            .strip_prefix("www.")
            .unwrap_or(without_scheme);
        let rest = strip_prefix_ignore_case(without_www, HOST).ok_or_else(invalid)?;

        let mut segments = rest.split('/');
        let owner = segments.next().unwrap_or_default().trim();
        let name = segments.next().unwrap_or_default().trim();
        let name = name.strip_suffix(".git").unwrap_or(name);
        if owner.is_empty() || name.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::RepoRef;

    fn parsed(reference: &str) -> (String, String) {
        let repo = RepoRef::parse(reference).expect("parse");
        (repo.owner, repo.name)
    }

    #[test]
    fn accepts_common_forms() {
        let expected = ("octo".to_string(), "demo".to_string());
        assert_eq!(parsed("https://github.com/octo/demo"), expected);
        assert_eq!(parsed("https://github.com/octo/demo.git"), expected);
        assert_eq!(parsed("http://www.github.com/octo/demo/"), expected);
        assert_eq!(parsed("github.com/octo/demo"), expected);
        assert_eq!(parsed("  https://GitHub.com/octo/demo  "), expected);
        assert_eq!(parsed("https://github.com/octo/demo/tree/main/src"), expected);
        assert_eq!(parsed("https://github.com/octo/demo?tab=readme"), expected);
    }

    #[test]
    fn only_strips_trailing_git_suffix() {
        assert_eq!(
            parsed("https://github.com/octo/my.github.io"),
            ("octo".to_string(), "my.github.io".to_string())
        );
        assert_eq!(
            parsed("https://github.com/octo/.gitignore-templates.git"),
            ("octo".to_string(), ".gitignore-templates".to_string())
        );
    }

    #[test]
    fn rejects_other_shapes() {
        for reference in [
            "",
            "not a url",
            "https://gitlab.com/octo/demo",
            "https://github.com/octo",
            "https://github.com/octo/",
            "https://github.com//demo",
            "https://github.com/octo/.git",
            "git@github.com:octo/demo.git",
        ] {
            let err = RepoRef::parse(reference).unwrap_err();
            assert!(err.is_client_error(), "{reference} should be rejected");
        }
    }

    #[test]
    fn displays_as_owner_slash_name() {
        let repo = RepoRef::parse("https://github.com/octo/demo").expect("parse");
        assert_eq!(repo.to_string(), "octo/demo");
    }
}

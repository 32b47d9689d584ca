//! Environment-driven configuration for the RepoGrade server.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_NARRATIVE_TIMEOUT_SECS: u64 = 30;

/// Error raised when a configuration value cannot be parsed.
#[derive(Debug, Clone)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ListenConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Browser origins allowed by CORS.
    pub ui_origins: Vec<String>,
}

/// GitHub REST API settings.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// GitHub API base URL.
    pub api_url: String,
    /// Operator token attached to every request when set.
    pub token: Option<String>,
    /// User agent sent with API requests.
    pub user_agent: String,
}

/// Chat-completion endpoint settings for narrative reports.
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    /// Chat-completion endpoint URL.
    pub api_url: String,
    /// Model identifier.
    pub model: String,
    /// Value of the `HTTP-Referer` header.
    pub referer: String,
    /// Upper bound on a single completion request.
    pub timeout: Duration,
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listener settings.
    pub listen: ListenConfig,
    /// GitHub API settings.
    pub github: GitHubConfig,
    /// Narrative generator settings.
    pub narrative: NarrativeConfig,
}

impl Config {
    /// Build configuration from environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let ui_origins = value(
            "REPOGRADE_UI_ORIGINS",
            "http://127.0.0.1:3000,http://localhost:3000",
        )
        .split(',')
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect();
        let port = parse_number::<u16>("REPOGRADE_PORT", &value("REPOGRADE_PORT", "8000"))?;
        let timeout_secs = parse_number::<u64>(
            "NARRATIVE_TIMEOUT_SECS",
            &value(
                "NARRATIVE_TIMEOUT_SECS",
                &DEFAULT_NARRATIVE_TIMEOUT_SECS.to_string(),
            ),
        )?;

        Ok(Self {
            listen: ListenConfig {
                host: value("REPOGRADE_HOST", "127.0.0.1"),
                port,
                ui_origins,
            },
            github: GitHubConfig {
                api_url: value("GITHUB_API_URL", "https://api.github.com"),
                token: lookup("GITHUB_TOKEN")
                    .map(|token| token.trim().to_string())
                    .filter(|token| !token.is_empty()),
                user_agent: value("GITHUB_USER_AGENT", "repograde-server"),
            },
            narrative: NarrativeConfig {
                api_url: value(
                    "NARRATIVE_API_URL",
                    "https://openrouter.ai/api/v1/chat/completions",
                ),
                model: value("NARRATIVE_MODEL", "google/gemini-2.0-flash-001"),
                referer: value("NARRATIVE_REFERER", "http://localhost:3000"),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    T::from_str(raw).map_err(|_| ConfigError::new(format!("{key} must be a number, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(|_| None).expect("config");
        assert_eq!(config.listen.host, "127.0.0.1");
        assert_eq!(config.listen.port, 8000);
        assert_eq!(config.listen.ui_origins.len(), 2);
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert!(config.github.token.is_none());
        assert_eq!(config.narrative.model, "google/gemini-2.0-flash-001");
        assert_eq!(config.narrative.timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_trimmed_and_split() {
        let config = Config::from_lookup(lookup_from(&[
            ("REPOGRADE_PORT", " 9090 "),
            ("REPOGRADE_UI_ORIGINS", "https://a.dev, ,https://b.dev"),
            ("GITHUB_TOKEN", "  "),
            ("NARRATIVE_TIMEOUT_SECS", "5"),
        ]))
        .expect("config");
        assert_eq!(config.listen.port, 9090);
        assert_eq!(config.listen.ui_origins, vec!["https://a.dev", "https://b.dev"]);
        assert!(config.github.token.is_none());
        assert_eq!(config.narrative.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[("REPOGRADE_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("REPOGRADE_PORT"));

        let err =
            Config::from_lookup(lookup_from(&[("NARRATIVE_TIMEOUT_SECS", "-1")])).unwrap_err();
        assert!(err.to_string().contains("NARRATIVE_TIMEOUT_SECS"));
    }
}

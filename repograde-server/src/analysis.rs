//! Request orchestration: parse, gather, score and narrate.

use std::sync::Arc;

use repograde_core::{
    AnalysisResponse, RepoGradeError, RepoRef, RepositoryFacts, Result, score_repository,
};
use uuid::Uuid;

use crate::config::Config;
use crate::github::{GitHubApiClient, RepositorySource};
use crate::narrative::{NarrativeGenerator, OpenRouterClient};

/// Analysis service shared by request handlers.
#[derive(Clone)]
pub struct AnalysisService {
    source: Arc<dyn RepositorySource + Send + Sync>,
    narrator: Arc<dyn NarrativeGenerator + Send + Sync>,
}

impl AnalysisService {
    /// Build a service with explicit collaborators.
    pub fn new(
        source: Arc<dyn RepositorySource + Send + Sync>,
        narrator: Arc<dyn NarrativeGenerator + Send + Sync>,
    ) -> Self {
        Self { source, narrator }
    }

    /// Build a service backed by the live GitHub and narrative clients.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = GitHubApiClient::new(&config.github)?;
        let narrator = OpenRouterClient::new(&config.narrative).map_err(|err| {
            RepoGradeError::Other(format!("narrative client setup failed: {err}"))
        })?;
        Ok(Self::new(Arc::new(source), Arc::new(narrator)))
    }

    /// Analyze a repository reference.
    ///
    /// The narrative generator only runs when `api_key` holds a non-blank value;
    /// otherwise `detailed_report` is left empty.
    pub async fn analyze(&self, repo_url: &str, api_key: Option<&str>) -> Result<AnalysisResponse> {
        let repo = RepoRef::parse(repo_url)?;
        let analysis_id = Uuid::new_v4();
        log::info!("analysis {analysis_id}: gathering facts for {repo}");

        let facts = self.gather(&repo).await.inspect_err(|err| {
            log::error!("analysis {analysis_id}: {err}");
        })?;
        let mut result = score_repository(&facts);

        if let Some(api_key) = api_key.map(str::trim).filter(|key| !key.is_empty()) {
            log::info!("analysis {analysis_id}: requesting narrative report");
            let report = self
                .narrator
                .generate(&facts.metadata, &facts.tree, &result.checklist, Some(api_key))
                .await;
            result.detailed_report = Some(report);
        }

        log::info!(
            "analysis {analysis_id}: {repo} scored {} ({} tree entries, {} commits)",
            result.score,
            facts.tree.len(),
            facts.commits.len()
        );
        Ok(AnalysisResponse::new(repo.to_string(), result))
    }

    async fn gather(&self, repo: &RepoRef) -> Result<RepositoryFacts> {
        let source = self.source.as_ref();
        // The tree lookup needs the default branch from metadata.
        let metadata_and_tree = async {
            let metadata = source.metadata(repo).await?;
            let tree = source.tree(repo, metadata.branch()).await?;
            Ok::<_, RepoGradeError>((metadata, tree))
        };
        let ((metadata, tree), languages, commits, branches) = tokio::try_join!(
            metadata_and_tree,
            source.languages(repo),
            source.commits(repo),
            source.branches(repo),
        )?;
        Ok(RepositoryFacts {
            metadata,
            tree,
            commits,
            branches,
            languages,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::{RecordingNarrator, StaticSource};
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use repograde_core::{Branch, Commit, FileTreeEntry, RepositoryMetadata};

    use crate::config::GitHubConfig;

    fn sample_facts() -> RepositoryFacts {
        RepositoryFacts {
            metadata: RepositoryMetadata {
                full_name: "octo/demo".to_string(),
                description: None,
                default_branch: Some("trunk".to_string()),
            },
            tree: vec![
                FileTreeEntry::file("README.md"),
                FileTreeEntry::file("LICENSE"),
            ],
            commits: vec![Commit {
                sha: "a1".to_string(),
            }],
            branches: vec![Branch {
                name: "trunk".to_string(),
            }],
            languages: [("Rust".to_string(), 10)].into_iter().collect(),
        }
    }

    fn service_with(
        source: StaticSource,
        narrator: Arc<RecordingNarrator>,
    ) -> AnalysisService {
        AnalysisService::new(Arc::new(source), narrator)
    }

    #[tokio::test]
    async fn analyzes_without_narrative_when_key_is_absent() {
        let narrator = Arc::new(RecordingNarrator::default());
        let service = service_with(StaticSource::new(sample_facts()), narrator.clone());

        let response = service
            .analyze("https://github.com/Octo/Demo.git", None)
            .await
            .expect("analysis");

        assert_eq!(response.repository, "Octo/Demo");
        assert_eq!(response.score, 20);
        assert_eq!(response.checklist.len(), 6);
        assert!(response.detailed_report.is_none());
        assert!(narrator.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_key_is_treated_as_absent() {
        let narrator = Arc::new(RecordingNarrator::default());
        let service = service_with(StaticSource::new(sample_facts()), narrator.clone());

        let response = service
            .analyze("github.com/octo/demo", Some("   "))
            .await
            .expect("analysis");

        assert!(response.detailed_report.is_none());
        assert!(narrator.calls().is_empty());
    }

    #[tokio::test]
    async fn key_triggers_narrative_with_scoring_inputs() {
        let narrator = Arc::new(RecordingNarrator::default());
        let service = service_with(StaticSource::new(sample_facts()), narrator.clone());

        let response = service
            .analyze("https://www.github.com/octo/demo", Some(" sk-user "))
            .await
            .expect("analysis");

        assert_eq!(
            response.detailed_report.as_deref(),
            Some("Report for octo/demo (2 files, 6 checks)")
        );
        assert_eq!(narrator.calls(), vec!["sk-user".to_string()]);
    }

    #[tokio::test]
    async fn key_only_changes_the_detailed_report() {
        let narrator = Arc::new(RecordingNarrator::default());
        let service = service_with(StaticSource::new(sample_facts()), narrator);

        let without_key = service
            .analyze("https://github.com/octo/demo", None)
            .await
            .expect("analysis");
        let mut with_key = service
            .analyze("https://github.com/octo/demo", Some("k"))
            .await
            .expect("analysis");

        assert!(without_key.detailed_report.is_none());
        assert!(with_key.detailed_report.is_some());
        with_key.detailed_report = None;
        assert_eq!(without_key, with_key);
    }

    #[tokio::test]
    async fn invalid_reference_is_a_client_error() {
        let narrator = Arc::new(RecordingNarrator::default());
        let service = service_with(StaticSource::new(sample_facts()), narrator);

        let err = service
            .analyze("https://gitlab.com/octo/demo", None)
            .await
            .unwrap_err();

        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn upstream_failure_aborts_the_analysis() {
        for operation in ["metadata", "languages", "commits", "branches", "tree"] {
            let narrator = Arc::new(RecordingNarrator::default());
            let service = service_with(StaticSource::failing(operation), narrator.clone());

            let err = service
                .analyze("https://github.com/octo/demo", Some("key"))
                .await
                .unwrap_err();

            assert!(!err.is_client_error(), "{operation} should be a server error");
            assert!(narrator.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn tree_is_fetched_for_the_default_branch() {
        let mut facts = sample_facts();
        facts.metadata.default_branch = None;
        let narrator = Arc::new(RecordingNarrator::default());
        let service = service_with(StaticSource::new(facts), narrator);

        let response = service
            .analyze("https://github.com/octo/demo", None)
            .await
            .expect("analysis");

        assert!(response.summary.iter().any(|line| line.contains("README")));
    }

    #[tokio::test]
    async fn end_to_end_against_github_api() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/web");
                then.status(200).json_body(serde_json::json!({
                    "full_name": "octo/web",
                    "description": "A web app",
                    "default_branch": "develop"
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/web/languages");
                then.status(200)
                    .json_body(serde_json::json!({"JavaScript": 5000, "CSS": 300}));
            })
            .await;
        let commits: Vec<serde_json::Value> = (0..35)
            .map(|index| serde_json::json!({"sha": format!("sha{index}")}))
            .collect();
        server
            .mock_async(move |when, then| {
                when.method(GET)
                    .path("/repos/octo/web/commits")
                    .query_param("per_page", "100");
                then.status(200).json_body(serde_json::Value::Array(commits));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/octo/web/branches");
                then.status(200)
                    .json_body(serde_json::json!([{"name": "develop"}, {"name": "main"}]));
            })
            .await;
        let tree_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/repos/octo/web/git/trees/develop")
                    .query_param("recursive", "1");
                then.status(200).json_body(serde_json::json!({
                    "tree": [
                        {"path": "README.md", "type": "blob"},
                        {"path": "tests/unit.test.js", "type": "blob"},
                        {"path": "LICENSE", "type": "blob"},
                        {"path": ".gitignore", "type": "blob"},
                        {"path": "CONTRIBUTING.md", "type": "blob"}
                    ],
                    "truncated": false
                }));
            })
            .await;

        let source = GitHubApiClient::new(&GitHubConfig {
            api_url: server.url(""),
            token: None,
            user_agent: "repograde-tests".to_string(),
        })
        .expect("client");
        let service = AnalysisService::new(
            Arc::new(source),
            Arc::new(RecordingNarrator::default()),
        );

        let response = service
            .analyze("https://github.com/octo/web", None)
            .await
            .expect("analysis");

        tree_mock.assert_async().await;
        assert_eq!(response.repository, "octo/web");
        assert_eq!(response.score, 80);
        assert_eq!(response.roadmap.len(), 1);
        assert!(
            response
                .summary
                .contains(&"Primary language: JavaScript".to_string())
        );
        assert!(response.detailed_report.is_none());
    }
}

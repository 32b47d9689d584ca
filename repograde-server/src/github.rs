//! GitHub REST client that gathers raw repository facts.

use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use repograde_core::{
    Branch, Commit, FileTreeEntry, LanguageHistogram, RepoGradeError, RepoRef,
    RepositoryMetadata, Result,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::GitHubConfig;

/// Boxed future returned by [`RepositorySource`] operations.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

const COMMITS_PER_PAGE: &str = "100";

/// Read-only access to the repository facts used for scoring.
pub trait RepositorySource {
    /// Fetch repository metadata.
    fn metadata<'a>(&'a self, repo: &'a RepoRef) -> SourceFuture<'a, RepositoryMetadata>;
    /// Fetch the language byte histogram.
    fn languages<'a>(&'a self, repo: &'a RepoRef) -> SourceFuture<'a, LanguageHistogram>;
    /// Fetch the first page of commits.
    fn commits<'a>(&'a self, repo: &'a RepoRef) -> SourceFuture<'a, Vec<Commit>>;
    /// Fetch the branch list.
    fn branches<'a>(&'a self, repo: &'a RepoRef) -> SourceFuture<'a, Vec<Branch>>;
    /// Fetch the recursive file tree at `branch`.
    fn tree<'a>(
        &'a self,
        repo: &'a RepoRef,
        branch: &'a str,
    ) -> SourceFuture<'a, Vec<FileTreeEntry>>;
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<FileTreeEntry>,
    #[serde(default)]
    truncated: bool,
}

/// GitHub API client implementation.
#[derive(Debug, Clone)]
pub struct GitHubApiClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl GitHubApiClient {
    /// Build a GitHub API client from configuration.
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| RepoGradeError::Other(format!("github client setup failed: {err}")))?;
        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
        })
    }

    fn repo_url(&self, repo: &RepoRef, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}{suffix}",
            self.base_url,
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name)
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|err| RepoGradeError::upstream(operation, err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RepoGradeError::upstream(
                operation,
                format!("github api error ({status}): {body}"),
            ));
        }
        response
            .json::<T>()
            .await
            .map_err(|err| RepoGradeError::upstream(operation, format!("decode failed: {err}")))
    }

    async fn fetch_tree(&self, repo: &RepoRef, branch: &str) -> Result<Vec<FileTreeEntry>> {
        let url = self.repo_url(repo, &format!("/git/trees/{}", branch_path(branch)));
        let response: TreeResponse = self.get_json("tree", url, &[("recursive", "1")]).await?;
        if response.truncated {
            log::warn!(
                "tree for {repo}@{branch} was truncated by GitHub at {} entries",
                response.tree.len()
            );
        }
        Ok(response.tree)
    }
}

/// Percent-encode each `/`-separated segment of a branch name.
fn branch_path(branch: &str) -> String {
    branch
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl RepositorySource for GitHubApiClient {
    fn metadata<'a>(&'a self, repo: &'a RepoRef) -> SourceFuture<'a, RepositoryMetadata> {
        Box::pin(self.get_json("metadata", self.repo_url(repo, ""), &[]))
    }

    fn languages<'a>(&'a self, repo: &'a RepoRef) -> SourceFuture<'a, LanguageHistogram> {
        Box::pin(self.get_json("languages", self.repo_url(repo, "/languages"), &[]))
    }

    fn commits<'a>(&'a self, repo: &'a RepoRef) -> SourceFuture<'a, Vec<Commit>> {
        Box::pin(self.get_json(
            "commits",
            self.repo_url(repo, "/commits"),
            &[("per_page", COMMITS_PER_PAGE)],
        ))
    }

    fn branches<'a>(&'a self, repo: &'a RepoRef) -> SourceFuture<'a, Vec<Branch>> {
        Box::pin(self.get_json("branches", self.repo_url(repo, "/branches"), &[]))
    }

    fn tree<'a>(
        &'a self,
        repo: &'a RepoRef,
        branch: &'a str,
    ) -> SourceFuture<'a, Vec<FileTreeEntry>> {
        Box::pin(self.fetch_tree(repo, branch))
    }
}

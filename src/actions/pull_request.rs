use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;
use tracing::info;
use tracing::warn;

use crate::App;
use crate::actions::default_server;
use crate::auth::CredentialsProvider;
use crate::errors::InputError;
use crate::ops::azure::AzureDevOpsOps;
use crate::ops::azure::AzureRepoTarget;
use crate::ops::azure::CompletionOptions;
use crate::ops::azure::CreatePullRequest;
use crate::ops::azure::UpdatePullRequest;
use crate::ops::git::GitOps;

/// Input for `azure:repo:pr`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestInput {
    /// The name of the organization in Azure DevOps.
    #[serde(default)]
    pub organization: Option<String>,
    /// The branch to merge into the target (default: scaffolder).
    #[serde(default)]
    pub source_branch: Option<String>,
    /// The branch to merge into (default: main).
    #[serde(default)]
    pub target_branch: Option<String>,
    /// The title of the pull request.
    pub title: String,
    /// The description of the pull request.
    #[serde(default)]
    pub description: Option<String>,
    /// Repo ID of the pull request.
    pub repo_id: String,
    /// The project in Azure DevOps.
    #[serde(default)]
    pub project: Option<String>,
    /// Whether or not the PR supports iterations.
    #[serde(default)]
    pub supports_iterations: Option<bool>,
    /// The hostname of the Azure DevOps service.
    #[serde(default = "default_server")]
    pub server: String,
    /// The token to use for authorization.
    #[serde(default)]
    pub token: Option<String>,
    /// Enable auto-completion of the pull request once policies are met.
    #[serde(default)]
    pub auto_complete: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestOutput {
    pub pull_request_id: u64,
}

impl<G: GitOps, A: AzureDevOpsOps, P: CredentialsProvider> App<G, A, P> {
    /// Create a pull request to a repository in Azure DevOps.
    pub async fn cmd_pr(&self, input: PullRequestInput) -> Result<PullRequestOutput> {
        let source_ref = format!(
            "refs/heads/{}",
            input.source_branch.as_deref().unwrap_or("scaffolder")
        );
        let target_ref = format!(
            "refs/heads/{}",
            input.target_branch.as_deref().unwrap_or("main")
        );

        let organization = input
            .organization
            .unwrap_or_else(|| "not-empty".to_string());
        let url = format!("https://{}/{}", input.server, organization);

        let token = match input.token {
            Some(token) => token,
            None => match self.creds.get_credentials(&url).await? {
                Some(credentials) => credentials.token,
                None => return Err(InputError::MissingCredentials { url }.into()),
            },
        };

        let target = AzureRepoTarget {
            host: input.server,
            organization,
            repo_id: input.repo_id,
            project: input.project,
        };
        let spec = CreatePullRequest {
            source_ref_name: source_ref,
            target_ref_name: target_ref,
            title: input.title,
            description: input.description.unwrap_or_default(),
        };

        let pr = self
            .azure
            .create_pull_request(&target, &token, &spec, input.supports_iterations)
            .await?;
        info!("Created pull request {}", pr.pull_request_id);

        // Auto-complete can't be set at creation time, so the PR has to be
        // updated afterwards. If that second call fails the PR still exists;
        // report the failure and keep the id.
        if input.auto_complete {
            let patch = UpdatePullRequest {
                auto_complete_set_by: pr.created_by.clone(),
                // If you fire-and-forget the PR by setting auto-complete, you
                // don't want the source branch to stick around afterwards.
                completion_options: CompletionOptions {
                    delete_source_branch: true,
                },
            };
            if let Err(err) = self
                .azure
                .update_pull_request(&target, &token, pr.pull_request_id, &patch)
                .await
            {
                warn!(
                    "Pull request {} was created but enabling auto-complete failed: {:#}",
                    pr.pull_request_id, err
                );
            }
        }

        Ok(PullRequestOutput {
            pull_request_id: pr.pull_request_id,
        })
    }
}

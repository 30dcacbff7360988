use anyhow::Result;
use serde::Deserialize;

use crate::App;
use crate::actions::helpers;
use crate::auth::CredentialsProvider;
use crate::ops::azure::AzureDevOpsOps;
use crate::ops::git::AuthorInfo;
use crate::ops::git::GitOps;
use crate::paths::resolve_safe_child_path;

/// Input for `azure:repo:push`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushInput {
    /// The branch to checkout to.
    #[serde(default)]
    pub branch: Option<String>,
    /// The subdirectory of the workspace containing the repository.
    #[serde(default)]
    pub source_path: Option<String>,
    /// Sets the commit message on the repository.
    #[serde(default)]
    pub git_commit_message: Option<String>,
    /// Sets the author name for the commit.
    #[serde(default)]
    pub git_author_name: Option<String>,
    /// Sets the author email for the commit.
    #[serde(default)]
    pub git_author_email: Option<String>,
    /// The token to use for authorization.
    #[serde(default)]
    pub token: Option<String>,
}

impl<G: GitOps, A: AzureDevOpsOps, P: CredentialsProvider> App<G, A, P> {
    /// Push the content in the workspace to a remote Azure repository.
    pub async fn cmd_push(&self, input: PushInput) -> Result<()> {
        let source_dir = resolve_safe_child_path(
            &self.workspace,
            input.source_path.as_deref().unwrap_or("./"),
        )?;

        let author = AuthorInfo::resolve(
            input
                .git_author_name
                .or_else(|| self.config.default_author_name.clone()),
            input
                .git_author_email
                .or_else(|| self.config.default_author_email.clone()),
        );
        let commit_message = input
            .git_commit_message
            .or_else(|| self.config.default_commit_message.clone())
            .unwrap_or_else(|| "Initial commit".to_string());
        let branch = input.branch.as_deref().unwrap_or("scaffolder");

        helpers::commit_and_push_branch(
            &self.git,
            &self.creds,
            &source_dir,
            "origin",
            &commit_message,
            &author,
            branch,
            input.token.as_deref(),
        )
        .await
    }
}

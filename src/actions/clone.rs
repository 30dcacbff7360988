use anyhow::Result;
use serde::Deserialize;
use tracing::info;

use crate::App;
use crate::actions::default_server;
use crate::actions::helpers;
use crate::auth::CredentialsProvider;
use crate::auth::resolve_credentials;
use crate::ops::azure::AzureDevOpsOps;
use crate::ops::git::GitOps;
use crate::paths::resolve_safe_child_path;

/// Input for `azure:repo:clone`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneInput {
    /// The Git URL to the repository.
    pub remote_url: String,
    /// The branch to checkout to.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// The subdirectory of the workspace to clone the repository into.
    #[serde(default = "default_target_path")]
    pub target_path: String,
    /// The hostname of the Azure DevOps service.
    #[serde(default = "default_server")]
    pub server: String,
    /// The token to use for authorization.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_target_path() -> String {
    "./".to_string()
}

impl<G: GitOps, A: AzureDevOpsOps, P: CredentialsProvider> App<G, A, P> {
    /// Clone an Azure repository into the workspace directory.
    pub async fn cmd_clone(&self, input: CloneInput) -> Result<()> {
        let output_dir = resolve_safe_child_path(&self.workspace, &input.target_path)?;

        let auth =
            resolve_credentials(&self.creds, &input.remote_url, input.token.as_deref()).await?;

        helpers::clone_repo(
            &self.git,
            &auth,
            &output_dir,
            &input.remote_url,
            &input.branch,
            "origin",
        )
        .await?;
        info!(
            "Cloned {} into {}",
            input.remote_url,
            output_dir.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::auth::Credential;
    use crate::auth::MockCredentialsProvider;
    use crate::auth::ProviderCredential;
    use crate::auth::TokenKind;
    use crate::config::Config;
    use crate::errors::InputError;
    use crate::ops::azure::MockAzureDevOpsOps;
    use crate::ops::git::MockGitOps;

    fn input(json: serde_json::Value) -> CloneInput {
        serde_json::from_value(json).unwrap()
    }

    fn app(
        git: MockGitOps,
        creds: MockCredentialsProvider,
    ) -> App<MockGitOps, MockAzureDevOpsOps, MockCredentialsProvider> {
        App::new(
            Config::default_for_tests(),
            git,
            MockAzureDevOpsOps::new(),
            creds,
            PathBuf::from("/ws"),
        )
    }

    #[test]
    fn test_input_defaults() {
        let input = input(serde_json::json!({
            "remoteUrl": "https://dev.azure.com/org/proj/_git/repo",
        }));
        assert_eq!(input.branch, "main");
        assert_eq!(input.target_path, "./");
        assert_eq!(input.server, "dev.azure.com");
        assert!(input.token.is_none());
    }

    #[tokio::test]
    async fn test_clone_checks_out_branch_and_adds_origin() {
        let mut git = MockGitOps::new();
        git.expect_clone_repo()
            .times(1)
            .withf(|url, dir, reference, auth| {
                url == "https://dev.azure.com/org/proj/_git/repo"
                    && dir == PathBuf::from("/ws/repo")
                    && reference == "feature/x"
                    && matches!(auth, Credential::Basic { password, .. } if password == "abc")
            })
            .returning(|_, _, _, _| Ok(()));
        git.expect_add_remote()
            .times(1)
            .withf(|_, remote, url| {
                remote == "origin" && url == "https://dev.azure.com/org/proj/_git/repo"
            })
            .returning(|_, _, _| Ok(()));

        let app = app(git, MockCredentialsProvider::new());
        app.cmd_clone(input(serde_json::json!({
            "remoteUrl": "https://dev.azure.com/org/proj/_git/repo",
            "branch": "feature/x",
            "targetPath": "repo",
            "token": "abc",
        })))
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_clone_resolves_credentials_for_the_remote_url() {
        let mut git = MockGitOps::new();
        git.expect_clone_repo()
            .times(1)
            .withf(|_, _, _, auth| {
                matches!(auth, Credential::Basic { password, .. } if password == "pat-token")
            })
            .returning(|_, _, _, _| Ok(()));
        git.expect_add_remote().returning(|_, _, _| Ok(()));

        let mut creds = MockCredentialsProvider::new();
        creds
            .expect_get_credentials()
            .times(1)
            .withf(|url| url == "https://azure.example.org/org/proj/_git/repo")
            .returning(|_| {
                Ok(Some(ProviderCredential {
                    kind: TokenKind::Pat,
                    token: "pat-token".to_string(),
                }))
            });

        // A credential stored for the remote's host is found even though
        // `server` is left at its default.
        let app = app(git, creds);
        app.cmd_clone(input(serde_json::json!({
            "remoteUrl": "https://azure.example.org/org/proj/_git/repo",
        })))
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_clone_without_any_token_fails_before_cloning() {
        let mut git = MockGitOps::new();
        git.expect_clone_repo().times(0);

        let mut creds = MockCredentialsProvider::new();
        creds
            .expect_get_credentials()
            .times(1)
            .withf(|url| url == "https://dev.azure.com/org/proj/_git/repo")
            .returning(|_| Ok(None));

        let app = app(git, creds);
        let err = app
            .cmd_clone(input(serde_json::json!({
                "remoteUrl": "https://dev.azure.com/org/proj/_git/repo",
            })))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::MissingCredentials { .. })
        ));
    }

    #[tokio::test]
    async fn test_clone_rejects_target_path_outside_workspace() {
        let mut git = MockGitOps::new();
        git.expect_clone_repo().times(0);

        let app = app(git, MockCredentialsProvider::new());
        let err = app
            .cmd_clone(input(serde_json::json!({
                "remoteUrl": "https://dev.azure.com/org/proj/_git/repo",
                "targetPath": "../outside",
                "token": "abc",
            })))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::PathOutsideWorkspace { .. })
        ));
    }
}

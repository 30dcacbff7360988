//! Shared git workflow helpers used by the clone and push actions.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::auth::Credential;
use crate::auth::CredentialsProvider;
use crate::auth::resolve_credentials;
use crate::errors::GitError;
use crate::ops::git::AuthorInfo;
use crate::ops::git::GitOps;

/// Clone `remote_url` into `dir` checked out on `branch`, and make sure
/// `remote` points at the URL afterwards.
pub async fn clone_repo(
    git: &impl GitOps,
    auth: &Credential,
    dir: &Path,
    remote_url: &str,
    branch: &str,
    remote: &str,
) -> Result<()> {
    git.clone_repo(remote_url, dir, branch, auth).await?;
    git.add_remote(dir, remote, remote_url).await?;
    Ok(())
}

/// Guarantee that the checkout in `dir` is on `branch`, creating the branch
/// from the current HEAD if it does not exist.
///
/// Idempotent: if the checkout is already on `branch` nothing is done. A
/// branch-already-exists failure from creation is swallowed (the existing
/// branch is reused); every other failure propagates unchanged.
pub async fn ensure_branch(git: &impl GitOps, dir: &Path, branch: &str) -> Result<()> {
    let current = git.current_branch(dir).await?;
    info!("Current branch is {}", current);
    info!("Target branch is {}", branch);
    if current == branch {
        return Ok(());
    }

    if let Err(err) = git.create_branch(dir, branch).await {
        match err.downcast_ref::<GitError>() {
            Some(GitError::BranchAlreadyExists(_)) => {}
            _ => return Err(err),
        }
    }

    git.checkout(dir, branch).await
}

/// Stage everything under `dir`, commit it with identical author and
/// committer, and push the result to `refs/heads/<branch>` on `remote`.
///
/// Credentials are resolved fresh for the remote's configured URL before any
/// mutation happens.
pub async fn commit_and_push_branch(
    git: &impl GitOps,
    creds: &impl CredentialsProvider,
    dir: &Path,
    remote: &str,
    commit_message: &str,
    author: &AuthorInfo,
    branch: &str,
    explicit_token: Option<&str>,
) -> Result<()> {
    let remote_url = git.remote_url(dir, remote).await?;
    let auth = resolve_credentials(creds, &remote_url, explicit_token).await?;

    ensure_branch(git, dir, branch).await?;
    git.add_all(dir).await?;
    git.commit(dir, commit_message, author).await?;
    git.push(dir, remote, &format!("refs/heads/{}", branch), &auth)
        .await
}

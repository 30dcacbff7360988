#![allow(async_fn_in_trait)]

use std::path::Path;

use anyhow::Result;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::instrument;

use crate::auth::Credential;
use crate::errors::GitError;

// -----------------------------------------------------------------------------
// Types

/// Commit authorship. The same identity is used for author and committer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorInfo {
    pub name: String,
    pub email: String,
}

impl AuthorInfo {
    /// Use provided info if possible, otherwise use fallbacks.
    pub fn resolve(name: Option<String>, email: Option<String>) -> Self {
        Self {
            name: name.unwrap_or_else(|| "Scaffolder".to_string()),
            email: email.unwrap_or_else(|| "scaffolder@backstage.io".to_string()),
        }
    }
}

// -----------------------------------------------------------------------------
// GitOps trait

/// Operations for interacting with a git working directory and its remotes.
///
/// The caller owns the working directory exclusively for the duration of an
/// operation; nothing here locks against concurrent use.
#[cfg_attr(test, automock)]
pub trait GitOps {
    /// Clone `url` into `dir`, checked out on `reference` with depth 1.
    async fn clone_repo(
        &self,
        url: &str,
        dir: &Path,
        reference: &str,
        auth: &Credential,
    ) -> Result<()>;

    /// Ensure `remote` exists in `dir` and points at `url`.
    async fn add_remote(&self, dir: &Path, remote: &str, url: &str) -> Result<()>;

    /// Read the URL configured for `remote`.
    async fn remote_url(&self, dir: &Path, remote: &str) -> Result<String>;

    async fn current_branch(&self, dir: &Path) -> Result<String>;

    /// Create `branch` at the current HEAD. Fails with
    /// [`GitError::BranchAlreadyExists`] if the branch is already present.
    async fn create_branch(&self, dir: &Path, branch: &str) -> Result<()>;

    async fn checkout(&self, dir: &Path, branch: &str) -> Result<()>;

    /// Stage all modified, added, and removed paths under `dir`.
    async fn add_all(&self, dir: &Path) -> Result<()>;

    async fn commit(&self, dir: &Path, message: &str, author: &AuthorInfo) -> Result<()>;

    /// Push HEAD to `remote_ref` (e.g. `refs/heads/feature`) on `remote`.
    async fn push(
        &self,
        dir: &Path,
        remote: &str,
        remote_ref: &str,
        auth: &Credential,
    ) -> Result<()>;
}

// -----------------------------------------------------------------------------
// RealGit

/// Real implementation that calls the git CLI
pub struct RealGit;

impl RealGit {
    async fn run(dir: &Path, args: &[&str]) -> Result<std::process::Output> {
        Command::new("git")
            .current_dir(dir)
            .args(args)
            .output()
            .await
            .map_err(|e| GitError::Io(e).into())
    }
}

impl GitOps for RealGit {
    #[instrument(skip_all, fields(url = url, reference = reference))]
    async fn clone_repo(
        &self,
        url: &str,
        dir: &Path,
        reference: &str,
        auth: &Credential,
    ) -> Result<()> {
        let header = format!("http.extraHeader={}", auth.http_extra_header());
        let dir_arg = dir.to_string_lossy().to_string();
        // No current_dir here: the target directory is created by the clone.
        let output = Command::new("git")
            .args([
                "-c",
                &header,
                "clone",
                "--depth",
                "1",
                "--branch",
                reference,
                url,
                &dir_arg,
            ])
            .output()
            .await
            .map_err(GitError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            if is_auth_failure(&stderr) {
                return Err(GitError::Unauthorized(stderr).into());
            }
            return Err(GitError::Command(stderr).into());
        }

        Ok(())
    }

    async fn add_remote(&self, dir: &Path, remote: &str, url: &str) -> Result<()> {
        let output = Self::run(dir, &["remote", "add", remote, url]).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            if !stderr.to_lowercase().contains("already exists") {
                return Err(GitError::Command(stderr).into());
            }
            // Remote exists; repoint it instead.
            let output = Self::run(dir, &["remote", "set-url", remote, url]).await?;
            if !output.status.success() {
                return Err(GitError::Command(
                    String::from_utf8_lossy(&output.stderr).to_string(),
                )
                .into());
            }
        }

        Ok(())
    }

    async fn remote_url(&self, dir: &Path, remote: &str) -> Result<String> {
        let key = format!("remote.{}.url", remote);
        let output = Self::run(dir, &["config", "--get", &key]).await?;

        if !output.status.success() {
            return Err(GitError::Command(format!("no remote {} configured", remote)).into());
        }

        Ok(String::from_utf8(output.stdout)?.trim().to_string())
    }

    async fn current_branch(&self, dir: &Path) -> Result<String> {
        let output = Self::run(dir, &["rev-parse", "--abbrev-ref", "HEAD"]).await?;

        if !output.status.success() {
            return Err(GitError::Command(
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
            .into());
        }

        Ok(String::from_utf8(output.stdout)?.trim().to_string())
    }

    async fn create_branch(&self, dir: &Path, branch: &str) -> Result<()> {
        let output = Self::run(dir, &["branch", branch]).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            if stderr.to_lowercase().contains("already exists") {
                return Err(GitError::BranchAlreadyExists(branch.to_string()).into());
            }
            return Err(GitError::Command(stderr).into());
        }

        Ok(())
    }

    async fn checkout(&self, dir: &Path, branch: &str) -> Result<()> {
        let output = Self::run(dir, &["checkout", branch]).await?;

        if !output.status.success() {
            return Err(GitError::Command(
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
            .into());
        }

        Ok(())
    }

    async fn add_all(&self, dir: &Path) -> Result<()> {
        let output = Self::run(dir, &["add", "-A"]).await?;

        if !output.status.success() {
            return Err(GitError::Command(
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
            .into());
        }

        Ok(())
    }

    async fn commit(&self, dir: &Path, message: &str, author: &AuthorInfo) -> Result<()> {
        // user.name/user.email config covers both author and committer,
        // keeping the two identical.
        let name = format!("user.name={}", author.name);
        let email = format!("user.email={}", author.email);
        let output = Self::run(dir, &["-c", &name, "-c", &email, "commit", "-m", message]).await?;

        if !output.status.success() {
            return Err(GitError::Command(
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
            .into());
        }

        Ok(())
    }

    #[instrument(skip_all, fields(remote = remote, remote_ref = remote_ref))]
    async fn push(
        &self,
        dir: &Path,
        remote: &str,
        remote_ref: &str,
        auth: &Credential,
    ) -> Result<()> {
        let header = format!("http.extraHeader={}", auth.http_extra_header());
        let refspec = format!("HEAD:{}", remote_ref);
        let output = Self::run(dir, &["-c", &header, "push", remote, &refspec]).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            if is_auth_failure(&stderr) {
                return Err(GitError::Unauthorized(stderr).into());
            }
            if stderr.contains("[rejected]") || stderr.contains("non-fast-forward") {
                return Err(GitError::NonFastForward(stderr).into());
            }
            return Err(GitError::Command(stderr).into());
        }

        Ok(())
    }
}

fn is_auth_failure(stderr: &str) -> bool {
    let stderr = stderr.to_lowercase();
    stderr.contains("authentication failed")
        || stderr.contains("could not read username")
        || stderr.contains("http 401")
        || stderr.contains("http 403")
}

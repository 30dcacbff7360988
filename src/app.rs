use std::path::PathBuf;

use crate::auth::CredentialsProvider;
use crate::config::Config;
use crate::ops::azure::AzureDevOpsOps;
use crate::ops::git::GitOps;

/// Shared state for the scaffolder actions: the ops implementations, the
/// credentials provider, optional authoring defaults, and the workspace root
/// all paths are confined to.
pub struct App<G: GitOps, A: AzureDevOpsOps, P: CredentialsProvider> {
    pub config: Config,
    pub git: G,
    pub azure: A,
    pub creds: P,
    pub workspace: PathBuf,
}

impl<G: GitOps, A: AzureDevOpsOps, P: CredentialsProvider> App<G, A, P> {
    pub fn new(config: Config, git: G, azure: A, creds: P, workspace: PathBuf) -> Self {
        Self {
            config,
            git,
            azure,
            creds,
            workspace,
        }
    }
}

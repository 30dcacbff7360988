#![allow(async_fn_in_trait)]

use anyhow::Result;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use serde::Serialize;
use tracing::instrument;

use super::azure_http::AzureCurlClient;

const API_VERSION: &str = "7.0";

// -----------------------------------------------------------------------------
// Wire types

/// Coordinates of a repository on an Azure DevOps service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureRepoTarget {
    pub host: String,
    pub organization: String,
    pub repo_id: String,
    pub project: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePullRequest {
    pub source_ref_name: String,
    pub target_ref_name: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_request_id: u64,
    pub created_by: IdentityRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePullRequest {
    pub auto_complete_set_by: IdentityRef,
    pub completion_options: CompletionOptions,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOptions {
    pub delete_source_branch: bool,
}

// -----------------------------------------------------------------------------
// AzureDevOpsOps trait

/// Pull request operations against the Azure DevOps REST API.
#[cfg_attr(test, automock)]
pub trait AzureDevOpsOps {
    async fn create_pull_request(
        &self,
        target: &AzureRepoTarget,
        token: &str,
        spec: &CreatePullRequest,
        supports_iterations: Option<bool>,
    ) -> Result<PullRequest>;

    async fn update_pull_request(
        &self,
        target: &AzureRepoTarget,
        token: &str,
        pull_request_id: u64,
        patch: &UpdatePullRequest,
    ) -> Result<()>;
}

// -----------------------------------------------------------------------------
// RealAzureDevOps

/// Real implementation that talks to the Azure DevOps REST API via curl
pub struct RealAzureDevOps;

fn pull_requests_url(target: &AzureRepoTarget) -> String {
    let mut url = format!("https://{}/{}", target.host, target.organization);
    if let Some(project) = &target.project {
        url.push('/');
        url.push_str(project);
    }
    url.push_str("/_apis/git/repositories/");
    url.push_str(&target.repo_id);
    url.push_str("/pullrequests");
    url
}

impl AzureDevOpsOps for RealAzureDevOps {
    #[instrument(skip_all, fields(repo_id = %target.repo_id))]
    async fn create_pull_request(
        &self,
        target: &AzureRepoTarget,
        token: &str,
        spec: &CreatePullRequest,
        supports_iterations: Option<bool>,
    ) -> Result<PullRequest> {
        let mut url = format!("{}?api-version={}", pull_requests_url(target), API_VERSION);
        if let Some(supports_iterations) = supports_iterations {
            url.push_str(&format!("&supportsIterations={}", supports_iterations));
        }

        let client = AzureCurlClient::new(token);
        let json_data = serde_json::to_string(spec)?;
        let response = client.post(&url, &json_data).await?;
        let pr: PullRequest = serde_json::from_str(&response)?;
        Ok(pr)
    }

    #[instrument(skip_all, fields(repo_id = %target.repo_id, pull_request_id = pull_request_id))]
    async fn update_pull_request(
        &self,
        target: &AzureRepoTarget,
        token: &str,
        pull_request_id: u64,
        patch: &UpdatePullRequest,
    ) -> Result<()> {
        let url = format!(
            "{}/{}?api-version={}",
            pull_requests_url(target),
            pull_request_id,
            API_VERSION
        );

        let client = AzureCurlClient::new(token);
        let json_data = serde_json::to_string(patch)?;
        client.patch(&url, &json_data).await?;
        Ok(())
    }
}

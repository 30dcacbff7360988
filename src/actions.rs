//! The scaffolder template actions and their JSON dispatch surface.
//!
//! Three actions are registered, keyed by the ids a template references:
//!
//! - [`ACTION_CLONE`] (`azure:repo:clone`): clone a repository into the workspace
//! - [`ACTION_PUSH`] (`azure:repo:push`): commit the workspace and push it to a remote branch
//! - [`ACTION_PULL_REQUEST`] (`azure:repo:pr`): open a pull request, optionally auto-completing
//!
//! Each action has a typed input struct mirroring its JSON schema;
//! [`App::run_action`] bridges from untyped JSON values for callers that
//! dispatch by id.

pub mod clone;
pub mod helpers;
pub mod pull_request;
pub mod push;

use anyhow::Result;
use serde::de::DeserializeOwned;

use crate::App;
use crate::auth::CredentialsProvider;
use crate::errors::InputError;
use crate::ops::azure::AzureDevOpsOps;
use crate::ops::git::GitOps;

pub const ACTION_CLONE: &str = "azure:repo:clone";
pub const ACTION_PUSH: &str = "azure:repo:push";
pub const ACTION_PULL_REQUEST: &str = "azure:repo:pr";

pub(crate) fn default_server() -> String {
    "dev.azure.com".to_string()
}

fn parse_input<T: DeserializeOwned>(input: serde_json::Value) -> Result<T> {
    serde_json::from_value(input).map_err(|err| InputError::Invalid(err.to_string()).into())
}

impl<G: GitOps, A: AzureDevOpsOps, P: CredentialsProvider> App<G, A, P> {
    /// Run the action registered under `id` with a JSON-shaped input,
    /// returning its JSON-shaped output.
    pub async fn run_action(&self, id: &str, input: serde_json::Value) -> Result<serde_json::Value> {
        match id {
            ACTION_CLONE => {
                self.cmd_clone(parse_input(input)?).await?;
                Ok(serde_json::json!({}))
            }
            ACTION_PUSH => {
                self.cmd_push(parse_input(input)?).await?;
                Ok(serde_json::json!({}))
            }
            ACTION_PULL_REQUEST => {
                let output = self.cmd_pr(parse_input(input)?).await?;
                Ok(serde_json::to_value(output)?)
            }
            _ => Err(InputError::Invalid(format!("unknown action id {}", id)).into()),
        }
    }
}

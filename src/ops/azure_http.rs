use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use tokio::process::Command;

/// HTTP client using curl for making Azure DevOps REST API requests
pub struct AzureCurlClient {
    auth_header: String,
}

#[derive(Debug, Deserialize)]
struct AzureApiError {
    message: String,
    #[serde(default, rename = "typeKey")]
    #[allow(dead_code)]
    type_key: Option<String>,
}

impl AzureCurlClient {
    /// Azure DevOps accepts a personal access token as the password half of
    /// basic auth with an empty username.
    pub fn new(token: &str) -> Self {
        let encoded = BASE64.encode(format!(":{}", token));
        Self {
            auth_header: format!("Authorization: Basic {}", encoded),
        }
    }

    /// Make a POST request
    pub async fn post(&self, url: &str, json_data: &str) -> Result<String> {
        self.send("POST", url, json_data).await
    }

    /// Make a PATCH request
    pub async fn patch(&self, url: &str, json_data: &str) -> Result<String> {
        self.send("PATCH", url, json_data).await
    }

    async fn send(&self, method: &str, url: &str, json_data: &str) -> Result<String> {
        let output = Command::new("curl")
            .args([
                "-s",
                "-w",
                "\n%{http_code}",
                "-X",
                method,
                "-H",
                &self.auth_header,
                "-H",
                "Accept: application/json",
                "-H",
                "Content-Type: application/json",
                "-H",
                "User-Agent: azrepo-cli",
                "-d",
                json_data,
                url,
            ])
            .output()
            .await
            .context("Failed to execute curl command")?;

        if !output.status.success() {
            bail!(
                "curl command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        self.parse_response(output.stdout)
    }

    /// Parse curl response with status code appended
    fn parse_response(&self, stdout: Vec<u8>) -> Result<String> {
        let output_str = String::from_utf8(stdout)?;
        let mut lines: Vec<&str> = output_str.rsplitn(2, '\n').collect();
        lines.reverse();

        let response = lines.first().unwrap_or(&"").to_string();
        let status_code = lines
            .get(1)
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(0);

        // Check HTTP status code
        if status_code >= 400 {
            // Try to parse error message from response
            if let Ok(error) = serde_json::from_str::<AzureApiError>(&response) {
                bail!("Azure DevOps API error: {}", error.message);
            }
            bail!(
                "Azure DevOps API request failed with status {}: {}",
                status_code,
                response
            );
        }

        Ok(response)
    }
}

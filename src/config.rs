use std::path::Path;

use anyhow::Result;

/// Optional scaffolder defaults for commit authoring.
///
/// Values come from git config keys so operators can set them once per
/// machine or per repository:
///
/// ```text
/// git config scaffolder.defaultAuthor.name "Platform Team"
/// git config scaffolder.defaultAuthor.email "platform@example.com"
/// git config scaffolder.defaultCommitMessage "Scaffolded changes"
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub default_author_name: Option<String>,
    pub default_author_email: Option<String>,
    pub default_commit_message: Option<String>,
}

impl Config {
    /// Load config from git config, with every key optional.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            default_author_name: read_git_config(dir, "scaffolder.defaultAuthor.name")?,
            default_author_email: read_git_config(dir, "scaffolder.defaultAuthor.email")?,
            default_commit_message: read_git_config(dir, "scaffolder.defaultCommitMessage")?,
        })
    }

    /// Create a config with explicit values (useful for tests)
    pub fn new(
        default_author_name: Option<String>,
        default_author_email: Option<String>,
        default_commit_message: Option<String>,
    ) -> Self {
        Self {
            default_author_name,
            default_author_email,
            default_commit_message,
        }
    }

    /// Default config for tests
    pub fn default_for_tests() -> Self {
        Self::default()
    }
}

fn read_git_config(dir: &Path, key: &str) -> Result<Option<String>> {
    let output = std::process::Command::new("git")
        .current_dir(dir)
        .args(["config", "--get", key])
        .output()?;

    // A missing key exits non-zero; that is not an error here.
    if !output.status.success() {
        return Ok(None);
    }

    let value = String::from_utf8(output.stdout)?.trim().to_string();
    Ok((!value.is_empty()).then_some(value))
}

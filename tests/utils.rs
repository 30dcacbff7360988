use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::level_filters::LevelFilter;

/// Run a git command in `dir`, discarding output.
pub async fn run_git(dir: &Path, args: &[&str]) -> anyhow::Result<()> {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;
    anyhow::ensure!(status.success(), "git {:?} failed", args);
    Ok(())
}

/// Run a git command in `dir` and capture stdout.
pub async fn git_stdout(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git").args(args).current_dir(dir).output().await?;
    anyhow::ensure!(output.status.success(), "git {:?} failed", args);
    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// Creates a working git repository in the given directory.
///
/// This initializes the repo on `main` and sets basic git config needed for
/// commits. The directory should already exist.
pub async fn create_git_repo(dir: &Path) -> anyhow::Result<()> {
    run_git(dir, &["init", "-b", "main"]).await?;
    run_git(dir, &["config", "user.name", "Test User"]).await?;
    run_git(dir, &["config", "user.email", "test@example.com"]).await?;
    Ok(())
}

/// Creates a bare repository seeded with a commit on `main` and one on
/// `feature/x`, and returns its `file://` URL.
pub async fn create_seeded_remote(root: &Path) -> anyhow::Result<String> {
    let bare = root.join("remote.git");
    tokio::fs::create_dir(&bare).await?;
    run_git(&bare, &["init", "--bare", "-b", "main"]).await?;

    let seed = root.join("seed");
    tokio::fs::create_dir(&seed).await?;
    create_git_repo(&seed).await?;
    tokio::fs::write(seed.join("README.md"), "seed\n").await?;
    run_git(&seed, &["add", "-A"]).await?;
    run_git(&seed, &["commit", "-m", "Seed"]).await?;

    let url = file_url(&bare);
    run_git(&seed, &["remote", "add", "origin", &url]).await?;
    run_git(&seed, &["push", "origin", "main"]).await?;

    run_git(&seed, &["checkout", "-b", "feature/x"]).await?;
    tokio::fs::write(seed.join("feature.txt"), "feature\n").await?;
    run_git(&seed, &["add", "-A"]).await?;
    run_git(&seed, &["commit", "-m", "Feature"]).await?;
    run_git(&seed, &["push", "origin", "feature/x"]).await?;

    Ok(url)
}

pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

pub fn setup_logging() -> anyhow::Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    tracing_subscriber::fmt()
        .with_timer(timer)
        .with_env_filter(filter)
        .init();
    Ok(())
}

pub enum TestDir {
    Temp(tempfile::TempDir),
    Kept(PathBuf),
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;

        if std::env::var("DEBUG_TESTS").is_ok() {
            let path = temp_dir.keep();
            eprintln!("Test directory kept at: {}", path.display());
            Ok(TestDir::Kept(path))
        } else {
            Ok(TestDir::Temp(temp_dir))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            TestDir::Temp(t) => t.path(),
            TestDir::Kept(p) => p.as_path(),
        }
    }
}

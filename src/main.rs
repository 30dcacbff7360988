use std::path::PathBuf;

use anyhow::Result;
use azrepo::App;
use azrepo::Config;
use azrepo::actions::clone::CloneInput;
use azrepo::actions::pull_request::PullRequestInput;
use azrepo::actions::push::PushInput;
use azrepo::auth::DefaultCredentialsProvider;
use azrepo::ops::azure::RealAzureDevOps;
use azrepo::ops::git::RealGit;
use clap::Parser;
use clap::Subcommand;
use colored::Colorize;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "azrepo")]
#[command(about = "Scaffolder actions for Azure Repos: clone, push, and open pull requests", long_about = None)]
pub struct Cli {
    /// Workspace root that all paths are resolved within
    #[arg(long, default_value = ".", global = true)]
    pub workspace: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clone an Azure repository into the workspace directory
    Clone {
        /// The Git URL to the repository
        #[arg(long)]
        remote_url: String,
        /// The branch to checkout to
        #[arg(long, default_value = "main")]
        branch: String,
        /// The subdirectory of the workspace to clone into
        #[arg(long, default_value = "./")]
        target_path: String,
        /// The hostname of the Azure DevOps service
        #[arg(long, default_value = "dev.azure.com")]
        server: String,
        /// The token to use for authorization
        #[arg(long)]
        token: Option<String>,
    },
    /// Push the content in the workspace to a remote Azure repository
    Push {
        /// The branch to checkout to
        #[arg(long)]
        branch: Option<String>,
        /// The subdirectory of the workspace containing the repository
        #[arg(long)]
        source_path: Option<String>,
        /// The commit message
        #[arg(short, long)]
        message: Option<String>,
        /// The author name for the commit
        #[arg(long)]
        author_name: Option<String>,
        /// The author email for the commit
        #[arg(long)]
        author_email: Option<String>,
        /// The token to use for authorization
        #[arg(long)]
        token: Option<String>,
    },
    /// Create a pull request to a repository in Azure DevOps
    Pr {
        /// The name of the organization in Azure DevOps
        #[arg(long)]
        organization: Option<String>,
        /// The branch to merge into the target
        #[arg(long)]
        source_branch: Option<String>,
        /// The branch to merge into
        #[arg(long)]
        target_branch: Option<String>,
        /// The title of the pull request
        #[arg(long)]
        title: String,
        /// The description of the pull request
        #[arg(long)]
        description: Option<String>,
        /// Repo ID of the pull request
        #[arg(long)]
        repo_id: String,
        /// The project in Azure DevOps
        #[arg(long)]
        project: Option<String>,
        /// Whether the PR supports iterations
        #[arg(long)]
        supports_iterations: bool,
        /// The hostname of the Azure DevOps service
        #[arg(long, default_value = "dev.azure.com")]
        server: String,
        /// The token to use for authorization
        #[arg(long)]
        token: Option<String>,
        /// Enable auto-completion of the pull request once policies are met
        #[arg(long)]
        auto_complete: bool,
    },
}

fn setup_logging() -> Result<()> {
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

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cli = Cli::parse();
    let workspace = cli.workspace.canonicalize()?;

    let app = App::new(
        Config::load(&workspace)?,
        RealGit,
        RealAzureDevOps,
        DefaultCredentialsProvider::from_env(),
        workspace,
    );

    match cli.command {
        Commands::Clone {
            remote_url,
            branch,
            target_path,
            server,
            token,
        } => {
            app.cmd_clone(CloneInput {
                remote_url,
                branch,
                target_path,
                server,
                token,
            })
            .await?;
            println!("{}", "Repository cloned".green());
        }
        Commands::Push {
            branch,
            source_path,
            message,
            author_name,
            author_email,
            token,
        } => {
            app.cmd_push(PushInput {
                branch,
                source_path,
                git_commit_message: message,
                git_author_name: author_name,
                git_author_email: author_email,
                token,
            })
            .await?;
            println!("{}", "Changes pushed".green());
        }
        Commands::Pr {
            organization,
            source_branch,
            target_branch,
            title,
            description,
            repo_id,
            project,
            supports_iterations,
            server,
            token,
            auto_complete,
        } => {
            let output = app
                .cmd_pr(PullRequestInput {
                    organization,
                    source_branch,
                    target_branch,
                    title,
                    description,
                    repo_id,
                    project,
                    supports_iterations: supports_iterations.then_some(true),
                    server,
                    token,
                    auto_complete,
                })
                .await?;
            println!(
                "{} {}",
                "Created pull request".green(),
                output.pull_request_id
            );
        }
    }

    Ok(())
}

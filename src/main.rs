use anyhow::{bail, Context};
use clap::Parser;
use spec_tracker::{
    read_config, run, GitHubSource, GitHubSubmitter, GitWorkspace, RunOptions, Submission,
    TrackerConfig,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_CONFIG: &str = "spec-tracker.json";

/// Spec Tracker - keeps a catalog of third-party API specs up to date
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON configuration file (optional)
    #[arg(short, long, env = "SPEC_TRACKER_CONFIG", default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Catalog file, overrides the config file
    #[arg(long, env = "SPEC_TRACKER_CATALOG")]
    catalog: Option<PathBuf>,

    /// Directory specs are written to, overrides the config file
    #[arg(long, env = "SPEC_TRACKER_SPECS_DIR")]
    specs_dir: Option<PathBuf>,

    /// GitHub token used for API requests and pull requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Only check for updates; write nothing
    #[arg(long)]
    dry_run: bool,

    /// Commit, push, and open a pull request for published updates
    #[arg(long)]
    submit: bool,

    /// Repository (owner/repo) to open the pull request against
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Branch to commit updates on
    #[arg(long)]
    branch: Option<String>,

    /// Base branch for the pull request
    #[arg(long)]
    base_branch: Option<String>,

    /// Comma-separated vendor/api keys to restrict the run to
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// Write a JSON run report to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Exit with an error when any entry fails
    #[arg(long)]
    strict: bool,
}

impl Args {
    fn apply(&self, config: &mut TrackerConfig) {
        if let Some(catalog) = &self.catalog {
            config.catalog_path = catalog.clone();
        }
        if let Some(specs_dir) = &self.specs_dir {
            config.specs_dir = specs_dir.clone();
        }
        if let Some(summary) = &self.summary {
            config.summary_path = Some(summary.clone());
        }
        if let Some(repository) = &self.repository {
            config.submission.repository = Some(repository.clone());
        }
        if let Some(base_branch) = &self.base_branch {
            config.submission.base_branch = base_branch.clone();
        }
        config.github.token = self.token.clone();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse CLI arguments
    let args = Args::parse();

    let mut config = read_config(&args.config)
        .await
        .with_context(|| format!("reading {}", args.config.display()))?
        .unwrap_or_default();
    args.apply(&mut config);

    let source = GitHubSource::new(&config.github)?;

    let options = RunOptions {
        dry_run: args.dry_run,
        only: args.only.clone(),
        branch: args.branch.clone(),
    };

    let submitter = if args.submit && !args.dry_run {
        let Some((owner, repo)) = config.submission.repository_parts()? else {
            bail!("--submit requires --repository or GITHUB_REPOSITORY");
        };
        Some(GitHubSubmitter::new(
            &config.github,
            owner,
            repo,
            config.submission.labels.clone(),
        )?)
    } else {
        None
    };
    let git = GitWorkspace::new(std::env::current_dir()?);

    let submission = submitter.as_ref().map(|submitter| Submission {
        submitter,
        git: Some(&git),
    });

    let report = run(&config, &options, &source, submission).await?;

    if let Some(url) = &report.change_url {
        info!(url = %url, "Change request ready");
    }
    for problem in &report.errors {
        tracing::error!("{}", problem);
    }

    if args.strict && (report.failed() > 0 || !report.errors.is_empty()) {
        bail!(
            "{} entries failed, {} end-of-run errors",
            report.failed(),
            report.errors.len()
        );
    }

    Ok(())
}

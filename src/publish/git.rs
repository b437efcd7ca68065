use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GitError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
}

/// A local git checkout that published specs are committed in
#[derive(Debug, Clone)]
pub struct GitWorkspace {
    root: PathBuf,
}

impl GitWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Run a git command and return its trimmed stdout
    async fn git(&self, args: &[&str]) -> Result<String, GitError> {
        debug!(args = ?args, "git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(GitError::CommandFailed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    /// Create or reset `branch` at the current HEAD and check it out
    pub async fn checkout_branch(&self, branch: &str) -> Result<(), GitError> {
        self.git(&["checkout", "-B", branch]).await?;
        Ok(())
    }

    pub async fn stage(&self, paths: &[&Path]) -> Result<(), GitError> {
        let mut args = vec!["add", "--"];
        let paths: Vec<String> = paths.iter().map(|p| p.to_string_lossy().to_string()).collect();
        args.extend(paths.iter().map(String::as_str));
        self.git(&args).await?;
        Ok(())
    }

    /// Whether the index differs from HEAD
    pub async fn has_staged_changes(&self) -> Result<bool, GitError> {
        let output = Command::new("git")
            .args(["diff", "--cached", "--quiet"])
            .current_dir(&self.root)
            .output()
            .await?;

        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(GitError::CommandFailed {
                command: "diff --cached --quiet".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    pub async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.git(&["commit", "-m", message]).await?;
        Ok(())
    }

    pub async fn push(&self, branch: &str) -> Result<(), GitError> {
        self.git(&["push", "--force-with-lease", "-u", "origin", branch])
            .await?;
        info!(branch = %branch, "Pushed branch");
        Ok(())
    }

    /// Branch, stage, commit, and push. Returns false when nothing was staged.
    pub async fn commit_and_push(
        &self,
        branch: &str,
        paths: &[&Path],
        message: &str,
    ) -> Result<bool, GitError> {
        self.checkout_branch(branch).await?;
        self.stage(paths).await?;

        if !self.has_staged_changes().await? {
            info!(branch = %branch, "Nothing to commit");
            return Ok(false);
        }

        self.commit(message).await?;
        self.push(branch).await?;
        Ok(true)
    }
}

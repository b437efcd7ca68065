//! Discovery of numbered rollout directories.
//!
//! Some vendors publish specs as `<prefix>/Rollouts/<n>/<file>` instead of
//! tagging releases. The newest rollout is the highest numeric directory.

use crate::remote::{RemoteError, RemoteSource};
use thiserror::Error;
use tracing::debug;

const ROLLOUTS_SEGMENT: &str = "/Rollouts/";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RolloutError {
    #[error("No numbered rollouts found under {0}")]
    NoRolloutsFound(String),

    #[error("Spec path '{0}' does not contain a /Rollouts/<number>/ segment")]
    InvalidPath(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// A spec path split around its rollout number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloutPath {
    /// Everything up to and including `Rollouts`, e.g. `Specs/Rollouts`
    pub base_path: String,
    /// The number segment as written in the path
    pub rollout: String,
    /// Everything after the number segment, e.g. `openapi.yaml`
    pub suffix: String,
}

impl RolloutPath {
    /// Spec path pointing at another rollout directory
    pub fn with_rollout(&self, rollout: &str) -> String {
        build_rollout_path(&self.base_path, rollout, &self.suffix)
    }
}

/// A numbered rollout directory as it appears in a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollout {
    pub number: u64,
    /// Directory name exactly as listed, e.g. `006`
    pub name: String,
}

/// Split `prefix/Rollouts/<n>/suffix` into its parts
pub fn split_rollout_path(spec_path: &str) -> Result<RolloutPath, RolloutError> {
    let invalid = || RolloutError::InvalidPath(spec_path.to_string());

    let index = spec_path.find(ROLLOUTS_SEGMENT).ok_or_else(invalid)?;
    let prefix = &spec_path[..index];
    let remainder = &spec_path[index + ROLLOUTS_SEGMENT.len()..];

    let (rollout, suffix) = remainder.split_once('/').ok_or_else(invalid)?;
    if rollout.is_empty() || suffix.is_empty() {
        return Err(invalid());
    }

    Ok(RolloutPath {
        base_path: format!("{}/Rollouts", prefix),
        rollout: rollout.to_string(),
        suffix: suffix.to_string(),
    })
}

/// `{base_path}/{rollout}/{suffix}`
pub fn build_rollout_path(base_path: &str, rollout: &str, suffix: &str) -> String {
    format!("{}/{}/{}", base_path.trim_end_matches('/'), rollout, suffix)
}

/// Parse a directory name made only of ASCII digits
fn rollout_number(name: &str) -> Option<u64> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Highest numbered directory in a listing.
///
/// Ties on the number (`6` and `006`) keep the first listed name.
pub fn highest_rollout<I, S>(names: I) -> Option<Rollout>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut best: Option<Rollout> = None;

    for name in names {
        let name = name.as_ref();
        let Some(number) = rollout_number(name) else {
            continue;
        };
        if best.as_ref().map_or(true, |b| number > b.number) {
            best = Some(Rollout {
                number,
                name: name.to_string(),
            });
        }
    }

    best
}

/// Find the newest rollout directly under `base_path`
pub async fn latest_rollout(
    source: &dyn RemoteSource,
    owner: &str,
    repo: &str,
    branch: &str,
    base_path: &str,
) -> Result<Rollout, RolloutError> {
    let names = source.list_directory(owner, repo, branch, base_path).await?;
    debug!(base_path = %base_path, entries = names.len(), "Listed rollouts");

    highest_rollout(&names).ok_or_else(|| RolloutError::NoRolloutsFound(base_path.to_string()))
}

use crate::reconciliation::{ErrorKind, UpdateType};
use serde::Serialize;

/// Options for one tracker run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Discover and classify only; write nothing
    pub dry_run: bool,
    /// Restrict the run to these `vendor/api` keys
    pub only: Vec<String>,
    /// Branch for the change request; `{prefix}/{date}` when unset
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryStatus {
    NoChange,
    Updated,
    WouldUpdate,
    Failed,
}

/// Per-entry line of the run report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryReport {
    pub entry: String,
    pub status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_type: Option<UpdateType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EntryReport {
    pub fn new(entry: String, status: EntryStatus) -> Self {
        Self {
            entry,
            status,
            update_type: None,
            old_version: None,
            new_version: None,
            api_version: None,
            path: None,
            error_kind: None,
            error: None,
        }
    }
}

/// Summary of a tracker run, in catalog order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub started_at: String,
    pub finished_at: String,
    pub dry_run: bool,
    pub entries: Vec<EntryReport>,
    pub catalog_saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_url: Option<String>,
    /// End-of-run problems (catalog save, git, submission)
    pub errors: Vec<String>,
}

impl RunReport {
    fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    pub fn updated(&self) -> usize {
        self.count(EntryStatus::Updated) + self.count(EntryStatus::WouldUpdate)
    }

    pub fn unchanged(&self) -> usize {
        self.count(EntryStatus::NoChange)
    }

    pub fn failed(&self) -> usize {
        self.count(EntryStatus::Failed)
    }
}

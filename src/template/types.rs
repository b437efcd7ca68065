use crate::reconciliation::{ErrorKind, UpdateResult, UpdateType};
use serde::Serialize;

/// One published update, as shown in a change request
#[derive(Debug, Clone, Serialize)]
pub struct ChangeItem {
    pub name: String,
    pub vendor: String,
    pub api: String,
    pub old_version: String,
    pub new_version: String,
    pub api_version: String,
    pub update_type: UpdateType,
    pub local_path: String,
    pub download_url: String,
}

impl From<&UpdateResult> for ChangeItem {
    fn from(update: &UpdateResult) -> Self {
        Self {
            name: update.name.clone(),
            vendor: update.vendor.clone(),
            api: update.api.clone(),
            old_version: if update.old_version.is_empty() {
                "none".to_string()
            } else {
                update.old_version.clone()
            },
            new_version: update.new_version.clone(),
            api_version: update.api_version.clone(),
            update_type: update.update_type,
            local_path: format!("{}{}", update.local_path, update.file_name),
            download_url: update.download_url.clone(),
        }
    }
}

/// An entry that could not be reconciled in this run
#[derive(Debug, Clone, Serialize)]
pub struct FailureItem {
    pub entry: String,
    pub kind: ErrorKind,
    pub reason: String,
}

/// Context for change request templates
/// Placeholders: {{date}}, {{update_count}}, {{failure_count}}, {{updates}}, {{failures}}
#[derive(Debug, Clone, Serialize)]
pub struct ChangeContext {
    pub date: String,
    pub update_count: usize,
    pub failure_count: usize,
    pub updates: Vec<ChangeItem>,
    pub failures: Vec<FailureItem>,
}

impl ChangeContext {
    pub fn new(updates: Vec<ChangeItem>, failures: Vec<FailureItem>) -> Self {
        Self {
            date: crate::utils::today(),
            update_count: updates.len(),
            failure_count: failures.len(),
            updates,
            failures,
        }
    }
}

use serde::Deserialize;

/// Raw spec text plus the URL it was fetched from.
/// Lives only for the duration of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    pub content: String,
    pub url: String,
}

/// Latest release of a repository
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseInfo {
    #[serde(rename = "tag_name")]
    pub tag: String,
    #[serde(rename = "draft", default)]
    pub is_draft: bool,
    #[serde(rename = "prerelease", default)]
    pub is_prerelease: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseInfo {
    /// Find an attached asset by exact name
    pub fn asset(&self, name: &str) -> Option<&ReleaseAsset> {
        if name.is_empty() {
            return None;
        }
        self.assets.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
}

/// One item of a GitHub contents listing
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentEntry {
    pub name: String,
}

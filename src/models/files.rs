use super::Unmapped;
use chrono::serde::ts_seconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModFile {
    pub file_id: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "version", default)]
    pub file_version: Option<String>,
    #[serde(default)]
    pub mod_version: Option<String>,
    pub file_name: String,
    #[serde(rename = "category_id")]
    pub category: FileCategory,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(rename = "size_kb", default)]
    pub size_in_kilobytes: u64,
    #[serde(default)]
    pub size_in_bytes: Option<u64>,
    #[serde(rename = "uploaded_timestamp", with = "ts_seconds")]
    pub uploaded: DateTime<Utc>,
    #[serde(rename = "external_virus_scan_url", default)]
    pub external_virus_scan_url: Option<String>,
    #[serde(rename = "changelog_html", default)]
    pub changelog: Option<String>,
    #[serde(default)]
    pub content_preview_link: Option<String>,
    #[serde(flatten)]
    pub unmapped: Unmapped,
}

impl ModFile {
    /// The content preview link, if the API sent a usable one.
    pub fn content_preview_url(&self) -> Option<Url> {
        self.content_preview_link
            .as_deref()
            .and_then(|s| Url::parse(s).ok())
    }
}

/// A [`ModFile`] returned by an MD5 search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModFileWithHash {
    pub md5: String,
    #[serde(flatten)]
    pub file: ModFile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModFileList {
    #[serde(default)]
    pub files: Vec<ModFile>,
    #[serde(default)]
    pub file_updates: Vec<ModFileUpdate>,
    #[serde(flatten)]
    pub unmapped: Unmapped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModFileUpdate {
    pub old_file_id: u32,
    pub old_file_name: String,
    pub new_file_id: u32,
    pub new_file_name: String,
    #[serde(rename = "uploaded_timestamp", with = "ts_seconds")]
    pub uploaded: DateTime<Utc>,
    #[serde(flatten)]
    pub unmapped: Unmapped,
}

/// File category, sent by the API as a numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FileCategory {
    Main = 1,
    Update = 2,
    Optional = 3,
    Old = 4,
    Miscellaneous = 5,
    Deleted = 6,
    Archived = 7,
}

impl FileCategory {
    /// The value accepted by the file list's `category` filter.
    /// Deleted files can't be filtered on.
    pub fn filter_name(self) -> Option<&'static str> {
        match self {
            FileCategory::Main => Some("main"),
            FileCategory::Update => Some("update"),
            FileCategory::Optional => Some("optional"),
            FileCategory::Old => Some("old_version"),
            FileCategory::Miscellaneous => Some("miscellaneous"),
            FileCategory::Archived => Some("archived"),
            FileCategory::Deleted => None,
        }
    }
}

impl TryFrom<u8> for FileCategory {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Ok(match id {
            1 => FileCategory::Main,
            2 => FileCategory::Update,
            3 => FileCategory::Optional,
            4 => FileCategory::Old,
            5 => FileCategory::Miscellaneous,
            6 => FileCategory::Deleted,
            7 => FileCategory::Archived,
            other => return Err(format!("unknown file category id {other}")),
        })
    }
}

impl From<FileCategory> for u8 {
    fn from(category: FileCategory) -> u8 {
        category as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModFileDownloadLink {
    #[serde(rename = "name")]
    pub cdn_name: String,
    #[serde(rename = "short_name")]
    pub cdn_short_name: String,
    #[serde(rename = "URI", alias = "uri")]
    pub uri: Url,
}

/// Key and expiry from an `nxm://` link, needed by non-premium accounts to
/// request download links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NxmKey {
    pub key: String,
    pub expires: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPreview {
    #[serde(default)]
    pub children: Vec<ContentPreviewEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPreviewEntry {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: ContentPreviewEntryType,
    /// Human-readable size such as `"1.2 kB"`; absent for directories.
    #[serde(rename = "size", default)]
    pub file_size: Option<String>,
    #[serde(default)]
    pub children: Vec<ContentPreviewEntry>,
    #[serde(flatten)]
    pub unmapped: Unmapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentPreviewEntryType {
    File,
    Directory,
}

use super::files::ModFileWithHash;
use super::Unmapped;
use chrono::serde::{ts_seconds, ts_seconds_option};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mod {
    pub mod_id: u32,
    pub game_id: u32,
    pub domain_name: String,
    /// Missing while a mod is unpublished or hidden.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub category_id: u32,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(rename = "created_timestamp", with = "ts_seconds")]
    pub created: DateTime<Utc>,
    #[serde(rename = "updated_timestamp", with = "ts_seconds")]
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(rename = "uploaded_users_profile_url", default)]
    pub uploaded_by_profile_url: Option<String>,
    #[serde(default)]
    pub contains_adult_content: bool,
    #[serde(default)]
    pub status: ModStatus,
    #[serde(rename = "available", default)]
    pub is_available: bool,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub allow_rating: bool,
    /// Only present when the request was authenticated.
    #[serde(default)]
    pub endorsement: Option<EndorsementRef>,
    #[serde(default)]
    pub endorsement_count: u64,
    #[serde(flatten)]
    pub unmapped: Unmapped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModStatus {
    NotPublished,
    Published,
    Hidden,
    /// Deleted by its author.
    Wastebinned,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModUpdate {
    pub mod_id: u32,
    #[serde(with = "ts_seconds")]
    pub latest_file_update: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    pub latest_mod_activity: DateTime<Utc>,
    #[serde(flatten)]
    pub unmapped: Unmapped,
}

/// A mod matched by the MD5 hash of one of its files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModHashResult {
    #[serde(rename = "mod")]
    pub mod_info: Mod,
    #[serde(rename = "file_details")]
    pub file: ModFileWithHash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub member_id: u32,
    #[serde(default)]
    pub member_group_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndorsementRef {
    #[serde(rename = "endorse_status")]
    pub status: EndorsementStatus,
    #[serde(with = "ts_seconds_option", default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(flatten)]
    pub unmapped: Unmapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndorsementStatus {
    #[serde(alias = "undecided")]
    Undecided,
    #[serde(alias = "abstained")]
    Abstained,
    #[serde(alias = "endorsed")]
    Endorsed,
}

/// Window for [`crate::endpoints::ModsEndpoint::get_updated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePeriod {
    Day,
    Week,
    Month,
}

impl UpdatePeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdatePeriod::Day => "1d",
            UpdatePeriod::Week => "1w",
            UpdatePeriod::Month => "1m",
        }
    }
}

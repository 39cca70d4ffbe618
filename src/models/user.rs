use super::mods::EndorsementStatus;
use super::Unmapped;
use chrono::serde::ts_seconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The account behind the API key, as returned by key validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: u32,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub is_supporter: bool,
    #[serde(flatten)]
    pub unmapped: Unmapped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEndorsement {
    pub mod_id: u32,
    pub domain_name: String,
    #[serde(with = "ts_seconds")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub version: Option<String>,
    pub status: EndorsementStatus,
    #[serde(flatten)]
    pub unmapped: Unmapped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTrackedMod {
    pub mod_id: u32,
    pub domain_name: String,
}

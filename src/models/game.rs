use super::encoding::false_as_none;
use super::Unmapped;
use chrono::serde::ts_seconds_option;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: u32,
    pub domain_name: String,
    pub name: String,
    #[serde(rename = "nexusmods_url", default)]
    pub mods_url: Option<String>,
    #[serde(default)]
    pub forum_url: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub mods: u64,
    #[serde(rename = "file_count", default)]
    pub mod_files: u64,
    #[serde(default)]
    pub downloads: u64,
    #[serde(rename = "file_views", default)]
    pub views: u64,
    #[serde(default)]
    pub authors: u64,
    #[serde(rename = "file_endorsements", default)]
    pub endorsements: u64,
    #[serde(default)]
    pub categories: Vec<GameCategory>,
    /// `None` for unapproved games.
    #[serde(with = "ts_seconds_option", default)]
    pub approved_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub unmapped: Unmapped,
}

impl Game {
    pub fn is_approved(&self) -> bool {
        self.approved_date.is_some()
    }

    /// Replace the API's placeholder values with `None`: unapproved games
    /// carry an approval date of `1` and root categories a parent of `0`.
    pub(crate) fn normalize(&mut self) {
        if self.approved_date.is_some_and(|d| d.year() <= 1970) {
            self.approved_date = None;
        }
        for category in &mut self.categories {
            if category.parent_category == Some(0) {
                category.parent_category = None;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCategory {
    #[serde(rename = "category_id")]
    pub id: u32,
    pub name: String,
    #[serde(default, deserialize_with = "false_as_none::deserialize")]
    pub parent_category: Option<u32>,
    #[serde(flatten)]
    pub unmapped: Unmapped,
}

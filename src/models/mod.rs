//! Typed records returned by the API.
//!
//! Fields the API sends but these types don't name are kept in `unmapped`.

mod encoding;
mod files;
mod game;
mod mods;
mod user;

pub use files::{
    ContentPreview, ContentPreviewEntry, ContentPreviewEntryType, FileCategory, ModFile,
    ModFileDownloadLink, ModFileList, ModFileUpdate, ModFileWithHash, NxmKey,
};
pub use game::{Game, GameCategory};
pub use mods::{
    EndorsementRef, EndorsementStatus, Mod, ModHashResult, ModStatus, ModUpdate, UpdatePeriod,
    UserRef,
};
pub use user::{User, UserEndorsement, UserTrackedMod};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Unmapped = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub id: u32,
    pub name: String,
    #[serde(rename = "primary_colour")]
    pub primary_color: String,
    #[serde(rename = "secondary_colour")]
    pub secondary_color: String,
    #[serde(rename = "darker_colour")]
    pub darker_color: String,
}

/// Per-version changelog entries of a mod, keyed by version.
pub type ChangeLogs = BTreeMap<String, Vec<String>>;

use crate::client::NexusClient;
use crate::error::Result;
use crate::http::encode_path_segment;
use crate::models::{ChangeLogs, Mod, ModHashResult, ModUpdate, UpdatePeriod};
use reqwest::Method;
use serde_json::json;

pub struct ModsEndpoint<'a> {
    client: &'a NexusClient,
}

impl<'a> ModsEndpoint<'a> {
    pub(crate) fn new(client: &'a NexusClient) -> Self {
        Self { client }
    }

    /// Mods updated within `period`.
    pub async fn get_updated(&self, domain_name: &str, period: UpdatePeriod) -> Result<Vec<ModUpdate>> {
        let request = self
            .client
            .request(Method::GET, &game_path(domain_name, "mods/updated.json"))?
            .query("period", period.as_str());
        self.client.send_json(request).await
    }

    pub async fn get_latest_added(&self, domain_name: &str) -> Result<Vec<Mod>> {
        self.list(domain_name, "mods/latest_added.json").await
    }

    pub async fn get_latest_updated(&self, domain_name: &str) -> Result<Vec<Mod>> {
        self.list(domain_name, "mods/latest_updated.json").await
    }

    pub async fn get_trending(&self, domain_name: &str) -> Result<Vec<Mod>> {
        self.list(domain_name, "mods/trending.json").await
    }

    /// Find mods containing a file with this MD5 hash.
    pub async fn get_mods_by_file_hash(&self, domain_name: &str, md5: &str) -> Result<Vec<ModHashResult>> {
        let tail = format!("mods/md5_search/{}.json", encode_path_segment(md5));
        let request = self.client.request(Method::GET, &game_path(domain_name, &tail))?;
        self.client.send_json(request).await
    }

    pub async fn get_mod(&self, domain_name: &str, mod_id: u32) -> Result<Mod> {
        let request = self
            .client
            .request(Method::GET, &game_path(domain_name, &format!("mods/{mod_id}.json")))?;
        self.client.send_json(request).await
    }

    pub async fn get_mod_changelogs(&self, domain_name: &str, mod_id: u32) -> Result<ChangeLogs> {
        let tail = format!("mods/{mod_id}/changelogs.json");
        let request = self.client.request(Method::GET, &game_path(domain_name, &tail))?;
        self.client.send_json(request).await
    }

    pub async fn endorse(&self, domain_name: &str, mod_id: u32, version: &str) -> Result<()> {
        self.endorsement(domain_name, mod_id, version, "endorse").await
    }

    /// Withdraw an endorsement.
    pub async fn unendorse(&self, domain_name: &str, mod_id: u32, version: &str) -> Result<()> {
        self.endorsement(domain_name, mod_id, version, "abstain").await
    }

    async fn list(&self, domain_name: &str, tail: &str) -> Result<Vec<Mod>> {
        let request = self.client.request(Method::GET, &game_path(domain_name, tail))?;
        self.client.send_json(request).await
    }

    async fn endorsement(&self, domain_name: &str, mod_id: u32, version: &str, action: &str) -> Result<()> {
        let tail = format!("mods/{mod_id}/{action}.json");
        // This endpoint's body keys are case-sensitive.
        let request = self
            .client
            .request(Method::POST, &game_path(domain_name, &tail))?
            .json_body(json!({ "Version": version }));
        self.client.send(request).await?;
        Ok(())
    }
}

pub(crate) fn game_path(domain_name: &str, tail: &str) -> String {
    format!("v1/games/{}/{}", encode_path_segment(domain_name), tail)
}

use crate::client::NexusClient;
use crate::error::Result;
use crate::http::error_from_response;
use crate::models::{User, UserEndorsement, UserTrackedMod};
use reqwest::{Method, StatusCode};
use serde_json::json;

const TRACKED_MODS: &str = "v1/user/tracked_mods.json";

pub struct UsersEndpoint<'a> {
    client: &'a NexusClient,
}

impl<'a> UsersEndpoint<'a> {
    pub(crate) fn new(client: &'a NexusClient) -> Self {
        Self { client }
    }

    /// Validate the API key and fetch its account. Doesn't count against
    /// the rate limits.
    pub async fn validate(&self) -> Result<User> {
        let request = self.client.request(Method::GET, "v1/users/validate.json")?;
        self.client.send_json(request).await
    }

    pub async fn get_endorsements(&self) -> Result<Vec<UserEndorsement>> {
        let request = self.client.request(Method::GET, "v1/user/endorsements.json")?;
        self.client.send_json(request).await
    }

    pub async fn get_tracked_mods(&self) -> Result<Vec<UserTrackedMod>> {
        let request = self.client.request(Method::GET, TRACKED_MODS)?;
        self.client.send_json(request).await
    }

    /// Start tracking a mod. Returns `false` if the mod doesn't exist.
    pub async fn track_mod(&self, domain_name: &str, mod_id: u32) -> Result<bool> {
        let request = self
            .client
            .request(Method::POST, TRACKED_MODS)?
            .query("domain_name", domain_name)
            .json_body(json!({ "mod_id": mod_id }));
        let response = self.client.execute(request).await?;
        match response.status {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(error_from_response(&response)),
        }
    }

    /// Stop tracking a mod. Untracking a mod that isn't tracked succeeds.
    pub async fn untrack_mod(&self, domain_name: &str, mod_id: u32) -> Result<()> {
        let request = self
            .client
            .request(Method::DELETE, TRACKED_MODS)?
            .query("domain_name", domain_name)
            .json_body(json!({ "mod_id": mod_id }));
        let response = self.client.execute(request).await?;
        if response.status.is_success() || response.status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(error_from_response(&response))
        }
    }
}

use super::mods::game_path;
use crate::client::NexusClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::models::{ContentPreview, FileCategory, ModFile, ModFileDownloadLink, ModFileList, NxmKey};
use reqwest::Method;
use url::Url;

pub struct ModFilesEndpoint<'a> {
    client: &'a NexusClient,
}

impl<'a> ModFilesEndpoint<'a> {
    pub(crate) fn new(client: &'a NexusClient) -> Self {
        Self { client }
    }

    /// Files of a mod, optionally restricted to some categories. An empty
    /// slice returns every category except deleted files.
    pub async fn get_mod_files(
        &self,
        domain_name: &str,
        mod_id: u32,
        categories: &[FileCategory],
    ) -> Result<ModFileList> {
        let tail = format!("mods/{mod_id}/files.json");
        let mut request = self.client.request(Method::GET, &game_path(domain_name, &tail))?;
        if let Some(filter) = category_filter(categories) {
            request = request.query("category", filter);
        }
        self.client.send_json(request).await
    }

    pub async fn get_mod_file(&self, domain_name: &str, mod_id: u32, file_id: u32) -> Result<ModFile> {
        let tail = format!("mods/{mod_id}/files/{file_id}.json");
        let request = self.client.request(Method::GET, &game_path(domain_name, &tail))?;
        self.client.send_json(request).await
    }

    /// Download links for a file. Premium accounts may omit `nxm`; other
    /// accounts need the key and expiry from an `nxm://` link.
    pub async fn get_download_links(
        &self,
        domain_name: &str,
        mod_id: u32,
        file_id: u32,
        nxm: Option<&NxmKey>,
    ) -> Result<Vec<ModFileDownloadLink>> {
        let tail = format!("mods/{mod_id}/files/{file_id}/download_link.json");
        let mut request = self.client.request(Method::GET, &game_path(domain_name, &tail))?;
        if let Some(nxm) = nxm {
            request = request.query("key", &nxm.key).query("expires", nxm.expires);
        }
        self.client.send_json(request).await
    }

    /// Fetch the file tree behind [`ModFile::content_preview_link`]. The
    /// preview is usually served from a CDN host, which is neither sent the
    /// API key nor counted toward rate limits.
    pub async fn get_content_preview(&self, url: &Url) -> Result<ContentPreview> {
        let request = ApiRequest::new(Method::GET, url.clone()).authenticated(self.client.is_api_url(url));
        self.client.send_json(request).await
    }
}

/// Comma-separated category filter, skipping deleted files and duplicates.
fn category_filter(categories: &[FileCategory]) -> Option<String> {
    let mut names: Vec<&str> = Vec::new();
    for name in categories.iter().filter_map(|c| c.filter_name()) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    if names.is_empty() {
        None
    } else {
        Some(names.join(","))
    }
}

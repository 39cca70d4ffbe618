use crate::client::NexusClient;
use crate::error::Result;
use crate::models::ColorScheme;
use reqwest::Method;

pub struct ColorSchemesEndpoint<'a> {
    client: &'a NexusClient,
}

impl<'a> ColorSchemesEndpoint<'a> {
    pub(crate) fn new(client: &'a NexusClient) -> Self {
        Self { client }
    }

    /// Site color schemes, as used for game branding.
    pub async fn get_color_schemes(&self) -> Result<Vec<ColorScheme>> {
        let request = self.client.request(Method::GET, "v1/colourschemes.json")?;
        self.client.send_json(request).await
    }
}

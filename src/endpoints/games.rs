use crate::client::NexusClient;
use crate::error::Result;
use crate::http::encode_path_segment;
use crate::models::Game;
use reqwest::Method;

pub struct GamesEndpoint<'a> {
    client: &'a NexusClient,
}

impl<'a> GamesEndpoint<'a> {
    pub(crate) fn new(client: &'a NexusClient) -> Self {
        Self { client }
    }

    pub async fn get_games(&self, include_unapproved: bool) -> Result<Vec<Game>> {
        let request = self
            .client
            .request(Method::GET, "v1/games.json")?
            .query("include_unapproved", u8::from(include_unapproved));
        let mut games: Vec<Game> = self.client.send_json(request).await?;
        games.iter_mut().for_each(Game::normalize);
        Ok(games)
    }

    /// Look up a game by its URL domain, e.g. `stardewvalley`.
    pub async fn get_game(&self, domain_name: &str) -> Result<Game> {
        let path = format!("v1/games/{}.json", encode_path_segment(domain_name));
        let request = self.client.request(Method::GET, &path)?;
        let mut game: Game = self.client.send_json(request).await?;
        game.normalize();
        Ok(game)
    }
}

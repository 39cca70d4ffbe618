//! Endpoint groups, borrowed from a [`NexusClient`](crate::NexusClient).

mod color_schemes;
mod games;
mod mod_files;
mod mods;
mod users;

pub use color_schemes::ColorSchemesEndpoint;
pub use games::GamesEndpoint;
pub use mod_files::ModFilesEndpoint;
pub use mods::ModsEndpoint;
pub use users::UsersEndpoint;

pub mod discord;
pub mod error;
pub mod maestro;
mod response;

pub use discord::{DiscordClient, DiscordClientBuilder, EntitlementQuery};
pub use error::{ProviderError, Result};
pub use maestro::{MaestroClient, MaestroClientBuilder, UtxoChain};

pub mod client;

pub use client::{DiscordClient, DiscordClientBuilder, EntitlementQuery, DISCORD_API_BASE};

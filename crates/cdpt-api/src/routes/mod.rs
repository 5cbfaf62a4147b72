pub mod chain;
pub mod chat;
pub mod discord;
pub mod health;
pub mod markdown;

pub mod client;

pub use client::{IagonClient, IagonClientBuilder, IAGON_API_BASE};

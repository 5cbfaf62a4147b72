pub mod client;

pub use client::{
    MaestroClient, MaestroClientBuilder, UtxoChain, MAESTRO_BITCOIN_BASE, MAESTRO_CARDANO_BASE,
    MAESTRO_DOGECOIN_BASE, MAESTRO_MARKET_BASE,
};

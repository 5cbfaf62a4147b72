pub mod config;
pub mod error;
pub mod markdown;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod routes;
pub mod state;

//! League profile aggregation service: resolves Riot IDs into full player
//! profiles through a rate-limited upstream client, paginates match history
//! incrementally and proxies game art with ordered-fallback resolution.

pub mod assets;
pub mod config;
pub mod error;
pub mod logging;
pub mod profile;
pub mod riot;
pub mod server;

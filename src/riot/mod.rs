//! Typed client for the upstream Riot REST API.

pub mod client;
mod endpoints;
pub mod region;
pub mod traits;
pub mod types;

pub use client::{ConcurrencyLimiter, RiotClient};
pub use region::{Platform, Region};
pub use traits::RiotApi;

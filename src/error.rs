use thiserror::Error;

/// Error taxonomy for the whole service.
///
/// Transient upstream conditions (429, 5xx, network hiccups) are retried
/// inside [`crate::riot::RiotClient`] and only surface here once retries are
/// exhausted. Asset resolution never produces an error at all; total failure
/// degrades to a placeholder response instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing or invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Invalid platform: {0}")]
    InvalidPlatform(String),

    #[error("Player not found: {game_name}#{tag_line}")]
    PlayerNotFound { game_name: String, tag_line: String },

    #[error("Resource not found upstream")]
    NotFound,

    #[error("Riot API error: status {status}")]
    RiotApi { status: u16 },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether retrying the same call could possibly succeed. 404s and
    /// caller mistakes are terminal; everything upstream-shaped is not.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::RiotApi { .. } | AppError::Http(_))
    }
}

use crate::error::{AppError, Result};

pub const FPL_API_URL: &str = "https://fantasy.premierleague.com/api";
pub const ANALYTICS_URL: &str = "https://understat.com";

/// Backoff values in milliseconds for a secondary page whose embedded data
/// block is missing (the site serves a bare shell when rate limiting).
/// One attempt per entry; exhausting the table surfaces a parse error.
pub const SECONDARY_RETRY_BACKOFF_MS: &[u64] = &[250, 500, 1000, 2000, 4000];

/// Opponent-filtered match logs longer than this indicate the player has
/// faced the opponent across multiple spells with different clubs; the
/// fixture filter then restricts to the player's current club.
pub const OPPONENT_SPELL_LIMIT: usize = 10;

/// Gameweeks contributing to the Form column of price-change tables.
pub const FORM_WINDOW: usize = 5;

/// HTTP request timeout (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub fpl_api_url: String,
    pub analytics_url: String,
    pub log_level: String,
    pub db_path: String,
    /// Current season as the analytics site labels it, e.g. "2020" (SEASON).
    pub season: String,
    /// Minimum relevance score the resolver accepts (RESOLVER_MIN_SCORE).
    /// 0.0 accepts any ranked hit; raise it to reject weak name matches
    /// without a rebuild.
    pub resolver_min_score: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            fpl_api_url: std::env::var("FPL_API_URL").unwrap_or_else(|_| FPL_API_URL.to_string()),
            analytics_url: std::env::var("ANALYTICS_URL")
                .unwrap_or_else(|_| ANALYTICS_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "scout.db".to_string()),
            season: std::env::var("SEASON").unwrap_or_else(|_| "2020".to_string()),
            resolver_min_score: std::env::var("RESOLVER_MIN_SCORE")
                .unwrap_or_else(|_| "0.0".to_string())
                .parse::<f64>()
                .map_err(|_| {
                    AppError::Config("RESOLVER_MIN_SCORE must be a number".to_string())
                })?,
        })
    }
}

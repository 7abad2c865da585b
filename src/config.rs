use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    /// Cadence of the recurring finalization job.
    pub finalize_interval_minutes: u64,
    /// Grace window after shift end before a final decision is allowed.
    pub shift_end_buffer_minutes: i64,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            finalize_interval_minutes: env::var("FINALIZE_INTERVAL_MINUTES")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .expect("FINALIZE_INTERVAL_MINUTES must be a number"),
            shift_end_buffer_minutes: env::var("SHIFT_END_BUFFER_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("SHIFT_END_BUFFER_MINUTES must be a number"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }
}

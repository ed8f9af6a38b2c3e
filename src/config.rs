// src/config.rs

use dotenvy::dotenv;
use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub max_connections: u32,
    pub log_dir: String,
    /// Keep soft-deleted comments as placeholder nodes in the listed tree.
    /// When off, their replies are detached from the tree instead.
    pub keep_placeholders: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            rust_log: "info".to_string(),
            max_connections: 5,
            log_dir: "logs".to_string(),
            keep_placeholders: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Config("DATABASE_URL must be set".to_string()))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse::<u32>().map_err(|_| {
                AppError::Config(format!("DB_MAX_CONNECTIONS is not a number: {}", raw))
            })?,
            Err(_) => 5,
        };

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let keep_placeholders = match env::var("COMMENT_PLACEHOLDERS") {
            Ok(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!("COMMENT_PLACEHOLDERS must be true or false: {}", raw))
            })?,
            Err(_) => true,
        };

        Ok(Self {
            database_url,
            rust_log,
            max_connections,
            log_dir,
            keep_placeholders,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}

use crate::suppression::{MAX_PAGE_SIZE, SesSettings};
use std::env;

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

fn env_u16(key: &str, default: u16) -> u16 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .unwrap_or(default)
}

fn env_i32(key: &str, default: i32) -> i32 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<i32>().ok())
        .unwrap_or(default)
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub address: String,
    pub port: u16,
    pub page_size: i32,
    pub refresh_on_start: bool,
    pub ses: SesSettings,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: env_u16("PORT", 8080),
            page_size: env_i32("SUPPRESSION_PAGE_SIZE", MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            refresh_on_start: env_bool("SUPPRESSION_REFRESH_ON_START", true),
            ses: SesSettings {
                region: env_optional("AWS_REGION"),
                profile: env_optional("AWS_PROFILE"),
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use edudesk_infra::SuperAdminSeed;

const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_TOKEN_TTL_SECS: i64 = 3 * 24 * 60 * 60;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub long_token_ttl: Duration,
    pub bind_addr: SocketAddr,
    /// `None` disables seeding.
    pub super_admin: Option<SuperAdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET").filter(|s| !s.is_empty()).unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let long_token_ttl = match lookup("LONG_TOKEN_TTL_SECS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(secs) if secs > 0 => Duration::seconds(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "LONG_TOKEN_TTL_SECS",
                        expected: "a positive number of seconds",
                        value: raw,
                    });
                }
            },
            None => Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        };

        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.trim().parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            expected: "a socket address",
            value: raw_addr.clone(),
        })?;

        let seed_enabled = match lookup("SEED_SUPERADMIN") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                key: "SEED_SUPERADMIN",
                expected: "true or false",
                value: raw.clone(),
            })?,
            None => true,
        };

        let super_admin = seed_enabled.then(|| {
            let password = lookup("SUPERADMIN_PASSWORD").unwrap_or_else(|| {
                tracing::warn!("SUPERADMIN_PASSWORD not set; seeding with dev default");
                "test".to_string()
            });
            SuperAdminSeed {
                username: lookup("SUPERADMIN_USERNAME").unwrap_or_else(|| "superadmin".to_string()),
                email: lookup("SUPERADMIN_EMAIL").unwrap_or_else(|| "superadmin@test.com".to_string()),
                password,
            }
        });

        Ok(Self {
            jwt_secret,
            long_token_ttl,
            bind_addr,
            super_admin,
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

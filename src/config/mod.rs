//! Configuration module for the directory gateway.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Which member store backs the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Flat JSON array-of-objects document on disk
    File { path: PathBuf },
    /// Hosted record collection behind a PocketBase-shaped REST API
    Hosted { base_url: String, collection: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selected member store backend
    pub store: StoreBackend,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let store_kind = env::var("ROSTER_STORE").unwrap_or_else(|_| "file".to_string());
        let store = match store_kind.as_str() {
            "file" => StoreBackend::File {
                path: env::var("ROSTER_MEMBERS_PATH")
                    .unwrap_or_else(|_| "./data/members.json".to_string())
                    .into(),
            },
            "pocketbase" => StoreBackend::Hosted {
                base_url: env::var("ROSTER_POCKETBASE_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:8090".to_string()),
                collection: env::var("ROSTER_COLLECTION")
                    .unwrap_or_else(|_| "ed_members".to_string()),
            },
            other => panic!(
                "Invalid ROSTER_STORE value '{}' (expected 'file' or 'pocketbase')",
                other
            ),
        };

        let bind_addr = env::var("ROSTER_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid ROSTER_BIND_ADDR format");

        let log_level = env::var("ROSTER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            store,
            bind_addr,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Clear any existing env vars
        env::remove_var("ROSTER_STORE");
        env::remove_var("ROSTER_MEMBERS_PATH");
        env::remove_var("ROSTER_POCKETBASE_URL");
        env::remove_var("ROSTER_COLLECTION");
        env::remove_var("ROSTER_BIND_ADDR");
        env::remove_var("ROSTER_LOG_LEVEL");

        let config = Config::from_env();

        assert_eq!(
            config.store,
            StoreBackend::File {
                path: PathBuf::from("./data/members.json")
            }
        );
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");

        // Selecting the hosted backend picks up its own defaults.
        env::set_var("ROSTER_STORE", "pocketbase");
        let config = Config::from_env();
        assert_eq!(
            config.store,
            StoreBackend::Hosted {
                base_url: "http://127.0.0.1:8090".to_string(),
                collection: "ed_members".to_string()
            }
        );
        env::remove_var("ROSTER_STORE");
    }
}

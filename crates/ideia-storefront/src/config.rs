//! Storefront configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Storefront service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Service host
    pub host: String,
    /// Service port
    pub port: u16,
    /// Shared secret expected in the admin key header; admin routes are
    /// closed when unset
    #[serde(skip_serializing)]
    pub admin_key: Option<String>,
    /// Load the demo catalog on startup
    pub seed_demo: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            admin_key: None,
            seed_demo: true,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        // Platform PORT first, IDEIA_PORT overrides it
        for key in ["PORT", "IDEIA_PORT"] {
            if let Some(p) = lookup(key).and_then(|v| v.trim().parse::<u16>().ok()) {
                cfg.port = p;
            }
        }

        if let Some(host) = lookup("IDEIA_HOST").filter(|h| !h.trim().is_empty()) {
            cfg.host = host.trim().to_string();
        }

        cfg.admin_key = ["IDEIA_ADMIN_KEY", "ADMIN_KEY"]
            .iter()
            .filter_map(|key| lookup(key))
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty());

        if let Some(seed) = lookup("IDEIA_SEED_DEMO").and_then(|v| parse_bool(&v)) {
            cfg.seed_demo = seed;
        }

        Ok(cfg)
    }

    /// `host:port` to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> StorefrontConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| env.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = load(&[]);
        assert_eq!(cfg, StorefrontConfig::default());
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
        assert!(cfg.admin_key.is_none());
    }

    #[test]
    fn test_port_precedence() {
        assert_eq!(load(&[("PORT", "3000")]).port, 3000);
        assert_eq!(load(&[("PORT", "3000"), ("IDEIA_PORT", "4000")]).port, 4000);
        // Unparseable values keep the previous one
        assert_eq!(load(&[("PORT", "3000"), ("IDEIA_PORT", "x")]).port, 3000);
    }

    #[test]
    fn test_admin_key_sources() {
        assert_eq!(load(&[("ADMIN_KEY", "k1")]).admin_key.as_deref(), Some("k1"));
        assert_eq!(
            load(&[("ADMIN_KEY", "k1"), ("IDEIA_ADMIN_KEY", "k2")])
                .admin_key
                .as_deref(),
            Some("k2")
        );
        assert!(load(&[("IDEIA_ADMIN_KEY", "  ")]).admin_key.is_none());
    }

    #[test]
    fn test_seed_flag() {
        assert!(!load(&[("IDEIA_SEED_DEMO", "false")]).seed_demo);
        assert!(load(&[("IDEIA_SEED_DEMO", "maybe")]).seed_demo);
    }

    #[test]
    fn test_admin_key_not_serialized() {
        let cfg = load(&[("IDEIA_ADMIN_KEY", "secret")]);
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("secret"));
    }
}

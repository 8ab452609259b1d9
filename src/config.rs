//! Gateway configuration

use serde::Deserialize;

/// Main gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server bind address
    pub bind_address: String,

    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Enable permissive CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
}

fn default_true() -> bool {
    true
}

fn default_max_connections() -> u32 {
    5
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/postgres".to_string(),
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: default_max_connections(),
            cors_enabled: true,
        }
    }
}

impl GatewayConfig {
    /// Create a new configuration builder
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }
}

/// Builder for GatewayConfig
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    /// Set the database URL
    pub fn database(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    /// Set the bind address
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.config.bind_address = addr.into();
        self
    }

    /// Set the maximum pooled connections
    pub fn max_connections(mut self, n: u32) -> Self {
        self.config.max_connections = n;
        self
    }

    /// Enable or disable CORS
    pub fn cors(mut self, enabled: bool) -> Self {
        self.config.cors_enabled = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> GatewayConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = GatewayConfig::builder()
            .database("postgres://db.internal/app")
            .bind("127.0.0.1:9000")
            .max_connections(10)
            .cors(false)
            .build();

        assert_eq!(config.database_url, "postgres://db.internal/app");
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.max_connections, 10);
        assert!(!config.cors_enabled);
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.max_connections, 5);
        assert!(config.cors_enabled);
    }
}

//! Gateway server implementation
//!
//! Main entry point for running the gateway. The pool is opened at init
//! and shared by every request handler; draining it at shutdown belongs to
//! the surrounding process, not to this type.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::router::create_router;

/// Shared state for the gateway
pub struct GatewayState {
    pub pool: PgPool,
    pub config: GatewayConfig,
}

/// The pglens gateway server
pub struct Gateway {
    config: GatewayConfig,
    state: Option<Arc<GatewayState>>,
}

impl Gateway {
    /// Create a new gateway with the given configuration
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create a gateway builder
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    /// Initialize the gateway (connect to the database)
    pub async fn init(&mut self) -> Result<(), GatewayError> {
        tracing::info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(self.config.max_connections)
            .connect(&self.config.database_url)
            .await
            .map_err(|e| GatewayError::Config(format!("Database connection failed: {}", e)))?;

        tracing::info!(
            "Database connected ({} max connections)",
            self.config.max_connections
        );

        self.state = Some(Arc::new(GatewayState {
            pool,
            config: self.config.clone(),
        }));

        Ok(())
    }

    /// Start serving requests
    ///
    /// # Errors
    /// Returns error if the gateway is not initialized or the server fails
    /// to start
    pub async fn serve(&self) -> Result<(), GatewayError> {
        let state = self.state.as_ref().ok_or_else(|| {
            GatewayError::Config("Gateway not initialized. Call init() first.".to_string())
        })?;

        let router = create_router(Arc::clone(state));

        let addr = &self.config.bind_address;
        tracing::info!("pglens starting on {}", addr);
        tracing::info!("   GET  /databases                  - List databases");
        tracing::info!("   GET  /tables                     - List public tables");
        tracing::info!("   GET  /table/{{name}}/columns       - Table columns");
        tracing::info!("   GET  /table/{{name}}/primary-keys  - Table primary keys");
        tracing::info!("   GET  /table/{{name}}/foreign-keys  - Table foreign keys");
        tracing::info!("   GET  /schema                     - Full schema dump");
        tracing::info!("   POST /run-query                  - Read-only ad-hoc query");
        tracing::info!("   GET  /health                     - Health check");

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| GatewayError::Internal(e.into()))?;

        Ok(())
    }
}

/// Builder for the Gateway
#[derive(Debug, Default)]
pub struct GatewayBuilder {
    config: GatewayConfig,
}

impl GatewayBuilder {
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

    /// Build the gateway
    pub fn build(self) -> Gateway {
        Gateway::new(self.config)
    }

    /// Build and initialize the gateway
    ///
    /// # Errors
    /// Returns error if initialization fails
    pub async fn build_and_init(self) -> Result<Gateway, GatewayError> {
        let mut gateway = self.build();
        gateway.init().await?;
        Ok(gateway)
    }
}

//! pglens — PostgreSQL schema explorer and read-only query gateway
//!
//! # Usage
//!
//! ```bash
//! pglens --database-url postgres://postgres@localhost:5432/mydb
//!
//! # or via environment
//! DATABASE_URL=postgres://localhost/mydb pglens --bind 127.0.0.1:9000
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pglens::Gateway;

#[derive(Parser)]
#[command(name = "pglens")]
#[command(version)]
#[command(about = "PostgreSQL schema explorer and read-only query gateway", long_about = None)]
struct Cli {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Server bind address
    #[arg(long, env = "PGLENS_BIND", default_value = "0.0.0.0:8080")]
    bind: String,

    /// Maximum pooled connections
    #[arg(long, env = "PGLENS_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "pglens=info,tower_http=info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let gateway = Gateway::builder()
        .database(&cli.database_url)
        .bind(&cli.bind)
        .max_connections(cli.max_connections)
        .build_and_init()
        .await;

    let gateway = match gateway {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = gateway.serve().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

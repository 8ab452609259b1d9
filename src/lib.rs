//! # pglens
//!
//! A PostgreSQL schema explorer and read-only ad-hoc query gateway.
//!
//! ## Architecture
//!
//! ```text
//! Client → JSON { "sql": ... } → Gateway → Postgres
//!                                   │
//!                  classify → enforce → execute → materialize
//! ```
//!
//! The query path accepts arbitrary SQL text, parses it with a real SQL
//! grammar, rejects everything except a single SELECT, caps the result size
//! with a default `LIMIT`, and serializes the dynamically-typed rows to JSON.
//! The schema endpoints serve fixed catalog queries (tables, columns, keys).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pglens::Gateway;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let gateway = Gateway::builder()
//!         .database("postgres://localhost/mydb")
//!         .bind("0.0.0.0:8080")
//!         .build_and_init()
//!         .await?;
//!
//!     gateway.serve().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod handler;
pub mod policy;
pub mod router;
pub mod schema;
pub mod server;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use server::{Gateway, GatewayState};

//! Durable storage for the chunk collector service.
//!
//! Three interchangeable backends persist collector records: a flat YAML
//! file, `PostgreSQL` (via [`sqlx`]), and a Redis-compatible key-value
//! store (via [`fred`]). The [`CollectorStore`] handle selects one at
//! open time and falls back to the flat file when the configured backend
//! cannot be reached.
//!
//! Bulk loads are lenient by design: a corrupt record is skipped with a
//! warning rather than aborting startup.

pub mod error;
pub mod file;
pub mod postgres;
pub mod record;
pub mod redis;
pub mod store;

pub use error::StorageError;
pub use file::FileStore;
pub use postgres::{PostgresConfig, PostgresStore};
pub use record::CollectorRecord;
pub use redis::RedisStore;
pub use store::{CollectorStore, StorageBackend, StorageConfig};

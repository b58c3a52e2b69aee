//! Data models
//!
//! Shared between estoque-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod categoria;
pub mod page;
pub mod produto;

// Re-exports
pub use categoria::*;
pub use page::*;
pub use produto::*;

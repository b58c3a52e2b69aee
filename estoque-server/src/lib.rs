//! Estoque Server - inventory management service
//!
//! # Module structure
//!
//! ```text
//! estoque-server/src/
//! ├── core/        # configuration, state, server bootstrap
//! ├── api/         # HTTP routes and handlers
//! ├── db/          # SQLite pool, migrations, repositories
//! ├── filtro/      # session-scoped category filter resolution
//! ├── forms/       # multipart parsing and pure form validation
//! ├── media/       # image, thumbnail and placeholder derivation
//! ├── middleware/  # request logging
//! └── utils/       # logger and validation limits
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod filtro;
pub mod forms;
pub mod media;
pub mod middleware;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use shared::{ApiResponse, AppError, AppResult, ErrorCode};

/// Load .env and initialize logging; called once from main.
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    let log_dir = config.log_dir();
    utils::logger::init_logger_with_file(&config.log_level, Some(&log_dir));
}

pub fn print_banner() {
    println!(
        r#"
   ____     __
  / __/__ _/ /____  ___ ___ _____
 / _/(_-</ __/ _ \/ _ `/ // / -_)
/___/___/\__/\___/\_, /\_,_/\__/
                   /_/
    "#
    );
}

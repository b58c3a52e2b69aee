//! Shared types for the Estoque inventory service
//!
//! Everything that crosses the API boundary lives here:
//!
//! - [`models`]: domain entities (produto, categoria) and the pagination
//!   envelope returned by listing endpoints
//! - [`error`]: unified error codes, [`AppError`] and the [`ApiResponse`]
//!   wrapper used by every JSON endpoint
//! - [`util`]: id generation and timestamp helpers

pub mod error;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

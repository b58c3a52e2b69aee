//! Unified error system for the Estoque service
//!
//! - [`ErrorCode`]: standardized error codes for all error types
//! - [`ErrorCategory`]: classification of errors by domain
//! - [`AppError`]: rich error type with codes, messages, and details
//! - [`ApiResponse`]: unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 6xxx: Produto errors
//! - 7xxx: Categoria errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create an error with a custom message
//! let err = AppError::with_message(ErrorCode::CategoriaNotFound, "Categoria inexistente");
//!
//! // Create a validation error with details
//! let err = AppError::validation("Formulário inválido")
//!     .with_detail("campo", "nome");
//!
//! // Convert to an API response
//! let response = ApiResponse::<()>::error(&err);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};

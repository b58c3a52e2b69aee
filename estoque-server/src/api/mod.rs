//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe and service identity
//! - [`categorias`] - category management (`/categoria`)
//! - [`produtos`] - product management, listing, images (`/produto`)

pub mod categorias;
pub mod health;
pub mod produtos;

use axum::Json;
use serde::Serialize;
use shared::ApiResponse;

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Create a successful response carrying a flash-style notice
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}

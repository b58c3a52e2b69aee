//! Categoria API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/categoria", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/add", post(handler::create))
        .route("/edit/{id}", get(handler::detalhe).post(handler::rename))
        // The original exposes deletion on both methods
        .route("/del/{id}", get(handler::remove).post(handler::remove))
}

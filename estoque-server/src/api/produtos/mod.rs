//! Produto API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/produto", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::lista_get).post(handler::lista_post))
        .route("/lista", get(handler::lista_get).post(handler::lista_post))
        .route("/add", post(handler::add))
        .route("/edit/{id}", get(handler::detalhe).post(handler::edit))
        .route("/delete/{id}", get(handler::delete))
        .route("/imagem/{id}", get(handler::imagem))
        .route("/thumbnail/{id}", get(handler::thumbnail_padrao))
        .route("/thumbnail/{id}/{size}", get(handler::thumbnail_tamanho))
}

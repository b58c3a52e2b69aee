//! Shared fixtures for integration tests
#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::io::Cursor;
use std::str::FromStr;

use estoque_server::db::DbService;
use estoque_server::db::repository::{categoria, produto};
use shared::models::{CategoriaCreate, FotoPayload, ProdutoCreate};

/// Fresh in-memory database with migrations applied and no seed data.
pub async fn pool() -> SqlitePool {
    DbService::new_in_memory()
        .await
        .expect("in-memory database")
        .pool
}

pub async fn criar_categoria(pool: &SqlitePool, nome: &str) -> i64 {
    categoria::create(
        pool,
        CategoriaCreate {
            nome: nome.to_string(),
        },
    )
    .await
    .expect("create categoria")
    .id
}

pub async fn criar_produto(
    pool: &SqlitePool,
    nome: &str,
    preco: &str,
    estoque: i64,
    categorias: &[i64],
) -> i64 {
    produto::create(
        pool,
        ProdutoCreate {
            nome: nome.to_string(),
            preco: Decimal::from_str(preco).expect("preco"),
            estoque,
            ativo: true,
            foto: None,
            categorias: categorias.to_vec(),
        },
    )
    .await
    .expect("create produto")
    .id
}

/// A small PNG photo payload for products with a photo.
pub fn foto_png(largura: u32, altura: u32) -> FotoPayload {
    let img = image::RgbImage::from_pixel(largura, altura, image::Rgb([200, 50, 50]));
    let mut bytes = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    FotoPayload {
        base64: BASE64.encode(bytes.into_inner()),
        mime: "image/png".to_string(),
    }
}

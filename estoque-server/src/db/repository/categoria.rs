//! Categoria Repository

use super::{RepoError, RepoResult};
use serde::Serialize;
use shared::models::{Categoria, CategoriaCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Shortened product row shown on the category edit view
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProdutoAmostra {
    pub id: i64,
    pub nome: String,
}

/// Outcome of a delete attempt
#[derive(Debug)]
pub enum CategoriaDelete {
    Removida,
    /// Names of the products that would be left without any category
    Bloqueada(Vec<String>),
}

pub async fn is_empty(pool: &SqlitePool) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categoria")
        .fetch_one(pool)
        .await?;
    Ok(count == 0)
}

/// All categories ordered by name
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Categoria>> {
    let rows = sqlx::query_as::<_, Categoria>(
        "SELECT id, nome, created_at, updated_at FROM categoria ORDER BY nome",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Categoria>> {
    let row = sqlx::query_as::<_, Categoria>(
        "SELECT id, nome, created_at, updated_at FROM categoria WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CategoriaCreate) -> RepoResult<Categoria> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query("INSERT INTO categoria (id, nome, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(&data.nome)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

    Ok(Categoria {
        id,
        nome: data.nome,
        created_at: now,
        updated_at: now,
    })
}

/// Rename a category
pub async fn rename(pool: &SqlitePool, id: i64, nome: &str) -> RepoResult<Categoria> {
    let now = now_millis();
    let rows = sqlx::query("UPDATE categoria SET nome = ?, updated_at = ? WHERE id = ?")
        .bind(nome)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Categoria {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Categoria {id} not found")))
}

/// Delete a category unless some product would be left without any
/// category. Check and delete run in one transaction; on rejection
/// nothing changes.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<CategoriaDelete> {
    let mut tx = pool.begin().await?;

    let existe: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categoria WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if existe == 0 {
        return Err(RepoError::NotFound(format!("Categoria {id} not found")));
    }

    // Products having this category as their only one
    let bloqueantes: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT p.nome FROM produto p
        JOIN produto_categoria pc ON pc.produto_id = p.id
        WHERE pc.categoria_id = ?
          AND (SELECT COUNT(*) FROM produto_categoria pc2
               WHERE pc2.produto_id = p.id) = 1
        ORDER BY p.nome
        "#,
    )
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;

    if !bloqueantes.is_empty() {
        // Rolls back on drop; no rows change
        return Ok(CategoriaDelete::Bloqueada(bloqueantes));
    }

    sqlx::query("DELETE FROM produto_categoria WHERE categoria_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM categoria WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(CategoriaDelete::Removida)
}

/// Total number of associated products plus a random sample of up to
/// `limite` of them, for the edit view.
pub async fn resumo_produtos(
    pool: &SqlitePool,
    id: i64,
    limite: i64,
) -> RepoResult<(i64, Vec<ProdutoAmostra>)> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM produto_categoria WHERE categoria_id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    let amostra = sqlx::query_as::<_, ProdutoAmostra>(
        r#"
        SELECT p.id, p.nome FROM produto p
        JOIN produto_categoria pc ON pc.produto_id = p.id
        WHERE pc.categoria_id = ?
        ORDER BY RANDOM()
        LIMIT ?
        "#,
    )
    .bind(id)
    .bind(limite)
    .fetch_all(pool)
    .await?;

    Ok((total, amostra))
}

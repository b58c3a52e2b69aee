//! Produto Repository

use super::{RepoError, RepoResult, placeholders};
use rust_decimal::Decimal;
use shared::models::{PageSize, Pagina, Produto, ProdutoCreate, ProdutoUpdate, total_paginas};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqlitePool, Transaction};
use std::collections::HashMap;
use std::str::FromStr;

const PRODUTO_SELECT: &str = "SELECT id, nome, preco, estoque, ativo, possui_foto, \
     foto_base64, foto_mime, created_at, updated_at FROM produto";

const PRODUTO_SELECT_JOIN: &str = "SELECT DISTINCT p.id, p.nome, p.preco, p.estoque, p.ativo, \
     p.possui_foto, p.foto_base64, p.foto_mime, p.created_at, p.updated_at \
     FROM produto p JOIN produto_categoria pc ON pc.produto_id = p.id";

/// Raw produto row; `preco` is stored as canonical decimal text
#[derive(sqlx::FromRow)]
struct ProdutoRow {
    id: i64,
    nome: String,
    preco: String,
    estoque: i64,
    ativo: bool,
    possui_foto: bool,
    foto_base64: Option<String>,
    foto_mime: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl ProdutoRow {
    fn into_produto(self, categorias: Vec<i64>) -> RepoResult<Produto> {
        let preco = Decimal::from_str(&self.preco)
            .map_err(|e| RepoError::Database(format!("Invalid preco '{}': {e}", self.preco)))?;
        Ok(Produto {
            id: self.id,
            nome: self.nome,
            preco,
            estoque: self.estoque,
            ativo: self.ativo,
            possui_foto: self.possui_foto,
            foto_base64: self.foto_base64,
            foto_mime: self.foto_mime,
            categorias,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// One page of the listing plus whether an out-of-range page request was
/// corrected back to page 1
#[derive(Debug)]
pub struct ListaProdutos {
    pub pagina: Pagina<Produto>,
    pub pagina_corrigida: bool,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Produto>> {
    let sql = format!("{PRODUTO_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, ProdutoRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        None => Ok(None),
        Some(row) => {
            let categorias: Vec<i64> = sqlx::query_scalar(
                "SELECT categoria_id FROM produto_categoria WHERE produto_id = ?",
            )
            .bind(id)
            .fetch_all(pool)
            .await?;
            Ok(Some(row.into_produto(categorias)?))
        }
    }
}

/// Create a product with its category associations in one transaction.
///
/// Submitted category ids that do not exist are silently skipped.
pub async fn create(pool: &SqlitePool, data: ProdutoCreate) -> RepoResult<Produto> {
    let id = snowflake_id();
    let now = now_millis();
    let (possui_foto, foto_base64, foto_mime) = match &data.foto {
        Some(f) => (true, Some(f.base64.clone()), Some(f.mime.clone())),
        None => (false, None, None),
    };

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO produto (id, nome, preco, estoque, ativo, possui_foto, \
         foto_base64, foto_mime, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.nome)
    .bind(data.preco.to_string())
    .bind(data.estoque)
    .bind(data.ativo)
    .bind(possui_foto)
    .bind(&foto_base64)
    .bind(&foto_mime)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    associar_categorias(&mut tx, id, &data.categorias).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create produto".into()))
}

/// Full update of a product: every field is replaced, the photo follows
/// the remove/replace/keep rule and the category associations are
/// cleared and reassigned, all in one transaction.
pub async fn update(pool: &SqlitePool, id: i64, data: ProdutoUpdate) -> RepoResult<Produto> {
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let result = if data.remover_foto {
        sqlx::query(
            "UPDATE produto SET nome = ?, preco = ?, estoque = ?, ativo = ?, \
             possui_foto = 0, foto_base64 = NULL, foto_mime = NULL, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&data.nome)
        .bind(data.preco.to_string())
        .bind(data.estoque)
        .bind(data.ativo)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?
    } else if let Some(foto) = &data.foto {
        sqlx::query(
            "UPDATE produto SET nome = ?, preco = ?, estoque = ?, ativo = ?, \
             possui_foto = 1, foto_base64 = ?, foto_mime = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&data.nome)
        .bind(data.preco.to_string())
        .bind(data.estoque)
        .bind(data.ativo)
        .bind(&foto.base64)
        .bind(&foto.mime)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?
    } else {
        sqlx::query(
            "UPDATE produto SET nome = ?, preco = ?, estoque = ?, ativo = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&data.nome)
        .bind(data.preco.to_string())
        .bind(data.estoque)
        .bind(data.ativo)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?
    };

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Produto {id} not found")));
    }

    // Replace associations wholesale
    sqlx::query("DELETE FROM produto_categoria WHERE produto_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    associar_categorias(&mut tx, id, &data.categorias).await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Produto {id} not found")))
}

/// Unconditional delete; associations go with the product.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM produto_categoria WHERE produto_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM produto WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Produto {id} not found")));
    }

    tx.commit().await?;
    Ok(())
}

/// Filtered, deduplicated, name-ordered listing.
///
/// `restricao` is the effective category filter: `None` (or an empty
/// slice) applies no join at all, otherwise products with at least one
/// association to a listed category match, deduplicated via DISTINCT.
///
/// A `page` before 1 or past the last page falls back to page 1 and is
/// reported through `pagina_corrigida` instead of failing.
pub async fn lista(
    pool: &SqlitePool,
    restricao: Option<&[i64]>,
    page: i64,
    pp: PageSize,
) -> RepoResult<ListaProdutos> {
    let restricao = restricao.filter(|ids| !ids.is_empty());

    match pp {
        PageSize::All => {
            let rows = fetch_pagina(pool, restricao, None).await?;
            let produtos = montar_produtos(pool, rows).await?;
            Ok(ListaProdutos {
                pagina: Pagina::todos(produtos),
                pagina_corrigida: false,
            })
        }
        PageSize::Limit(per_page) => {
            let total = contar(pool, restricao).await?;
            let pages = total_paginas(total, per_page);

            let fora_do_intervalo = page < 1 || (page > 1 && page > pages);
            let pagina_atual = if fora_do_intervalo { 1 } else { page };

            let offset = (pagina_atual - 1) * per_page;
            let rows = fetch_pagina(pool, restricao, Some((per_page, offset))).await?;
            let produtos = montar_produtos(pool, rows).await?;

            Ok(ListaProdutos {
                pagina: Pagina::nova(produtos, total, pagina_atual, per_page),
                pagina_corrigida: fora_do_intervalo,
            })
        }
    }
}

async fn montar_produtos(pool: &SqlitePool, rows: Vec<ProdutoRow>) -> RepoResult<Vec<Produto>> {
    let mut produtos = Vec::with_capacity(rows.len());
    for row in rows {
        produtos.push(row.into_produto(Vec::new())?);
    }
    carregar_categorias(pool, &mut produtos).await?;
    Ok(produtos)
}

async fn contar(pool: &SqlitePool, restricao: Option<&[i64]>) -> RepoResult<i64> {
    let total: i64 = match restricao {
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM produto")
                .fetch_one(pool)
                .await?
        }
        Some(ids) => {
            let sql = format!(
                "SELECT COUNT(DISTINCT p.id) FROM produto p \
                 JOIN produto_categoria pc ON pc.produto_id = p.id \
                 WHERE pc.categoria_id IN ({})",
                placeholders(ids.len())
            );
            let mut query = sqlx::query_scalar::<_, i64>(&sql);
            for &id in ids {
                query = query.bind(id);
            }
            query.fetch_one(pool).await?
        }
    };
    Ok(total)
}

async fn fetch_pagina(
    pool: &SqlitePool,
    restricao: Option<&[i64]>,
    limite: Option<(i64, i64)>,
) -> RepoResult<Vec<ProdutoRow>> {
    let mut sql = match restricao {
        None => format!("{PRODUTO_SELECT} ORDER BY nome"),
        Some(ids) => format!(
            "{PRODUTO_SELECT_JOIN} WHERE pc.categoria_id IN ({}) ORDER BY p.nome",
            placeholders(ids.len())
        ),
    };
    if limite.is_some() {
        sql.push_str(" LIMIT ? OFFSET ?");
    }

    let mut query = sqlx::query_as::<_, ProdutoRow>(&sql);
    if let Some(ids) = restricao {
        for &id in ids {
            query = query.bind(id);
        }
    }
    if let Some((per_page, offset)) = limite {
        query = query.bind(per_page).bind(offset);
    }

    Ok(query.fetch_all(pool).await?)
}

/// Batch-load the categoria ids of every product in the slice.
async fn carregar_categorias(pool: &SqlitePool, produtos: &mut [Produto]) -> RepoResult<()> {
    if produtos.is_empty() {
        return Ok(());
    }

    let sql = format!(
        "SELECT produto_id, categoria_id FROM produto_categoria WHERE produto_id IN ({})",
        placeholders(produtos.len())
    );
    let mut query = sqlx::query_as::<_, (i64, i64)>(&sql);
    for p in produtos.iter() {
        query = query.bind(p.id);
    }
    let rows = query.fetch_all(pool).await?;

    let mut mapa: HashMap<i64, Vec<i64>> = HashMap::new();
    for (produto_id, categoria_id) in rows {
        mapa.entry(produto_id).or_default().push(categoria_id);
    }
    for p in produtos.iter_mut() {
        p.categorias = mapa.remove(&p.id).unwrap_or_default();
    }
    Ok(())
}

/// Insert the associations for the category ids that actually exist;
/// everything else is silently skipped.
async fn associar_categorias(
    tx: &mut Transaction<'_, sqlx::Sqlite>,
    produto_id: i64,
    categorias: &[i64],
) -> RepoResult<()> {
    if categorias.is_empty() {
        return Ok(());
    }

    let sql = format!(
        "SELECT id FROM categoria WHERE id IN ({})",
        placeholders(categorias.len())
    );
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for &id in categorias {
        query = query.bind(id);
    }
    let validas: Vec<i64> = query.fetch_all(&mut **tx).await?;

    for categoria_id in validas {
        sqlx::query(
            "INSERT OR IGNORE INTO produto_categoria (produto_id, categoria_id) VALUES (?, ?)",
        )
        .bind(produto_id)
        .bind(categoria_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

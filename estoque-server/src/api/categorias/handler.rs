//! Categoria API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::api::{ok, ok_with_message};
use crate::core::ServerState;
use crate::db::repository::categoria::{self, CategoriaDelete, ProdutoAmostra};
use crate::forms;
use shared::models::{Categoria, CategoriaCreate, CategoriaUpdate};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

/// Sample size shown on the edit view
const AMOSTRA_PRODUTOS: i64 = 5;

/// GET /categoria - all categories ordered by name
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Categoria>>>> {
    let categorias = categoria::find_all(&state.db).await?;
    Ok(ok(categorias))
}

/// POST /categoria/add - create a category
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoriaCreate>,
) -> AppResult<Json<ApiResponse<Categoria>>> {
    let nome = forms::categoria::validar_nome(&payload.nome).map_err(forms::erros_de_formulario)?;

    let criada = categoria::create(&state.db, CategoriaCreate { nome }).await?;
    let aviso = format!("Categoria '{}' adicionada", criada.nome);
    Ok(ok_with_message(criada, aviso))
}

/// Category plus the association summary shown on the edit view
#[derive(Debug, Serialize)]
pub struct CategoriaDetalhe {
    pub categoria: Categoria,
    pub total_produtos: i64,
    /// Up to 5 randomly sampled associated products
    pub amostra_produtos: Vec<ProdutoAmostra>,
}

/// GET /categoria/edit/{id} - category with its product summary
pub async fn detalhe(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<CategoriaDetalhe>>> {
    let categoria_row = categoria::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoriaNotFound))?;

    let (total_produtos, amostra_produtos) =
        categoria::resumo_produtos(&state.db, id, AMOSTRA_PRODUTOS).await?;

    Ok(ok(CategoriaDetalhe {
        categoria: categoria_row,
        total_produtos,
        amostra_produtos,
    }))
}

/// POST /categoria/edit/{id} - rename a category
pub async fn rename(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoriaUpdate>,
) -> AppResult<Json<ApiResponse<Categoria>>> {
    categoria::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoriaNotFound))?;

    let nome = forms::categoria::validar_nome(&payload.nome).map_err(forms::erros_de_formulario)?;

    let alterada = categoria::rename(&state.db, id, &nome).await?;
    Ok(ok_with_message(alterada, "Categoria alterada"))
}

/// GET/POST /categoria/del/{id} - delete a category
///
/// Rejected, naming the affected products, if any product would be left
/// without a category.
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    categoria::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoriaNotFound))?;

    match categoria::delete(&state.db, id).await? {
        CategoriaDelete::Removida => Ok(ok_with_message(true, "Categoria removida")),
        CategoriaDelete::Bloqueada(nomes) => Err(AppError::with_message(
            ErrorCode::CategoriaComProdutos,
            format!(
                "Não é possível remover esta categoria. Os seguintes produtos \
                 ficariam sem categoria: {}",
                nomes.join(", ")
            ),
        )
        .with_detail("produtos", nomes)),
    }
}

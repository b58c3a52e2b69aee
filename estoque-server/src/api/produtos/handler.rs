//! Produto API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{ok, ok_with_message};
use crate::core::ServerState;
use crate::db::repository::{categoria, produto};
use crate::filtro;
use crate::forms::{self, produto::ProdutoForm};
use crate::media;
use shared::models::{Categoria, PageSize, Pagina, Produto};
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

/// Session cookie carrying the filter-selection key
const COOKIE_SESSAO: &str = "estoque_sid";

fn nao_encontrado() -> AppError {
    AppError::new(ErrorCode::ProdutoNotFound)
}

// =============================================================================
// Create / update / delete
// =============================================================================

/// POST /produto/add - create a product from the multipart form
pub async fn add(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Produto>>> {
    // Without at least one category no product can be created
    if categoria::is_empty(&state.db).await? {
        return Err(AppError::new(ErrorCode::SemCategorias));
    }

    let form = ProdutoForm::from_multipart(&mut multipart).await?;
    let payload = form.validar_create().map_err(forms::erros_de_formulario)?;

    let criado = produto::create(&state.db, payload).await?;
    Ok(ok_with_message(criado, "Produto adicionado!"))
}

/// GET /produto/edit/{id} - current values backing the edit form
pub async fn detalhe(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Produto>>> {
    let produto_row = produto::find_by_id(&state.db, id)
        .await?
        .ok_or_else(nao_encontrado)?;
    Ok(ok(produto_row))
}

/// POST /produto/edit/{id} - replace product fields, photo and
/// associations from the multipart form
pub async fn edit(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<Produto>>> {
    produto::find_by_id(&state.db, id)
        .await?
        .ok_or_else(nao_encontrado)?;

    let form = ProdutoForm::from_multipart(&mut multipart).await?;
    let payload = form.validar_update().map_err(forms::erros_de_formulario)?;

    let alterado = produto::update(&state.db, id, payload).await?;
    Ok(ok_with_message(alterado, "Produto alterado"))
}

/// GET /produto/delete/{id} - unconditional delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    produto::find_by_id(&state.db, id)
        .await?
        .ok_or_else(nao_encontrado)?;

    produto::delete(&state.db, id).await?;
    Ok(ok_with_message(true, "Produto removido!"))
}

// =============================================================================
// Listing with category filter and pagination
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ListaParams {
    pub page: Option<i64>,
    pub pp: Option<String>,
}

/// Multi-value `cat` field posted by the filter form
#[derive(Debug, Deserialize)]
pub struct FiltroForm {
    #[serde(default)]
    pub cat: Vec<String>,
}

/// Listing payload: the page plus the filter state the view renders
#[derive(Debug, Serialize)]
pub struct ListaResposta {
    pub produtos: Pagina<Produto>,
    pub todas_categorias: Vec<Categoria>,
    pub categorias_selecionadas: Vec<i64>,
}

/// GET /produto[/lista] - paginated listing reusing the session filter
pub async fn lista_get(
    State(state): State<ServerState>,
    Query(params): Query<ListaParams>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<ApiResponse<ListaResposta>>)> {
    lista_comum(state, params, jar, None).await
}

/// POST /produto[/lista] - listing with a new filter submission,
/// persisted in the session for subsequent pagination requests
pub async fn lista_post(
    State(state): State<ServerState>,
    Query(params): Query<ListaParams>,
    jar: CookieJar,
    Form(filtro_form): Form<FiltroForm>,
) -> AppResult<(CookieJar, Json<ApiResponse<ListaResposta>>)> {
    lista_comum(state, params, jar, Some(filtro_form.cat)).await
}

async fn lista_comum(
    state: ServerState,
    params: ListaParams,
    jar: CookieJar,
    enviadas: Option<Vec<String>>,
) -> AppResult<(CookieJar, Json<ApiResponse<ListaResposta>>)> {
    let (sessao, jar) = sessao_id(jar);

    let todas_categorias = categoria::find_all(&state.db).await?;
    let todas_ids: Vec<i64> = todas_categorias.iter().map(|c| c.id).collect();

    // POST submissions replace the session selection (malformed ids are
    // dropped); GETs reuse whatever the session holds
    let base = match enviadas {
        Some(valores) => {
            let selecao = filtro::parse_selecao(&valores);
            state.filtros.set(sessao, selecao.clone());
            selecao
        }
        None => state.filtros.get(sessao).unwrap_or_default(),
    };
    let resolvido = filtro::resolver(&todas_ids, &base);

    let page = params.page.unwrap_or(1);
    let pp = PageSize::parse(params.pp.as_deref());

    let lista = produto::lista(&state.db, resolvido.restricao.as_deref(), page, pp).await?;

    let resposta = ListaResposta {
        produtos: lista.pagina,
        todas_categorias,
        categorias_selecionadas: resolvido.selecionadas,
    };

    let json = if lista.pagina_corrigida {
        ok_with_message(
            resposta,
            format!("Não temos produtos na página {page}. Apresentando página 1"),
        )
    } else {
        ok(resposta)
    };
    Ok((jar, json))
}

/// Session id from the cookie, creating one (and the cookie) on demand.
fn sessao_id(jar: CookieJar) -> (Uuid, CookieJar) {
    if let Some(cookie) = jar.get(COOKIE_SESSAO)
        && let Ok(id) = Uuid::parse_str(cookie.value())
    {
        return (id, jar);
    }

    let id = Uuid::new_v4();
    let mut cookie = Cookie::new(COOKIE_SESSAO, id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    (id, jar.add(cookie))
}

// =============================================================================
// Image endpoints
// =============================================================================

/// GET /produto/imagem/{id} - stored photo bytes, or the 480×480
/// placeholder; plain 404 when the product does not exist
pub async fn imagem(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let Some(produto_row) = produto::find_by_id(&state.db, id).await? else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let (bytes, mime) = media::imagem(&produto_row)?;
    Ok(([(header::CONTENT_TYPE, mime)], bytes).into_response())
}

/// GET /produto/thumbnail/{id} - thumbnail at the default size
pub async fn thumbnail_padrao(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    thumbnail_comum(state, id, media::TAMANHO_THUMBNAIL).await
}

/// GET /produto/thumbnail/{id}/{size} - thumbnail at the requested size
pub async fn thumbnail_tamanho(
    State(state): State<ServerState>,
    Path((id, tamanho)): Path<(i64, u32)>,
) -> Result<Response, AppError> {
    if tamanho == 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "O tamanho deve ser um inteiro positivo",
        ));
    }
    thumbnail_comum(state, id, tamanho).await
}

async fn thumbnail_comum(state: ServerState, id: i64, tamanho: u32) -> Result<Response, AppError> {
    let Some(produto_row) = produto::find_by_id(&state.db, id).await? else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let (bytes, mime) = media::thumbnail(&produto_row, tamanho)?;
    Ok(([(header::CONTENT_TYPE, mime)], bytes).into_response())
}

//! Produto model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Produto entity
///
/// Photo invariant: `possui_foto == false` ⇔ `foto_base64` and
/// `foto_mime` are both `None`; `possui_foto == true` ⇒ both present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Produto {
    pub id: i64,
    pub nome: String,
    /// Fixed-point price, two decimal places, never negative
    pub preco: Decimal,
    pub estoque: i64,
    pub ativo: bool,
    pub possui_foto: bool,
    /// Inline photo payload; never serialized into listings
    #[serde(skip_serializing, default)]
    pub foto_base64: Option<String>,
    pub foto_mime: Option<String>,
    /// Categoria ids this product belongs to (junction table, populated
    /// by the repository)
    #[serde(default)]
    pub categorias: Vec<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Photo payload carried by the add/edit forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FotoPayload {
    /// Raw upload bytes, base64-encoded for inline storage
    pub base64: String,
    /// Media type reported by the upload (image/jpeg or image/png)
    pub mime: String,
}

/// Create produto payload (already validated)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProdutoCreate {
    pub nome: String,
    pub preco: Decimal,
    pub estoque: i64,
    pub ativo: bool,
    pub foto: Option<FotoPayload>,
    /// Selected categoria ids; the form guarantees at least one entry
    pub categorias: Vec<i64>,
}

/// Update produto payload (already validated)
///
/// The edit form replaces every field and the category associations
/// wholesale. The photo is kept unless `remover_foto` is set or a new
/// `foto` is uploaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProdutoUpdate {
    pub nome: String,
    pub preco: Decimal,
    pub estoque: i64,
    pub ativo: bool,
    pub foto: Option<FotoPayload>,
    pub remover_foto: bool,
    pub categorias: Vec<i64>,
}

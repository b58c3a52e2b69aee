//! Categoria model

use serde::{Deserialize, Serialize};

/// Categoria entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Categoria {
    pub id: i64,
    pub nome: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create categoria payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriaCreate {
    pub nome: String,
}

/// Rename categoria payload
///
/// The edit form carries the same single field as the add form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriaUpdate {
    pub nome: String,
}

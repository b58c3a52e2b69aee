//! Form parsing and validation
//!
//! Validation is a set of pure functions invoked before any mutation:
//! each form validates into the repository payload or into a list of
//! field-level errors. Nothing is written when validation fails.

pub mod categoria;
pub mod produto;

use serde::Serialize;
use shared::AppError;

/// One field-level validation error
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErroCampo {
    pub campo: &'static str,
    pub mensagem: String,
}

impl ErroCampo {
    pub fn novo(campo: &'static str, mensagem: impl Into<String>) -> Self {
        Self {
            campo,
            mensagem: mensagem.into(),
        }
    }
}

/// Collapse field errors into the validation error returned to the
/// client, with the per-field messages under `details.campos`.
pub fn erros_de_formulario(erros: Vec<ErroCampo>) -> AppError {
    let detalhes = serde_json::to_value(&erros).unwrap_or_default();
    AppError::validation("Formulário inválido").with_detail("campos", detalhes)
}

//! Categoria form validation

use super::ErroCampo;
use crate::utils::validation::MAX_NOME_CATEGORIA;

/// Validate the single `nome` field shared by the add and edit forms,
/// returning the trimmed name.
pub fn validar_nome(nome: &str) -> Result<String, Vec<ErroCampo>> {
    let nome = nome.trim();
    let mut erros = Vec::new();

    if nome.is_empty() {
        erros.push(ErroCampo::novo(
            "nome",
            "É obrigatório definir o nome da categoria",
        ));
    } else if nome.chars().count() > MAX_NOME_CATEGORIA {
        erros.push(ErroCampo::novo(
            "nome",
            format!("A categoria pode ter até {MAX_NOME_CATEGORIA} caracteres"),
        ));
    }

    if erros.is_empty() {
        Ok(nome.to_string())
    } else {
        Err(erros)
    }
}

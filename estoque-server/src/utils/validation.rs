//! Input validation limits
//!
//! SQLite TEXT has no built-in length enforcement, so the form layer
//! applies these limits before any mutation.

/// Product names (mirrors the original 100-char column)
pub const MAX_NOME_PRODUTO: usize = 100;

/// Category names (mirrors the original 128-char column)
pub const MAX_NOME_CATEGORIA: usize = 128;

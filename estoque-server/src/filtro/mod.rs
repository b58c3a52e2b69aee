//! Category filter resolution
//!
//! The listing accepts a multi-value `cat` form field on POST and reuses
//! the resolved selection on subsequent GETs (pagination links) through a
//! per-session store. Resolution rules:
//!
//! - malformed ids in the submission are silently dropped
//! - an empty selection (no submission, no session entry) means "all"
//! - a selection equal to the full category set applies no join filter,
//!   which must produce the same results as filtering by the full set

use dashmap::DashMap;
use std::collections::BTreeSet;
use uuid::Uuid;

use shared::util::parse_id;

/// Per-session category filter selections, keyed by the session id
/// carried in the `estoque_sid` cookie.
#[derive(Debug, Default)]
pub struct FiltroStore {
    selecoes: DashMap<Uuid, Vec<i64>>,
}

impl FiltroStore {
    pub fn new() -> Self {
        Self {
            selecoes: DashMap::new(),
        }
    }

    /// Selection saved by an earlier POST of this session, if any
    pub fn get(&self, sessao: Uuid) -> Option<Vec<i64>> {
        self.selecoes.get(&sessao).map(|v| v.clone())
    }

    /// Persist the selection for reuse by later requests of the same
    /// session. An empty list is stored as-is (it resolves to "all").
    pub fn set(&self, sessao: Uuid, selecao: Vec<i64>) {
        self.selecoes.insert(sessao, selecao);
    }
}

/// Effective filter computed for one listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiltroResolvido {
    /// Ids considered selected (for echoing back to the client)
    pub selecionadas: Vec<i64>,
    /// Join restriction to apply; `None` when filtering is a no-op
    pub restricao: Option<Vec<i64>>,
}

/// Parse a submitted multi-value `cat` field, silently dropping
/// malformed ids.
pub fn parse_selecao(valores: &[String]) -> Vec<i64> {
    valores.iter().filter_map(|v| parse_id(v)).collect()
}

/// Resolve the effective selection from the base selection (submitted or
/// session-restored) against the full category id set.
pub fn resolver(todas: &[i64], base: &[i64]) -> FiltroResolvido {
    if base.is_empty() {
        return FiltroResolvido {
            selecionadas: todas.to_vec(),
            restricao: None,
        };
    }

    let base_set: BTreeSet<i64> = base.iter().copied().collect();
    let todas_set: BTreeSet<i64> = todas.iter().copied().collect();

    if base_set == todas_set {
        // Selecting everything is the same as not filtering at all
        return FiltroResolvido {
            selecionadas: todas.to_vec(),
            restricao: None,
        };
    }

    let selecionadas: Vec<i64> = base_set.into_iter().collect();
    FiltroResolvido {
        restricao: Some(selecionadas.clone()),
        selecionadas,
    }
}

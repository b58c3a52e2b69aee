//! Pagination envelope for listing endpoints

use serde::{Deserialize, Serialize};

/// Default page size when `pp` is absent or unparseable
pub const PP_PADRAO: i64 = 25;

/// Requested page size: a positive limit or the `all` sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    /// Every matching row in a single logical page
    All,
    /// Positive per-page limit
    Limit(i64),
}

impl PageSize {
    /// Parse the `pp` query parameter.
    ///
    /// `"all"` selects the unbounded page; anything that is not a
    /// positive integer falls back to the default of 25.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("all") => Self::All,
            Some(v) => match v.parse::<i64>() {
                Ok(n) if n >= 1 => Self::Limit(n),
                _ => Self::Limit(PP_PADRAO),
            },
            None => Self::Limit(PP_PADRAO),
        }
    }
}

/// One page of results plus the counters the listing view needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagina<T> {
    pub items: Vec<T>,
    /// Total number of matching rows across all pages
    pub total: i64,
    /// Current page number (1-based)
    pub page: i64,
    /// Total number of pages (`ceil(total / per_page)`)
    pub pages: i64,
    pub per_page: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> Pagina<T> {
    /// Build a bounded page; derives page count and prev/next flags.
    pub fn nova(items: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        let pages = total_paginas(total, per_page);
        Self {
            items,
            total,
            page,
            pages,
            per_page,
            has_prev: page > 1,
            has_next: page < pages,
        }
    }

    /// Build the single logical page returned for `pp=all`.
    pub fn todos(items: Vec<T>) -> Self {
        let total = items.len() as i64;
        Self {
            items,
            total,
            page: 1,
            pages: 1,
            per_page: total,
            has_prev: false,
            has_next: false,
        }
    }
}

/// Page count for a bounded listing: `ceil(total / per_page)`.
pub fn total_paginas(total: i64, per_page: i64) -> i64 {
    if total <= 0 { 0 } else { (total + per_page - 1) / per_page }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pp_accepts_all_and_positive_ints() {
        assert_eq!(PageSize::parse(Some("all")), PageSize::All);
        assert_eq!(PageSize::parse(Some("10")), PageSize::Limit(10));
        assert_eq!(PageSize::parse(Some("1")), PageSize::Limit(1));
    }

    #[test]
    fn parse_pp_falls_back_to_default() {
        assert_eq!(PageSize::parse(None), PageSize::Limit(PP_PADRAO));
        assert_eq!(PageSize::parse(Some("xyz")), PageSize::Limit(PP_PADRAO));
        assert_eq!(PageSize::parse(Some("0")), PageSize::Limit(PP_PADRAO));
        assert_eq!(PageSize::parse(Some("-3")), PageSize::Limit(PP_PADRAO));
    }

    #[test]
    fn page_count_is_ceiling() {
        assert_eq!(total_paginas(0, 25), 0);
        assert_eq!(total_paginas(1, 25), 1);
        assert_eq!(total_paginas(25, 25), 1);
        assert_eq!(total_paginas(26, 25), 2);
        assert_eq!(total_paginas(75, 25), 3);
    }

    #[test]
    fn bounded_page_flags() {
        let p = Pagina::nova(vec![1, 2, 3], 7, 2, 3);
        assert_eq!(p.pages, 3);
        assert!(p.has_prev);
        assert!(p.has_next);

        let ultima = Pagina::nova(vec![7], 7, 3, 3);
        assert!(ultima.has_prev);
        assert!(!ultima.has_next);
    }

    #[test]
    fn unbounded_page_is_single() {
        let p = Pagina::todos(vec!["a", "b", "c"]);
        assert_eq!(p.total, 3);
        assert_eq!(p.pages, 1);
        assert_eq!(p.page, 1);
        assert!(!p.has_prev);
        assert!(!p.has_next);
    }
}

//! Pagination types for list endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, MAX_PAGE_SIZE};

/// `page` / `limit` query parameters shared by every list endpoint.
///
/// Missing, zero or unparsable values fall back to page 1 and the listing's
/// own default page size. Resource queries embed this with `#[serde(flatten)]`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "lenient_number")]
    #[param(value_type = Option<u64>)]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[param(value_type = Option<u64>)]
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

// Flattened query structs hand every value over as a string.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(raw)) => raw.trim().parse().ok(),
        None => None,
    })
}

impl PaginationParams {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Resolve against a listing's default page size.
    pub fn resolve(&self, default_limit: u64) -> PageRequest {
        let page = self
            .page
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PAGE_NUMBER);
        let limit = self
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(default_limit)
            .min(MAX_PAGE_SIZE);
        PageRequest { page, limit }
    }
}

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Rows to skip. Saturates at `i64::MAX`, the largest OFFSET Postgres takes,
    /// so an absurd `?page=` reads as past the end.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }

    /// Apply the window to an in-memory list.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(self.limit as usize)
            .cloned()
            .collect()
    }
}

/// `ceil(total / limit)`, zero when nothing matches.
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        0
    } else {
        total.div_ceil(limit)
    }
}

/// Paginated response wrapper: `{success, data, meta}`.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            success: true,
            data,
            meta: PaginationMeta {
                page: request.page,
                limit: request.limit,
                total,
                total_pages: total_pages(total, request.limit),
            },
        }
    }

    /// Convert the items, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            success: self.success,
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_missing() {
        let request = PaginationParams::default().resolve(5);
        assert_eq!(request, PageRequest { page: 1, limit: 5 });
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_zero_values_fall_back() {
        let params = PaginationParams {
            page: Some(0),
            limit: Some(0),
        };
        assert_eq!(params.resolve(10), PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn test_limit_is_capped() {
        let request = PaginationParams::new(2, 1_000).resolve(5);
        assert_eq!(request.limit, MAX_PAGE_SIZE);
        assert_eq!(request.offset(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_huge_page_saturates() {
        let page = PaginationParams::new(u64::MAX, 5).resolve(5);
        assert_eq!(page.offset(), i64::MAX as u64);
        assert!(page.slice(&[1, 2, 3]).is_empty());

        let meta = Paginated::new(Vec::<u8>::new(), page, 3).meta;
        assert_eq!(meta.page, u64::MAX);
        assert_eq!(meta.total_pages, 1);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(11, 3), 4);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let items: Vec<u32> = (0..7).collect();
        let request = PaginationParams::new(4, 3).resolve(5);
        assert!(request.slice(&items).is_empty());

        let last = PaginationParams::new(3, 3).resolve(5);
        assert_eq!(last.slice(&items), vec![6]);
    }

    #[test]
    fn test_flattened_query_parses_strings() {
        #[derive(Deserialize)]
        struct Query {
            search: Option<String>,
            #[serde(flatten)]
            pagination: PaginationParams,
        }

        let query: Query =
            serde_json::from_value(serde_json::json!({"search": "asha", "page": "2", "limit": "x"}))
                .unwrap();
        assert_eq!(query.search.as_deref(), Some("asha"));
        assert_eq!(query.pagination.resolve(5), PageRequest { page: 2, limit: 5 });
    }

    #[test]
    fn test_paginated_meta() {
        let page = Paginated::new(vec!["a", "b"], PageRequest { page: 1, limit: 2 }, 5);
        assert!(page.success);
        assert_eq!(page.meta.total_pages, 3);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["meta"]["totalPages"], 3);
    }
}

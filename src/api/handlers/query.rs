//! Query strings shared by the listing handlers.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::rules::parse_day;
use crate::errors::{AppError, AppResult};
use crate::types::{PageRequest, PaginationParams};

/// `?search=&page=&limit=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl SearchQuery {
    pub fn term(&self) -> Option<String> {
        search_term(self.search.as_deref())
    }

    pub fn page(&self, default_limit: u64) -> PageRequest {
        self.pagination.resolve(default_limit)
    }
}

/// Trimmed search text; blank means no search.
pub fn search_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Optional day filter; blank is absent, garbage is a 400.
pub fn day_param(name: &str, raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse_day(value)
            .map(Some)
            .ok_or_else(|| AppError::bad_request(format!("Invalid {name}: {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;

    #[test]
    fn test_search_query_from_string_values() {
        let uri = "/api/v1/guest?search=%20ravi%20&page=2&limit=abc".parse().unwrap();
        let Query(query) = Query::<SearchQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.term().as_deref(), Some("ravi"));
        let page = query.page(5);
        assert_eq!((page.page, page.limit), (2, 5));
    }

    #[test]
    fn test_day_param() {
        assert_eq!(day_param("dob", Some("")).unwrap(), None);
        assert_eq!(
            day_param("dob", Some("1990-04-12")).unwrap(),
            NaiveDate::from_ymd_opt(1990, 4, 12)
        );
        let err = day_param("checkInDate", Some("12/04/1990")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid checkInDate: 12/04/1990");
    }
}

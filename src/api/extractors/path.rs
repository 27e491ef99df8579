//! Typed path parameter helpers.

use std::str::FromStr;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::errors::AppError;

/// Parse an identifier from a path segment.
pub fn parse_id<T: FromStr>(raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("Invalid ID: {raw}")))
}

/// Single `:id` segment parsed into a typed identifier.
pub struct IdPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: FromStr + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;
        parse_id(&raw).map(IdPath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GuestId;

    #[test]
    fn test_parse_id() {
        let id = GuestId::new();
        assert_eq!(parse_id::<GuestId>(&id.to_string()).unwrap(), id);

        let err = parse_id::<GuestId>("65f1c0ffee").unwrap_err();
        assert_eq!(err.to_string(), "Invalid ID: 65f1c0ffee");
    }
}

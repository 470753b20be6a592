//! Request Extractors
//!
//! Query parsing that never rejects with axum's plain-text body: malformed
//! query strings become validation errors and get the JSON envelope.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::error::ApiError;
use crate::models::requests::QueryParams;
use crate::validation::ValidationError;

/// Query parameters decoded into `T`, first value wins for repeated keys.
#[derive(Debug, Clone)]
pub struct Params<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Params<T>
where
    T: From<QueryParams> + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|_| ApiError::Validation(ValidationError::Query))?;
        Ok(Params(T::from(QueryParams::new(pairs))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DrivingQuery;
    use axum::http::Request;

    async fn extract(uri: &str) -> Result<Params<DrivingQuery>, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        Params::<DrivingQuery>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_repeated_keys_keep_first() {
        let Params(query) = extract("/driving?origin=a&origin=b&destination=c")
            .await
            .unwrap();
        assert_eq!(query.origin.as_deref(), Some("a"));
        assert_eq!(query.destination.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_missing_query_is_empty() {
        let Params(query) = extract("/driving").await.unwrap();
        assert!(query.origin.is_none());
        assert!(query.destination.is_none());
    }

    #[tokio::test]
    async fn test_percent_decoding() {
        let Params(query) = extract("/driving?origin=1%20Elm%20St%2C%20Boston")
            .await
            .unwrap();
        assert_eq!(query.origin.as_deref(), Some("1 Elm St, Boston"));
    }
}

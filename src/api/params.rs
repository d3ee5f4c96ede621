//! Query-string parameters

use super::response::ApiError;
use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::Uri;
use std::convert::Infallible;

/// Decoded query parameters in request order
///
/// Lookups follow the usual form conventions: the first occurrence of a key
/// wins and blank values are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Parse the query string of `uri`; a malformed query yields no parameters
    pub fn from_uri(uri: &Uri) -> Self {
        Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map(|Query(pairs)| Self(pairs))
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn require(&self, key: &'static str) -> Result<&str, ApiError> {
        self.get(key).ok_or(ApiError::MissingParameter(key))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for QueryParams {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_uri(&parts.uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(uri: &str) -> QueryParams {
        QueryParams::from_uri(&uri.parse::<Uri>().unwrap())
    }

    #[test]
    fn test_decodes_values() {
        let p = params("/add?user=al%20ice&password=a+b");
        assert_eq!(p.get("user"), Some("al ice"));
        assert_eq!(p.get("password"), Some("a b"));
    }

    #[test]
    fn test_first_value_wins() {
        let p = params("/add?user=first&user=second");
        assert_eq!(p.get("user"), Some("first"));
    }

    #[test]
    fn test_blank_is_absent() {
        let p = params("/add?user=&days=");
        assert_eq!(p.get("user"), None);
        assert_eq!(p.get_or("days", "30"), "30");
        assert_eq!(
            p.require("user"),
            Err(ApiError::MissingParameter("user"))
        );
    }

    #[test]
    fn test_no_query() {
        let p = params("/del");
        assert_eq!(p.get("auth"), None);
    }
}

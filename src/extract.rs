//! Request extractors shared by the user handlers.

use std::collections::HashMap;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde_json::error::Category;

use crate::error::AppError;

/// A flat JSON object of string values, read without requiring a
/// `Content-Type` header.
///
/// Rejections distinguish an empty body, broken JSON syntax and any other
/// decode failure, and an object with no keys is rejected as well.
#[derive(Debug, Clone, Default)]
pub struct JsonMap(pub HashMap<String, String>);

impl JsonMap {
    pub fn parse(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::bad_request("empty request body"));
        }
        let data: Option<HashMap<String, String>> = serde_json::from_slice(body).map_err(|e| {
            match e.classify() {
                Category::Syntax => AppError::bad_request("invalid json syntax"),
                _ => AppError::bad_request(e.to_string().to_lowercase()),
            }
        })?;
        match data {
            Some(map) if !map.is_empty() => Ok(JsonMap(map)),
            _ => Err(AppError::bad_request("no data provided")),
        }
    }

    /// Value for `key`, trimmed; missing or blank values are rejected.
    pub fn required(&self, key: &str) -> Result<&str, AppError> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::bad_request(format!("`{key}` is required")))
    }

    /// Like `required`, but keeps surrounding whitespace. For passwords.
    pub fn required_raw(&self, key: &str) -> Result<&str, AppError> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::bad_request(format!("`{key}` is required")))
    }

    /// Strict `"true"` / `"false"` flag.
    pub fn flag(&self, key: &str) -> Result<bool, AppError> {
        match self.required(key)? {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(AppError::bad_request(format!("`{key}` must be \"true\" or \"false\""))),
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonMap
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text().to_lowercase()))?;
        JsonMap::parse(&body)
    }
}

/// Numeric id taken from the trailing `:id` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("invalid user id"))?;
        raw.trim()
            .parse::<i64>()
            .map(UserId)
            .map_err(|_| AppError::bad_request("invalid user id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(err: AppError) -> String {
        match err {
            AppError::BadRequest(m) => m,
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_whitespace_bodies() {
        assert_eq!(msg(JsonMap::parse(b"").unwrap_err()), "empty request body");
        assert_eq!(msg(JsonMap::parse(b"  \n").unwrap_err()), "empty request body");
    }

    #[test]
    fn syntax_errors_are_named() {
        assert_eq!(msg(JsonMap::parse(b"{email: x}").unwrap_err()), "invalid json syntax");
        assert_eq!(msg(JsonMap::parse(b"not json").unwrap_err()), "invalid json syntax");
    }

    #[test]
    fn other_decode_failures_keep_decoder_message() {
        let m = msg(JsonMap::parse(br#"{"active": true}"#).unwrap_err());
        assert!(m.contains("invalid type"), "{m}");
        assert_eq!(m, m.to_lowercase());

        let m = msg(JsonMap::parse(br#"{"email": "a@b.co""#).unwrap_err());
        assert!(m.contains("eof"), "{m}");
    }

    #[test]
    fn null_and_empty_object_carry_no_data() {
        assert_eq!(msg(JsonMap::parse(b"null").unwrap_err()), "no data provided");
        assert_eq!(msg(JsonMap::parse(b"{}").unwrap_err()), "no data provided");
    }

    #[test]
    fn required_and_flag() {
        let map = JsonMap::parse(br#"{"email": "  a@b.co ", "blank": "  ", "on": "true", "off": "false", "odd": "yes"}"#).unwrap();
        assert_eq!(map.required("email").unwrap(), "a@b.co");
        assert_eq!(msg(map.required("blank").unwrap_err()), "`blank` is required");
        assert_eq!(msg(map.required("missing").unwrap_err()), "`missing` is required");
        assert!(map.flag("on").unwrap());
        assert!(!map.flag("off").unwrap());
        assert!(map.flag("odd").is_err());
    }

    #[test]
    fn raw_values_keep_whitespace() {
        let map = JsonMap::parse(br#"{"password": " spaced "}"#).unwrap();
        assert_eq!(map.required_raw("password").unwrap(), " spaced ");
    }
}

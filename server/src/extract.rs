//! Inbound Payload Extraction
//!
//! Webhook senders are inconsistent about encodings: some post JSON, some
//! post URL-encoded forms, some send numbers where strings are expected.
//! [`Payload`] accepts both encodings, [`QueryParams`] answers bad query
//! strings with a JSON error, and the `lenient_*` helpers normalize field
//! values to strings.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::CONTENT_TYPE, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::json;
use validator::ValidationErrors;

/// Request body decoded from JSON or `application/x-www-form-urlencoded`.
///
/// A missing content type is decoded as JSON; an empty body decodes as an
/// empty object so every optional field is simply absent.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

/// Body could not be decoded.
#[derive(Debug)]
pub struct PayloadRejection(String);

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self.0, "Rejected inbound payload");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid request body" })),
        )
            .into_response()
    }
}

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| PayloadRejection(e.to_string()))?;

        let value = if is_form {
            serde_urlencoded::from_bytes(&body).map_err(|e| PayloadRejection(e.to_string()))?
        } else if body.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_slice(b"{}").map_err(|e| PayloadRejection(e.to_string()))?
        } else {
            serde_json::from_slice(&body).map_err(|e| PayloadRejection(e.to_string()))?
        };

        Ok(Self(value))
    }
}

/// Query string decoded with a JSON error body, like [`Payload`].
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = QueryRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        serde_urlencoded::from_str(query)
            .map(Self)
            .map_err(|e| QueryRejection(e.to_string()))
    }
}

/// Query string could not be decoded.
#[derive(Debug)]
pub struct QueryRejection(String);

impl IntoResponse for QueryRejection {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self.0, "Rejected query string");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid query string" })),
        )
            .into_response()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Deserialize an optional text field that may arrive as a string, number or
/// boolean. `null` becomes `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrText {
    List(Vec<Scalar>),
    Text(String),
}

/// Deserialize an optional list that may arrive as an array or as a
/// comma-separated string (forms cannot carry arrays). Blank entries are
/// dropped.
pub fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<String>> = match Option::<ListOrText>::deserialize(deserializer)? {
        None => None,
        Some(ListOrText::List(items)) => Some(items.into_iter().map(String::from).collect()),
        Some(ListOrText::Text(text)) => Some(text.split(',').map(str::to_string).collect()),
    };

    Ok(items.map(|items| {
        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }))
}

/// First message attached to a validation failure.
pub fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| "Invalid request body".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_string")]
        lead_id: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        first_name: Option<String>,
        #[serde(default, deserialize_with = "lenient_list")]
        tags: Option<Vec<String>>,
    }

    async fn decode(content_type: Option<&str>, body: &'static str) -> Result<Sample, StatusCode> {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body)).unwrap();
        Payload::<Sample>::from_request(req, &())
            .await
            .map(|Payload(sample)| sample)
            .map_err(|rejection| rejection.into_response().status())
    }

    #[tokio::test]
    async fn test_json_body_with_numeric_id() {
        let sample = decode(
            Some("application/json"),
            r#"{"leadId": 42, "firstName": "Ada", "tags": ["a", " b ", ""]}"#,
        )
        .await
        .unwrap();

        assert_eq!(sample.lead_id.as_deref(), Some("42"));
        assert_eq!(sample.first_name.as_deref(), Some("Ada"));
        assert_eq!(sample.tags, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[tokio::test]
    async fn test_form_body() {
        let sample = decode(
            Some("application/x-www-form-urlencoded"),
            "leadId=7&firstName=Jos%C3%A9&tags=new,%20hot",
        )
        .await
        .unwrap();

        assert_eq!(sample.lead_id.as_deref(), Some("7"));
        assert_eq!(sample.first_name.as_deref(), Some("José"));
        assert_eq!(sample.tags, Some(vec!["new".to_string(), "hot".to_string()]));
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_object() {
        let sample = decode(None, "").await.unwrap();
        assert!(sample.lead_id.is_none());
        assert!(sample.tags.is_none());
    }

    #[tokio::test]
    async fn test_null_is_absent() {
        let sample = decode(Some("application/json"), r#"{"leadId": null}"#)
            .await
            .unwrap();
        assert!(sample.lead_id.is_none());
    }

    #[tokio::test]
    async fn test_query_params() {
        let req = axum::http::Request::builder()
            .uri("/?leadId=9&firstName=Ada")
            .body(())
            .unwrap();
        let (mut parts, ()) = req.into_parts();
        let QueryParams(sample) = QueryParams::<Sample>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(sample.lead_id.as_deref(), Some("9"));
        assert_eq!(sample.first_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_duplicate_query_field_is_bad_request() {
        let req = axum::http::Request::builder()
            .uri("/?leadId=1&leadId=2")
            .body(())
            .unwrap();
        let (mut parts, ()) = req.into_parts();
        let rejection = QueryParams::<Sample>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let status = decode(Some("application/json"), "{not json").await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

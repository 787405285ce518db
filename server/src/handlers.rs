//! Route handlers and the request payloads they accept.
//!
//! Handlers stay thin: decode, call the store, shape the response. Bodies are
//! read as raw bytes and decoded here rather than through `Json<T>`, so a bad
//! body always yields `{"error":"invalid JSON body"}` no matter what
//! `Content-Type` the client sent.

use axum::{
    body::Bytes,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::store::{Todo, TodoPatch};
use crate::SharedStore;

/// Body of `POST /todos`. A missing or `null` title is treated as empty.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodo {
    pub title: Option<String>,
    pub done: Option<bool>,
}

/// Body of `PATCH`/`PUT /todos/{id}`. Absent or `null` fields are left as is.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub done: Option<bool>,
}

impl From<UpdateTodo> for TodoPatch {
    fn from(input: UpdateTodo) -> Self {
        TodoPatch {
            title: input.title,
            done: input.done,
        }
    }
}

/// Id taken from the percent-decoded path remainder after `/todos/`.
///
/// Extraction fails with [`ApiError::InvalidId`] before any store access. On
/// the bare `/todos/` route there is no remainder to capture, which also
/// counts as an invalid id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoId(pub u64);

impl<S: Send + Sync> FromRequestParts<S> for TodoId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InvalidId)?;
        parse_id(&raw).map(TodoId)
    }
}

pub fn parse_id(raw: &str) -> Result<u64, ApiError> {
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::InvalidId),
    }
}

/// Decode the first JSON value in `body`. Anything after it is ignored.
///
/// A literal `null` decodes to `T::default()`, an empty payload.
pub fn decode_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<T>>()
        .next()
    {
        Some(Ok(value)) => Ok(value.unwrap_or_default()),
        _ => Err(ApiError::InvalidJson),
    }
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "welcome to todos simple API" }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn hello(Query(params): Query<Vec<(String, String)>>) -> Json<Value> {
    let name = params
        .into_iter()
        .find(|(key, _)| key == "name")
        .map(|(_, value)| value)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "world".to_string());
    Json(json!({ "message": format!("Hello, {name}!") }))
}

pub async fn list_todos(State(store): State<SharedStore>) -> Json<Vec<Todo>> {
    Json(store.list().await)
}

pub async fn create_todo(
    State(store): State<SharedStore>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let input: CreateTodo = decode_body(&body)?;
    let title = input.title.unwrap_or_default();
    let todo = store.create(&title, input.done.unwrap_or(false)).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn get_todo(
    State(store): State<SharedStore>,
    TodoId(id): TodoId,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(store.get(id).await?))
}

pub async fn update_todo(
    State(store): State<SharedStore>,
    TodoId(id): TodoId,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let input: UpdateTodo = decode_body(&body)?;
    Ok(Json(store.update(id, input.into()).await?))
}

pub async fn delete_todo(
    State(store): State<SharedStore>,
    TodoId(id): TodoId,
) -> Result<StatusCode, ApiError> {
    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Unsupported method on `/todos/{id}`. A bad id still wins with 400.
pub async fn item_method_not_allowed(_id: TodoId) -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_positive_integers() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("+7").unwrap(), 7);
    }

    #[test]
    fn parse_id_rejects_everything_else() {
        for raw in ["", "0", "-1", "abc", "1.5", "1/extra", " 1", "99999999999999999999999"] {
            assert!(
                matches!(parse_id(raw), Err(ApiError::InvalidId)),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn create_todo_fields_are_optional() {
        let input: CreateTodo = decode_body(br#"{"title":"No done field"}"#).unwrap();
        assert_eq!(input.title.as_deref(), Some("No done field"));
        assert!(input.done.is_none());

        let input: CreateTodo = decode_body(br#"{"done":true}"#).unwrap();
        assert!(input.title.is_none());
        assert_eq!(input.done, Some(true));
    }

    #[test]
    fn update_todo_distinguishes_absent_from_false() {
        let input: UpdateTodo = decode_body(br#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.done.is_none());

        let input: UpdateTodo = decode_body(br#"{"done":false,"title":""}"#).unwrap();
        assert_eq!(input.done, Some(false));
        assert_eq!(input.title.as_deref(), Some(""));
    }

    #[test]
    fn null_fields_count_as_absent() {
        let input: UpdateTodo = decode_body(br#"{"title":null,"done":null}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.done.is_none());
    }

    #[test]
    fn null_body_is_an_empty_payload() {
        let input: CreateTodo = decode_body(b"null").unwrap();
        assert!(input.title.is_none());
        assert!(input.done.is_none());

        let input: UpdateTodo = decode_body(b" null ").unwrap();
        assert!(input.title.is_none());
        assert!(input.done.is_none());
    }

    #[test]
    fn decode_body_ignores_unknown_fields_and_trailing_data() {
        let input: UpdateTodo = decode_body(br#"{"done":true,"extra":1} trailing"#).unwrap();
        assert_eq!(input.done, Some(true));
    }

    #[test]
    fn decode_body_rejects_malformed_input() {
        let bodies: [&[u8]; 6] = [b"", b"   ", b"{", b"not json", br#"{"title":5}"#, br#"{"done":"yes"}"#];
        for body in bodies {
            assert!(
                matches!(decode_body::<CreateTodo>(body), Err(ApiError::InvalidJson)),
                "expected {:?} to be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }
}

//! Route handlers for `/todo`.
//!
//! | Method | Path              | Success                   |
//! |--------|-------------------|---------------------------|
//! | GET    | `/todo/`          | 200, JSON array of items  |
//! | POST   | `/todo/`          | 201, `{"id": "<token>"}`  |
//! | GET    | `/todo/{item_id}` | 200, JSON item            |
//! | POST   | `/todo/done`      | 200, empty body           |

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use todo_core::{ItemId, ItemService, TodoItem};

use crate::error::ApiError;

/// Body of `POST /todo/`.
#[derive(Debug, Deserialize)]
pub struct CreateItem {
    pub title: String,
}

/// Response of `POST /todo/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedItem {
    pub id: ItemId,
}

/// Input of `POST /todo/done`, read from the urlencoded body or, failing
/// that, the query string. A missing `id` is treated as an empty, and
/// therefore malformed, token.
#[derive(Debug, Deserialize)]
pub struct DoneForm {
    #[serde(default)]
    pub id: String,
}

pub async fn list_items(
    State(service): State<ItemService>,
) -> Result<Json<Vec<TodoItem>>, ApiError> {
    let items = service.list().await?;
    Ok(Json(items))
}

pub async fn get_item(
    State(service): State<ItemService>,
    Path(item_id): Path<String>,
) -> Result<Json<TodoItem>, ApiError> {
    let item = service.get(&item_id).await?;
    Ok(Json(item))
}

pub async fn create_item(
    State(service): State<ItemService>,
    body: Result<Json<CreateItem>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedItem>), ApiError> {
    let Json(input) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let id = service.create(&input.title).await?;
    Ok((StatusCode::CREATED, Json(CreatedItem { id })))
}

/// The body `id` wins over the query `id`. A body that is absent or not a
/// form falls through to the query string.
pub async fn mark_done(
    State(service): State<ItemService>,
    query: Result<Query<DoneForm>, QueryRejection>,
    form: Result<Form<DoneForm>, FormRejection>,
) -> Result<StatusCode, ApiError> {
    let from_body = form.ok().map(|Form(input)| input.id);
    let from_query = query.ok().map(|Query(input)| input.id);
    let id = [from_body, from_query]
        .into_iter()
        .flatten()
        .find(|id| !id.is_empty())
        .unwrap_or_default();
    service.mark_done(&id).await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_item_requires_title() {
        let input: CreateItem = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert_eq!(input.title, "Buy milk");
        assert!(serde_json::from_str::<CreateItem>(r#"{"name":"Buy milk"}"#).is_err());
    }

    #[test]
    fn created_item_serializes_token() {
        let id: ItemId = "01ARZ3NDEKTSV4RRFFQ69G5FAV".parse().unwrap();
        let json = serde_json::to_string(&CreatedItem { id }).unwrap();
        assert_eq!(json, r#"{"id":"01ARZ3NDEKTSV4RRFFQ69G5FAV"}"#);
    }
}

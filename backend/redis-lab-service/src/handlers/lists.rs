/// List endpoints under `/api/redis/list`
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::StoreData;
use crate::error::Result;

fn default_start() -> isize {
    0
}

fn default_end() -> isize {
    9
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    #[serde(default = "default_start")]
    pub start: isize,
    #[serde(default = "default_end")]
    pub end: isize,
}

/// `POST /api/redis/list/{key}` with a JSON array body
pub async fn push(
    store: StoreData,
    key: web::Path<String>,
    values: web::Json<Vec<String>>,
) -> Result<HttpResponse> {
    let len = store.push_to_list(&key, &values).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Values pushed to list",
        "added": values.len(),
        "size": len,
    })))
}

/// `GET /api/redis/list/{key}`
pub async fn get_all(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    let items = store.list_range(&key, 0, -1).await?;
    let size = store.list_size(&key).await?;
    Ok(HttpResponse::Ok().json(json!({ "size": size, "items": items })))
}

/// `GET /api/redis/list/{key}/range?start&end`
pub async fn range(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse> {
    let items = store.list_range(&key, query.start, query.end).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// `DELETE /api/redis/list/{key}/pop`
pub async fn pop(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    let value = store.pop_from_list(&key).await?;
    Ok(HttpResponse::Ok().json(value))
}

/// `GET /api/redis/list/{key}/size`
pub async fn size(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    let size = store.list_size(&key).await?;
    Ok(HttpResponse::Ok().json(size))
}

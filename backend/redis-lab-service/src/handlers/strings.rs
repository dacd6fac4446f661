/// String (scalar) endpoints under `/api/redis/string`
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::StoreData;
use crate::error::Result;

fn default_ttl_seconds() -> u64 {
    60
}

#[derive(Debug, Deserialize)]
pub struct SetStringQuery {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct SetWithTtlQuery {
    pub key: String,
    pub value: String,
    #[serde(default = "default_ttl_seconds")]
    pub seconds: u64,
}

#[derive(Debug, Deserialize)]
pub struct DeltaQuery {
    pub delta: i64,
}

/// `POST /api/redis/string?key&value`
pub async fn set_string(store: StoreData, query: web::Query<SetStringQuery>) -> Result<HttpResponse> {
    store.set_string(&query.key, &query.value).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "String value set",
        "key": query.key,
    })))
}

/// `GET /api/redis/string/{key}`
pub async fn get_string(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    let value = store.get_string(&key).await?;
    Ok(HttpResponse::Ok().json(value))
}

/// `POST /api/redis/string/expire?key&value&seconds`
pub async fn set_with_ttl(
    store: StoreData,
    query: web::Query<SetWithTtlQuery>,
) -> Result<HttpResponse> {
    store
        .set_string_with_ttl(&query.key, &query.value, query.seconds)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("String value set with {} second TTL", query.seconds),
        "key": query.key,
        "ttl_seconds": query.seconds,
    })))
}

/// `POST /api/redis/string/increment/{key}`
pub async fn increment(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    let value = store.increment(&key).await?;
    Ok(HttpResponse::Ok().json(value))
}

/// `POST /api/redis/string/increment/{key}/by?delta`
pub async fn increment_by(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<DeltaQuery>,
) -> Result<HttpResponse> {
    let value = store.increment_by(&key, query.delta).await?;
    Ok(HttpResponse::Ok().json(value))
}

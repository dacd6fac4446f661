/// Set endpoints under `/api/redis/set`
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::StoreData;
use crate::error::Result;

#[derive(Debug, Deserialize)]
pub struct MemberQuery {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct PairQuery {
    pub key1: String,
    pub key2: String,
}

/// `POST /api/redis/set/{key}` with a JSON array body
pub async fn add(
    store: StoreData,
    key: web::Path<String>,
    values: web::Json<Vec<String>>,
) -> Result<HttpResponse> {
    let added = store.add_to_set(&key, &values).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Members added to set",
        "added": added,
    })))
}

/// `GET /api/redis/set/{key}`
pub async fn members(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    let members = store.set_members(&key).await?;
    let size = store.set_size(&key).await?;
    Ok(HttpResponse::Ok().json(json!({ "size": size, "members": members })))
}

/// `GET /api/redis/set/{key}/contains?value`
pub async fn contains(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<MemberQuery>,
) -> Result<HttpResponse> {
    let found = store.is_set_member(&key, &query.value).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// `GET /api/redis/set/{key}/size`
pub async fn size(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.set_size(&key).await?))
}

/// `GET /api/redis/set/intersect?key1&key2`
pub async fn intersect(store: StoreData, query: web::Query<PairQuery>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.set_intersect(&query.key1, &query.key2).await?))
}

/// `GET /api/redis/set/union?key1&key2`
pub async fn union(store: StoreData, query: web::Query<PairQuery>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.set_union(&query.key1, &query.key2).await?))
}

/// `GET /api/redis/set/difference?key1&key2`
pub async fn difference(store: StoreData, query: web::Query<PairQuery>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.set_difference(&query.key1, &query.key2).await?))
}

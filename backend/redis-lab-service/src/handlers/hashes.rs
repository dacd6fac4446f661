/// Hash endpoints under `/api/redis/hash`
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use validator::Validate;

use super::StoreData;
use crate::error::Result;
use crate::models::{FieldValue, UserProfile};

#[derive(Debug, Deserialize)]
pub struct FieldQuery {
    pub field: String,
}

#[derive(Debug, Deserialize)]
pub struct FieldValueQuery {
    pub field: String,
    pub value: String,
}

/// `POST /api/redis/hash/{key}/field?field&value`
///
/// Query values arrive as text and are stored as text.
pub async fn set_field(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<FieldValueQuery>,
) -> Result<HttpResponse> {
    let FieldValueQuery { field, value } = query.into_inner();
    store
        .set_hash_field(&key, &field, FieldValue::Text(value))
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": format!("Field '{field}' set") })))
}

/// `POST /api/redis/hash/{key}/user` with a user profile body
pub async fn set_user(
    store: StoreData,
    key: web::Path<String>,
    user: web::Json<UserProfile>,
) -> Result<HttpResponse> {
    user.validate()?;
    store.set_hash_all(&key, &user.to_fields()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "User profile stored" })))
}

/// `POST /api/redis/hash/{key}` with a JSON object body
pub async fn set_all(
    store: StoreData,
    key: web::Path<String>,
    fields: web::Json<BTreeMap<String, FieldValue>>,
) -> Result<HttpResponse> {
    store.set_hash_all(&key, &fields).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Hash fields set",
        "fields": fields.len(),
    })))
}

/// `GET /api/redis/hash/{key}`
pub async fn get_all(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.get_hash_all(&key).await?))
}

/// `GET /api/redis/hash/{key}/field?field`
pub async fn get_field(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<FieldQuery>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.get_hash_field(&key, &query.field).await?))
}

/// `GET /api/redis/hash/{key}/keys`
pub async fn fields(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.hash_fields(&key).await?))
}

/// `GET /api/redis/hash/{key}/values`
pub async fn values(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.hash_values(&key).await?))
}

/// `GET /api/redis/hash/{key}/exists?field`
pub async fn field_exists(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<FieldQuery>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.hash_field_exists(&key, &query.field).await?))
}

/// HyperLogLog endpoints under `/api/redis/hyperloglog`
use actix_web::{web, HttpResponse};
use serde_json::json;

use super::StoreData;
use crate::error::Result;

/// `POST /api/redis/hyperloglog/{key}` with a JSON array body
pub async fn add(
    store: StoreData,
    key: web::Path<String>,
    values: web::Json<Vec<String>>,
) -> Result<HttpResponse> {
    let added = store.add_to_hyperloglog(&key, &values).await?;
    let total = store.hyperloglog_count(&key).await?;
    Ok(HttpResponse::Ok().json(json!({
        "added_count": added,
        "total_unique_count": total,
    })))
}

/// `GET /api/redis/hyperloglog/{key}/count`
pub async fn count(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    let total = store.hyperloglog_count(&key).await?;
    Ok(HttpResponse::Ok().json(json!({ "unique_count": total })))
}

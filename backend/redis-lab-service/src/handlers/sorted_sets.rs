/// Sorted set endpoints under `/api/redis/sortedset`
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::StoreData;
use crate::error::Result;
use crate::handlers::lists::RangeQuery;
use crate::models::RangeOrder;

#[derive(Debug, Deserialize)]
pub struct ScoredMemberQuery {
    pub value: String,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct MemberQuery {
    pub value: String,
}

/// `POST /api/redis/sortedset/{key}?value&score`
pub async fn add(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<ScoredMemberQuery>,
) -> Result<HttpResponse> {
    store.add_to_sorted_set(&key, &query.value, query.score).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Member added to sorted set",
        "value": query.value,
        "score": query.score,
    })))
}

async fn range_in_order(
    store: StoreData,
    key: &str,
    query: &RangeQuery,
    order: RangeOrder,
) -> Result<HttpResponse> {
    let members = store
        .sorted_set_range(key, query.start, query.end, order)
        .await?;
    Ok(HttpResponse::Ok().json(members))
}

/// `GET /api/redis/sortedset/{key}/range?start&end`
pub async fn range(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse> {
    range_in_order(store, &key, &query, RangeOrder::Ascending).await
}

/// `GET /api/redis/sortedset/{key}/reverse?start&end`
pub async fn reverse_range(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse> {
    range_in_order(store, &key, &query, RangeOrder::Descending).await
}

/// `GET /api/redis/sortedset/{key}/rank?value`
pub async fn rank(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<MemberQuery>,
) -> Result<HttpResponse> {
    let rank = store.sorted_set_rank(&key, &query.value).await?;
    let score = store.sorted_set_score(&key, &query.value).await?;
    Ok(HttpResponse::Ok().json(json!({
        "value": query.value,
        "rank": rank,
        "score": score,
    })))
}

/// `GET /api/redis/sortedset/{key}/score?value`
pub async fn score(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<MemberQuery>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.sorted_set_score(&key, &query.value).await?))
}

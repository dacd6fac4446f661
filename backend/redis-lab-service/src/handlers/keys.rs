/// Key-level endpoints under `/api/redis/key`
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::StoreData;
use crate::error::Result;

#[derive(Debug, Deserialize)]
pub struct ExpireQuery {
    pub seconds: i64,
}

/// `GET /api/redis/key/{key}/exists`
pub async fn exists(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    let exists = store.exists(&key).await?;
    Ok(HttpResponse::Ok().json(json!({ "key": key.as_str(), "exists": exists })))
}

/// `POST /api/redis/key/{key}/expire?seconds`
pub async fn expire(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<ExpireQuery>,
) -> Result<HttpResponse> {
    let applied = store.expire(&key, query.seconds).await?;
    let message = if applied {
        format!("Expiry set to {} seconds", query.seconds)
    } else {
        "Key does not exist".to_string()
    };
    Ok(HttpResponse::Ok().json(json!({
        "key": key.as_str(),
        "seconds": query.seconds,
        "applied": applied,
        "message": message,
    })))
}

/// `GET /api/redis/key/{key}/ttl`
pub async fn ttl(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    let ttl = store.ttl(&key).await?;
    Ok(HttpResponse::Ok().json(json!({
        "key": key.as_str(),
        "ttl": ttl.as_seconds(),
        "unit": "seconds",
        "status": ttl.status(),
        "message": ttl.describe(),
    })))
}

/// `DELETE /api/redis/key/{key}`
pub async fn delete(store: StoreData, key: web::Path<String>) -> Result<HttpResponse> {
    let deleted = store.delete(&key).await?;
    let message = if deleted {
        "Key deleted"
    } else {
        "Key did not exist"
    };
    Ok(HttpResponse::Ok().json(json!({
        "key": key.as_str(),
        "deleted": deleted,
        "message": message,
    })))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test::TestRequest};
    use serde_json::json;

    use crate::handlers::test_support::send;
    use crate::models::KeyTtl;
    use crate::services::data_structures::MockDataStructureStore;

    #[actix_web::test]
    async fn test_ttl_of_missing_key_uses_absent_sentinel() {
        let mut store = MockDataStructureStore::new();
        store.expect_ttl().returning(|_| Ok(KeyTtl::Absent));

        let (status, body) = send(store, TestRequest::get().uri("/api/redis/key/ghost/ttl")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ttl"], -2);
        assert_eq!(body["status"], "absent");
        assert_eq!(body["unit"], "seconds");
    }

    #[actix_web::test]
    async fn test_ttl_of_persistent_key() {
        let mut store = MockDataStructureStore::new();
        store.expect_ttl().returning(|_| Ok(KeyTtl::Persistent));

        let (_, body) = send(store, TestRequest::get().uri("/api/redis/key/config/ttl")).await;

        assert_eq!(body["ttl"], -1);
        assert_eq!(body["status"], "persistent");
    }

    #[actix_web::test]
    async fn test_expire_on_missing_key_is_not_applied() {
        let mut store = MockDataStructureStore::new();
        store
            .expect_expire()
            .withf(|key, seconds| key == "ghost" && *seconds == 30)
            .returning(|_, _| Ok(false));

        let (status, body) = send(
            store,
            TestRequest::post().uri("/api/redis/key/ghost/expire?seconds=30"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], false);
        assert_eq!(body["seconds"], 30);
    }

    #[actix_web::test]
    async fn test_non_positive_expire_is_bad_request() {
        let mut store = MockDataStructureStore::new();
        store
            .expect_expire()
            .withf(|_, seconds| *seconds == -5)
            .returning(|_, _| {
                Err(crate::services::StoreError::InvalidArgument(
                    "TTL must be at least one second, got -5".into(),
                ))
            });

        let (status, body) = send(
            store,
            TestRequest::post().uri("/api/redis/key/session/expire?seconds=-5"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
    }

    #[actix_web::test]
    async fn test_delete_then_exists() {
        let mut store = MockDataStructureStore::new();
        store.expect_delete().times(1).returning(|_| Ok(true));

        let (status, body) = send(store, TestRequest::delete().uri("/api/redis/key/k1")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], true);

        let mut store = MockDataStructureStore::new();
        store.expect_exists().returning(|_| Ok(false));

        let (_, body) = send(store, TestRequest::get().uri("/api/redis/key/k1/exists")).await;
        assert_eq!(body, json!({"key": "k1", "exists": false}));
    }
}

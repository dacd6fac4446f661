use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::{Duration, Instant};

use super::StoreData;

const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    latency_ms: u64,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: BTreeMap<&'static str, ComponentCheck>,
    timestamp: String,
}

/// Liveness probe
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn probe<F, E>(name: &str, check: F) -> ComponentCheck
where
    F: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let start = Instant::now();
    let outcome = tokio::time::timeout(CHECK_TIMEOUT, check).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let (status, message) = match outcome {
        Ok(Ok(())) => (ComponentStatus::Healthy, format!("{name} reachable")),
        Ok(Err(e)) => (ComponentStatus::Unhealthy, format!("{name} check failed: {e}")),
        Err(_) => (
            ComponentStatus::Unhealthy,
            format!("{name} check timed out after {}s", CHECK_TIMEOUT.as_secs()),
        ),
    };

    ComponentCheck {
        status,
        message,
        latency_ms,
    }
}

/// Readiness probe: Redis `PING` and PostgreSQL `SELECT 1`.
///
/// 200 when both answer, 503 otherwise.
pub async fn readiness(store: StoreData, pool: web::Data<PgPool>) -> impl Responder {
    let redis = probe("Redis", store.ping()).await;
    let postgres = probe("PostgreSQL", async {
        sqlx::query("SELECT 1")
            .execute(pool.get_ref())
            .await
            .map(|_| ())
    })
    .await;

    let mut checks = BTreeMap::new();
    checks.insert("redis", redis);
    checks.insert("postgresql", postgres);

    let ready = checks
        .values()
        .all(|check| check.status == ComponentStatus::Healthy);
    if !ready {
        tracing::warn!("readiness check failed");
    }

    let body = ReadinessResponse {
        ready,
        status: if ready {
            ComponentStatus::Healthy
        } else {
            ComponentStatus::Unhealthy
        },
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

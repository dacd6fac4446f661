//! Prometheus gauges for the database connection pool

use once_cell::sync::Lazy;
use prometheus::{IntGaugeVec, Opts};
use sqlx::PgPool;

static DB_POOL_CONNECTIONS: Lazy<IntGaugeVec> = Lazy::new(|| {
    let gauge = IntGaugeVec::new(
        Opts::new(
            "db_pool_connections",
            "Database pool connection count by state",
        ),
        &["service", "state"],
    )
    .expect("valid metric definition");
    prometheus::default_registry()
        .register(Box::new(gauge.clone()))
        .expect("failed to register db_pool_connections");
    gauge
});

/// Publish idle/active/max connection counts for `pool`.
pub fn record_pool_state(pool: &PgPool, service: &str) {
    let size = i64::from(pool.size());
    let idle = pool.num_idle() as i64;

    DB_POOL_CONNECTIONS
        .with_label_values(&[service, "idle"])
        .set(idle);
    DB_POOL_CONNECTIONS
        .with_label_values(&[service, "active"])
        .set((size - idle).max(0));
    DB_POOL_CONNECTIONS
        .with_label_values(&[service, "max"])
        .set(i64::from(pool.options().get_max_connections()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_pool_state_is_published() {
        let pool = PgPoolOptions::new()
            .max_connections(7)
            .connect_lazy("postgres://localhost/metrics_test")
            .unwrap();

        record_pool_state(&pool, "metrics-test");

        let families = prometheus::default_registry().gather();
        let family = families
            .iter()
            .find(|f| f.get_name() == "db_pool_connections")
            .expect("db_pool_connections registered");
        let max = family
            .get_metric()
            .iter()
            .find(|m| {
                let labels = m.get_label();
                labels.iter().any(|l| l.get_value() == "metrics-test")
                    && labels.iter().any(|l| l.get_value() == "max")
            })
            .expect("max gauge for service");
        assert_eq!(max.get_gauge().get_value(), 7.0);
    }
}

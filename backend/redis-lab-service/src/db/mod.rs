pub mod product_repo;

pub use product_repo::{PgProductRepository, ProductRepository};

use sqlx::PgPool;

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

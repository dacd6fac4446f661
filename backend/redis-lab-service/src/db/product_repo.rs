use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::{CreateProductRequest, Product};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock, category, created_at, updated_at";

/// Persistence for catalog products
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Product>, sqlx::Error>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, sqlx::Error>;

    async fn insert(&self, req: &CreateProductRequest) -> Result<Product, sqlx::Error>;

    /// Overwrite all mutable columns; `None` if the row vanished.
    async fn update(&self, product: &Product) -> Result<Option<Product>, sqlx::Error>;

    async fn delete(&self, id: i64) -> Result<bool, sqlx::Error>;

    async fn find_by_name_containing(&self, name: &str) -> Result<Vec<Product>, sqlx::Error>;

    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, sqlx::Error>;

    async fn find_by_price_between(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<Product>, sqlx::Error>;
}

/// PostgreSQL-backed product repository
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so user input matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert(&self, req: &CreateProductRequest) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, price, stock, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.stock)
        .bind(&req.category)
        .fetch_one(&self.pool)
        .await
    }

    async fn update(&self, product: &Product) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, stock = $5, category = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(&product.category)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_name_containing(&self, name: &str) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE name LIKE '%' || $1 || '%' ESCAPE '\'
            ORDER BY id
            "#
        ))
        .bind(escape_like(name))
        .fetch_all(&self.pool)
        .await
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY id"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await
    }

    async fn find_by_price_between(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE price BETWEEN $1 AND $2
            ORDER BY price, id
            "#
        ))
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await
    }
}

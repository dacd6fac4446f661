use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::{CreateProductRequest, Product, ProductPatch};

/// Catalog operations over a `ProductRepository`
#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

/// Prices are stored as `NUMERIC(12, 2)`.
const PRICE_SCALE: u32 = 2;
const PRICE_CEILING: i64 = 10_000_000_000;

fn ensure_valid_price(price: Decimal) -> Result<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::Validation(format!(
            "price must be zero or greater, got {price}"
        )));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(AppError::Validation(format!(
            "price must have at most {PRICE_SCALE} decimal places, got {price}"
        )));
    }
    if price >= Decimal::from(PRICE_CEILING) {
        return Err(AppError::Validation(format!(
            "price must be less than {PRICE_CEILING}, got {price}"
        )));
    }
    Ok(())
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("product {id} not found"))
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get_product(&self, id: i64) -> Result<Product> {
        self.repo.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn create_product(&self, req: CreateProductRequest) -> Result<Product> {
        req.validate()?;
        ensure_valid_price(req.price)?;

        let product = self.repo.insert(&req).await?;
        info!(product_id = product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Product> {
        patch.validate()?;
        if let Some(price) = patch.price {
            ensure_valid_price(price)?;
        }

        let mut product = self.get_product(id).await?;
        if patch.is_empty() {
            return Ok(product);
        }
        patch.apply(&mut product);

        let updated = self
            .repo
            .update(&product)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(product_id = id, "product updated");
        Ok(updated)
    }

    pub async fn delete_product(&self, id: i64) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(not_found(id));
        }
        info!(product_id = id, "product deleted");
        Ok(())
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Product>> {
        Ok(self.repo.find_by_name_containing(name).await?)
    }

    pub async fn search_by_category(&self, category: &str) -> Result<Vec<Product>> {
        Ok(self.repo.find_by_category(category).await?)
    }

    /// Inclusive on both ends.
    pub async fn search_by_price_range(&self, min: Decimal, max: Decimal) -> Result<Vec<Product>> {
        if min > max {
            return Err(AppError::BadRequest(format!(
                "minPrice {min} is greater than maxPrice {max}"
            )));
        }
        Ok(self.repo.find_by_price_between(min, max).await?)
    }
}

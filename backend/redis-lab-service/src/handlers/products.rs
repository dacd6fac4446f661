/// Product catalog handlers under `/api/products`
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::models::{CreateProductRequest, NameSearchQuery, PriceRangeQuery, ProductPatch};
use crate::services::ProductService;

/// List all products
pub async fn list_products(service: web::Data<ProductService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.list_products().await?))
}

/// Get a specific product
pub async fn get_product(
    service: web::Data<ProductService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.get_product(*id).await?))
}

/// Create a new product
pub async fn create_product(
    service: web::Data<ProductService>,
    req: web::Json<CreateProductRequest>,
) -> Result<HttpResponse> {
    let product = service.create_product(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

/// Update product fields that are present in the body
pub async fn update_product(
    service: web::Data<ProductService>,
    id: web::Path<i64>,
    patch: web::Json<ProductPatch>,
) -> Result<HttpResponse> {
    let product = service.update_product(*id, patch.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Delete a product
pub async fn delete_product(
    service: web::Data<ProductService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    service.delete_product(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// `GET /api/products/search?name`
pub async fn search_by_name(
    service: web::Data<ProductService>,
    query: web::Query<NameSearchQuery>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.search_by_name(&query.name).await?))
}

/// `GET /api/products/category/{category}`
pub async fn search_by_category(
    service: web::Data<ProductService>,
    category: web::Path<String>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service.search_by_category(&category).await?))
}

/// `GET /api/products/price-range?minPrice&maxPrice`
pub async fn search_by_price_range(
    service: web::Data<ProductService>,
    query: web::Query<PriceRangeQuery>,
) -> Result<HttpResponse> {
    let products = service
        .search_by_price_range(query.min_price, query.max_price)
        .await?;
    Ok(HttpResponse::Ok().json(products))
}

/// Route table for redis-lab-service
use actix_web::web;

use crate::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::handlers::{
    geo, hashes, health, hyperloglog, keys, lists, products, sets, sorted_sets, strings,
};
use crate::metrics;

/// Register every route plus the extractor error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .configure(configure_health)
        .configure(configure_redis)
        .configure(configure_products);
}

pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::liveness))
        .route("/health/live", web::get().to(health::liveness))
        .route("/health/ready", web::get().to(health::readiness))
        .route("/metrics", web::get().to(metrics::metrics_handler));
}

pub fn configure_redis(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/redis")
            .service(
                web::scope("/string")
                    .route("", web::post().to(strings::set_string))
                    .route("/expire", web::post().to(strings::set_with_ttl))
                    .route("/increment/{key}", web::post().to(strings::increment))
                    .route("/increment/{key}/by", web::post().to(strings::increment_by))
                    .route("/{key}", web::get().to(strings::get_string)),
            )
            .service(
                web::scope("/list")
                    .route("/{key}", web::post().to(lists::push))
                    .route("/{key}", web::get().to(lists::get_all))
                    .route("/{key}/range", web::get().to(lists::range))
                    .route("/{key}/pop", web::delete().to(lists::pop))
                    .route("/{key}/size", web::get().to(lists::size)),
            )
            .service(
                // Fixed paths first so they are not captured as keys
                web::scope("/set")
                    .route("/intersect", web::get().to(sets::intersect))
                    .route("/union", web::get().to(sets::union))
                    .route("/difference", web::get().to(sets::difference))
                    .route("/{key}", web::post().to(sets::add))
                    .route("/{key}", web::get().to(sets::members))
                    .route("/{key}/contains", web::get().to(sets::contains))
                    .route("/{key}/size", web::get().to(sets::size)),
            )
            .service(
                web::scope("/sortedset")
                    .route("/{key}", web::post().to(sorted_sets::add))
                    .route("/{key}/range", web::get().to(sorted_sets::range))
                    .route("/{key}/reverse", web::get().to(sorted_sets::reverse_range))
                    .route("/{key}/rank", web::get().to(sorted_sets::rank))
                    .route("/{key}/score", web::get().to(sorted_sets::score)),
            )
            .service(
                web::scope("/hash")
                    .route("/{key}", web::post().to(hashes::set_all))
                    .route("/{key}", web::get().to(hashes::get_all))
                    .route("/{key}/field", web::post().to(hashes::set_field))
                    .route("/{key}/field", web::get().to(hashes::get_field))
                    .route("/{key}/user", web::post().to(hashes::set_user))
                    .route("/{key}/keys", web::get().to(hashes::fields))
                    .route("/{key}/values", web::get().to(hashes::values))
                    .route("/{key}/exists", web::get().to(hashes::field_exists)),
            )
            .service(
                web::scope("/hyperloglog")
                    .route("/{key}", web::post().to(hyperloglog::add))
                    .route("/{key}/count", web::get().to(hyperloglog::count)),
            )
            .service(
                web::scope("/geo")
                    .route("/{key}", web::post().to(geo::add))
                    .route("/{key}/batch", web::post().to(geo::add_batch))
                    .route("/{key}/distance", web::get().to(geo::distance))
                    .route("/{key}/radius", web::get().to(geo::radius))
                    .route("/{key}/radius/member", web::get().to(geo::radius_by_member)),
            )
            .service(
                web::scope("/key")
                    .route("/{key}", web::delete().to(keys::delete))
                    .route("/{key}/exists", web::get().to(keys::exists))
                    .route("/{key}/expire", web::post().to(keys::expire))
                    .route("/{key}/ttl", web::get().to(keys::ttl)),
            ),
    );
}

pub fn configure_products(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/products")
            .route("", web::get().to(products::list_products))
            .route("", web::post().to(products::create_product))
            .route("/search", web::get().to(products::search_by_name))
            .route("/category/{category}", web::get().to(products::search_by_category))
            .route("/price-range", web::get().to(products::search_by_price_range))
            .route("/{id}", web::get().to(products::get_product))
            .route("/{id}", web::put().to(products::update_product))
            .route("/{id}", web::delete().to(products::delete_product)),
    );
}

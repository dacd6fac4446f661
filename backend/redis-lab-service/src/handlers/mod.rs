/// HTTP handlers
///
/// One module per Redis data structure kind, plus the product catalog and
/// health probes. Handlers only extract parameters, call the facade or the
/// catalog service, and shape the JSON response.
pub mod geo;
pub mod hashes;
pub mod health;
pub mod hyperloglog;
pub mod keys;
pub mod lists;
pub mod products;
pub mod sets;
pub mod sorted_sets;
pub mod strings;

use actix_web::web;

use crate::services::DataStructureStore;

/// Shared facade handle injected into every Redis handler.
pub type StoreData = web::Data<dyn DataStructureStore>;

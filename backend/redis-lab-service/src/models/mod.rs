/// Data models shared by handlers, services and repositories
pub mod product;
pub mod structures;

pub use product::{CreateProductRequest, NameSearchQuery, PriceRangeQuery, Product, ProductPatch};
pub use structures::{
    FieldValue, GeoMatch, KeyTtl, Location, RangeOrder, UserProfile, GEO_RADIUS_LIMIT,
};

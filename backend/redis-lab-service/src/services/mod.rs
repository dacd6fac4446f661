pub mod data_structures;
pub mod products;

pub use data_structures::{DataStructureStore, RedisStore, StoreError, StoreResult};
pub use products::ProductService;

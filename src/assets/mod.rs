pub mod store;
pub mod transform;

pub mod factory;
pub mod surface;

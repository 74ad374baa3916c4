pub mod compositor;
pub mod fingerprint;
pub mod rotation;
pub mod spine;
pub mod warning;

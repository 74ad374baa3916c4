pub mod dot_gain;
pub mod misregister;
pub mod pipeline;
pub mod stage;
pub mod vignette;

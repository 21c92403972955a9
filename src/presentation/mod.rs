pub mod configuration;
pub mod kind;

pub use configuration::*;
pub use kind::*;

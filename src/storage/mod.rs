//! Host types and their store-type mappings.

mod mapping;
mod types;

pub use mapping::*;
pub use types::*;

//! Registries owned by a root scope

mod classes;
mod wrappers;

pub use classes::ClassInfoRegistry;
pub use wrappers::WrapperRegistry;

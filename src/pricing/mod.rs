//! Price sources shipped with the crate

pub mod config;
pub mod static_table;

pub use config::*;
pub use static_table::*;

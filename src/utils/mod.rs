//! Utility modules

pub mod manual_clock;
pub mod validation;

pub use manual_clock::*;
pub use validation::*;

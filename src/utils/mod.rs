//! contains utils used in reading inputs and dumping matrices

pub mod files;
pub mod parameters;

pub use files::*;
pub use parameters::*;

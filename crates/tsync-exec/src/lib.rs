pub mod contract;
pub mod fake;
pub mod runner;

pub use fake::*;
pub use runner::*;

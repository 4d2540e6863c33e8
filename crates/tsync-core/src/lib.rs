pub mod commands;
pub mod engine;
pub mod error;
pub mod ids;
pub mod model;
pub mod outcomes;
pub mod types;

pub use commands::*;
pub use engine::*;
pub use error::*;
pub use ids::*;
pub use model::*;
pub use outcomes::*;
pub use types::*;

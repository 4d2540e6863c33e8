pub mod config;
pub mod doctor;
pub mod executor;
pub mod install;
pub mod project;
pub mod prober;
pub mod synchronizer;
pub mod util;

pub use config::*;
pub use doctor::*;
pub use executor::*;
pub use install::*;
pub use project::*;
pub use prober::*;
pub use synchronizer::*;
pub use util::*;

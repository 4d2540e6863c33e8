pub mod fs;
pub mod memory;
pub mod traits;

pub use fs::*;
pub use memory::*;
pub use traits::*;

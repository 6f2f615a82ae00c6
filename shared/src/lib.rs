pub mod entities;
pub mod transform;
pub mod wire;

pub use entities::*;
pub use transform::*;
pub use wire::*;

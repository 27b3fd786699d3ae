pub mod datasets;
pub mod layer;
pub mod paint;
pub mod stack;
pub mod symbology;

pub use datasets::*;
pub use layer::*;
pub use stack::*;
pub use symbology::*;

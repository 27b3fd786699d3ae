pub mod bounds;
pub mod camera;
pub mod geo;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use camera::*;
pub use geo::*;
pub use time::*;

pub mod collage;
pub mod controller;
pub mod coordinator;
pub mod map_state;
pub mod registry;
pub mod renderer;
pub mod sections;
pub mod step;
pub mod step_map;
pub mod viewport;

// Story crate: scroll steps in, camera commands and layer stacks out.
pub use collage::*;
pub use controller::*;
pub use coordinator::*;
pub use map_state::*;
pub use registry::*;
pub use renderer::*;
pub use step::*;
pub use step_map::*;
pub use viewport::*;

pub mod dataset;
pub mod geojson;
pub mod manifest;

pub use dataset::*;
pub use geojson::*;
pub use manifest::*;

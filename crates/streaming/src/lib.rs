//! Tile addressing and the tile-source contract of the rendering engine.

pub mod address;
pub mod descriptor;
pub mod format;
pub mod registry;
pub mod resolve;

pub use address::*;
pub use descriptor::*;
pub use format::*;
pub use registry::*;
pub use resolve::*;

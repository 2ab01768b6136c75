pub mod bounds;
pub mod ids;
mod number;
pub mod page;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use ids::*;
pub use page::*;

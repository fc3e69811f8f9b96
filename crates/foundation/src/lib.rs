pub mod color;
pub mod geo;
pub mod precision;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use color::*;
pub use geo::*;
pub use precision::*;
pub use time::*;

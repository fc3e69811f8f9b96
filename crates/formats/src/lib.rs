pub mod csv;
pub mod dataset;
pub mod features;
pub mod record;

pub use dataset::*;
pub use record::*;

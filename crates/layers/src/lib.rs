pub mod column;
pub mod layer;
pub mod lighting;
pub mod symbology;
pub mod tooltip;

pub use column::*;
pub use layer::*;
pub use lighting::*;
pub use symbology::*;
pub use tooltip::*;

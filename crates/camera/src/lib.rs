pub mod animator;
pub mod interaction;
pub mod transition;
pub mod view_state;

pub use animator::*;
pub use interaction::*;
pub use transition::*;
pub use view_state::*;

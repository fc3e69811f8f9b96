pub mod event_loop;
pub mod metrics;
pub mod queue;
pub mod tick;
pub mod timers;

pub use event_loop::*;
pub use metrics::*;
pub use queue::*;
pub use tick::*;
pub use timers::*;

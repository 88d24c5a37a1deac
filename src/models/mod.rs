pub mod event;
pub mod macros;
pub mod reservation;
pub mod snapshot;
pub mod time;

pub use event::*;
pub use reservation::*;
pub use snapshot::*;
pub use time::*;

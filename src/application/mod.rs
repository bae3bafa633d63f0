pub mod board_store;
pub mod error;
pub mod events;
pub mod snapshot;
mod writer;

pub use board_store::*;
pub use error::*;
pub use events::*;
pub use snapshot::*;
use writer::SnapshotWriter;

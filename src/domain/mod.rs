pub mod column;
pub mod error;
pub mod project;
pub mod task;

pub use column::*;
pub use error::*;
pub use project::*;
pub use task::*;

pub mod blob_store;
pub mod config_store;
pub mod id_generator;

pub use blob_store::*;
pub use config_store::*;
pub use id_generator::*;

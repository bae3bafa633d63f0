//! Client-side state engine for a Kanban-style project board.
//!
//! [`application::BoardStore`] owns projects, their ordered columns and the
//! ordered tasks inside each column. Storage and id generation are injected
//! through the traits in [`ports`]; [`adapters`] holds the stock
//! implementations and the command-line front end.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use application::{AppError, AppResult, BoardChange, BoardEvent, BoardSettings, BoardStore};

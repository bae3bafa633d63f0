pub mod cli;
pub mod config;
pub mod ids;
pub mod storage;

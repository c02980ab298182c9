//! Claude messages API adapter

pub mod client;
pub mod types;

//! MCP (Model Context Protocol) tool server adapter

pub mod client;
pub mod protocol;

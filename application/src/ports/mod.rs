//! Port definitions
//!
//! Ports are the interfaces through which the orchestration layer talks to
//! the two external protocols. Adapters live in the infrastructure layer.

pub mod completion_gateway;
pub mod tool_gateway;

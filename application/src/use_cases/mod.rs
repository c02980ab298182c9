//! Orchestration use cases

pub mod connect;
pub mod send_message;

#[cfg(test)]
pub(crate) mod test_support;

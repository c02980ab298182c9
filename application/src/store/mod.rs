//! Session state container

pub mod session_store;

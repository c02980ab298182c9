//! Session entities and provider response types

pub mod entities;
pub mod response;

//! Tool domain types

pub mod entities;

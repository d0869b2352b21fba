//! Entities

pub mod credential;
pub mod identity;

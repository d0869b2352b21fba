//! Stable user identifier

pub use kernel::id::UserId;

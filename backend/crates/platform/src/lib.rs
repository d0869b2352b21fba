//! Platform Crate - Technical Infrastructure
//!
//! Building blocks with no business meaning:
//! - Password hashing (Argon2id, NIST SP 800-63B policy)
//! - Cookie building and parsing
//! - `Authorization: Bearer` parsing

pub mod bearer;
pub mod cookie;
pub mod password;

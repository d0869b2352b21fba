//! User Password Value Objects
//!
//! Thin domain wrappers over `platform::password`:
//! - [`RawPassword`] is what the client sent, zeroized on drop
//! - [`UserPassword`] is the Argon2id PHC string that gets persisted
//!
//! Only the credential store touches these; handlers never see a hash.

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicyError, burn_verification,
};
use std::fmt;

/// Password as received from the client
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// A new password being chosen (sign-up, password change); policy applies
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        ClearTextPassword::new(raw).map(Self)
    }

    /// A password presented for sign-in; no policy, the stored hash decides
    pub fn presented(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    /// Spend the cost of a verification without a stored hash
    pub fn burn_verification(&self, pepper: Option<&[u8]>) -> bool {
        burn_verification(&self.0, pepper)
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Hashed password, safe to persist
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Salt and hash a validated password
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> Result<Self, PasswordHashError> {
        raw.0.hash(pepper).map(Self)
    }

    /// Rebuild from the stored PHC string
    pub fn from_db(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        HashedPassword::from_phc_string(phc).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time check
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(&raw.0, pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}

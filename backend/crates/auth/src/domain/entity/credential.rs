//! Credential Entity
//!
//! The stored login record of a user. The password hash lives only here and
//! never leaves the credential store.

use chrono::{DateTime, Utc};

use crate::domain::entity::identity::Subject;
use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};

/// Credential record
#[derive(Debug, Clone)]
pub struct Credential {
    pub user_id: UserId,
    pub email: Email,
    pub password_hash: UserPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// New record for a freshly registered user
    pub fn new(email: Email, password_hash: UserPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the password hash
    pub fn update_password(&mut self, password_hash: UserPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// Identity fields without the hash
    pub fn subject(&self) -> Subject {
        Subject {
            id: self.user_id,
            email: self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;

    fn hash(raw: &str) -> UserPassword {
        UserPassword::from_raw(&RawPassword::new(raw.to_string()).unwrap(), None).unwrap()
    }

    #[test]
    fn test_new_credential() {
        let credential = Credential::new(Email::new("a@test.com").unwrap(), hash("secret123"));
        assert_eq!(credential.created_at, credential.updated_at);

        let subject = credential.subject();
        assert_eq!(subject.id, credential.user_id);
        assert_eq!(subject.email.as_str(), "a@test.com");
    }

    #[test]
    fn test_update_password() {
        let mut credential = Credential::new(Email::new("a@test.com").unwrap(), hash("secret123"));
        let before = credential.updated_at;

        credential.update_password(hash("another-pass9"));

        assert!(credential.updated_at >= before);
        assert!(
            credential
                .password_hash
                .verify(&RawPassword::presented("another-pass9".to_string()), None)
        );
    }
}

//! Registered-user directory.
//!
//! An insertion-ordered list standing in for a real identity service.
//! Emails are unique (case-sensitive, as stored); records are never
//! removed.

use chrono::Utc;

use crate::models::{RoleData, UserRecord, UserRole};

/// The registered-user directory owned by a session store.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: Vec<UserRecord>,
}

impl Directory {
    /// Empty directory, for callers providing their own seed set
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory populated with the fixed demo accounts, one per role.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let users = vec![
            UserRecord {
                id: "finder-1".to_string(),
                name: "Alex Johnson".to_string(),
                email: "finder@test.com".to_string(),
                password: "password123".to_string(),
                role_data: RoleData::Finder {
                    finder_preferences: None,
                },
                phone: Some("+91 98765 12345".to_string()),
                photo_url: Some(UserRole::Finder.default_photo_url().to_string()),
                is_new_user: None,
                created_at: now,
                last_login: None,
            },
            UserRecord {
                id: "buddy-1".to_string(),
                name: "Rahul Sharma".to_string(),
                email: "buddy@test.com".to_string(),
                password: "password123".to_string(),
                role_data: RoleData::Buddy,
                phone: Some("+91 98765 43210".to_string()),
                photo_url: Some(UserRole::Buddy.default_photo_url().to_string()),
                is_new_user: None,
                created_at: now,
                last_login: None,
            },
        ];
        Self { users }
    }

    /// Exact-match email lookup (no normalization)
    pub fn email_exists(&self, email: &str) -> bool {
        self.users.iter().any(|u| u.email == email)
    }

    /// First record matching both email and secret exactly.
    ///
    /// A miss is uniform: callers cannot tell an unknown email from a
    /// wrong secret.
    pub fn find_credentials(&self, email: &str, password: &str) -> Option<&UserRecord> {
        self.users
            .iter()
            .find(|u| u.email == email && u.password == password)
    }

    /// Append a record, refusing duplicates. Returns false (no mutation)
    /// when the email is already present.
    pub fn insert(&mut self, record: UserRecord) -> bool {
        if self.email_exists(&record.email) {
            return false;
        }
        self.users.push(record);
        true
    }

    /// Stamp the last-login time on the record with this email
    pub fn record_login(&mut self, email: &str) {
        if let Some(user) = self.users.iter_mut().find(|u| u.email == email) {
            user.last_login = Some(Utc::now());
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.iter()
    }
}

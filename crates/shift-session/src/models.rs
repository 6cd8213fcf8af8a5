//! User and session data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default profile photo for finders who register without one
const FINDER_PHOTO_URL: &str =
    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=400&auto=format&fit=crop&q=60";

/// Default profile photo for buddies who register without one
const BUDDY_PHOTO_URL: &str =
    "https://images.unsplash.com/photo-1506794778202-cad84cf45f1d?w=400&auto=format&fit=crop&q=60";

/// The two marketplace roles: finders seek relocation help, buddies offer it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Finder,
    Buddy,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Finder => "finder",
            UserRole::Buddy => "buddy",
        }
    }

    /// Profile photo assigned at registration when none is supplied
    pub fn default_photo_url(self) -> &'static str {
        match self {
            UserRole::Finder => FINDER_PHOTO_URL,
            UserRole::Buddy => BUDDY_PHOTO_URL,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relocation preferences collected during finder onboarding.
/// Opaque to the core; consumers interpret the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinderPreferences {
    pub destination_city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_city: Option<String>,
    pub budget_range: String,
    pub preferred_language: String,
    pub move_date: String,
}

/// Role-specific payload, tagged by the `role` field.
///
/// Only finders carry preferences; a buddy record cannot hold them.
/// Flattened into the owning record so the encoded shape keeps the
/// separate `role` and `finderPreferences` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleData {
    Finder {
        #[serde(rename = "finderPreferences", skip_serializing_if = "Option::is_none")]
        finder_preferences: Option<FinderPreferences>,
    },
    Buddy,
}

impl RoleData {
    /// Build the payload for a role, dropping preferences a buddy can't hold
    pub fn new(role: UserRole, finder_preferences: Option<FinderPreferences>) -> Self {
        match role {
            UserRole::Finder => RoleData::Finder { finder_preferences },
            UserRole::Buddy => RoleData::Buddy,
        }
    }

    pub fn role(&self) -> UserRole {
        match self {
            RoleData::Finder { .. } => UserRole::Finder,
            RoleData::Buddy => UserRole::Buddy,
        }
    }

    pub fn finder_preferences(&self) -> Option<&FinderPreferences> {
        match self {
            RoleData::Finder { finder_preferences } => finder_preferences.as_ref(),
            RoleData::Buddy => None,
        }
    }
}

/// A registered user as the directory stores it, credential secret included.
///
/// Never serialized; the externalized shape is [`SessionUser`].
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Opaque credential secret, compared by exact equality only
    pub password: String,
    pub role_data: RoleData,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub is_new_user: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn role(&self) -> UserRole {
        self.role_data.role()
    }
}

/// Public session info (no secret, no directory bookkeeping)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub role_data: RoleData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new_user: Option<bool>,
}

impl SessionUser {
    pub fn role(&self) -> UserRole {
        self.role_data.role()
    }
}

impl From<&UserRecord> for SessionUser {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            email: record.email.clone(),
            role_data: record.role_data.clone(),
            phone: record.phone.clone(),
            photo_url: record.photo_url.clone(),
            is_new_user: record.is_new_user,
        }
    }
}

/// Payload for [`crate::auth::SessionStore::register`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    /// Only meaningful when `role` is finder; ignored for buddies
    #[serde(default)]
    pub finder_preferences: Option<FinderPreferences>,
}

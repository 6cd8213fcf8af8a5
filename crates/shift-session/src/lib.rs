//! ShiftBuddy client session core
//!
//! Owns the authenticated identity of one running client: credential
//! checking against the registered-user directory, session persistence
//! across restarts, and role information for route guards. Everything
//! the UI renders around it consumes this crate's output.

pub mod auth;
pub mod directory;
pub mod error;
pub mod guard;
pub mod models;
pub mod store;

pub use auth::{LoginOutcome, RegisterOutcome, SessionStore};
pub use directory::Directory;
pub use error::{Result, SessionError};
pub use guard::{authorize_role, RouteDecision};
pub use models::{FinderPreferences, RegisterRequest, RoleData, SessionUser, UserRecord, UserRole};
pub use store::{FileSessionStore, MemorySessionStore, SessionPersistence};

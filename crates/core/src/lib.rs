//! Skillzone Core Library
//!
//! Models, session handling, filtering, and text helpers shared by the
//! Skillzone network client and application.

pub mod config;
pub mod error;
pub mod filter;
pub mod invariants;
pub mod linkify;
pub mod media;
pub mod models;
pub mod session;

pub use config::{ClientConfig, StalePolicy};
pub use error::{Error, Result};
pub use filter::SearchCategory;
pub use linkify::{linkify, Segment};
pub use media::{Upload, DEFAULT_PROFILE_IMAGE};
pub use models::*;
pub use session::{
    derive_role, FileSessionStore, MemorySessionStore, Role, Session, SessionManager,
    SessionStore, ADMIN_CREDENTIAL,
};

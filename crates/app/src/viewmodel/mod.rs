//! View models driving the terminal front end
//!
//! Each view model owns its collections behind `tokio::sync::RwLock` and
//! talks to the backend only through [`crate::state::AppState`].

mod admin;
mod auth;
mod feed;
mod profile;
mod search;

pub use admin::{AdminViewModel, RenameOutcome};
pub use auth::AuthViewModel;
pub use feed::FeedViewModel;
pub use profile::{ProfileViewModel, UserPage};
pub use search::{SearchOutcome, SearchStatus, SearchViewModel};

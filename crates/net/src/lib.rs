//! Skillzone Network Library
//!
//! HTTP access to the Skillzone REST API.
//!
//! # Architecture
//!
//! - **Api**: the [`SkillzoneApi`] trait, one async method per remote operation
//! - **Client**: [`HttpClient`], the reqwest implementation of the trait
//! - **Wire**: JSON shapes and their conversion into core models
//!
//! # Usage
//!
//! ```ignore
//! let client = HttpClient::new("https://skillsetzone-1.onrender.com")?;
//! let session = client.login("ada@example.com", "secret").await?;
//! let skills = client.list_skills(&session).await?;
//! ```

pub mod api;
pub mod client;
mod endpoints;
pub mod error;
pub mod wire;

pub use api::SkillzoneApi;
pub use client::HttpClient;
pub use error::{Error, Result};

//! Data models for Skillzone

mod experience;
mod skill;
mod top_skill;
mod user;

pub use experience::*;
pub use skill::*;
pub use top_skill::*;
pub use user::*;

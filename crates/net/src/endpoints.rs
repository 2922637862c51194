//! REST paths, as path segments relative to the base URL

pub const TOP_SKILLS: &[&str] = &["admin", "skill", "all"];
pub const TOP_SKILL_CREATE: &[&str] = &["admin", "skill", "create"];
pub const TOP_SKILL_DELETE: &[&str] = &["admin", "skill", "delete"];
pub const ALL_USERS: &[&str] = &["admin", "all-users"];
pub const ADMIN_USER_PROFILE: &[&str] = &["admin", "userProfile"];
pub const ADMIN_USER_DELETE: &[&str] = &["admin", "user", "delete"];

pub const ALL_SKILLS: &[&str] = &["api", "skills", "all-skills"];
pub const OWN_SKILLS: &[&str] = &["api", "skills", "all"];
pub const SKILLS: &[&str] = &["api", "skills"];
pub const SKILL_SEARCH: &[&str] = &["api", "skills", "search"];
pub const SKILL_LIKE: &[&str] = &["api", "skills", "like"];
pub const SKILL_CREATE: &[&str] = &["api", "skills", "create"];
pub const SKILL_UPDATE: &[&str] = &["api", "skills", "update"];
pub const SKILL_DELETE: &[&str] = &["api", "skills", "delete"];

pub const PROFILE: &[&str] = &["api", "users", "profile"];
pub const PROFILE_UPDATE: &[&str] = &["api", "users", "updateUser"];

pub const OWN_EXPERIENCES: &[&str] = &["api", "expr", "all"];
pub const USER_EXPERIENCES: &[&str] = &["api", "expr", "user-email"];
pub const EXPERIENCE_CREATE: &[&str] = &["api", "expr", "create"];
pub const EXPERIENCE_DELETE: &[&str] = &["api", "expr", "delete"];

pub const SIGNUP: &[&str] = &["public", "signup"];
pub const LOGIN: &[&str] = &["public", "login"];

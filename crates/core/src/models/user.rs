//! User models

use crate::error::{Error, Result};
use crate::media::Upload;

/// Read-only user projection used by admin listings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Titles of the user's skills
    pub skills: Vec<String>,
    /// Names of the tools the user works with
    pub tools: Vec<String>,
    pub bio: Option<String>,
    pub college_branch: Option<String>,
    pub profile_image: String,
}

/// A user's public profile
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserProfile {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub college_branch: Option<String>,
    pub bio: Option<String>,
    pub profile_image: String,
}

/// Registration form
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub college_branch: Option<String>,
    pub bio: Option<String>,
    pub image: Option<Upload>,
}

impl SignupForm {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(Error::validation("email is required"));
        }
        if self.password.is_empty() {
            return Err(Error::validation("password is required"));
        }
        Ok(())
    }
}

/// Own-profile update form; empty optional fields are not sent
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub college_branch: String,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub image: Option<Upload>,
}

impl ProfileUpdate {
    /// Prefill from the currently loaded profile
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            college_branch: profile.college_branch.clone().unwrap_or_default(),
            password: None,
            bio: profile.bio.clone(),
            image: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(Error::validation("email is required"));
        }
        Ok(())
    }
}

//! Experience model

use crate::error::{Error, Result};
use crate::media::Upload;

/// An experience entry owned by exactly one user
#[derive(Debug, Clone, PartialEq)]
pub struct Experience {
    pub id: String,
    pub text: String,
    pub image: Option<String>,
}

/// Input for a new experience
#[derive(Debug, Clone, Default)]
pub struct ExperienceDraft {
    pub text: String,
    pub image: Option<Upload>,
}

impl ExperienceDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::validation("experience text is required"));
        }
        Ok(())
    }
}

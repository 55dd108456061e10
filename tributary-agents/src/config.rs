use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;

use crate::errors::{ManagerError, Result};

/// What `register` does when the name is already bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail with `ManagerError::DuplicateAgent`, leaving the manager untouched.
    #[default]
    Reject,
    /// Unindex the previous agent and bind the new one in its place.
    Replace,
}

/// Agent manager settings, usually loaded from the application's YAML file.
///
/// ```yaml
/// duplicate_policy: replace
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Behaviour of `register` on a name collision
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

impl ManagerConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(ManagerError::Config(
                "configuration document is empty".to_string(),
            ));
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }
}

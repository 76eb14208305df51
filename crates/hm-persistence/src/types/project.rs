//! Root project file type.

use chrono::{DateTime, Utc};
use hm_model::Framework;
use serde::{Deserialize, Serialize};

use super::{CommandHistory, FORMAT_VERSION};

/// Root project file structure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectFile {
    /// Format version and timestamps.
    pub info: ProjectInfo,

    /// Recorded commands, kept opaque.
    pub history: CommandHistory,

    /// Contours, grids, surfaces and boundary types.
    pub framework: Framework,
}

impl ProjectFile {
    pub fn new(framework: Framework) -> Self {
        Self {
            framework,
            ..Self::default()
        }
    }

    /// Update the last saved timestamp.
    pub fn touch(&mut self) {
        self.info.last_saved_at = Utc::now().to_rfc3339();
    }
}

/// Project-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub format_version: String,

    /// When the project was created (RFC 3339).
    pub created_at: String,

    /// When the project was last saved (RFC 3339).
    pub last_saved_at: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            format_version: FORMAT_VERSION.to_string(),
            created_at: now.clone(),
            last_saved_at: now,
        }
    }
}

impl ProjectInfo {
    /// Parse the created_at timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Parse the last_saved_at timestamp.
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.last_saved_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

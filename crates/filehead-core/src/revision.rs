//! Revision markers
//!
//! The filesystem has no versioning, so a revision is only a wall-clock
//! stamp taken when a commit completes. Revisions carry no link to the
//! patchset that produced them or to any earlier revision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Revision {
    timestamp: DateTime<Utc>,
}

impl Revision {
    /// A revision stamped with the current time.
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now(),
        }
    }

    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.timestamp.to_rfc3339())
    }
}

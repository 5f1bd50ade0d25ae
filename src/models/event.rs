// Provider events and collection targets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recent provider event (reboot, backup, failover, ...) for an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEvent {
    pub source_identifier: String,
    pub source_type: String,
    pub message: String,
    pub date: DateTime<Utc>,
    pub categories: Vec<String>,
}

/// Account profile + region pair a fetch is issued against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderTarget {
    pub profile: String,
    pub region: String,
}

impl ProviderTarget {
    pub fn new(profile: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            region: region.into(),
        }
    }
}

impl std::fmt::Display for ProviderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.profile, self.region)
    }
}

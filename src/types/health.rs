use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Available,
    Degraded,
    Unavailable,
    Unknown,
}

impl HealthStatus {
    /// Merge rank. `Unknown` ranks above `Unavailable`: no data is treated as
    /// the least trustworthy observation.
    pub fn severity(self) -> u8 {
        match self {
            HealthStatus::Available => 0,
            HealthStatus::Degraded => 1,
            HealthStatus::Unavailable => 2,
            HealthStatus::Unknown => 3,
        }
    }

    pub fn worst(self, other: HealthStatus) -> HealthStatus {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

/// Client product a health record applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceId {
    Cc,
    Cx,
}

impl ServiceId {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceId::Cc => "cc",
            ServiceId::Cx => "cx",
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduced health of one provider/service pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealth {
    pub is_healthy: bool,
    pub status: HealthStatus,
    /// Milliseconds.
    pub latency: f64,
    /// Unix milliseconds.
    pub last_checked: Option<i64>,
    /// Percentage, 0-100.
    pub availability: Option<f64>,
}

impl ProviderHealth {
    /// Record reported for pairs the snapshot has no data for.
    pub fn unknown() -> Self {
        Self {
            is_healthy: false,
            status: HealthStatus::Unknown,
            latency: 0.0,
            last_checked: None,
            availability: None,
        }
    }
}

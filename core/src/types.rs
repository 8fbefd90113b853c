//! Shared primitive types used across the entire dashboard core.

use crate::error::{DashError, DashResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of simulated days in a generation window.
pub type DayCount = u32;

/// Store platform a subscription was purchased on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Ios, Platform::Android];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ios     => "ios",
            Self::Android => "android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = DashError;

    fn from_str(s: &str) -> DashResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios"     => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            _ => Err(DashError::UnknownPlatform(s.to_string())),
        }
    }
}

/// Billing plan of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Monthly,
    Annual,
}

impl Plan {
    pub const ALL: [Plan; 2] = [Plan::Monthly, Plan::Annual];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Annual  => "annual",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Plan {
    type Err = DashError;

    fn from_str(s: &str) -> DashResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "annual"  => Ok(Self::Annual),
            _ => Err(DashError::UnknownPlan(s.to_string())),
        }
    }
}

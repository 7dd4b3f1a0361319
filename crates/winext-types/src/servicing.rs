use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATE_ENABLED: &str = "Enabled";
pub const STATE_ENABLE_PENDING: &str = "Enable Pending";

/// A servicing package as reported by `dism /Get-Packages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Release Type")]
    pub release_type: String,
    #[serde(rename = "Install Time")]
    pub install_time: String,
}

/// An optional feature as reported by `dism /Get-Features`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureInfo {
    #[serde(rename = "State")]
    pub state: String,
}

impl FeatureInfo {
    pub fn is_enabled(&self) -> bool {
        self.state == STATE_ENABLED
    }

    pub fn is_enable_pending(&self) -> bool {
        self.state == STATE_ENABLE_PENDING
    }
}

/// Outcome of `enable_feature`, shaped like an agent state return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnableFeatureReport {
    pub name: String,
    pub result: bool,
    pub changes: Map<String, Value>,
    pub comment: String,
    pub pending: bool,
    /// Raw DISM output, only filled when enabling failed
    pub dism: String,
}

impl EnableFeatureReport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            result: true,
            changes: Map::new(),
            comment: String::new(),
            pending: false,
            dism: String::new(),
        }
    }
}

//! Host facts ("grains") supplied by the agent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const OS_FAMILY: &str = "os_family";
pub const OS_RELEASE: &str = "osrelease";
pub const KERNEL: &str = "kernel";
pub const OS_VERSION: &str = "osversion";

/// Releases on which the AD FS cmdlets are available.
pub const ADFS_RELEASES: &[&str] = &["2008Server", "2008ServerR2", "2012Server", "2012ServerR2"];

/// Releases shipping AD FS 2.0, whose cmdlets live in a snap-in.
pub const SNAPIN_RELEASES: &[&str] = &["2008Server", "2008ServerR2"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grains {
    values: Map<String, Value>,
}

impl Grains {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Overlay `other` on top of these grains.
    pub fn merge(&mut self, other: Grains) {
        self.values.extend(other.values);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn os_family(&self) -> Option<&str> {
        self.get_str(OS_FAMILY)
    }

    pub fn os_release(&self) -> Option<&str> {
        self.get_str(OS_RELEASE)
    }

    pub fn kernel(&self) -> Option<&str> {
        self.get_str(KERNEL)
    }

    /// Major component of `osversion`, e.g. `6` for `6.3.9600`.
    pub fn os_version_major(&self) -> Option<u32> {
        self.get_str(OS_VERSION)?.split('.').next()?.trim().parse().ok()
    }

    pub fn is_windows(&self) -> bool {
        self.os_family() == Some("Windows")
    }

    pub fn release_in(&self, allowed: &[&str]) -> bool {
        self.os_release().is_some_and(|r| allowed.contains(&r))
    }
}

impl From<Map<String, Value>> for Grains {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

//! Windows Server installation type grain.
//!
//! Server Core has no `%windir%\explorer.exe`. On such hosts the grain
//! rewrites `osrelease` to carry a `Core` suffix (`2012ServerR2Core`). This
//! check cannot tell Nano Server apart from Server Core.

use std::path::Path;

use winext_types::grains::{Grains, OS_RELEASE};

use crate::ports::HostProbe;

/// Minimum `ProductType` of a server operating system.
const SERVER_PRODUCT_TYPE: u32 = 2;

pub async fn windows_installation_type(probe: &dyn HostProbe) -> Grains {
    let mut grains = Grains::new();

    let Some(product_type) = probe.product_type().await else {
        log::warn!("Unable to query Win32_OperatingSystem; the installation type grain will be missing");
        return grains;
    };
    if product_type < SERVER_PRODUCT_TYPE {
        return grains;
    }

    let Some(windir) = probe.windir() else {
        return grains;
    };
    let explorer = Path::new(&windir).join("explorer.exe");
    if probe.is_file(&explorer) {
        return grains;
    }

    match probe.os_release().await {
        Some(release) => grains.set(OS_RELEASE, format!("{}Core", release)),
        None => log::warn!("Server Core detected but the OS release is unknown"),
    }
    grains
}

/// Map a `Win32_OperatingSystem.Caption` to a release tag:
/// `Microsoft Windows Server 2012 R2 Standard` → `2012ServerR2`,
/// `Microsoft® Windows Server® 2008 Standard` → `2008Server`,
/// `Microsoft Windows 10 Pro` → `10`.
pub fn release_from_caption(caption: &str) -> Option<String> {
    // Older captions carry trademark marks (`Server®`, `Windows®`).
    let words: Vec<&str> = caption
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();

    if let Some(pos) = words.iter().position(|w| *w == "Server") {
        let year = words[pos + 1..]
            .iter()
            .find(|w| w.len() == 4 && w.chars().all(|c| c.is_ascii_digit()))?;
        let r2 = words[pos + 1..].contains(&"R2");
        return Some(format!("{}Server{}", year, if r2 { "R2" } else { "" }));
    }

    let pos = words.iter().position(|w| *w == "Windows")?;
    words.get(pos + 1).map(|w| w.to_string())
}

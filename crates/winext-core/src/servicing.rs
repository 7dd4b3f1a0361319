//! Windows servicing through DISM.
//!
//! DISM has no machine-readable output mode, so results are scraped from its
//! `Key : Value` listing. Every query is gated on DISM's success banner.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use winext_types::{
    args::InvocationArgs,
    cmdlet::FunctionDoc,
    exec::RunOptions,
    grains::Grains,
    servicing::{EnableFeatureReport, FeatureInfo, PackageInfo},
    ExtError, Result,
};

use crate::module::ExtensionModule;
use crate::ports::ExecPort;

pub const MODULE_NAME: &str = "windows_servicing";

pub const SUCCESS_MARKER: &str = "The operation completed successfully.";

static PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Package Identity : ([^\r\n]+)\r?\nState : ([^\r\n]+)\r?\nRelease Type : ([^\r\n]+)\r?\nInstall Time : ([^\r\n]+)\r?\n",
    )
    .expect("package pattern is valid")
});

static FEATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Feature Name : ([^\r\n]+)\r?\nState : ([^\r\n]+)\r?\n")
        .expect("feature pattern is valid")
});

/// Build a DISM command line against an offline image or the running system.
///
/// The three slots are always separated by single spaces, so an empty source
/// list leaves a double space.
pub fn dism_command(action: &str, image: Option<&str>, sources: &[String]) -> String {
    let target = match image {
        Some(image) => format!("/Image:{}", image),
        None => "/Online".to_string(),
    };
    let sources = sources
        .iter()
        .map(|s| format!("/Source:{}", s))
        .collect::<Vec<_>>()
        .join(" ");
    format!("dism {} {} {}", target, sources, action)
}

pub fn succeeded(output: &str) -> bool {
    output.contains(SUCCESS_MARKER)
}

pub fn parse_packages(output: &str) -> BTreeMap<String, PackageInfo> {
    if !succeeded(output) {
        return BTreeMap::new();
    }
    PACKAGE_RE
        .captures_iter(output)
        .map(|c| {
            (
                c[1].to_string(),
                PackageInfo {
                    state: c[2].to_string(),
                    release_type: c[3].to_string(),
                    install_time: c[4].to_string(),
                },
            )
        })
        .collect()
}

pub fn parse_features(output: &str) -> BTreeMap<String, FeatureInfo> {
    if !succeeded(output) {
        return BTreeMap::new();
    }
    FEATURE_RE
        .captures_iter(output)
        .map(|c| (c[1].to_string(), FeatureInfo { state: c[2].to_string() }))
        .collect()
}

pub struct WindowsServicingModule {
    exec: Rc<dyn ExecPort>,
}

impl WindowsServicingModule {
    pub fn new(exec: Rc<dyn ExecPort>) -> Self {
        Self { exec }
    }

    /// Windows Vista / Server 2008 (NT 6.0) and newer.
    pub fn is_applicable(grains: &Grains) -> bool {
        grains.kernel() == Some("Windows") && grains.os_version_major().is_some_and(|v| v >= 6)
    }

    pub fn load(grains: &Grains, exec: Rc<dyn ExecPort>) -> Option<Self> {
        Self::is_applicable(grains).then(|| Self::new(exec))
    }

    async fn dism(&self, action: &str, image: Option<&str>, sources: &[String]) -> Result<String> {
        let cmd = dism_command(action, image, sources);
        log::debug!("Running {}", cmd);
        self.exec.run(&cmd, &RunOptions::ignore_retcode()).await
    }

    /// All packages in the image, or in the running system when `image` is
    /// `None`.
    pub async fn get_packages(&self, image: Option<&str>) -> Result<BTreeMap<String, PackageInfo>> {
        let output = self.dism("/Get-Packages", image, &[]).await?;
        Ok(parse_packages(&output))
    }

    /// Features of one package, or of every package when `package` is `None`.
    pub async fn get_features(
        &self,
        package: Option<&str>,
        image: Option<&str>,
    ) -> Result<BTreeMap<String, FeatureInfo>> {
        let action = match package {
            Some(package) => format!("/Get-Features /PackageName:{}", package),
            None => "/Get-Features".to_string(),
        };
        let output = self.dism(&action, image, &[]).await?;
        Ok(parse_features(&output))
    }

    /// Enable a feature unless it is already enabled or pending a reboot.
    pub async fn enable_feature(
        &self,
        name: &str,
        package: Option<&str>,
        image: Option<&str>,
        sources: &[String],
    ) -> Result<EnableFeatureReport> {
        let mut report = EnableFeatureReport::new(name);

        let features = self.get_features(package, image).await?;
        match features.get(name) {
            None => {
                report.result = false;
                report.comment = format!("Feature {} not found", name);
                return Ok(report);
            }
            Some(feature) if feature.is_enabled() => {
                report.comment = format!("Feature {} already installed", name);
                return Ok(report);
            }
            Some(feature) if feature.is_enable_pending() => {
                report.pending = true;
                report.comment = format!("Feature {} already installed (pending a reboot)", name);
                return Ok(report);
            }
            Some(_) => {}
        }

        let action = match package {
            Some(package) => format!(
                "/Enable-Feature /FeatureName:{} /PackageName:{} /NoRestart",
                name, package
            ),
            None => format!("/Enable-Feature /FeatureName:{} /NoRestart", name),
        };
        let output = self.dism(&action, image, sources).await?;
        if !succeeded(&output) {
            log::warn!("Enabling feature {} failed", name);
            report.result = false;
            report.comment = format!("Feature {} installation failed", name);
            report.dism = output;
            return Ok(report);
        }

        report.changes.insert(
            MODULE_NAME.to_string(),
            Value::String(format!("Installed feature {}", name)),
        );
        let features = self.get_features(package, image).await?;
        if features.get(name).is_some_and(FeatureInfo::is_enable_pending) {
            report.pending = true;
            report.comment = format!("Reboot to complete feature {} installation", name);
        }
        Ok(report)
    }
}

#[async_trait(?Send)]
impl ExtensionModule for WindowsServicingModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    fn functions(&self) -> Vec<FunctionDoc> {
        vec![
            FunctionDoc::new(
                "enable_feature",
                "Enable the specified Windows feature (name, package, image, sources).",
            ),
            FunctionDoc::new(
                "get_features",
                "Return all features of a package within an image (package, image).",
            ),
            FunctionDoc::new(
                "get_packages",
                "Return information about all packages in an image (image).",
            ),
        ]
    }

    async fn call(&self, function: &str, args: &InvocationArgs) -> Result<Value> {
        let image = args.get_str("image");
        let package = args.get_str("package");
        match function {
            "get_packages" => Ok(json!(self.get_packages(image).await?)),
            "get_features" => Ok(json!(self.get_features(package, image).await?)),
            "enable_feature" => {
                let name = args.get_str("name").ok_or_else(|| {
                    ExtError::InvalidArgument("enable_feature requires a name".to_string())
                })?;
                let sources = args.get_string_list("sources")?;
                let report = self.enable_feature(name, package, image, &sources).await?;
                Ok(serde_json::to_value(report)?)
            }
            _ => Err(ExtError::UnknownFunction {
                module: MODULE_NAME.to_string(),
                function: function.to_string(),
            }),
        }
    }
}

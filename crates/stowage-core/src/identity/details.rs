//! Path-safe vendor/product/version triple derived from a [`ProgramIdentity`].

use std::fmt;
use std::path::PathBuf;

use crate::error::{Result, SettingsError};

use super::ProgramIdentity;

/// Version used when no usable version metadata exists.
pub const VERSION_SENTINEL: &str = "0.0.0.0";

#[cfg(windows)]
const FORBIDDEN: &[char] = &['"', '<', '>', '|', ':', '*', '?', '\\', '/'];
#[cfg(not(windows))]
const FORBIDDEN: &[char] = &['/'];

/// Vendor, product and version of a program, each safe to use as a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyDetails {
    vendor: String,
    product: String,
    version: String,
}

impl AssemblyDetails {
    /// Resolve the details for `identity`.
    ///
    /// - vendor: explicit vendor, else the first module path segment
    /// - product: explicit product, else the executable stem
    /// - version: explicit version unless blank or zero, else the file
    ///   version, else [`VERSION_SENTINEL`]
    pub fn resolve(identity: &ProgramIdentity) -> Result<Self> {
        Ok(Self {
            vendor: sanitize(&vendor_name(identity)?),
            product: sanitize(&product_name(identity)?),
            version: sanitize(&version_name(identity)),
        })
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Render as `vendor/product` or, when versionized, `vendor/product/version`.
    pub fn to_path(&self, versionized: bool) -> PathBuf {
        let mut path = PathBuf::from(&self.vendor);
        path.push(&self.product);
        if versionized {
            path.push(&self.version);
        }
        path
    }
}

impl fmt::Display for AssemblyDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vendor: {}, Product: {}, Version: {}",
            self.vendor, self.product, self.version
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn vendor_name(identity: &ProgramIdentity) -> Result<String> {
    if let Some(vendor) = non_blank(identity.vendor()) {
        return Ok(vendor.to_string());
    }
    identity
        .module_path()
        .and_then(|path| path.split("::").next())
        .filter(|segment| !segment.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| SettingsError::invalid_state("unable to determine the vendor name"))
}

fn product_name(identity: &ProgramIdentity) -> Result<String> {
    if let Some(product) = non_blank(identity.product()) {
        return Ok(product.to_string());
    }
    identity
        .executable()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| SettingsError::invalid_state("unable to determine the product name"))
}

fn version_name(identity: &ProgramIdentity) -> String {
    if let Some(version) = non_blank(identity.version()).filter(|v| !is_zero_version(v)) {
        return version.to_string();
    }
    non_blank(identity.file_version())
        .unwrap_or(VERSION_SENTINEL)
        .to_string()
}

/// `0.0.0.0`, or a semver `0.0.0` without pre-release, counts as "no version".
fn is_zero_version(version: &str) -> bool {
    let version = version.trim();
    if version == VERSION_SENTINEL {
        return true;
    }
    semver::Version::parse(version)
        .map(|v| v.major == 0 && v.minor == 0 && v.patch == 0 && v.pre.is_empty())
        .unwrap_or(false)
}

/// Remove whitespace, control characters and characters forbidden in paths.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control() && !FORBIDDEN.contains(c))
        .collect()
}

//! Identity of the running program.
//!
//! Location resolution needs a vendor, a product and a version to build
//! per-application subdirectories inside shared OS folders. Rust binaries carry
//! no runtime metadata beyond their own path, so the raw inputs are collected
//! in [`ProgramIdentity`], either from the process alone or from the calling
//! crate's package metadata via [`program_identity!`](crate::program_identity).

pub mod details;

use std::path::{Path, PathBuf};

pub use details::AssemblyDetails;

use crate::error::{Result, SettingsError};

/// Raw identity metadata of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramIdentity {
    executable: PathBuf,
    vendor: Option<String>,
    product: Option<String>,
    module_path: Option<String>,
    version: Option<String>,
    file_version: Option<String>,
}

impl ProgramIdentity {
    /// Identity with only an executable path and no explicit metadata.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            vendor: None,
            product: None,
            module_path: None,
            version: None,
            file_version: None,
        }
    }

    /// Identity of the running process.
    ///
    /// The module path is derived from the executable name, which is the
    /// binary crate's root module unless the target was renamed.
    pub fn from_current_exe() -> Result<Self> {
        let executable = std::env::current_exe().map_err(|e| {
            SettingsError::invalid_state(format!("unable to determine the running executable: {e}"))
        })?;
        let module_path = executable
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(|stem| stem.replace('-', "_"));

        Ok(Self {
            module_path,
            ..Self::new(executable)
        })
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    /// Use the first entry of a Cargo authors list (`a <a@x>:b`) as vendor.
    pub fn with_authors(mut self, authors: &str) -> Self {
        if let Some(vendor) = first_author(authors) {
            self.vendor = Some(vendor);
        }
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn with_module_path(mut self, module_path: impl Into<String>) -> Self {
        self.module_path = Some(module_path.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_file_version(mut self, file_version: impl Into<String>) -> Self {
        self.file_version = Some(file_version.into());
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }

    pub fn product(&self) -> Option<&str> {
        self.product.as_deref()
    }

    pub fn module_path(&self) -> Option<&str> {
        self.module_path.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn file_version(&self) -> Option<&str> {
        self.file_version.as_deref()
    }

    /// Directory containing the executable.
    pub fn executable_dir(&self) -> Result<&Path> {
        self.executable
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or_else(|| {
                SettingsError::invalid_state(format!(
                    "executable has no parent directory: {}",
                    self.executable.display()
                ))
            })
    }

    /// File name of the executable with its extension swapped for `extension`.
    ///
    /// The extension is appended to the file stem verbatim, with a leading dot
    /// added if missing, so `"."` yields `widget.` rather than `widget`.
    pub fn settings_file_name(&self, extension: &str) -> Result<PathBuf> {
        let stem = self.executable.file_stem().ok_or_else(|| {
            SettingsError::invalid_state(format!(
                "executable has no file name: {}",
                self.executable.display()
            ))
        })?;
        let mut file_name = stem.to_os_string();
        if !extension.starts_with('.') {
            file_name.push(".");
        }
        file_name.push(extension);
        Ok(PathBuf::from(file_name))
    }
}

fn first_author(authors: &str) -> Option<String> {
    let first = authors.split(':').next()?;
    let name = match first.find('<') {
        Some(index) => &first[..index],
        None => first,
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Build a [`ProgramIdentity`] for the running process, enriched with the
/// calling crate's package metadata (authors, name, version, module path).
///
/// ```no_run
/// let identity = stowage_core::program_identity!().expect("identity");
/// println!("{}", identity.executable().display());
/// ```
#[macro_export]
macro_rules! program_identity {
    () => {
        $crate::identity::ProgramIdentity::from_current_exe().map(|identity| {
            identity
                .with_authors(env!("CARGO_PKG_AUTHORS"))
                .with_product(env!("CARGO_PKG_NAME"))
                .with_version(env!("CARGO_PKG_VERSION"))
                .with_module_path(module_path!())
        })
    };
}

//! Host platform access used by location resolution.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::identity::ProgramIdentity;
use crate::types::KnownFolder;

/// Everything the storage resolver needs to know about the host.
pub trait HostEnvironment: fmt::Debug + Send + Sync {
    /// Identity of the program whose settings are stored.
    fn program_identity(&self) -> Result<ProgramIdentity>;

    /// Location of an OS application data root, if the platform defines one.
    fn known_folder(&self, folder: KnownFolder) -> Option<PathBuf>;

    /// Create and remove a uniquely named empty file inside `dir`.
    fn probe_write(&self, dir: &Path) -> io::Result<()>;
}

/// The real host: process identity, `dirs` folders and a temp-file probe.
#[derive(Debug, Clone, Default)]
pub struct SystemEnvironment {
    identity: Option<ProgramIdentity>,
    folders: HashMap<KnownFolder, PathBuf>,
}

impl SystemEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed identity instead of inspecting the running process.
    pub fn with_identity(mut self, identity: ProgramIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Override the root used for an OS folder.
    pub fn with_folder(mut self, folder: KnownFolder, path: impl Into<PathBuf>) -> Self {
        self.folders.insert(folder, path.into());
        self
    }
}

impl HostEnvironment for SystemEnvironment {
    fn program_identity(&self) -> Result<ProgramIdentity> {
        match &self.identity {
            Some(identity) => Ok(identity.clone()),
            None => ProgramIdentity::from_current_exe(),
        }
    }

    fn known_folder(&self, folder: KnownFolder) -> Option<PathBuf> {
        if let Some(path) = self.folders.get(&folder) {
            return Some(path.clone());
        }
        system_folder(folder)
    }

    fn probe_write(&self, dir: &Path) -> io::Result<()> {
        let probe = tempfile::Builder::new()
            .prefix(".stowage-probe-")
            .tempfile_in(dir)?;
        probe.close()
    }
}

fn system_folder(folder: KnownFolder) -> Option<PathBuf> {
    match folder {
        KnownFolder::LocalApplicationData => dirs::data_local_dir(),
        KnownFolder::ApplicationData => roaming_data_dir(),
        KnownFolder::CommonApplicationData => common_data_dir(),
    }
}

#[cfg(windows)]
fn roaming_data_dir() -> Option<PathBuf> {
    dirs::data_dir()
}

#[cfg(not(windows))]
fn roaming_data_dir() -> Option<PathBuf> {
    dirs::config_dir()
}

#[cfg(windows)]
fn common_data_dir() -> Option<PathBuf> {
    std::env::var_os("ProgramData")
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from(r"C:\ProgramData")))
}

#[cfg(not(windows))]
fn common_data_dir() -> Option<PathBuf> {
    Some(PathBuf::from("/usr/share"))
}

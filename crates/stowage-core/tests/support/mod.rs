#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use stowage_core::identity::ProgramIdentity;
use stowage_core::location::{HostEnvironment, StorageResolver};
use stowage_core::types::KnownFolder;
use stowage_core::{Result, SettingsError};

/// Host rooted in a temporary directory:
/// `<root>/app/widget` is the executable and `<root>/{local,roaming,common}`
/// are the OS folders.
#[derive(Debug)]
pub struct TestHost {
    root: PathBuf,
    identity: ProgramIdentity,
    deny_writes: bool,
}

impl TestHost {
    pub fn new(root: &Path) -> Self {
        let identity = ProgramIdentity::new(root.join("app").join("widget"))
            .with_vendor("Acme Corp")
            .with_product("Widget Studio")
            .with_version("3.2.1");
        Self::with_identity(root, identity)
    }

    pub fn with_identity(root: &Path, identity: ProgramIdentity) -> Self {
        std::fs::create_dir_all(root.join("app")).expect("create executable dir");
        Self {
            root: root.to_path_buf(),
            identity,
            deny_writes: false,
        }
    }

    /// Make the executable folder report `PermissionDenied` on the write probe.
    pub fn deny_executable_folder(mut self) -> Self {
        self.deny_writes = true;
        self
    }

    pub fn executable_dir(&self) -> PathBuf {
        self.root.join("app")
    }

    pub fn folder(&self, folder: KnownFolder) -> PathBuf {
        let name = match folder {
            KnownFolder::LocalApplicationData => "local",
            KnownFolder::ApplicationData => "roaming",
            KnownFolder::CommonApplicationData => "common",
        };
        self.root.join(name)
    }
}

impl HostEnvironment for TestHost {
    fn program_identity(&self) -> Result<ProgramIdentity> {
        Ok(self.identity.clone())
    }

    fn known_folder(&self, folder: KnownFolder) -> Option<PathBuf> {
        Some(self.folder(folder))
    }

    fn probe_write(&self, dir: &Path) -> io::Result<()> {
        if self.deny_writes && dir == self.executable_dir() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        tempfile::tempfile_in(dir).map(drop)
    }
}

/// Host whose program identity cannot be determined.
#[derive(Debug)]
pub struct AnonymousHost;

impl HostEnvironment for AnonymousHost {
    fn program_identity(&self) -> Result<ProgramIdentity> {
        Err(SettingsError::InvalidState(
            "unable to determine the running program".to_string(),
        ))
    }

    fn known_folder(&self, _folder: KnownFolder) -> Option<PathBuf> {
        None
    }

    fn probe_write(&self, _dir: &Path) -> io::Result<()> {
        Ok(())
    }
}

pub fn shared_resolver(host: TestHost) -> (StorageResolver, Arc<TestHost>) {
    let host = Arc::new(host);
    (StorageResolver::from_shared(host.clone()), host)
}

//! Storage location resolution.
//!
//! Maps a [`StorageLocation`] plus a file extension to one concrete settings
//! file path:
//! - Default / ExecutableFolder: next to the executable, if that folder is
//!   writable; otherwise the LocalApplicationData path
//! - Fallback / LocalApplicationData, ApplicationData, CommonApplicationData:
//!   `<os folder>/<vendor>/<product>[/<version>]/<executable name>.<ext>`
//!
//! Nothing is cached; every call re-reads the host and re-runs the probe.

pub mod environment;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use environment::{HostEnvironment, SystemEnvironment};

use crate::error::{Result, SettingsError};
use crate::identity::{AssemblyDetails, ProgramIdentity};
use crate::options::SettingsOptions;
use crate::types::{KnownFolder, StorageLocation};

/// Resolves settings file paths against a [`HostEnvironment`].
#[derive(Clone)]
pub struct StorageResolver {
    environment: Arc<dyn HostEnvironment>,
}

impl Default for StorageResolver {
    fn default() -> Self {
        Self::new(SystemEnvironment::new())
    }
}

impl fmt::Debug for StorageResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageResolver")
            .field("environment", &self.environment)
            .finish()
    }
}

impl StorageResolver {
    pub fn new(environment: impl HostEnvironment + 'static) -> Self {
        Self {
            environment: Arc::new(environment),
        }
    }

    pub fn from_shared(environment: Arc<dyn HostEnvironment>) -> Self {
        Self { environment }
    }

    pub fn environment(&self) -> &dyn HostEnvironment {
        self.environment.as_ref()
    }

    /// Resolve the settings file path for `options`.
    pub fn resolve(&self, options: &SettingsOptions) -> Result<PathBuf> {
        self.resolve_location(
            options.location(),
            options.extension(),
            options.is_versionized(),
        )
    }

    /// Resolve a path from raw location parameters.
    ///
    /// Fails with `InvalidArgument` for a blank extension and `InvalidState`
    /// when the program identity or an OS folder cannot be determined.
    pub fn resolve_location(
        &self,
        location: StorageLocation,
        extension: &str,
        versionized: bool,
    ) -> Result<PathBuf> {
        if extension.trim().is_empty() {
            return Err(SettingsError::invalid_argument(
                "unable to build a file name without a valid extension",
            ));
        }

        let identity = self.environment.program_identity()?;

        match location.known_folder() {
            None => self.executable_folder_path(&identity, extension, versionized),
            Some(folder) => self.known_folder_path(&identity, folder, extension, versionized),
        }
    }

    fn executable_folder_path(
        &self,
        identity: &ProgramIdentity,
        extension: &str,
        versionized: bool,
    ) -> Result<PathBuf> {
        let dir = identity.executable_dir()?;
        if self.is_writing_permitted(dir)? {
            return Ok(dir.join(identity.settings_file_name(extension)?));
        }

        tracing::debug!(
            dir = %dir.display(),
            "executable folder not writable, using local application data"
        );
        self.known_folder_path(
            identity,
            KnownFolder::LocalApplicationData,
            extension,
            versionized,
        )
    }

    fn known_folder_path(
        &self,
        identity: &ProgramIdentity,
        folder: KnownFolder,
        extension: &str,
        versionized: bool,
    ) -> Result<PathBuf> {
        let root = self.environment.known_folder(folder).ok_or_else(|| {
            SettingsError::invalid_state(format!("unable to determine the {folder} folder"))
        })?;
        let details = AssemblyDetails::resolve(identity)?;

        Ok(root
            .join(details.to_path(versionized))
            .join(identity.settings_file_name(extension)?))
    }

    /// Probe `dir` by creating a throwaway file.
    ///
    /// Only a permission denial means "not writable"; every other failure is
    /// returned to the caller.
    fn is_writing_permitted(&self, dir: &Path) -> Result<bool> {
        classify_probe(dir, self.environment.probe_write(dir))
    }
}

fn classify_probe(dir: &Path, outcome: io::Result<()>) -> Result<bool> {
    match outcome {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            tracing::debug!(dir = %dir.display(), error = %err, "write probe denied");
            Ok(false)
        }
        Err(err) => Err(SettingsError::Io(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Copy)]
    enum Probe {
        Allow,
        Deny,
        DiskFull,
    }

    #[derive(Debug)]
    struct FakeHost {
        root: PathBuf,
        probe: Probe,
        probes: AtomicUsize,
        identity: Option<ProgramIdentity>,
    }

    impl FakeHost {
        fn new(root: &Path, probe: Probe) -> Self {
            let identity = ProgramIdentity::new(root.join("bin").join("widget.exe"))
                .with_vendor("Acme Corp")
                .with_product("Widget")
                .with_version("2.1.0");
            Self {
                root: root.to_path_buf(),
                probe,
                probes: AtomicUsize::new(0),
                identity: Some(identity),
            }
        }
    }

    impl HostEnvironment for FakeHost {
        fn program_identity(&self) -> Result<ProgramIdentity> {
            self.identity
                .clone()
                .ok_or_else(|| SettingsError::invalid_state("no entry point"))
        }

        fn known_folder(&self, folder: KnownFolder) -> Option<PathBuf> {
            let name = match folder {
                KnownFolder::LocalApplicationData => "local",
                KnownFolder::ApplicationData => "roaming",
                KnownFolder::CommonApplicationData => "common",
            };
            Some(self.root.join(name))
        }

        fn probe_write(&self, _dir: &Path) -> io::Result<()> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            match self.probe {
                Probe::Allow => Ok(()),
                Probe::Deny => Err(io::Error::from(io::ErrorKind::PermissionDenied)),
                Probe::DiskFull => Err(io::Error::other("no space left on device")),
            }
        }
    }

    fn resolver(root: &Path, probe: Probe) -> StorageResolver {
        StorageResolver::new(FakeHost::new(root, probe))
    }

    #[test]
    fn executable_folder_uses_executable_name() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let resolver = resolver(temp_dir.path(), Probe::Allow);

        let path = resolver
            .resolve_location(StorageLocation::ExecutableFolder, ".conf", false)
            .unwrap();

        assert_eq!(path, temp_dir.path().join("bin").join("widget.conf"));
    }

    #[test]
    fn default_matches_executable_folder() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let resolver = resolver(temp_dir.path(), Probe::Allow);

        assert_eq!(
            resolver
                .resolve_location(StorageLocation::Default, ".conf", false)
                .unwrap(),
            resolver
                .resolve_location(StorageLocation::ExecutableFolder, ".conf", false)
                .unwrap()
        );
    }

    #[test]
    fn known_folders_include_vendor_and_product() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let resolver = resolver(temp_dir.path(), Probe::Allow);
        let cases = [
            (StorageLocation::Fallback, "local"),
            (StorageLocation::LocalApplicationData, "local"),
            (StorageLocation::ApplicationData, "roaming"),
            (StorageLocation::CommonApplicationData, "common"),
        ];

        for (location, root) in cases {
            let path = resolver.resolve_location(location, ".json", false).unwrap();
            assert_eq!(
                path,
                temp_dir
                    .path()
                    .join(root)
                    .join("AcmeCorp")
                    .join("Widget")
                    .join("widget.json"),
                "location {location}"
            );
        }
    }

    #[test]
    fn versionized_paths_add_version_segment() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let resolver = resolver(temp_dir.path(), Probe::Allow);

        let path = resolver
            .resolve_location(StorageLocation::ApplicationData, ".conf", true)
            .unwrap();

        assert_eq!(
            path,
            temp_dir
                .path()
                .join("roaming")
                .join("AcmeCorp")
                .join("Widget")
                .join("2.1.0")
                .join("widget.conf")
        );
    }

    #[test]
    fn denied_probe_falls_back_to_local_application_data() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let resolver = resolver(temp_dir.path(), Probe::Deny);

        let fallback = resolver
            .resolve_location(StorageLocation::LocalApplicationData, ".conf", false)
            .unwrap();
        for location in [StorageLocation::Default, StorageLocation::ExecutableFolder] {
            let path = resolver.resolve_location(location, ".conf", false).unwrap();
            assert_eq!(path, fallback);
        }
    }

    #[test]
    fn other_probe_errors_propagate() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let resolver = resolver(temp_dir.path(), Probe::DiskFull);

        let err = resolver
            .resolve_location(StorageLocation::ExecutableFolder, ".conf", false)
            .unwrap_err();

        match err {
            SettingsError::Io(io) => assert_eq!(io.to_string(), "no space left on device"),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn probe_runs_on_every_call() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let host = Arc::new(FakeHost::new(temp_dir.path(), Probe::Allow));
        let resolver = StorageResolver::from_shared(host.clone());

        for _ in 0..3 {
            resolver
                .resolve_location(StorageLocation::ExecutableFolder, ".conf", false)
                .unwrap();
        }
        resolver
            .resolve_location(StorageLocation::ApplicationData, ".conf", false)
            .unwrap();

        assert_eq!(host.probes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn known_folder_resolution_is_idempotent() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let resolver = resolver(temp_dir.path(), Probe::Allow);

        for location in StorageLocation::ALL
            .into_iter()
            .filter(|l| l.known_folder().is_some())
        {
            let first = resolver.resolve_location(location, ".conf", true).unwrap();
            let second = resolver.resolve_location(location, ".conf", true).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn blank_extension_is_invalid_argument() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let resolver = resolver(temp_dir.path(), Probe::Allow);

        let err = resolver
            .resolve_location(StorageLocation::ApplicationData, "  ", false)
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidArgument(_)));
    }

    #[test]
    fn missing_identity_is_invalid_state() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let mut host = FakeHost::new(temp_dir.path(), Probe::Allow);
        host.identity = None;
        let resolver = StorageResolver::new(host);

        let err = resolver
            .resolve_location(StorageLocation::Default, ".conf", false)
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidState(_)));
    }

    #[test]
    fn real_probe_accepts_writable_directory() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let env = SystemEnvironment::new()
            .with_identity(ProgramIdentity::new(temp_dir.path().join("tool")).with_vendor("Acme"));
        let resolver = StorageResolver::new(env);

        let path = resolver
            .resolve_location(StorageLocation::ExecutableFolder, "settings", false)
            .unwrap();
        assert_eq!(path, temp_dir.path().join("tool.settings"));
    }
}

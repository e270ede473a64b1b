//! Stowage Core Library
//!
//! Persists a strongly typed settings value to a single JSON or XML file.
//! The file location is derived from [`options::SettingsOptions`]: the
//! executable's folder or a vendor/product folder under one of the OS data
//! roots, with a fallback to the per-user local data folder when the
//! executable's folder is not writable.
//!
//! ```no_run
//! use stowage_core::prelude::*;
//!
//! #[derive(serde::Serialize, serde::Deserialize, Default)]
//! struct Window {
//!     title: String,
//!     width: u32,
//! }
//!
//! # fn main() -> stowage_core::Result<()> {
//! let options = SettingsFactory::create::<SettingsOptions>(&[SettingsPattern::Xml.into()])?;
//! let writer = SettingsWriter::<Window>::with_options(options.clone());
//! writer.write(&Window { title: "Main".into(), width: 800 })?;
//!
//! let reader = SettingsReader::<Window>::with_options(options);
//! let window = reader.try_read().unwrap_or_default();
//! # let _ = window;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod factory;
pub mod format;
pub mod identity;
pub mod location;
pub mod options;
pub mod processing;
pub mod types;

pub use error::{Result, SettingsError};

/// Re-exports of commonly used types
pub mod prelude {
    // Errors
    pub use crate::error::{Result, SettingsError};

    // Identity
    pub use crate::identity::{AssemblyDetails, ProgramIdentity};

    // Location
    pub use crate::location::StorageResolver;
    pub use crate::location::environment::{HostEnvironment, SystemEnvironment};

    // Options
    pub use crate::options::{OptionArg, OptionsProperty, SettingsOptions};

    // Factory
    pub use crate::factory::{Capability, CapabilityKind, Component, SettingsFactory};

    // Processing
    pub use crate::processing::{SettingsReader, SettingsWriter};

    // Types
    pub use crate::types::{KnownFolder, SettingsPattern, StorageLocation};
}

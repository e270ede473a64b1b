//! Capability factory.
//!
//! Three capabilities can be built: [`SettingsOptions`], [`SettingsReader<T>`]
//! and [`SettingsWriter<T>`]. Statically typed callers use
//! [`SettingsFactory::create`]; callers holding a capability name at runtime
//! go through [`SettingsFactory::create_named`], which looks the name up in a
//! constructor table.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SettingsError};
use crate::options::{OptionArg, SettingsOptions};
use crate::processing::{SettingsReader, SettingsWriter};

mod sealed {
    pub trait Sealed {}

    impl Sealed for crate::options::SettingsOptions {}
    impl<T> Sealed for crate::processing::SettingsReader<T> {}
    impl<T> Sealed for crate::processing::SettingsWriter<T> {}
}

/// Role a factory product plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    Options,
    Reader,
    Writer,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 3] = [
        CapabilityKind::Options,
        CapabilityKind::Reader,
        CapabilityKind::Writer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Options => "options",
            CapabilityKind::Reader => "reader",
            CapabilityKind::Writer => "writer",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityKind {
    type Err = SettingsError;

    /// Accepts `options`, `reader`, `writer` and their `settings-` prefixed
    /// forms, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        let name = normalized
            .strip_prefix("settings-")
            .or_else(|| normalized.strip_prefix("settings_"))
            .unwrap_or(&normalized);
        match name {
            "options" => Ok(CapabilityKind::Options),
            "reader" => Ok(CapabilityKind::Reader),
            "writer" => Ok(CapabilityKind::Writer),
            _ => Err(SettingsError::UnsupportedCapability(s.trim().to_string())),
        }
    }
}

/// Something the factory can build from positional option arguments.
///
/// Sealed: only the crate's options, reader and writer implement it.
pub trait Capability: sealed::Sealed + Sized {
    const KIND: CapabilityKind;

    fn construct(args: &[OptionArg]) -> Result<Self>;
}

impl Capability for SettingsOptions {
    const KIND: CapabilityKind = CapabilityKind::Options;

    fn construct(args: &[OptionArg]) -> Result<Self> {
        if args.is_empty() {
            return Ok(SettingsOptions::new());
        }
        Ok(SettingsOptions::from_args(args))
    }
}

impl<T> Capability for SettingsReader<T> {
    const KIND: CapabilityKind = CapabilityKind::Reader;

    fn construct(args: &[OptionArg]) -> Result<Self> {
        SettingsOptions::construct(args).map(SettingsReader::with_options)
    }
}

impl<T> Capability for SettingsWriter<T> {
    const KIND: CapabilityKind = CapabilityKind::Writer;

    fn construct(args: &[OptionArg]) -> Result<Self> {
        SettingsOptions::construct(args).map(SettingsWriter::with_options)
    }
}

/// A capability built from a runtime name.
#[derive(Debug, Clone)]
pub enum Component<T> {
    Options(SettingsOptions),
    Reader(SettingsReader<T>),
    Writer(SettingsWriter<T>),
}

impl<T> Component<T> {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            Component::Options(_) => CapabilityKind::Options,
            Component::Reader(_) => CapabilityKind::Reader,
            Component::Writer(_) => CapabilityKind::Writer,
        }
    }

    pub fn into_options(self) -> Option<SettingsOptions> {
        match self {
            Component::Options(options) => Some(options),
            _ => None,
        }
    }

    pub fn into_reader(self) -> Option<SettingsReader<T>> {
        match self {
            Component::Reader(reader) => Some(reader),
            _ => None,
        }
    }

    pub fn into_writer(self) -> Option<SettingsWriter<T>> {
        match self {
            Component::Writer(writer) => Some(writer),
            _ => None,
        }
    }
}

type Constructor<T> = fn(&[OptionArg]) -> Result<Component<T>>;

fn build_options<T>(args: &[OptionArg]) -> Result<Component<T>> {
    SettingsOptions::construct(args).map(Component::Options)
}

fn build_reader<T>(args: &[OptionArg]) -> Result<Component<T>> {
    SettingsReader::construct(args).map(Component::Reader)
}

fn build_writer<T>(args: &[OptionArg]) -> Result<Component<T>> {
    SettingsWriter::construct(args).map(Component::Writer)
}

fn constructor_table<T>() -> [(CapabilityKind, Constructor<T>); 3] {
    [
        (CapabilityKind::Options, build_options::<T> as Constructor<T>),
        (CapabilityKind::Reader, build_reader::<T> as Constructor<T>),
        (CapabilityKind::Writer, build_writer::<T> as Constructor<T>),
    ]
}

/// Builds settings capabilities.
#[derive(Debug, Default, Clone, Copy)]
pub struct SettingsFactory;

impl SettingsFactory {
    /// Build capability `C`, passing `args` to its constructor.
    pub fn create<C: Capability>(args: &[OptionArg]) -> Result<C> {
        tracing::debug!(capability = %C::KIND, args = args.len(), "creating capability");
        C::construct(args)
    }

    /// Like [`SettingsFactory::create`], logging and discarding failures.
    pub fn try_create<C: Capability>(args: &[OptionArg]) -> Option<C> {
        match Self::create::<C>(args) {
            Ok(capability) => Some(capability),
            Err(err) => {
                tracing::warn!(capability = %C::KIND, error = %err, "failed to create capability");
                None
            }
        }
    }

    /// Build the capability registered under `tag` for settings type `T`.
    pub fn create_named<T>(tag: &str, args: &[OptionArg]) -> Result<Component<T>> {
        let kind: CapabilityKind = tag.parse()?;
        Self::create_kind(kind, args)
    }

    pub fn create_kind<T>(kind: CapabilityKind, args: &[OptionArg]) -> Result<Component<T>> {
        let (_, constructor) = constructor_table::<T>()
            .into_iter()
            .find(|(registered, _)| *registered == kind)
            .ok_or_else(|| SettingsError::UnsupportedCapability(kind.to_string()))?;
        tracing::debug!(capability = %kind, args = args.len(), "creating capability");
        constructor(args)
    }

    pub fn try_create_named<T>(tag: &str, args: &[OptionArg]) -> Option<Component<T>> {
        match Self::create_named(tag, args) {
            Ok(component) => Some(component),
            Err(err) => {
                tracing::warn!(tag, error = %err, "failed to create capability");
                None
            }
        }
    }
}

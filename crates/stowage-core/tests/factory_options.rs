use std::sync::{Arc, Mutex};

use stowage_core::prelude::*;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Editor {
    font: String,
}

#[test]
fn factory_options_reflect_positional_arguments() {
    let options = SettingsFactory::create::<SettingsOptions>(&[
        SettingsPattern::Json.into(),
        StorageLocation::ExecutableFolder.into(),
        "app.settings".into(),
    ])
    .unwrap();

    assert_eq!(options.pattern(), SettingsPattern::Json);
    assert_eq!(options.location(), StorageLocation::ExecutableFolder);
    assert_eq!(options.extension(), ".app.settings");
    assert!(!options.is_versionized());
}

#[test]
fn argument_order_does_not_matter() {
    let forward = SettingsFactory::create::<SettingsOptions>(&[
        SettingsPattern::Xml.into(),
        StorageLocation::ApplicationData.into(),
        true.into(),
    ])
    .unwrap();
    let reversed = SettingsFactory::create::<SettingsOptions>(&[
        true.into(),
        StorageLocation::ApplicationData.into(),
        SettingsPattern::Xml.into(),
    ])
    .unwrap();

    assert_eq!(forward.pattern(), reversed.pattern());
    assert_eq!(forward.location(), reversed.location());
    assert_eq!(forward.is_versionized(), reversed.is_versionized());
    assert_eq!(forward.extension(), ".conf");
}

#[test]
fn named_capabilities_are_built_for_the_requested_type() {
    let args = [SettingsPattern::Xml.into()];

    let writer = SettingsFactory::create_named::<Editor>("Writer", &args)
        .unwrap()
        .into_writer()
        .unwrap();
    assert_eq!(writer.root_name(), "Editor");
    assert_eq!(writer.options().pattern(), SettingsPattern::Xml);

    let options = SettingsFactory::create_kind::<Editor>(CapabilityKind::Options, &[])
        .unwrap()
        .into_options()
        .unwrap();
    assert_eq!(options.pattern(), SettingsPattern::Json);

    let err = SettingsFactory::create_named::<Editor>("cache", &args).unwrap_err();
    assert!(matches!(err, SettingsError::UnsupportedCapability(_)));
}

#[test]
fn listeners_observe_each_real_change_once() {
    let mut options = SettingsFactory::create::<SettingsOptions>(&[]).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    options.subscribe(move |property| sink.lock().unwrap().push(property));

    options.set_extension(".conf");
    options.set_extension("toml");
    options.set_extension(".toml");
    options.set_location(StorageLocation::Fallback);
    options.set_pattern(SettingsPattern::Json);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![OptionsProperty::Extension, OptionsProperty::Location]
    );
}

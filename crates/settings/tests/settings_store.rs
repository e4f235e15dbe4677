//! Integration tests for the SettingsStore: recursive deltas, reload and the
//! built-in sections.

use std::collections::HashMap;
use std::fs;

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use settings::{FlowSettings, Settings, SettingsError, SettingsStore, ViewSettings};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Nested {
    enabled: bool,
    level: u8,
}

impl Default for Nested {
    fn default() -> Self {
        Self {
            enabled: false,
            level: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct Network {
    port: u16,
    nested: Nested,
}

impl Settings for Network {
    const SECTION: &'static str = "network";
}

fn section_keys(content: &str, section: &str) -> Vec<String> {
    let root: HashMap<String, ron::Value> = ron::from_str(content).expect("parse delta RON");
    let Some(ron::Value::Map(map)) = root.get(section) else {
        panic!("{section} entry should be a map");
    };
    let mut keys: Vec<String> = map
        .iter()
        .filter_map(|(k, _)| match k {
            ron::Value::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect();
    keys.sort();
    keys
}

#[test]
fn only_changed_fields_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.ron");

    let store = SettingsStore::builder()
        .with_settings_file(&path)
        .build()
        .expect("build store");
    store.register::<Network>().expect("register network");
    assert!(!path.exists(), "no file before the first update");

    store
        .update::<Network, _>(|n| n.nested.enabled = true)
        .expect("update nested.enabled");
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(section_keys(&content, "network"), vec!["nested".to_string()]);

    store
        .update::<Network, _>(|n| n.port = 7777)
        .expect("update port");
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        section_keys(&content, "network"),
        vec!["nested".to_string(), "port".to_string()]
    );

    let net = store.get::<Network>().unwrap();
    assert_eq!(net.port, 7777);
    assert!(net.nested.enabled);
    assert_eq!(net.nested.level, 1);
}

#[test]
fn reverting_to_default_drops_the_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.ron");
    let store = SettingsStore::builder()
        .with_settings_file(&path)
        .build()
        .unwrap();
    store.register::<Network>().unwrap();

    store.update::<Network, _>(|n| n.port = 1).unwrap();
    store.update::<Network, _>(|n| n.port = 0).unwrap();

    let root: HashMap<String, ron::Value> =
        ron::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(root.is_empty());
}

#[test]
fn reload_applies_external_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.ron");
    let store = SettingsStore::builder()
        .with_settings_file(&path)
        .build()
        .unwrap();
    store.register::<Network>().unwrap();
    store.update::<Network, _>(|n| n.port = 1500).unwrap();

    fs::write(
        &path,
        r#"{ "network": { "port": 9000, "nested": { "enabled": true } } }"#,
    )
    .unwrap();
    store.reload().expect("reload");

    let net = store.get::<Network>().unwrap();
    assert_eq!(net.port, 9000);
    assert!(net.nested.enabled);
    assert_eq!(net.nested.level, 1);
}

#[test]
fn existing_file_is_applied_on_register() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.ron");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, r#"{ "view": { "default_area": "main" } }"#).unwrap();

    let store = SettingsStore::builder()
        .with_settings_file(&path)
        .build()
        .unwrap();
    store.register::<ViewSettings>().unwrap();

    let view = store.get::<ViewSettings>().unwrap();
    assert_eq!(view.default_area, "main");
    assert_eq!(view.popup_area, "popup");
}

#[test]
fn unregistered_and_duplicate_sections_are_errors() {
    let store = SettingsStore::in_memory();
    assert!(matches!(
        store.get::<FlowSettings>(),
        Err(SettingsError::NotRegistered("flow"))
    ));
    assert!(store.try_get::<FlowSettings>().unwrap().is_none());

    store.register::<FlowSettings>().unwrap();
    assert!(matches!(
        store.register::<FlowSettings>(),
        Err(SettingsError::AlreadyRegistered("flow"))
    ));

    store
        .update::<FlowSettings, _>(|f| f.localization_marker = '#')
        .unwrap();
    assert_eq!(store.get::<FlowSettings>().unwrap().localization_marker, '#');
}

mod common;

use std::sync::Arc;

use common::ScriptedFactory;
use framecast_core::api::{
    JsonFileStore, ProviderConfig, ProviderRegistry, ProviderType, RegistryError, Resolution,
    VideoConfig, STORAGE_KEY,
};
use pretty_assertions::assert_eq;

fn open(path: &std::path::Path) -> ProviderRegistry {
    ProviderRegistry::load(Arc::new(ScriptedFactory), Box::new(JsonFileStore::new(path)))
}

#[test]
fn file_round_trip_preserves_ids_types_and_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");

    let mut reg = open(&path);
    let mut cfg = ProviderConfig::new("ark-key-0123456789");
    cfg.video_config = VideoConfig::recommended();
    let first = reg
        .add(ProviderType::Volcengine, cfg, "primary", true)
        .unwrap();
    let second = reg
        .add(
            ProviderType::Volcengine,
            ProviderConfig::new("ark-key-abcdefghij"),
            "backup",
            false,
        )
        .unwrap();
    let before = reg.list().to_vec();
    drop(reg);

    let raw = std::fs::read_to_string(&path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc[STORAGE_KEY].as_array().map(Vec::len), Some(2));
    assert_eq!(doc[STORAGE_KEY][0]["isDefault"], serde_json::json!(true));

    let reloaded = open(&path);
    assert_eq!(reloaded.list(), before.as_slice());
    let ids: Vec<&str> = reloaded.list().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    assert_eq!(reloaded.default_id(), Some(first.as_str()));
    assert_eq!(
        reloaded.list().iter().filter(|c| c.is_default).count(),
        1
    );
    assert_eq!(
        reloaded
            .get_default()
            .unwrap()
            .config()
            .video_config
            .resolution,
        Some(Resolution::P1080)
    );
}

#[test]
fn removing_default_survives_reload_as_no_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");

    let mut reg = open(&path);
    let id = reg
        .add(
            ProviderType::Volcengine,
            ProviderConfig::new("ark-key-0123456789"),
            "only",
            true,
        )
        .unwrap();
    reg.remove(&id).unwrap();
    drop(reg);

    let reloaded = open(&path);
    assert!(reloaded.list().is_empty());
    assert_eq!(
        reloaded.get_default().err(),
        Some(RegistryError::NoDefaultConfigured)
    );
}

#[test]
fn missing_store_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let reg = open(&dir.path().join("absent").join("providers.json"));
    assert!(reg.list().is_empty());
    assert_eq!(reg.default_id(), None);
}

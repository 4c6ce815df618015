//! Integration tests for checkpoint persistence
//!
//! These tests exercise the store end to end against a temporary directory:
//! - Save/get round-trips in both formats
//! - Format detection and extension handling
//! - Strict validation with the `latest.resources` exemption
//! - Backup behavior of save and remove

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use waypoint::checkpoint::{Checkpoint, SchemaValidator};
use waypoint::encoding::{Codec, ExtensionResolver};
use waypoint::fs::{BackupOutcome, PathResolver, WorkspaceLayout};
use waypoint::models::{
    Archive, Asset, Manifest, PluginInfo, PropertyMap, PropertyValue, Resource, Snapshot, Target,
};
use waypoint::{CheckpointStore, Error, ErrorKind};

/// Resolves every name to `<dir>/<name><suffix>`, for exercising explicit paths.
struct SuffixPaths {
    dir: PathBuf,
    suffix: &'static str,
}

impl PathResolver for SuffixPaths {
    fn env_dir(&self) -> PathBuf {
        self.dir.clone()
    }

    fn env_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}{}", self.suffix))
    }
}

fn store_with_suffix(dir: &Path, suffix: &'static str) -> CheckpointStore<SuffixPaths> {
    CheckpointStore::new(
        SuffixPaths {
            dir: dir.to_path_buf(),
            suffix,
        },
        ExtensionResolver::default(),
        SchemaValidator,
    )
}

fn sample_target() -> Target {
    let mut target = Target::new("production");
    target.set_config("aws:region", "us-west-2");
    target.set_config("app:replicas", "3");
    target
}

fn sample_snapshot() -> Snapshot {
    let mut inputs = PropertyMap::new();
    inputs.insert("acl".to_string(), PropertyValue::from("private"));
    inputs.insert(
        "website".to_string(),
        PropertyValue::Asset(Asset::from_path("site/index.html")),
    );

    let mut outputs = PropertyMap::new();
    outputs.insert("arn".to_string(), PropertyValue::from("arn:aws:s3:::assets"));
    outputs.insert("versioned".to_string(), PropertyValue::from(true));
    outputs.insert("size".to_string(), PropertyValue::from(12.5));
    outputs.insert(
        "bundle".to_string(),
        PropertyValue::Archive(Archive::from_path("dist")),
    );
    outputs.insert(
        "tags".to_string(),
        PropertyValue::Array(vec![PropertyValue::from("web"), PropertyValue::Null]),
    );

    let bucket = Resource::new("urn:production::assets", "aws:s3/bucket:Bucket")
        .with_id("assets-1a2b")
        .with_inputs(inputs)
        .with_outputs(outputs);
    let app = Resource::new("urn:production::app", "acme:index:App")
        .with_dependencies(vec!["urn:production::assets".to_string()]);

    let manifest = Manifest::new(
        "0.4.2",
        vec![PluginInfo {
            name: "aws".to_string(),
            version: "1.3.0".to_string(),
        }],
    );
    Snapshot::new(manifest, vec![bucket, app])
}

#[test]
fn test_roundtrip_json() {
    let temp = TempDir::new().unwrap();
    let store = CheckpointStore::open(temp.path());
    let target = sample_target();
    let snapshot = sample_snapshot();

    let saved = store.save(&target, Some(&snapshot)).unwrap();
    assert_eq!(saved.path, temp.path().join("production.json"));
    assert_eq!(saved.backup, BackupOutcome::Missing);

    let loaded = store.get("production").unwrap();
    assert_eq!(loaded.path, saved.path);
    assert_eq!(loaded.target, target);
    assert_eq!(loaded.snapshot, Some(snapshot));
    assert_eq!(loaded.checkpoint.target, "production");
}

#[test]
fn test_roundtrip_yaml() {
    let temp = TempDir::new().unwrap();
    let store = CheckpointStore::new(
        WorkspaceLayout::new(temp.path()),
        ExtensionResolver::new(Codec::Yaml),
        SchemaValidator,
    );
    let target = sample_target();
    let snapshot = sample_snapshot();

    let saved = store.save(&target, Some(&snapshot)).unwrap();
    assert_eq!(saved.path, temp.path().join("production.yaml"));

    let loaded = store.get("production").unwrap();
    assert_eq!(loaded.target, target);
    assert_eq!(loaded.snapshot, Some(snapshot));
}

#[test]
fn test_roundtrip_without_snapshot() {
    let temp = TempDir::new().unwrap();
    let store = CheckpointStore::open(temp.path());

    store.save(&Target::new("dev"), None).unwrap();
    let loaded = store.get("dev").unwrap();

    assert_eq!(loaded.target, Target::new("dev"));
    assert!(loaded.snapshot.is_none());
}

#[test]
fn test_existing_yaml_checkpoint_is_found_with_json_default() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("staging.yml"),
        "target: staging\nconfig:\n  aws:region: eu-west-1\n",
    )
    .unwrap();
    let store = CheckpointStore::open(temp.path());

    let loaded = store.get("staging").unwrap();
    assert_eq!(loaded.path, temp.path().join("staging.yml"));
    assert_eq!(loaded.target.config["aws:region"], "eu-west-1");

    // Saving keeps the file's existing format.
    let saved = store.save(&loaded.target, None).unwrap();
    assert_eq!(saved.path, temp.path().join("staging.yml"));
}

#[test]
fn test_unsupported_extension_fails_without_io() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("state");
    let store = store_with_suffix(&dir, ".xml");

    let err = store.save(&sample_target(), None).unwrap_err();
    match err {
        Error::UnsupportedFormat { ext, .. } => assert_eq!(ext, ".xml"),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
    assert!(!dir.exists(), "no directory should be created");

    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("production.xml"), "<checkpoint/>").unwrap();
    let err = store.get("production").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);

    let err = store.remove(&sample_target()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    assert!(dir.join("production.xml").exists());
}

#[test]
fn test_missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let store = CheckpointStore::open(temp.path());

    let err = store.get("nowhere").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(err, Error::NotFound { ref name, .. } if name == "nowhere"));
}

#[test]
fn test_malformed_bytes() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("broken.json"), "{\"target\": ").unwrap();
    let store = CheckpointStore::open(temp.path());

    let err = store.get("broken").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn test_type_mismatch_is_malformed() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("prod.json"), r#"{"target": ["prod"]}"#).unwrap();
    let store = CheckpointStore::open(temp.path());

    assert_eq!(
        store.get("prod").unwrap_err().kind(),
        ErrorKind::MalformedDocument
    );
}

#[test]
fn test_unknown_top_level_key_is_schema_violation() {
    let temp = TempDir::new().unwrap();
    let json = r#"{"target": "prod", "config": {"aws:region": "us-east-1"}, "owner": "ops"}"#;
    fs::write(temp.path().join("prod.json"), json).unwrap();

    // The lenient typed decode alone accepts the document.
    let typed: Checkpoint = serde_json::from_str(json).unwrap();
    assert_eq!(typed.target, "prod");

    let store = CheckpointStore::open(temp.path());
    let err = store.get("prod").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaViolation);
    assert!(err.to_string().contains("owner"), "{err}");
}

#[test]
fn test_unknown_manifest_key_is_schema_violation() {
    let temp = TempDir::new().unwrap();
    let yaml = "\
target: prod
latest:
  manifest:
    time: 2024-05-01T12:00:00Z
    magic: abc
    version: 1.0.0
    builder: ci
";
    fs::write(temp.path().join("prod.yaml"), yaml).unwrap();
    let store = CheckpointStore::open(temp.path());

    assert_eq!(
        store.get("prod").unwrap_err().kind(),
        ErrorKind::SchemaViolation
    );
}

#[test]
fn test_empty_target_in_file_is_schema_violation() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("prod.json"), r#"{"target": ""}"#).unwrap();
    let store = CheckpointStore::open(temp.path());

    assert_eq!(
        store.get("prod").unwrap_err().kind(),
        ErrorKind::SchemaViolation
    );
}

#[test]
fn test_resources_are_exempt_from_schema() {
    let temp = TempDir::new().unwrap();
    // Resources carry fields and tagged values the checkpoint schema knows nothing about.
    let json = r#"{
        "target": "prod",
        "latest": {
            "manifest": {
                "time": "2024-05-01T12:00:00Z",
                "magic": "abc",
                "version": "1.0.0"
            },
            "resources": [
                {
                    "urn": "urn:prod::site",
                    "type": "aws:s3/bucket:Bucket",
                    "id": "site-1",
                    "custom": true,
                    "provider": "aws-default",
                    "outputs": {
                        "index": {"__sig": "asset", "text": "<html></html>"},
                        "nested": {"deep": [1, 2, {"x": null}]}
                    }
                }
            ]
        }
    }"#;
    fs::write(temp.path().join("prod.json"), json).unwrap();
    let store = CheckpointStore::open(temp.path());

    let loaded = store.get("prod").unwrap();
    let snapshot = loaded.snapshot.unwrap();
    let site = snapshot.resource("urn:prod::site").unwrap();
    assert_eq!(site.id.as_deref(), Some("site-1"));
    assert_eq!(
        site.outputs["index"],
        PropertyValue::Asset(Asset::from_text("<html></html>"))
    );
    // The manifest magic does not match; loading still succeeds.
    assert!(!snapshot.manifest.is_intact());
}

#[test]
fn test_save_twice_keeps_one_backup() {
    let temp = TempDir::new().unwrap();
    let store = CheckpointStore::open(temp.path());
    let mut target = Target::new("prod");

    target.set_config("version", "1");
    store.save(&target, None).unwrap();
    target.set_config("version", "2");
    let second = store.save(&target, None).unwrap();
    assert!(second.backup.is_moved());

    let backup = temp.path().join("prod.json.bak");
    let files: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(files.len(), 2, "{files:?}");
    assert!(fs::read_to_string(&backup).unwrap().contains("\"1\""));

    target.set_config("version", "3");
    store.save(&target, None).unwrap();
    assert!(fs::read_to_string(&backup).unwrap().contains("\"2\""));
    assert!(!temp.path().join("prod.json.bak.bak").exists());
    assert_eq!(store.get("prod").unwrap().target.config["version"], "3");
}

#[test]
fn test_remove_moves_checkpoint_aside() {
    let temp = TempDir::new().unwrap();
    let store = CheckpointStore::open(temp.path());
    let target = sample_target();
    store.save(&target, Some(&sample_snapshot())).unwrap();

    let outcome = store.remove(&target).unwrap();

    assert!(outcome.is_moved());
    assert!(!temp.path().join("production.json").exists());
    assert!(temp.path().join("production.json.bak").exists());
    assert_eq!(
        store.get("production").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn test_remove_without_file_succeeds_and_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("env");
    let store = CheckpointStore::open(&dir);

    let outcome = store.remove(&Target::new("ghost")).unwrap();

    assert_eq!(outcome, BackupOutcome::Missing);
    assert!(!dir.exists());
}

#[test]
fn test_extensionless_save_appends_canonical_extension() {
    let temp = TempDir::new().unwrap();
    let store = store_with_suffix(temp.path(), "");

    let saved = store.save(&sample_target(), None).unwrap();
    assert_eq!(saved.path, temp.path().join("production.json"));
    assert!(saved.path.exists());

    let loaded = store.get("production").unwrap();
    assert_eq!(loaded.path, saved.path);
    assert_eq!(loaded.target, sample_target());
}

#[test]
fn test_save_creates_missing_directories() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".waypoint").join("env");
    let store = CheckpointStore::open(&dir);

    let saved = store.save(&Target::new("prod"), None).unwrap();
    assert_eq!(saved.path, dir.join("prod.json"));
    assert!(saved.path.is_file());
}

#[test]
fn test_non_finite_output_fails_save_before_touching_disk() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("env");
    let store = CheckpointStore::open(&dir);

    let mut outputs = PropertyMap::new();
    outputs.insert("ratio".to_string(), PropertyValue::from(f64::INFINITY));
    let snapshot = Snapshot::new(
        Manifest::new("1.0.0", Vec::new()),
        vec![Resource::new("urn:prod::lb", "aws:elb/lb:LoadBalancer").with_outputs(outputs)],
    );

    let err = store.save(&Target::new("prod"), Some(&snapshot)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("prod.json"), "{err}");
    assert!(!dir.exists());
}

#[test]
fn test_save_proceeds_when_backup_cannot_be_made() {
    let temp = TempDir::new().unwrap();
    let store = CheckpointStore::open(temp.path());
    let mut target = Target::new("prod");

    target.set_config("version", "1");
    store.save(&target, None).unwrap();

    // A non-empty directory squatting on the backup path makes the rename fail.
    let backup = temp.path().join("prod.json.bak");
    fs::create_dir(&backup).unwrap();
    fs::write(backup.join("keep"), "x").unwrap();

    target.set_config("version", "2");
    let saved = store.save(&target, None).unwrap();

    assert!(
        matches!(saved.backup, BackupOutcome::Failed { ref path, .. } if *path == saved.path),
        "{:?}",
        saved.backup
    );
    assert!(backup.join("keep").exists());
    assert_eq!(store.get("prod").unwrap().target.config["version"], "2");
}

//! Path resolution and addon enumeration against real directory trees.

use assert_fs::prelude::*;
use akhsync_core::{addons, AddonName, Context, CoreError};
use predicates::prelude::*;

// ---------------------------------------------------------------------------
// 1. Context resolution
// ---------------------------------------------------------------------------

#[test]
fn resolve_fails_without_source_root() {
    let project = assert_fs::TempDir::new().expect("tempdir");
    let home = assert_fs::TempDir::new().expect("home");

    let err = Context::resolve_at(project.path(), home.path()).unwrap_err();
    assert!(matches!(err, CoreError::SourceRootMissing { .. }), "got: {err}");
    assert!(err.to_string().contains("src"));
}

#[test]
fn resolve_applies_config_file() {
    let project = assert_fs::TempDir::new().expect("tempdir");
    let home = assert_fs::TempDir::new().expect("home");
    project.child("src/demo").create_dir_all().unwrap();
    project
        .child("akhsync.config.json")
        .write_str(r#"{"syncTargetDir": "mojang", "worldDirName": "level"}"#)
        .unwrap();

    let ctx = Context::resolve_at(project.path(), home.path()).expect("resolve");
    assert_eq!(ctx.sync_target_dir, project.path().join("mojang"));
    assert_eq!(ctx.world_dir, project.path().join("level"));
    assert!(ctx.config_path.is_some());
}

#[test]
fn resolve_propagates_config_parse_error() {
    let project = assert_fs::TempDir::new().expect("tempdir");
    let home = assert_fs::TempDir::new().expect("home");
    project.child("src/demo").create_dir_all().unwrap();
    project
        .child("akhsync.config.toml")
        .write_str("syncTargetDir = [unclosed")
        .unwrap();

    let err = Context::resolve_at(project.path(), home.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Addon enumeration
// ---------------------------------------------------------------------------

#[test]
fn list_all_returns_sorted_directories_only() {
    let src = assert_fs::TempDir::new().expect("tempdir");
    src.child("zeta/behavior_packs").create_dir_all().unwrap();
    src.child("alpha/resource_packs").create_dir_all().unwrap();
    src.child("README.md").write_str("not an addon").unwrap();

    let names = addons::list_all_at(src.path()).expect("list");
    assert_eq!(names, vec![AddonName::from("alpha"), AddonName::from("zeta")]);
}

#[test]
fn list_all_skips_hidden_directories() {
    let src = assert_fs::TempDir::new().expect("tempdir");
    src.child(".vscode").create_dir_all().unwrap();
    src.child(".git/objects").create_dir_all().unwrap();
    src.child("demo/behavior_packs").create_dir_all().unwrap();

    let names = addons::list_all_at(src.path()).expect("list");
    assert_eq!(names, vec![AddonName::from("demo")]);
}

#[test]
fn list_all_with_only_hidden_directories_is_an_error() {
    let src = assert_fs::TempDir::new().expect("tempdir");
    src.child(".vscode").create_dir_all().unwrap();

    let err = addons::list_all_at(src.path()).unwrap_err();
    assert!(matches!(err, CoreError::NoAddons { .. }), "got: {err}");
}

#[test]
fn list_all_on_empty_source_is_an_error() {
    let src = assert_fs::TempDir::new().expect("tempdir");
    let err = addons::list_all_at(src.path()).unwrap_err();
    assert!(matches!(err, CoreError::NoAddons { .. }), "got: {err}");
}

#[test]
fn validate_names_missing_addon_path() {
    let src = assert_fs::TempDir::new().expect("tempdir");
    src.child("demo").create_dir_all().unwrap();

    let err = addons::validate_at(src.path(), &["demo".into(), "ghost".into()]).unwrap_err();
    match &err {
        CoreError::AddonNotFound { name, path } => {
            assert_eq!(name, "ghost");
            assert!(predicate::str::ends_with("ghost").eval(&path.to_string_lossy()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn validate_rejects_path_traversal() {
    let src = assert_fs::TempDir::new().expect("tempdir");
    src.child("demo").create_dir_all().unwrap();

    let err = addons::validate_at(src.path(), &["../demo".into()]).unwrap_err();
    assert!(matches!(err, CoreError::InvalidAddonName { .. }), "got: {err}");
}

#[test]
fn validate_dedupes_and_keeps_order() {
    let src = assert_fs::TempDir::new().expect("tempdir");
    src.child("b").create_dir_all().unwrap();
    src.child("a").create_dir_all().unwrap();

    let names = addons::validate_at(src.path(), &["b".into(), "a".into(), "b".into()]).unwrap();
    assert_eq!(names, vec![AddonName::from("b"), AddonName::from("a")]);
    src.child("b").assert(predicate::path::is_dir());
}

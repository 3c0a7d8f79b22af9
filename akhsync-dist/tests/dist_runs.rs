//! Full `dist` runs against a scratch project.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use akhsync_compiler::{CompileError, CompileRequest, ScriptCompiler};
use akhsync_core::{AddonName, Context};
use akhsync_dist::nbt::{decode, encode, strip_header, with_header, Compound, NbtRoot, Tag};
use akhsync_dist::{dist, DistError, DistKind, DistOptions, DEFAULT_WORLD_NAME_TEMPLATE};
use tempfile::TempDir;

struct StubCompiler;

impl ScriptCompiler for StubCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<(), CompileError> {
        fs::create_dir_all(&request.outdir).unwrap();
        fs::write(request.outdir.join("main.js"), "export {};").unwrap();
        Ok(())
    }
}

fn write(path: PathBuf, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project() -> (TempDir, Context, Vec<AddonName>) {
    let root = TempDir::new().unwrap();
    let src = root.path().join("src");
    write(src.join("demo/behavior_packs/manifest.json"), b"{\"bp\":1}");
    write(src.join("demo/behavior_packs/scripts/main.ts"), b"export {};");
    write(src.join("demo/resource_packs/textures/a.png"), b"png");
    write(src.join("art/resource_packs/manifest.json"), b"{\"rp\":1}");
    let ctx = Context::from_config(root.path(), &root.path().join("home"), None);
    (root, ctx, vec![AddonName::from("art"), AddonName::from("demo")])
}

fn add_world(ctx: &Context) {
    let root = NbtRoot {
        name: String::new(),
        compound: Compound(vec![
            ("LevelName".into(), Tag::String("Template".into())),
            ("GameType".into(), Tag::Int(1)),
        ]),
    };
    write(
        ctx.world_dir.join("level.dat"),
        &with_header(&encode(&root).unwrap()).unwrap(),
    );
    write(ctx.world_dir.join("db/CURRENT"), b"MANIFEST-000001");
    fs::create_dir_all(ctx.world_dir.join("behavior_packs")).unwrap();
    fs::create_dir_all(ctx.world_dir.join("resource_packs")).unwrap();
}

fn options(kinds: Vec<DistKind>, version: &str) -> DistOptions {
    DistOptions {
        kinds,
        version: version.into(),
        world_name_template: DEFAULT_WORLD_NAME_TEMPLATE.into(),
    }
}

/// File entries of a zip, name → contents.
fn zip_files(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut out = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        if entry.is_dir() {
            continue;
        }
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).unwrap();
        out.insert(entry.name().to_string(), buf);
    }
    out
}

fn tree_files(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut out = BTreeMap::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let name = path
                    .strip_prefix(root)
                    .unwrap()
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                out.insert(name, fs::read(&path).unwrap());
            }
        }
    }
    out
}

#[tokio::test]
async fn addon_archives_mirror_their_staging_dirs() {
    let (_root, ctx, addons) = project();
    let stale = ctx.dist_dir.join("old-0.0.1.mcaddon");
    write(stale.clone(), b"stale");

    let report = dist(&ctx, &addons, &StubCompiler, &options(vec![DistKind::Addon], "9.9.9"))
        .await
        .unwrap();

    assert!(!stale.exists(), "dist root is regenerated");
    assert_eq!(report.archives.len(), 2);
    for archive in &report.archives {
        let file_name = archive.path.file_name().unwrap().to_string_lossy();
        assert!(file_name.contains("9.9.9"), "{file_name}");
        assert!(file_name.ends_with(".mcaddon"));
    }

    let demo_archive = ctx.dist_dir.join("demo-9.9.9.mcaddon");
    let entries = zip_files(&demo_archive);
    assert_eq!(entries, tree_files(&ctx.dist_dir.join("demo-9.9.9")));
    assert!(entries.contains_key("behavior_packs/manifest.json"));
    assert!(entries.contains_key("behavior_packs/scripts/main.js"));
    assert!(entries.contains_key("resource_packs/textures/a.png"));
    assert!(entries.keys().all(|name| !name.starts_with("demo-9.9.9")));
    assert!(!ctx.dist_dir.join(format!("{}-world-9.9.9.mcworld", ctx.project_name())).exists());
}

#[tokio::test]
async fn world_archive_bundles_renamed_world_and_packs() {
    let (_root, ctx, addons) = project();
    add_world(&ctx);

    let report = dist(&ctx, &addons, &StubCompiler, &options(vec![DistKind::World], "1.0.0"))
        .await
        .unwrap();
    assert_eq!(report.archives.len(), 1);
    assert_eq!(report.archives[0].kind, DistKind::World);

    let staging = ctx.dist_dir.join(format!("{}-world-1.0.0", ctx.project_name()));
    let entries = zip_files(&report.archives[0].path);
    assert!(entries.contains_key("db/CURRENT"));
    assert!(entries.contains_key("level.dat_old"));
    assert!(entries.contains_key("behavior_packs/demo-1.0.0/manifest.json"));
    assert!(entries.contains_key("resource_packs/demo-1.0.0/textures/a.png"));
    assert!(entries.contains_key("resource_packs/art-1.0.0/manifest.json"));
    assert!(!entries.keys().any(|n| n.starts_with("behavior_packs/art-1.0.0")));

    let level = decode(strip_header(&entries["level.dat"])).unwrap();
    assert_eq!(
        level.compound.get("LevelName"),
        Some(&Tag::String(format!("{} 1.0.0", ctx.project_name())))
    );
    assert_eq!(entries, tree_files(&staging));

    // The source world is left alone.
    assert!(!ctx.world_dir.join("level.dat_old").exists());
    assert!(!ctx.world_dir.join("behavior_packs/demo-1.0.0").exists());
    // Only the world was requested.
    assert!(!ctx.dist_dir.join("demo-1.0.0.mcaddon").exists());
}

#[tokio::test]
async fn both_kinds_in_one_run() {
    let (_root, ctx, addons) = project();
    add_world(&ctx);
    let report = dist(
        &ctx,
        &addons,
        &StubCompiler,
        &options(vec![DistKind::World, DistKind::Addon], "2.0.0"),
    )
    .await
    .unwrap();
    assert_eq!(report.archives.len(), 3);
}

#[tokio::test]
async fn missing_world_is_fatal_with_hint() {
    let (_root, ctx, addons) = project();
    let err = dist(&ctx, &addons, &StubCompiler, &options(vec![DistKind::World], "1.0.0"))
        .await
        .unwrap_err();
    assert!(matches!(err, DistError::WorldMissing { .. }), "{err}");
    assert!(err.worlds_dir().unwrap().ends_with("minecraftWorlds"));
}

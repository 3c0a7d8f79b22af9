//! End-to-end pipeline runs against a scratch project and a fake compiler.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use akhsync_compiler::{CompileError, CompileRequest, ScriptCompiler};
use akhsync_core::{AddonName, Context, PackFilter, PackType};
use akhsync_sync::{Pipeline, RunOptions, Stage, Stages, StepOutcome, SyncError};
use tempfile::TempDir;

/// Writes `<outdir>/<entry>.js` containing the source, and records requests.
#[derive(Default)]
struct RecordingCompiler {
    requests: Mutex<Vec<CompileRequest>>,
}

impl RecordingCompiler {
    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl ScriptCompiler for RecordingCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<(), CompileError> {
        for entry in &request.entry_points {
            let out = request
                .outdir
                .join(entry.strip_prefix(&request.outbase).unwrap())
                .with_extension("js");
            fs::create_dir_all(out.parent().unwrap()).unwrap();
            fs::copy(entry, out).unwrap();
        }
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}

struct BrokenCompiler;

impl ScriptCompiler for BrokenCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<(), CompileError> {
        Err(CompileError::Failed {
            addon: request.addon.clone(),
            status: "exit status: 1".into(),
            stderr: "syntax error".into(),
        })
    }
}

fn write(path: PathBuf, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// `demo` has both packs plus scripts; `art` has only a resource pack.
fn project() -> (TempDir, Context) {
    let root = TempDir::new().unwrap();
    let src = root.path().join("src");
    write(src.join("demo/behavior_packs/manifest.json"), "{\"bp\":1}");
    write(src.join("demo/behavior_packs/scripts/main.ts"), "console.log(1);");
    write(src.join("demo/behavior_packs/scripts/data/items.json"), "[]");
    write(src.join("demo/resource_packs/manifest.json"), "{\"rp\":1}");
    write(src.join("art/resource_packs/textures/a.png"), "png");

    let ctx = Context::from_config(root.path(), &root.path().join("home"), None);
    (root, ctx)
}

fn names(list: &[&str]) -> Vec<AddonName> {
    list.iter().map(|n| AddonName::from(*n)).collect()
}

fn listing(dir: &Path) -> Vec<String> {
    let mut out: Vec<String> = fs::read_dir(dir)
        .map(|rd| {
            rd.map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    out.sort();
    out
}

#[tokio::test]
async fn sync_then_async_touches_only_namespaced_entries() {
    let (_root, ctx) = project();
    let foreign = ctx.sync_pack_root(PackType::Behavior).join("someone-else");
    write(foreign.join("manifest.json"), "{}");

    let compiler = RecordingCompiler::default();
    let addons = names(&["demo"]);

    let report = Pipeline::new(&ctx, &compiler, Stages::sync())
        .run(&addons, RunOptions::default())
        .await
        .unwrap();
    assert!(!report.has_failures());
    assert_eq!(report.compiled, addons);

    let demo = &addons[0];
    let bp = ctx.sync_entry(demo, PackType::Behavior);
    let rp = ctx.sync_entry(demo, PackType::Resource);
    assert!(bp.ends_with("development_behavior_packs/akhsync-demo"));
    assert!(bp.join("manifest.json").is_file());
    assert!(bp.join("scripts/main.js").is_file());
    assert!(bp.join("scripts/data/items.json").is_file());
    assert!(!bp.join("scripts/main.ts").exists());
    assert!(rp.join("manifest.json").is_file());

    Pipeline::new(&ctx, &compiler, Stages::clear_only())
        .run(&addons, RunOptions::default())
        .await
        .unwrap();
    assert!(!bp.exists());
    assert!(!rp.exists());
    assert!(foreign.join("manifest.json").is_file());
    assert!(ctx.addon_build(demo).join("behavior_packs/manifest.json").is_file());
    assert_eq!(compiler.calls(), 1);
}

#[tokio::test]
async fn build_clears_previous_output() {
    let (_root, ctx) = project();
    let demo = AddonName::from("demo");
    let stale = ctx.addon_build(&demo).join("behavior_packs/stale.json");
    write(stale.clone(), "{}");

    Pipeline::new(&ctx, &RecordingCompiler::default(), Stages::build())
        .run(&[demo.clone()], RunOptions::default())
        .await
        .unwrap();
    assert!(!stale.exists());
    assert!(ctx.scripts_build(&demo).join("main.js").is_file());
    assert!(!ctx.sync_entry(&demo, PackType::Behavior).exists());
}

#[tokio::test]
async fn verify_runs_before_any_copy() {
    let (_root, ctx) = project();
    let addons = names(&["art", "demo"]);
    // Only demo has a build.
    Pipeline::new(&ctx, &RecordingCompiler::default(), Stages::build())
        .run(&addons[1..], RunOptions::default())
        .await
        .unwrap();

    let err = Pipeline::new(&ctx, &RecordingCompiler::default(), Stages::sync_without_build())
        .run(&addons, RunOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::BuildMissing { ref addon, .. } if addon == "art"), "{err}");
    assert!(listing(&ctx.sync_pack_root(PackType::Behavior)).is_empty());
    assert!(listing(&ctx.sync_pack_root(PackType::Resource)).is_empty());
}

#[tokio::test]
async fn only_filter_restricts_every_stage() {
    let (_root, ctx) = project();
    let compiler = RecordingCompiler::default();
    let addons = names(&["demo", "art"]);
    let options = RunOptions {
        filter: PackFilter::Only(PackType::Resource),
        development: false,
    };

    let report = Pipeline::new(&ctx, &compiler, Stages::sync())
        .run(&addons, options)
        .await
        .unwrap();

    assert_eq!(compiler.calls(), 0);
    assert!(report.compiled.is_empty());
    assert!(!ctx.pack_build(&addons[0], PackType::Behavior).exists());
    assert!(!ctx.sync_pack_root(PackType::Behavior).exists());
    assert_eq!(
        listing(&ctx.sync_pack_root(PackType::Resource)),
        vec!["akhsync-art", "akhsync-demo"]
    );
}

#[tokio::test]
async fn pack_missing_from_source_is_skipped_on_sync() {
    let (_root, ctx) = project();
    let art = names(&["art"]);
    let report = Pipeline::new(&ctx, &RecordingCompiler::default(), Stages::sync())
        .run(&art, RunOptions::default())
        .await
        .unwrap();

    let behavior_copy = report
        .steps_for(Stage::SyncCopy)
        .find(|r| r.pack == Some(PackType::Behavior))
        .unwrap();
    assert!(matches!(behavior_copy.outcome, StepOutcome::Skipped { .. }));
    assert!(!ctx.sync_entry(&art[0], PackType::Behavior).exists());
    assert!(ctx.sync_entry(&art[0], PackType::Resource).join("textures/a.png").is_file());
}

#[tokio::test]
async fn repeated_sync_converges() {
    let (_root, ctx) = project();
    let compiler = RecordingCompiler::default();
    let addons = names(&["demo", "art"]);
    let pipeline = Pipeline::new(&ctx, &compiler, Stages::sync());

    pipeline.run(&addons, RunOptions::default()).await.unwrap();
    let first = listing(&ctx.sync_entry(&addons[0], PackType::Behavior));
    pipeline.run(&addons, RunOptions::default()).await.unwrap();
    let second = listing(&ctx.sync_entry(&addons[0], PackType::Behavior));

    assert_eq!(first, second);
    assert_eq!(first, vec!["manifest.json", "scripts"]);
}

#[tokio::test]
async fn development_flag_reaches_the_compiler() {
    let (_root, ctx) = project();
    let compiler = RecordingCompiler::default();
    Pipeline::new(&ctx, &compiler, Stages::build())
        .run(
            &names(&["demo"]),
            RunOptions {
                filter: PackFilter::Both,
                development: true,
            },
        )
        .await
        .unwrap();
    assert!(compiler.requests.lock().unwrap()[0].development);
}

#[tokio::test]
async fn compile_failure_is_fatal() {
    let (_root, ctx) = project();
    let err = Pipeline::new(&ctx, &BrokenCompiler, Stages::sync())
        .run(&names(&["demo"]), RunOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Compile(_)), "{err}");
    assert!(!ctx.sync_pack_root(PackType::Behavior).exists());
}

#[cfg(unix)]
#[tokio::test]
async fn failed_copy_does_not_stop_sibling_addons() {
    let (root, ctx) = project();
    let bad_resources = root.path().join("src/bad/resource_packs");
    write(bad_resources.join("manifest.json"), "{}");
    std::os::unix::fs::symlink(root.path().join("nowhere"), bad_resources.join("broken"))
        .unwrap();

    let addons = names(&["demo", "bad"]);
    let report = Pipeline::new(&ctx, &RecordingCompiler::default(), Stages::sync())
        .run(&addons, RunOptions::default())
        .await
        .expect("copy failures are recorded, not returned");

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert_eq!(failures[0].stage, Stage::CopyToBuild);
    assert_eq!(failures[0].addon, addons[1]);
    assert!(failures[0].outcome.is_failed());

    // A pack absent from the source is skipped, not failed.
    let bad_behavior = report
        .steps_for(Stage::SyncCopy)
        .find(|r| r.addon == addons[1] && r.pack == Some(PackType::Behavior))
        .unwrap();
    assert!(matches!(bad_behavior.outcome, StepOutcome::Skipped { .. }));

    let demo = &addons[0];
    assert!(ctx.scripts_build(demo).join("main.js").is_file());
    assert!(ctx.sync_entry(demo, PackType::Behavior).join("scripts/main.js").is_file());
    assert!(ctx.sync_entry(demo, PackType::Resource).join("manifest.json").is_file());
    assert!(report
        .steps_for(Stage::SyncCopy)
        .filter(|r| &r.addon == demo)
        .all(|r| r.outcome == StepOutcome::Done));
}

//! `compile_addon` against a fake compiler that copies sources to `.js`.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use akhsync_compiler::{
    compile_addon, CompileError, CompileOutcome, CompileRequest, PathAliases, ScriptCompiler,
};
use akhsync_core::{AddonName, Context};
use tempfile::TempDir;

/// Emits each entry unchanged as `<outdir>/<relative>.js`.
#[derive(Default)]
struct CopyCompiler {
    requests: Mutex<Vec<CompileRequest>>,
}

impl ScriptCompiler for CopyCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<(), CompileError> {
        for entry in &request.entry_points {
            let relative = entry.strip_prefix(&request.outbase).unwrap();
            let out = request.outdir.join(relative).with_extension("js");
            fs::create_dir_all(out.parent().unwrap()).unwrap();
            fs::copy(entry, &out).unwrap();
        }
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}

struct FailingCompiler;

impl ScriptCompiler for FailingCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<(), CompileError> {
        Err(CompileError::Failed {
            addon: request.addon.clone(),
            status: "exit status: 1".into(),
            stderr: "✘ [ERROR] Expected \";\"".into(),
        })
    }
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project() -> (TempDir, Context) {
    let root = TempDir::new().unwrap();
    let scripts = root.path().join("src/demo/behavior_packs/scripts");
    write(
        &scripts.join("main.ts"),
        "import { add } from \"@/lib/math\";\nimport { world } from \"@minecraft/server\";\n",
    );
    write(&scripts.join("lib/math.ts"), "export const add = (a, b) => a + b;\n");
    write(&scripts.join("lib/types.d.ts"), "declare const x: number;\n");
    write(
        &root.path().join("tsconfig.json"),
        r#"{ "compilerOptions": { "baseUrl": "src/demo/behavior_packs/scripts", "paths": { "@/*": ["*"] } } }"#,
    );
    let ctx = Context::from_config(root.path(), root.path(), None);
    (root, ctx)
}

#[tokio::test]
async fn compiles_entries_and_rewrites_aliases() {
    let (root, ctx) = project();
    let aliases = PathAliases::load_at(root.path()).unwrap().expect("tsconfig");
    let compiler = CopyCompiler::default();
    let addon = AddonName::from("demo");

    let outcome = compile_addon(&ctx, &addon, false, Some(&aliases), &compiler)
        .await
        .expect("compile");
    assert_eq!(
        outcome,
        CompileOutcome::Compiled {
            entries: 2,
            rewritten: 1
        }
    );

    let main = fs::read_to_string(ctx.scripts_build(&addon).join("main.js")).unwrap();
    assert!(main.contains("from \"./lib/math.js\""), "{main}");
    assert!(main.contains("from \"@minecraft/server\""), "{main}");

    let requests = compiler.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].tsconfig.is_some());
    assert_eq!(requests[0].extra_externals, vec!["@/*".to_string()]);
    assert!(!requests[0].development);
}

#[tokio::test]
async fn addon_without_scripts_is_skipped() {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("src/art/resource_packs")).unwrap();
    let ctx = Context::from_config(root.path(), root.path(), None);
    let compiler = CopyCompiler::default();

    let outcome = compile_addon(&ctx, &AddonName::from("art"), true, None, &compiler)
        .await
        .expect("compile");
    assert_eq!(outcome, CompileOutcome::NoScripts);
    assert!(compiler.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn compiler_failure_propagates() {
    let (_root, ctx) = project();
    let err = compile_addon(&ctx, &AddonName::from("demo"), false, None, &FailingCompiler)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("demo"), "{err}");
}

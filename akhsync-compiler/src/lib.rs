//! # akhsync-compiler
//!
//! Script Compiler Adapter. Finds the script entry points of an addon, hands
//! them to an external compiler (esbuild by default) and post-processes the
//! output so no tsconfig path alias survives into the emitted code.
//!
//! The compiler itself sits behind [`ScriptCompiler`]; the pipeline only
//! depends on the trait.

pub mod adapter;
pub mod assets;
pub mod error;
pub mod esbuild;
pub mod rewrite;
pub mod scan;
pub mod tsconfig;

pub use adapter::{compile_addon, CompileOutcome};
pub use error::CompileError;
pub use esbuild::{CompileRequest, EsbuildCompiler, ScriptCompiler, HOST_MODULES};
pub use tsconfig::PathAliases;

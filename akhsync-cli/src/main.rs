//! akhsync — build, sync and package Minecraft Bedrock addons.
//!
//! # Usage
//!
//! ```text
//! akhsync build [addon...] [-d|--development] [--debug] [-o|--only behavior|resource]
//! akhsync sync  [addon...] [-d|--development] [--debug] [--no-build] [-o|--only ...]
//! akhsync async [addon...] [--debug] [-o|--only ...]
//! akhsync watch [addon...] [-d|--development] [--debug]
//! akhsync dist  [addon...] [-t|--type world|addon]... [--set-version x.y.z] [--set-world-name tpl]
//! ```

mod commands;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::{
    build::BuildArgs, clear::ClearArgs, dist::DistArgs, sync::SyncArgs, watch::WatchArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "akhsync",
    version,
    about = "Build Minecraft addons and sync them into the game's development packs",
    long_about = None,
)]
struct Cli {
    /// Verbose logging (RUST_LOG overrides).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile scripts and stage packs under build/.
    Build(BuildArgs),

    /// Build, then copy packs into the development pack directories.
    Sync(SyncArgs),

    /// Remove this tool's entries from the development pack directories.
    #[command(name = "async", visible_alias = "clear")]
    Async(ClearArgs),

    /// Sync again whenever an addon's sources change.
    Watch(WatchArgs),

    /// Build and package addons as .mcaddon and/or a .mcworld.
    Dist(DistArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Commands::Build(args) => args.run().await,
        Commands::Sync(args) => args.run().await,
        Commands::Async(args) => args.run().await,
        Commands::Watch(args) => args.run().await,
        Commands::Dist(args) => args.run().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::fatal(&err);
            ExitCode::FAILURE
        }
    }
}

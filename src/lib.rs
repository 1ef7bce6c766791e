// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod generate;
pub mod logging;
pub mod rules;
pub mod transpile;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::engine::{BuildEvent, Runtime, RuntimeOptions};
use crate::fs::{FileSystem, RealFileSystem};
use crate::generate::{output_path, Generator};
use crate::rules::{discover_sources, RuleSet};
use crate::transpile::SwcTranspiler;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - rule compilation against the project root
/// - the generator (SWC transpiler + real filesystem)
/// - (optional) file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let root = config_root_dir(&config_path);
    let rules = RuleSet::from_config(&root, &cfg)?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    if args.dry_run {
        print_dry_run(fs.as_ref(), &rules)?;
        return Ok(());
    }

    let generator = Arc::new(Generator::new(rules, Arc::clone(&fs), SwcTranspiler::new()));

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<BuildEvent>(64);

    // Optional file watcher (disabled in --once mode). Started before the
    // initial build so edits made while it runs are not lost.
    let _watcher_handle = if !args.once {
        Some(crate::watch::spawn_watcher(
            root.clone(),
            Arc::clone(&fs),
            rt_tx.clone(),
        )?)
    } else {
        None
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(BuildEvent::ShutdownRequested).await;
        });
    }

    let options = RuntimeOptions {
        debounce: Duration::from_millis(cfg.config.debounce_ms),
        exit_after_initial: args.once,
    };

    let runtime = Runtime::new(generator, rt_rx, options);
    runtime.run().await?;
    Ok(())
}

/// Figure out the project root that patterns are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "web/Modgen.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Modgen.toml" (parent = ""),
///   we fall back to the current working directory.
///
/// The result is canonicalized when possible so it lines up with the
/// absolute paths reported by the watcher.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    let dir = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    dir.canonicalize().unwrap_or(dir)
}

/// Dry-run output: rules, then each discovered source with its outputs.
fn print_dry_run(fs: &dyn FileSystem, rules: &RuleSet) -> Result<()> {
    println!("modgen dry-run");
    println!("  root = {}", rules.root().display());
    println!();

    println!("rules ({}):", rules.rules().len());
    for rule in rules.rules() {
        let formats: Vec<&str> = rule.formats().iter().map(|f| f.name()).collect();
        println!("  - {} -> {}", rule.pattern(), formats.join(", "));
    }
    println!();

    let sources = discover_sources(fs, rules)?;
    println!("sources ({}):", sources.len());
    for source in &sources {
        println!("  - {} (rule: {})", source.rel, source.rule.pattern());
        for &format in source.rule.formats() {
            let target = output_path(&source.path, format)?;
            println!("      {format}: {}", target.display());
        }
    }

    info!(sources = sources.len(), "dry-run listed sources");
    debug!("dry-run complete (nothing written)");
    Ok(())
}

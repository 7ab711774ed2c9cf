//! Orchid desktop entry point.
//!
//! Runs the shell against a terminal: draw calls are printed to stdout and
//! the keyboard is a key script (see `orchid_platform::keyboard`).
//!
//! Usage: `orchid [CONFIG] [KEYSCRIPT]`. The config path may also come from
//! `ORCHID_CONFIG`; without a key script file the script is read from stdin.

mod vfs_setup;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

use orchid_platform::{DesktopPlatform, Platform, ScriptedKeyboard, TextDisplay};
use orchid_shell::{CommandRegistry, Environment, Shell};
use orchid_types::config::OrchidConfig;
use orchid_vfs::MemoryVfs;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .or_else(|| std::env::var("ORCHID_CONFIG").ok())
        .map(PathBuf::from);
    let script_path = args.next().map(PathBuf::from);

    let config = match &config_path {
        Some(path) => OrchidConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            log::info!("No config given, using defaults");
            OrchidConfig::default()
        },
    };

    let script = match &script_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading key script {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading key script from stdin")?;
            text
        },
    };
    let mut keys = ScriptedKeyboard::from_text(&script)?;
    log::info!("Key script has {} snapshots", keys.remaining());

    let mut vfs = MemoryVfs::new();
    vfs_setup::populate_vfs(&mut vfs, &config.home_dir)?;

    let mut platform = DesktopPlatform::new();
    log::info!("Platform: {}", platform.name());
    let mut display = TextDisplay::new(std::io::stdout());
    let mut rng = StdRng::from_entropy();
    let registry = CommandRegistry::with_builtins()?;

    let env = Environment::new(&config, &mut vfs, &mut platform, &mut rng);
    let mut shell = Shell::new(&config, &mut keys, &mut display, &registry, env);
    shell.boot();
    shell.run();

    Ok(())
}

//! The strato interactive shell.

mod repl;

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};

use strato_config::ConfigStore;
use strato_platform::DesktopProbe;
use strato_plugin::{DirCatalog, PluginCatalog, PluginLoader, register_plugin_commands};
use strato_shell::{CommandRegistry, register_builtins};

use crate::repl::Repl;

/// Environment override for the install root (default `~/.strato`).
const HOME_VAR: &str = "STRATO_HOME";

/// Optional local plugin catalog directory.
const CATALOG_VAR: &str = "STRATO_CATALOG";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let root = install_root().context("cannot determine the install root")?;
    let plugins_dir = root.join("plugins");
    std::fs::create_dir_all(&plugins_dir)
        .with_context(|| format!("creating {}", plugins_dir.display()))?;

    let config = ConfigStore::open(&root);
    let probe = DesktopProbe::new();

    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry);

    let mut loader = PluginLoader::new();
    let summary = loader.load_all(&plugins_dir, &mut registry);
    for (path, reason) in &summary.failed {
        eprintln!("plugin {} failed to load: {reason}", path.display());
    }

    let catalog: Option<Rc<dyn PluginCatalog>> = std::env::var_os(CATALOG_VAR)
        .map(|dir| Rc::new(DirCatalog::new(PathBuf::from(dir))) as Rc<dyn PluginCatalog>);
    register_plugin_commands(
        &mut registry,
        env!("CARGO_PKG_VERSION"),
        loader.descriptors().to_vec(),
        catalog,
    );

    print_banner(&config, &summary.loaded);

    let mut repl = Repl::new(registry, config, probe, plugins_dir, loader);
    repl.run()
}

/// `$STRATO_HOME` when set, otherwise `~/.strato`.
fn install_root() -> Option<PathBuf> {
    if let Some(root) = std::env::var_os(HOME_VAR) {
        return Some(PathBuf::from(root));
    }
    dirs::home_dir().map(|home| home.join(".strato"))
}

fn print_banner(config: &ConfigStore, loaded_plugins: &[String]) {
    println!(
        "{} {}",
        config.colorize("strato", "header"),
        env!("CARGO_PKG_VERSION")
    );
    if loaded_plugins.is_empty() {
        println!("{}", config.colorize("type 'help' to get started", "dim"));
    } else {
        println!(
            "{}",
            config.colorize(
                &format!("plugins: {}", loaded_plugins.join(", ")),
                "data_primary"
            )
        );
    }
}

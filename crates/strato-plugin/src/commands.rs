//! Plugin management built-ins: pl, install, installdelete, ver.
//!
//! These capture their collaborators (loaded descriptors, catalog, shell
//! version) at registration time, after the plugin load pass has run.

use std::path::PathBuf;
use std::rc::Rc;

use strato_shell::{Command, CommandOutput, CommandRegistry, ShellContext};
use strato_types::error::{Result, StratoError};

use crate::catalog::PluginCatalog;
use crate::loader::PluginDescriptor;

/// Register the plugin management commands.
pub fn register_plugin_commands(
    reg: &mut CommandRegistry,
    shell_version: &str,
    loaded: Vec<PluginDescriptor>,
    catalog: Option<Rc<dyn PluginCatalog>>,
) {
    // `pl` and `installist` are the same listing under both of its
    // historical names.
    for name in ["pl", "installist"] {
        reg.register(Box::new(PlCmd {
            name,
            loaded: loaded.clone(),
            catalog: catalog.clone(),
        }));
    }
    reg.register(Box::new(InstallCmd {
        catalog: catalog.clone(),
    }));
    reg.register(Box::new(InstallDeleteCmd));
    reg.register(Box::new(VerCmd {
        shell_version: shell_version.to_string(),
        loaded,
    }));
}

fn installed_path(ctx: &ShellContext<'_>, name: &str) -> PathBuf {
    ctx.plugins_dir
        .join(format!("{name}.{}", std::env::consts::DLL_EXTENSION))
}

// ---------------------------------------------------------------------------
// pl
// ---------------------------------------------------------------------------

struct PlCmd {
    name: &'static str,
    loaded: Vec<PluginDescriptor>,
    catalog: Option<Rc<dyn PluginCatalog>>,
}
impl Command for PlCmd {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "List loaded and available plugins"
    }
    fn usage(&self) -> &str {
        self.name
    }
    fn category(&self) -> &str {
        "plugins"
    }
    fn execute(&self, _args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let mut lines = Vec::new();

        if self.loaded.is_empty() {
            lines.push(format!(
                "no plugins loaded (drop libraries into {})",
                ctx.plugins_dir.display()
            ));
        } else {
            lines.push(ctx.config.colorize("Loaded plugins", "header"));
            for plugin in &self.loaded {
                let version = plugin.version.as_deref().unwrap_or("-");
                lines.push(format!(
                    "  {:<16} {:<10} {}",
                    plugin.name,
                    version,
                    plugin.path.display()
                ));
            }
        }

        // Catalog entries, marked when already installed.
        if let Some(catalog) = &self.catalog {
            let names = catalog.available()?;
            if !names.is_empty() {
                lines.push(ctx.config.colorize("Available plugins", "header"));
                for name in names {
                    let mark = if installed_path(ctx, &name).is_file() {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    lines.push(format!("  {mark} {name}"));
                }
            }
        }

        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// install
// ---------------------------------------------------------------------------

struct InstallCmd {
    catalog: Option<Rc<dyn PluginCatalog>>,
}
impl Command for InstallCmd {
    fn name(&self) -> &str {
        "install"
    }
    fn description(&self) -> &str {
        "Install a plugin from the configured catalog"
    }
    fn usage(&self) -> &str {
        "install [name]"
    }
    fn category(&self) -> &str {
        "plugins"
    }
    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let Some(catalog) = &self.catalog else {
            return Err(StratoError::Catalog(
                "no plugin catalog configured".to_string(),
            ));
        };

        let Some(&name) = args.first() else {
            let names = catalog.available()?;
            if names.is_empty() {
                return Ok(CommandOutput::Text("catalog is empty".to_string()));
            }
            let mut lines = vec![ctx.config.colorize("Available plugins", "header")];
            for name in names {
                lines.push(format!("  {name}"));
            }
            return Ok(CommandOutput::Text(lines.join("\n")));
        };

        let installed = catalog.fetch(name, &ctx.plugins_dir)?;
        Ok(CommandOutput::Text(format!(
            "installed {} (restart to load it)",
            installed.display()
        )))
    }
}

// ---------------------------------------------------------------------------
// installdelete
// ---------------------------------------------------------------------------

struct InstallDeleteCmd;
impl Command for InstallDeleteCmd {
    fn name(&self) -> &str {
        "installdelete"
    }
    fn description(&self) -> &str {
        "Remove an installed plugin"
    }
    fn usage(&self) -> &str {
        "installdelete <name>"
    }
    fn category(&self) -> &str {
        "plugins"
    }
    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let Some(&name) = args.first() else {
            return Err(StratoError::Command(
                "usage: installdelete <name>".to_string(),
            ));
        };
        let path = installed_path(ctx, name);
        if !path.is_file() {
            return Err(StratoError::Plugin(format!("not installed: {name}")));
        }
        std::fs::remove_file(&path)?;
        Ok(CommandOutput::Text(format!(
            "removed {} (restart to unload it)",
            path.display()
        )))
    }
}

// ---------------------------------------------------------------------------
// ver
// ---------------------------------------------------------------------------

struct VerCmd {
    shell_version: String,
    loaded: Vec<PluginDescriptor>,
}
impl Command for VerCmd {
    fn name(&self) -> &str {
        "ver"
    }
    fn description(&self) -> &str {
        "Show shell and plugin versions"
    }
    fn usage(&self) -> &str {
        "ver"
    }
    fn category(&self) -> &str {
        "plugins"
    }
    fn execute(&self, _args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let mut lines = vec![format!(
            "{} {}",
            ctx.config.colorize("strato", "header"),
            self.shell_version
        )];
        for plugin in &self.loaded {
            if let Some(version) = &plugin.version {
                lines.push(format!("  {} {}", plugin.name, version));
            }
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

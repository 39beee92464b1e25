//! General built-ins and the top-level registration entry point.

use strato_types::error::{Result, StratoError};

use crate::config_commands::register_config_commands;
use crate::file_commands::register_file_commands;
use crate::interpreter::{Command, CommandOutput, CommandRegistry, ShellContext};

/// Register every built-in command. Plugins load after this, so a plugin
/// that registers an existing name shadows the built-in.
pub fn register_builtins(reg: &mut CommandRegistry) {
    register_file_commands(reg);
    register_config_commands(reg);
    reg.register(Box::new(ClearCmd));
    reg.register(Box::new(TimeCmd));
    reg.register(Box::new(RefreshCmd));
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "Clear the screen"
    }
    fn usage(&self) -> &str {
        "clear"
    }
    fn execute(&self, _args: &[&str], _ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Clear)
    }
}

// ---------------------------------------------------------------------------
// time
// ---------------------------------------------------------------------------

struct TimeCmd;
impl Command for TimeCmd {
    fn name(&self) -> &str {
        "time"
    }
    fn description(&self) -> &str {
        "Show the local time, or the time somewhere else"
    }
    fn usage(&self) -> &str {
        "time [place]"
    }
    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        if args.is_empty() {
            let fmt = if ctx.config.time_format() == "12" {
                "%I:%M:%S %p"
            } else {
                "%H:%M:%S"
            };
            return Ok(CommandOutput::Text(ctx.probe.now().format(fmt).to_string()));
        }

        let place = args.join(" ");
        let Some(lookup) = ctx.time_lookup else {
            return Err(StratoError::Command(
                "no time service configured".to_string(),
            ));
        };
        let answer = lookup.time_in(&place)?;
        Ok(CommandOutput::Text(format!("{place}: {answer}")))
    }
}

// ---------------------------------------------------------------------------
// refresh
// ---------------------------------------------------------------------------

struct RefreshCmd;
impl Command for RefreshCmd {
    fn name(&self) -> &str {
        "refresh"
    }
    fn description(&self) -> &str {
        "Re-read the configuration file"
    }
    fn usage(&self) -> &str {
        "refresh"
    }
    fn execute(&self, _args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        ctx.config.reload();
        Ok(CommandOutput::Text(
            "configuration reloaded (restart to pick up plugin changes)".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;
    use strato_config::ConfigStore;
    use strato_platform::{SystemProbe, TimeLookup};
    use tempfile::TempDir;

    struct TestProbe;
    impl SystemProbe for TestProbe {
        fn hostname(&self) -> Result<String> {
            Ok("box".to_string())
        }
        fn current_dir(&self) -> Result<PathBuf> {
            Ok(PathBuf::from("/home/nina"))
        }
        fn home_dir(&self) -> Option<PathBuf> {
            Some(PathBuf::from("/home/nina"))
        }
        fn battery_percent(&self) -> Option<u8> {
            None
        }
        fn now(&self) -> DateTime<Local> {
            Local.with_ymd_and_hms(2024, 3, 9, 13, 5, 30).unwrap()
        }
    }

    struct FixedLookup;
    impl TimeLookup for FixedLookup {
        fn time_in(&self, _place: &str) -> Result<String> {
            Ok("09:05".to_string())
        }
    }

    struct Harness {
        dir: TempDir,
        config: ConfigStore,
        probe: TestProbe,
    }

    impl Harness {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let config = ConfigStore::open(dir.path());
            Self {
                dir,
                config,
                probe: TestProbe,
            }
        }

        fn ctx(&mut self) -> ShellContext<'_> {
            ShellContext {
                config: &mut self.config,
                probe: &self.probe,
                time_lookup: None,
                plugins_dir: self.dir.path().join("plugins"),
            }
        }
    }

    fn registry() -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        register_builtins(&mut reg);
        reg
    }

    #[test]
    fn builtins_cover_expected_names() {
        let reg = registry();
        for name in [
            "ls",
            "cd",
            "mkdir",
            "pwd",
            "sfc",
            "cef",
            "mkex",
            "config",
            "format",
            "colors",
            "placeholders",
            "clear",
            "time",
            "refresh",
        ] {
            assert!(reg.contains(name), "missing builtin {name}");
        }
    }

    #[test]
    fn clear_signals_screen_clear() {
        let reg = registry();
        let mut h = Harness::new();
        assert!(matches!(
            reg.dispatch("clear", &mut h.ctx()).unwrap(),
            CommandOutput::Clear
        ));
    }

    #[test]
    fn time_respects_configured_format() {
        let reg = registry();
        let mut h = Harness::new();
        match reg.dispatch("time", &mut h.ctx()).unwrap() {
            CommandOutput::Text(s) => assert_eq!(s, "13:05:30"),
            other => panic!("unexpected output {other:?}"),
        }

        h.config.set("time_format", json!("12"));
        match reg.dispatch("time", &mut h.ctx()).unwrap() {
            CommandOutput::Text(s) => assert_eq!(s, "01:05:30 PM"),
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn time_with_place_needs_a_lookup() {
        let reg = registry();
        let mut h = Harness::new();
        let err = reg.dispatch("time tokyo", &mut h.ctx()).unwrap_err();
        assert!(format!("{err}").contains("no time service"));
    }

    #[test]
    fn time_with_place_uses_the_lookup() {
        let reg = registry();
        let mut h = Harness::new();
        let lookup = FixedLookup;
        let mut ctx = h.ctx();
        ctx.time_lookup = Some(&lookup);
        match reg.dispatch("time new york", &mut ctx).unwrap() {
            CommandOutput::Text(s) => assert_eq!(s, "new york: 09:05"),
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[test]
    fn refresh_rereads_the_file() {
        let reg = registry();
        let mut h = Harness::new();
        let mut edited = h.config.data().clone();
        edited.insert("username".to_string(), json!("edited"));
        fs::write(
            h.config.path(),
            serde_json::to_string(&serde_json::Value::Object(edited)).unwrap(),
        )
        .unwrap();
        reg.dispatch("refresh", &mut h.ctx()).unwrap();
        assert_eq!(h.config.username(), "edited");
    }
}

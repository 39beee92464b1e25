//! Command trait, registry, and dispatch logic.
//!
//! Supports quoted arguments and an external-executable fallback. There is
//! deliberately no pipe, redirection, or job-control grammar.

use std::collections::HashMap;
use std::path::PathBuf;

use strato_config::ConfigStore;
use strato_platform::{SystemProbe, TimeLookup};
use strato_types::error::{Result, StratoError};

/// Output produced by a command.
#[derive(Debug, Clone)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Command produced no visible output.
    None,
    /// Signal to clear the terminal screen.
    Clear,
    /// Signal to terminate the interactive loop.
    Exit,
}

/// Shared mutable context passed to every command.
pub struct ShellContext<'a> {
    /// The configuration store (mutations are persisted by the command).
    pub config: &'a mut ConfigStore,
    /// Live system values (hostname, cwd, battery, clock).
    pub probe: &'a dyn SystemProbe,
    /// Optional remote time lookup collaborator.
    pub time_lookup: Option<&'a dyn TimeLookup>,
    /// Directory scanned for plugins.
    pub plugins_dir: PathBuf,
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "ls \[path\]").
    fn usage(&self) -> &str;

    /// Command category for grouping in `help` output.
    fn category(&self) -> &str {
        "general"
    }

    /// Execute the command with the given arguments and context.
    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput>;
}

/// Registry of available commands with dispatch.
///
/// Built once during startup (built-ins first, then plugins) and treated
/// as immutable during the interactive loop: `dispatch` takes `&self`, so
/// handlers cannot re-enter registration.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command. Replaces any existing command with the same
    /// name -- last writer wins, so plugins may shadow built-ins.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Whether a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Parse and execute a command line.
    ///
    /// The first token names the command; remaining tokens are passed as
    /// positional arguments verbatim (no globbing, no re-interpretation).
    /// `exit` and `quit` are intercepted before lookup and request loop
    /// termination. Unbound names fall back to an executable on `$PATH`.
    pub fn dispatch(&self, line: &str, ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(CommandOutput::None);
        }

        let tokens = tokenize(trimmed)?;
        let Some(name) = tokens.first() else {
            return Ok(CommandOutput::None);
        };
        let arg_strings: Vec<&str> = tokens[1..].iter().map(String::as_str).collect();
        let args = arg_strings.as_slice();

        match name.as_str() {
            "exit" | "quit" => return Ok(CommandOutput::Exit),
            // help needs registry access, so it is intercepted here.
            "help" => return self.execute_help(args),
            _ => {},
        }

        match self.commands.get(name.as_str()) {
            Some(cmd) => cmd.execute(args, ctx),
            None => run_external(name, args),
        }
    }

    /// Built-in help with access to the registry.
    fn execute_help(&self, args: &[&str]) -> Result<CommandOutput> {
        if let Some(&name) = args.first() {
            match self.commands.get(name) {
                Some(cmd) => {
                    let mut out = format!("{} ({})\n", cmd.name(), cmd.category());
                    out.push_str(&format!("  {}\n", cmd.description()));
                    out.push_str(&format!("  Usage: {}", cmd.usage()));
                    Ok(CommandOutput::Text(out))
                },
                None => Err(StratoError::Command(format!("unknown command: {name}"))),
            }
        } else {
            // Group commands by category.
            let mut categories: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
            for intercepted in &[
                ("help", "shell", "List available commands"),
                ("exit", "shell", "Exit the shell"),
                ("quit", "shell", "Exit the shell"),
            ] {
                categories
                    .entry(intercepted.1)
                    .or_default()
                    .push((intercepted.0, intercepted.2));
            }
            for cmd in self.commands.values() {
                categories
                    .entry(cmd.category())
                    .or_default()
                    .push((cmd.name(), cmd.description()));
            }

            let mut cats: Vec<&str> = categories.keys().copied().collect();
            cats.sort_unstable();

            let total: usize = categories.values().map(|v| v.len()).sum();
            let mut out = format!("Commands ({total}):\n");
            for cat in &cats {
                let mut cmds = categories[cat].clone();
                cmds.sort_by_key(|(name, _)| *name);
                out.push_str(&format!("\n  [{cat}]\n"));
                for (name, desc) in &cmds {
                    out.push_str(&format!("    {name:14} {desc}\n"));
                }
            }
            out.push_str("\nType 'help <command>' for details.");
            Ok(CommandOutput::Text(out))
        }
    }

    /// Return a sorted list of (name, description) pairs.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<(&str, &str)> = self
            .commands
            .values()
            .map(|c| (c.name(), c.description()))
            .collect();
        cmds.sort_by_key(|(name, _)| *name);
        cmds
    }

    /// Return completions for a partial command name.
    pub fn completions(&self, partial: &str) -> Vec<String> {
        let mut matches: Vec<String> = self
            .commands
            .keys()
            .filter(|name| name.starts_with(partial))
            .cloned()
            .collect();
        matches.sort_unstable();
        matches
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// External executable fallback
// ---------------------------------------------------------------------------

/// Run a like-named executable from `$PATH` with the same argument vector.
///
/// Arguments are passed directly to the process -- never concatenated into
/// a shell string. A nonzero exit is reported distinctly from "not found".
fn run_external(name: &str, args: &[&str]) -> Result<CommandOutput> {
    let Some(path) = find_on_path(name) else {
        return Err(StratoError::Command(format!("command not found: {name}")));
    };
    log::debug!("running external command {}", path.display());

    let status = std::process::Command::new(&path)
        .args(args)
        .status()
        .map_err(|e| StratoError::Command(format!("{name}: failed to start: {e}")))?;

    if status.success() {
        return Ok(CommandOutput::None);
    }
    match status.code() {
        Some(code) => Err(StratoError::Command(format!(
            "{name}: exited with status {code}"
        ))),
        None => Err(StratoError::Command(format!("{name}: killed by signal"))),
    }
}

/// Locate `name` on the search path (or verify an explicit path).
fn find_on_path(name: &str) -> Option<PathBuf> {
    if name.contains(std::path::MAIN_SEPARATOR) {
        let path = PathBuf::from(name);
        return (path.is_file() && is_executable(&path)).then_some(path);
    }
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &std::path::Path) -> bool {
    true
}

// ---------------------------------------------------------------------------
// Tokenizer: handles single quotes, double quotes, and backslash escapes.
// ---------------------------------------------------------------------------

/// Tokenize a command line respecting quotes and backslash escapes.
///
/// - Single-quoted strings preserve all characters literally.
/// - Double-quoted strings group words; `\"`, `\\` escape inside them.
/// - Backslash escapes the next character outside of quotes.
///
/// An unterminated quote is an error, reported to the user by the caller.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(ch) = chars.next() {
        if in_single {
            if ch == '\'' {
                in_single = false;
            } else {
                current.push(ch);
            }
        } else if in_double {
            if ch == '"' {
                in_double = false;
            } else if ch == '\\'
                && let Some(&next) = chars.peek()
            {
                match next {
                    '"' | '\\' => {
                        current.push(next);
                        chars.next();
                    },
                    _ => current.push('\\'),
                }
            } else {
                current.push(ch);
            }
        } else {
            match ch {
                '\'' => in_single = true,
                '"' => in_double = true,
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                },
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                },
                c => current.push(c),
            }
        }
    }

    if in_single || in_double {
        return Err(StratoError::Command("unterminated quote".to_string()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local};
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct TestProbe;
    impl SystemProbe for TestProbe {
        fn hostname(&self) -> Result<String> {
            Ok("box".to_string())
        }
        fn current_dir(&self) -> Result<PathBuf> {
            Ok(std::env::current_dir()?)
        }
        fn home_dir(&self) -> Option<PathBuf> {
            None
        }
        fn battery_percent(&self) -> Option<u8> {
            None
        }
        fn now(&self) -> DateTime<Local> {
            Local::now()
        }
    }

    struct Harness {
        _dir: TempDir,
        config: ConfigStore,
        probe: TestProbe,
        plugins_dir: PathBuf,
    }

    impl Harness {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let config = ConfigStore::open(dir.path());
            let plugins_dir = dir.path().join("plugins");
            Self {
                _dir: dir,
                config,
                probe: TestProbe,
                plugins_dir,
            }
        }

        fn ctx(&mut self) -> ShellContext<'_> {
            ShellContext {
                config: &mut self.config,
                probe: &self.probe,
                time_lookup: None,
                plugins_dir: self.plugins_dir.clone(),
            }
        }
    }

    struct TagCmd {
        name: &'static str,
        tag: &'static str,
        hits: Rc<Cell<u32>>,
    }
    impl Command for TagCmd {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "test command"
        }
        fn usage(&self) -> &str {
            self.name
        }
        fn execute(&self, args: &[&str], _ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
            self.hits.set(self.hits.get() + 1);
            Ok(CommandOutput::Text(format!(
                "{}:{}",
                self.tag,
                args.join(",")
            )))
        }
    }

    #[test]
    fn registered_command_receives_args() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(TagCmd {
            name: "foo",
            tag: "a",
            hits: Rc::new(Cell::new(0)),
        }));
        let mut h = Harness::new();
        match reg.dispatch("foo one 'two words'", &mut h.ctx()).unwrap() {
            CommandOutput::Text(s) => assert_eq!(s, "a:one,two words"),
            _ => panic!("expected text output"),
        }
    }

    #[test]
    fn reregistering_overwrites_previous_binding() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(TagCmd {
            name: "foo",
            tag: "first",
            hits: Rc::clone(&first),
        }));
        reg.register(Box::new(TagCmd {
            name: "foo",
            tag: "second",
            hits: Rc::clone(&second),
        }));
        let mut h = Harness::new();
        match reg.dispatch("foo", &mut h.ctx()).unwrap() {
            CommandOutput::Text(s) => assert_eq!(s, "second:"),
            _ => panic!("expected text output"),
        }
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn empty_and_whitespace_lines_are_noops() {
        let reg = CommandRegistry::new();
        let mut h = Harness::new();
        assert!(matches!(
            reg.dispatch("", &mut h.ctx()).unwrap(),
            CommandOutput::None
        ));
        assert!(matches!(
            reg.dispatch("   \t ", &mut h.ctx()).unwrap(),
            CommandOutput::None
        ));
    }

    #[test]
    fn exit_and_quit_are_intercepted() {
        let reg = CommandRegistry::new();
        let mut h = Harness::new();
        assert!(matches!(
            reg.dispatch("exit", &mut h.ctx()).unwrap(),
            CommandOutput::Exit
        ));
        assert!(matches!(
            reg.dispatch("quit now", &mut h.ctx()).unwrap(),
            CommandOutput::Exit
        ));
    }

    #[test]
    fn unknown_command_reports_not_found_without_escaping() {
        let reg = CommandRegistry::new();
        let mut h = Harness::new();
        let err = reg.dispatch("zzqx-no-such-binary", &mut h.ctx()).unwrap_err();
        assert!(format!("{err}").contains("not found"));
    }

    #[test]
    fn handler_error_is_returned_not_panicked() {
        struct FailCmd;
        impl Command for FailCmd {
            fn name(&self) -> &str {
                "boom"
            }
            fn description(&self) -> &str {
                "always fails"
            }
            fn usage(&self) -> &str {
                "boom"
            }
            fn execute(&self, _: &[&str], _: &mut ShellContext<'_>) -> Result<CommandOutput> {
                Err(StratoError::Command("boom: deliberate failure".to_string()))
            }
        }
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(FailCmd));
        let mut h = Harness::new();
        let err = reg.dispatch("boom", &mut h.ctx()).unwrap_err();
        assert!(format!("{err}").contains("deliberate failure"));
    }

    #[test]
    fn help_lists_registered_and_intercepted_commands() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(TagCmd {
            name: "foo",
            tag: "a",
            hits: Rc::new(Cell::new(0)),
        }));
        let mut h = Harness::new();
        match reg.dispatch("help", &mut h.ctx()).unwrap() {
            CommandOutput::Text(s) => {
                assert!(s.contains("foo"));
                assert!(s.contains("exit"));
            },
            _ => panic!("expected text output"),
        }
    }

    #[test]
    fn completions_filter_by_prefix() {
        let mut reg = CommandRegistry::new();
        for name in ["config", "colors", "cd"] {
            reg.register(Box::new(TagCmd {
                name,
                tag: "x",
                hits: Rc::new(Cell::new(0)),
            }));
        }
        assert_eq!(reg.completions("co").len(), 2);
        assert_eq!(reg.completions("cd"), vec!["cd".to_string()]);
    }

    // -- tokenizer --

    #[test]
    fn tokenize_splits_on_whitespace() {
        assert_eq!(
            tokenize("a  b\tc").unwrap(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn tokenize_single_quotes_preserve_literally() {
        assert_eq!(
            tokenize(r#"echo 'hello "world"'"#).unwrap(),
            vec!["echo".to_string(), r#"hello "world""#.to_string()]
        );
    }

    #[test]
    fn tokenize_double_quotes_group_words() {
        assert_eq!(
            tokenize(r#"cfg prompt "a b c""#).unwrap(),
            vec!["cfg".to_string(), "prompt".to_string(), "a b c".to_string()]
        );
    }

    #[test]
    fn tokenize_backslash_escapes() {
        assert_eq!(
            tokenize(r"touch my\ file").unwrap(),
            vec!["touch".to_string(), "my file".to_string()]
        );
        assert_eq!(
            tokenize(r#"echo "say \"hi\"""#).unwrap(),
            vec!["echo".to_string(), r#"say "hi""#.to_string()]
        );
    }

    #[test]
    fn tokenize_unterminated_quote_is_error() {
        assert!(tokenize("echo 'oops").is_err());
        assert!(tokenize("echo \"oops").is_err());
    }
}

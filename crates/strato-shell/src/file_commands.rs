//! Filesystem built-ins: ls, cd, mkdir, pwd, sfc, cef, mkex.

use std::fs;
use std::path::Path;

use strato_types::error::{Result, StratoError};

use crate::interpreter::{Command, CommandOutput, ShellContext};

/// Register the filesystem commands into a registry.
pub fn register_file_commands(reg: &mut crate::CommandRegistry) {
    reg.register(Box::new(LsCmd));
    reg.register(Box::new(CdCmd));
    reg.register(Box::new(MkdirCmd));
    reg.register(Box::new(PwdCmd));
    reg.register(Box::new(SfcCmd));
    reg.register(Box::new(CefCmd));
    reg.register(Box::new(MkexCmd));
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List directory contents"
    }
    fn usage(&self) -> &str {
        "ls [dir]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let path = args.first().copied().unwrap_or(".");
        let entries =
            fs::read_dir(path).map_err(|e| StratoError::Command(format!("ls: {path}: {e}")))?;

        let mut names = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            names.push((name, is_dir));
        }
        names.sort();

        let lines: Vec<String> = names
            .into_iter()
            .map(|(name, is_dir)| {
                if is_dir {
                    ctx.config.colorize(&format!("{name}/"), "data_primary")
                } else {
                    name
                }
            })
            .collect();
        if lines.is_empty() {
            return Ok(CommandOutput::Text("(empty)".to_string()));
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Change directory (no args goes home)"
    }
    fn usage(&self) -> &str {
        "cd [dir]"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let target = match args.first() {
            Some(&dir) => std::path::PathBuf::from(dir),
            None => ctx
                .probe
                .home_dir()
                .ok_or_else(|| StratoError::Command("cd: cannot resolve home".to_string()))?,
        };
        std::env::set_current_dir(&target)
            .map_err(|e| StratoError::Command(format!("cd: {}: {e}", target.display())))?;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// mkdir
// ---------------------------------------------------------------------------

struct MkdirCmd;
impl Command for MkdirCmd {
    fn name(&self) -> &str {
        "mkdir"
    }
    fn description(&self) -> &str {
        "Create a directory"
    }
    fn usage(&self) -> &str {
        "mkdir <dir>"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], _ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let Some(&dir) = args.first() else {
            return Err(StratoError::Command("usage: mkdir <dir>".to_string()));
        };
        fs::create_dir_all(dir).map_err(|e| StratoError::Command(format!("mkdir: {dir}: {e}")))?;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Print working directory"
    }
    fn usage(&self) -> &str {
        "pwd"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, _args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let dir = ctx
            .probe
            .current_dir()
            .map_err(|e| StratoError::Command(format!("pwd: {e}")))?;
        Ok(CommandOutput::Text(dir.display().to_string()))
    }
}

// ---------------------------------------------------------------------------
// sfc (show file contents)
// ---------------------------------------------------------------------------

struct SfcCmd;
impl Command for SfcCmd {
    fn name(&self) -> &str {
        "sfc"
    }
    fn description(&self) -> &str {
        "Show file contents"
    }
    fn usage(&self) -> &str {
        "sfc <file>"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], _ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let Some(&file) = args.first() else {
            return Err(StratoError::Command("usage: sfc <file>".to_string()));
        };
        let text = fs::read_to_string(file)
            .map_err(|e| StratoError::Command(format!("sfc: {file}: {e}")))?;
        Ok(CommandOutput::Text(text.trim_end().to_string()))
    }
}

// ---------------------------------------------------------------------------
// cef (create empty file)
// ---------------------------------------------------------------------------

struct CefCmd;
impl Command for CefCmd {
    fn name(&self) -> &str {
        "cef"
    }
    fn description(&self) -> &str {
        "Create an empty file"
    }
    fn usage(&self) -> &str {
        "cef <file>"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], _ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let Some(&file) = args.first() else {
            return Err(StratoError::Command("usage: cef <file>".to_string()));
        };
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .map_err(|e| StratoError::Command(format!("cef: {file}: {e}")))?;
        Ok(CommandOutput::Text(format!("Created or updated {file}")))
    }
}

// ---------------------------------------------------------------------------
// mkex (make executable)
// ---------------------------------------------------------------------------

struct MkexCmd;
impl Command for MkexCmd {
    fn name(&self) -> &str {
        "mkex"
    }
    fn description(&self) -> &str {
        "Make a file executable"
    }
    fn usage(&self) -> &str {
        "mkex <file>"
    }
    fn category(&self) -> &str {
        "filesystem"
    }
    fn execute(&self, args: &[&str], _ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let Some(&file) = args.first() else {
            return Err(StratoError::Command("usage: mkex <file>".to_string()));
        };
        make_executable(Path::new(file))
            .map_err(|e| StratoError::Command(format!("mkex: {file}: {e}")))?;
        Ok(CommandOutput::Text(format!("Made {file} executable")))
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

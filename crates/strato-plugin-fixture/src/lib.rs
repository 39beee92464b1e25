//! Minimal plugin used by the loader integration tests.
//!
//! Built as a cdylib and loaded through the plugin loader like any user
//! plugin: it exports the registration entry point and a version string.

use std::os::raw::c_char;

use strato_shell::{Command, CommandOutput, CommandRegistry, ShellContext};
use strato_types::error::Result;

struct GreetCmd;
impl Command for GreetCmd {
    fn name(&self) -> &str {
        "greet"
    }
    fn description(&self) -> &str {
        "Say hello"
    }
    fn usage(&self) -> &str {
        "greet [name]"
    }
    fn category(&self) -> &str {
        "plugins"
    }
    fn execute(&self, args: &[&str], _ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let who = args.first().copied().unwrap_or("world");
        Ok(CommandOutput::Text(format!("hello, {who}!")))
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn strato_plugin_register(reg: &mut CommandRegistry) {
    reg.register(Box::new(GreetCmd));
}

#[unsafe(no_mangle)]
pub extern "C" fn strato_plugin_version() -> *const c_char {
    c"1.0.0".as_ptr()
}

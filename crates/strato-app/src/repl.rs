//! The interactive read-eval-print loop.

use std::path::PathBuf;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use strato_config::ConfigStore;
use strato_platform::DesktopProbe;
use strato_plugin::PluginLoader;
use strato_shell::{CommandOutput, CommandRegistry, ShellContext};

/// ANSI clear-screen plus cursor-home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct Repl {
    registry: CommandRegistry,
    config: ConfigStore,
    probe: DesktopProbe,
    plugins_dir: PathBuf,
    // Keeps plugin libraries mapped while their commands are registered.
    _loader: PluginLoader,
}

impl Repl {
    pub fn new(
        registry: CommandRegistry,
        config: ConfigStore,
        probe: DesktopProbe,
        plugins_dir: PathBuf,
        loader: PluginLoader,
    ) -> Self {
        Self {
            registry,
            config,
            probe,
            plugins_dir,
            _loader: loader,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;

        loop {
            // Re-rendered every iteration: cwd, time, and settings move.
            let template = self.config.prompt_template();
            let prompt = strato_template::render(&template, &self.config, &self.probe);

            match editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(&line);
                    }
                    if self.eval(&line) {
                        break;
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    println!("Use 'exit' or 'quit' to close strato.");
                },
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                },
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Evaluate one line; returns true when the loop should end.
    fn eval(&mut self, line: &str) -> bool {
        let mut ctx = ShellContext {
            config: &mut self.config,
            probe: &self.probe,
            time_lookup: None,
            plugins_dir: self.plugins_dir.clone(),
        };
        match self.registry.dispatch(line, &mut ctx) {
            Ok(CommandOutput::Text(text)) => println!("{text}"),
            Ok(CommandOutput::None) => {},
            Ok(CommandOutput::Clear) => print!("{CLEAR_SCREEN}"),
            Ok(CommandOutput::Exit) => {
                println!("{}", self.config.colorize("Goodbye!", "warning"));
                return true;
            },
            Err(e) => {
                println!("{}", self.config.colorize(&e.to_string(), "error"));
            },
        }
        false
    }
}

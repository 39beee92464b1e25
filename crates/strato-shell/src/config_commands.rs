//! Configuration and appearance built-ins: config, format, colors,
//! placeholders.

use serde_json::{Value, json};

use strato_config::{
    KEY_COLOR, KEY_PROMPT_TEMPLATE, KEY_TIME_FORMAT, KEY_USERNAME, resolve_color_spec, spec_names,
};
use strato_template::{placeholder_values, render, resolve_tags};
use strato_types::error::{Result, StratoError};

use crate::interpreter::{Command, CommandOutput, ShellContext};

/// Register the configuration commands into a registry.
pub fn register_config_commands(reg: &mut crate::CommandRegistry) {
    reg.register(Box::new(ConfigCmd));
    reg.register(Box::new(FormatCmd));
    reg.register(Box::new(ColorsCmd));
    reg.register(Box::new(PlaceholdersCmd));
}

/// Persist the store, turning a write failure into a non-fatal warning
/// line. In-memory state already holds the change either way.
fn save_note(ctx: &ShellContext<'_>) -> Option<String> {
    match ctx.config.save() {
        Ok(()) => None,
        Err(e) => Some(format!(
            "warning: could not write {}: {e}",
            ctx.config.path().display()
        )),
    }
}

fn with_save_note(mut text: String, ctx: &ShellContext<'_>) -> CommandOutput {
    if let Some(note) = save_note(ctx) {
        text.push('\n');
        text.push_str(&note);
    }
    CommandOutput::Text(text)
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

struct ConfigCmd;
impl Command for ConfigCmd {
    fn name(&self) -> &str {
        "config"
    }
    fn description(&self) -> &str {
        "View and change shell settings"
    }
    fn usage(&self) -> &str {
        "config [show|username|color|colors|time_format|prompt|reset] ..."
    }
    fn category(&self) -> &str {
        "configuration"
    }
    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        match args {
            [] => Ok(CommandOutput::Text(overview(ctx))),
            ["show"] => {
                let text = serde_json::to_string_pretty(&Value::Object(ctx.config.data().clone()))?;
                Ok(CommandOutput::Text(text))
            },
            ["username"] => Ok(CommandOutput::Text(format!(
                "username: {}",
                ctx.config.username()
            ))),
            ["username", name] => {
                ctx.config.set(KEY_USERNAME, json!(name));
                Ok(with_save_note(format!("username set to {name}"), ctx))
            },
            ["color", "on"] => {
                ctx.config.set(KEY_COLOR, json!(true));
                Ok(with_save_note("color output enabled".to_string(), ctx))
            },
            ["color", "off"] => {
                ctx.config.set(KEY_COLOR, json!(false));
                Ok(with_save_note("color output disabled".to_string(), ctx))
            },
            ["color", key, spec] => set_palette(ctx, key, spec),
            ["colors"] => Ok(CommandOutput::Text(palette_demo(ctx.config))),
            ["time_format", fmt @ ("12" | "24")] => {
                ctx.config.set(KEY_TIME_FORMAT, json!(fmt));
                Ok(with_save_note(format!("time format set to {fmt}-hour"), ctx))
            },
            ["time_format", other] => Err(StratoError::Config(format!(
                "time_format must be 12 or 24, got {other}"
            ))),
            ["prompt"] => {
                let template = ctx.config.prompt_template();
                let preview = render(&template, ctx.config, ctx.probe);
                Ok(CommandOutput::Text(format!(
                    "template: {template}\npreview:  {preview}"
                )))
            },
            ["prompt", template] => {
                ctx.config.set(KEY_PROMPT_TEMPLATE, json!(template));
                let preview = render(template, ctx.config, ctx.probe);
                Ok(with_save_note(format!("prompt set\npreview: {preview}"), ctx))
            },
            ["reset"] => {
                ctx.config.reset_to_defaults()?;
                Ok(CommandOutput::Text(
                    "configuration reset to defaults".to_string(),
                ))
            },
            _ => Err(StratoError::Command(format!("usage: {}", self.usage()))),
        }
    }
}

fn overview(ctx: &ShellContext<'_>) -> String {
    let config = &ctx.config;
    let mut lines = vec![
        config.colorize("Current settings", "header"),
        format!("  username:    {}", config.username()),
        format!(
            "  color:       {}",
            if config.color_enabled() { "on" } else { "off" }
        ),
        format!("  time_format: {}-hour", config.time_format()),
        format!("  prompt:      {}", config.prompt_template()),
        format!("  file:        {}", config.path().display()),
    ];
    lines.push(String::new());
    lines.push("Subcommands: show, username <name>, color on|off,".to_string());
    lines.push("  color <key> <value>, colors, time_format 12|24,".to_string());
    lines.push("  prompt <template>, reset".to_string());
    lines.join("\n")
}

fn set_palette(ctx: &mut ShellContext<'_>, key: &str, spec: &str) -> Result<CommandOutput> {
    if !ctx.config.palette_keys().iter().any(|k| k == key) {
        return Err(StratoError::Config(format!(
            "unknown palette key: {key} (see `colors` for the list)"
        )));
    }
    let code = resolve_color_spec(spec)?;
    ctx.config.set_palette_entry(key, &code);
    let sample = format!("{code}sample{}", ctx.config.reset_code());
    Ok(with_save_note(format!("{key} set: {sample}"), ctx))
}

// ---------------------------------------------------------------------------
// format
// ---------------------------------------------------------------------------

struct FormatCmd;
impl Command for FormatCmd {
    fn name(&self) -> &str {
        "format"
    }
    fn description(&self) -> &str {
        "Show the tag markup accepted in templates"
    }
    fn usage(&self) -> &str {
        "format"
    }
    fn category(&self) -> &str {
        "configuration"
    }
    fn execute(&self, _args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let config = &ctx.config;
        let examples = [
            "<green>text</green>",
            "<red,bold>text</red,bold>",
            "<underline><blue>text</blue></underline>",
        ];
        let mut lines = vec![
            config.colorize("Tag markup", "header"),
            "Wrap text in <key> ... </key>; keys come from the palette and".to_string(),
            "may combine one color with any formats, comma separated.".to_string(),
            String::new(),
        ];
        for example in examples {
            lines.push(format!("  {example}  ->  {}", resolve_tags(example, config)));
        }
        lines.push(String::new());
        lines.push(format!("Accepted names: {}", spec_names().join(", ")));
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// colors
// ---------------------------------------------------------------------------

struct ColorsCmd;
impl Command for ColorsCmd {
    fn name(&self) -> &str {
        "colors"
    }
    fn description(&self) -> &str {
        "Show the palette with each entry rendered in its own code"
    }
    fn usage(&self) -> &str {
        "colors"
    }
    fn category(&self) -> &str {
        "configuration"
    }
    fn execute(&self, _args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(palette_demo(ctx.config)))
    }
}

/// Every palette key rendered in its own code. Shared by `colors` and
/// `config colors`.
fn palette_demo(config: &strato_config::ConfigStore) -> String {
    let mut lines = vec![config.colorize("Palette", "header")];
    for key in config.palette_keys() {
        lines.push(format!("  {:<16} {}", key, config.colorize(&key, &key)));
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// placeholders
// ---------------------------------------------------------------------------

struct PlaceholdersCmd;
impl Command for PlaceholdersCmd {
    fn name(&self) -> &str {
        "placeholders"
    }
    fn description(&self) -> &str {
        "List template placeholders with their current values"
    }
    fn usage(&self) -> &str {
        "placeholders"
    }
    fn category(&self) -> &str {
        "configuration"
    }
    fn execute(&self, _args: &[&str], ctx: &mut ShellContext<'_>) -> Result<CommandOutput> {
        let mut lines = vec![ctx.config.colorize("Placeholders", "header")];
        for (token, value) in placeholder_values(ctx.config, ctx.probe) {
            lines.push(format!("  {token:<14} {value}"));
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

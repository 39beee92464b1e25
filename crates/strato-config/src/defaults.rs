//! Compiled-in default configuration.
//!
//! Defaults are built in code, never parsed, so constructing them cannot
//! fail at runtime.

use serde_json::{Map, Value, json};

/// Hardcoded reset code used when the palette itself lacks a `reset` entry.
pub const RESET_CODE: &str = "\x1b[0m";

/// Default prompt template shipped on first run.
pub const DEFAULT_PROMPT_TEMPLATE: &str =
    "<green>{username}</green>@<blue>{hostname}</blue> <yellow>{short_pwd}</yellow> \u{276f} ";

/// Reserved version marker written alongside the defaults.
pub const CONFIG_VERSION: i64 = 1;

/// Default color palette: semantic keys, plain/bright colors, format codes.
pub fn default_palette() -> Map<String, Value> {
    let mut palette = Map::new();
    let entries: &[(&str, &str)] = &[
        ("reset", "\x1b[0m"),
        // Plain colors, addressable directly from prompt templates.
        ("black", "\x1b[30m"),
        ("red", "\x1b[31m"),
        ("green", "\x1b[32m"),
        ("yellow", "\x1b[33m"),
        ("blue", "\x1b[34m"),
        ("magenta", "\x1b[35m"),
        ("cyan", "\x1b[36m"),
        ("white", "\x1b[37m"),
        ("bright_black", "\x1b[90m"),
        ("bright_red", "\x1b[91m"),
        ("bright_green", "\x1b[92m"),
        ("bright_yellow", "\x1b[93m"),
        ("bright_blue", "\x1b[94m"),
        ("bright_magenta", "\x1b[95m"),
        ("bright_cyan", "\x1b[96m"),
        ("bright_white", "\x1b[97m"),
        // Semantic UI keys.
        ("info", "\x1b[36m"),
        ("error", "\x1b[31m"),
        ("success", "\x1b[32m"),
        ("warning", "\x1b[33m"),
        ("header", "\x1b[1;36m"),
        ("subheader", "\x1b[1;33m"),
        ("dim", "\x1b[2;37m"),
        ("border", "\x1b[90m"),
        ("highlight", "\x1b[1;37m"),
        ("prompt", "\x1b[92m"),
        ("data_primary", "\x1b[34m"),
        ("data_secondary", "\x1b[35m"),
        ("data_value", "\x1b[37m"),
        ("data_key", "\x1b[33m"),
        // Text format codes.
        ("bold", "\x1b[1m"),
        ("italic", "\x1b[3m"),
        ("underline", "\x1b[4m"),
        ("strikethrough", "\x1b[9m"),
        ("reverse", "\x1b[7m"),
    ];
    for (key, code) in entries {
        palette.insert((*key).to_string(), json!(code));
    }
    palette
}

/// Complete default configuration map.
pub fn default_config() -> Map<String, Value> {
    let username = std::env::var("USER").unwrap_or_else(|_| "user".to_string());
    let mut map = Map::new();
    map.insert("config_version".to_string(), json!(CONFIG_VERSION));
    map.insert("color".to_string(), json!(true));
    map.insert("username".to_string(), json!(username));
    map.insert("time_format".to_string(), json!("24"));
    map.insert(
        "prompt_template".to_string(),
        json!(DEFAULT_PROMPT_TEMPLATE),
    );
    map.insert("colors".to_string(), Value::Object(default_palette()));
    map
}

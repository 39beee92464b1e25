//! Color and format name tables for the configuration editing path.
//!
//! `config color <key> <spec>` accepts a color name, a comma-separated
//! combination of at most one color with any number of format names, or a
//! raw ANSI code. The renderer shares the format-key classification.

use strato_types::error::{Result, StratoError};

/// Named colors usable in a color spec. At most one may appear.
const COLOR_NAMES: &[(&str, &str)] = &[
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
];

/// Format names usable in a color spec. These combine freely.
const FORMAT_NAMES: &[(&str, &str)] = &[
    ("bold", "\x1b[1m"),
    ("italic", "\x1b[3m"),
    ("underline", "\x1b[4m"),
    ("strikethrough", "\x1b[9m"),
    ("dim", "\x1b[2m"),
    ("reverse", "\x1b[7m"),
    ("reset", "\x1b[0m"),
];

/// Look up the ANSI code for a single color or format name.
pub fn color_name_code(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    COLOR_NAMES
        .iter()
        .chain(FORMAT_NAMES.iter())
        .find(|(n, _)| *n == lower)
        .map(|(_, code)| *code)
}

/// Whether `name` is a pure format attribute (not a color).
///
/// The tag renderer uses this to enforce the one-color-per-tag rule:
/// anything that is not a known format name counts as a color.
pub fn is_format_key(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    FORMAT_NAMES.iter().any(|(n, _)| *n == lower)
}

/// Translate escaped spellings of the ANSI introducer into the real byte.
///
/// Users typing a raw code at the prompt cannot easily produce an actual
/// ESC character, so `\033[` and `\e[` are accepted as spellings of it.
pub fn normalize_raw_code(input: &str) -> Option<String> {
    if input.starts_with('\x1b') {
        return Some(input.to_string());
    }
    if let Some(rest) = input.strip_prefix("\\033[") {
        return Some(format!("\x1b[{rest}"));
    }
    if let Some(rest) = input.strip_prefix("\\e[") {
        return Some(format!("\x1b[{rest}"));
    }
    None
}

/// Resolve a user-entered color spec into a concatenated ANSI code.
///
/// Accepted forms, in order: a raw ANSI code, a single name, or a
/// comma-separated combination. Combinations may contain at most one
/// color name; two or more is an error.
pub fn resolve_color_spec(spec: &str) -> Result<String> {
    // Allow tag-style input: <green,bold>
    let spec = spec.trim();
    let spec = spec
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(spec);

    if let Some(raw) = normalize_raw_code(spec) {
        return Ok(raw);
    }

    let parts: Vec<String> = spec
        .split(',')
        .map(|p| p.trim().to_ascii_lowercase())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return Err(StratoError::Config("empty color spec".to_string()));
    }

    let mut code = String::new();
    let mut colors = Vec::new();
    let mut invalid = Vec::new();
    for part in &parts {
        match color_name_code(part) {
            Some(c) => {
                if !is_format_key(part) {
                    colors.push(part.clone());
                }
                code.push_str(c);
            },
            None => invalid.push(part.clone()),
        }
    }

    if !invalid.is_empty() {
        return Err(StratoError::Config(format!(
            "unknown color/format names: {}",
            invalid.join(", ")
        )));
    }
    if colors.len() > 1 {
        return Err(StratoError::Config(format!(
            "cannot combine multiple colors: {}",
            colors.join(", ")
        )));
    }
    Ok(code)
}

/// All names accepted by [`resolve_color_spec`], for help output.
pub fn spec_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = COLOR_NAMES
        .iter()
        .chain(FORMAT_NAMES.iter())
        .map(|(n, _)| *n)
        .collect();
    names.sort_unstable();
    names
}

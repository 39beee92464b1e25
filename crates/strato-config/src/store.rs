//! The configuration store: load, reconcile, persist.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use strato_types::error::Result;

use crate::defaults::{DEFAULT_PROMPT_TEMPLATE, RESET_CODE, default_config};

/// Recognized configuration keys.
pub const KEY_VERSION: &str = "config_version";
pub const KEY_COLOR: &str = "color";
pub const KEY_USERNAME: &str = "username";
pub const KEY_TIME_FORMAT: &str = "time_format";
pub const KEY_PROMPT_TEMPLATE: &str = "prompt_template";
pub const KEY_COLORS: &str = "colors";

/// Filename inside the install root.
const CONFIG_FILE: &str = "config.json";

/// Process-lifetime configuration state backed by a JSON file.
///
/// Constructed once at startup and passed by reference wherever settings
/// are read. The in-memory map is authoritative: a failed `save()` is
/// reported by the caller but does not mutate state.
pub struct ConfigStore {
    path: PathBuf,
    data: Map<String, Value>,
}

impl ConfigStore {
    /// Open (or create) the configuration under `root`.
    ///
    /// A missing, empty, or unparseable file is replaced by the defaults
    /// and rewritten immediately so the corrupt state does not recur.
    pub fn open(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE);
        let data = load_or_heal(&path);
        Self { path, data }
    }

    /// Re-read the backing file, with the same healing rules as `open`.
    pub fn reload(&mut self) {
        self.data = load_or_heal(&self.path);
    }

    /// Persist the complete in-memory configuration, overwriting the file.
    pub fn save(&self) -> Result<()> {
        write_map(&self.path, &self.data)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The full configuration map (used by `config show`).
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    // -- Typed getters --

    /// Whether colorized output is enabled.
    pub fn color_enabled(&self) -> bool {
        self.data
            .get(KEY_COLOR)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Display name used by the `{username}` placeholder.
    pub fn username(&self) -> String {
        self.data
            .get(KEY_USERNAME)
            .and_then(Value::as_str)
            .unwrap_or("user")
            .to_string()
    }

    /// `"12"` or `"24"`.
    pub fn time_format(&self) -> String {
        self.data
            .get(KEY_TIME_FORMAT)
            .and_then(Value::as_str)
            .unwrap_or("24")
            .to_string()
    }

    /// The active prompt template.
    pub fn prompt_template(&self) -> String {
        self.data
            .get(KEY_PROMPT_TEMPLATE)
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROMPT_TEMPLATE)
            .to_string()
    }

    /// Raw value of any key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Set a top-level key. The caller persists via `save()`.
    pub fn set(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    /// Replace the whole configuration with the compiled-in defaults.
    pub fn reset_to_defaults(&mut self) -> Result<()> {
        self.data = default_config();
        self.save()
    }

    // -- Palette access --

    /// The palette escape code for `key`, ignoring the `color` switch.
    /// `None` when the key is absent.
    pub fn palette_code(&self, key: &str) -> Option<&str> {
        self.data
            .get(KEY_COLORS)
            .and_then(Value::as_object)
            .and_then(|palette| palette.get(key))
            .and_then(Value::as_str)
    }

    /// Sorted palette key names.
    pub fn palette_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .data
            .get(KEY_COLORS)
            .and_then(Value::as_object)
            .map(|palette| palette.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    /// The reset code, falling back to the hardcoded default if the
    /// palette has no `reset` entry.
    pub fn reset_code(&self) -> &str {
        self.palette_code("reset").unwrap_or(RESET_CODE)
    }

    /// The escape code for `key`, honoring the `color` switch.
    ///
    /// Empty when color is disabled; unknown keys fall back to `reset`.
    pub fn color(&self, key: &str) -> String {
        if !self.color_enabled() {
            return String::new();
        }
        match self.palette_code(key) {
            Some(code) => code.to_string(),
            None => self.reset_code().to_string(),
        }
    }

    /// Wrap `text` in the code for `key` plus a trailing reset.
    pub fn colorize(&self, text: &str, key: &str) -> String {
        if !self.color_enabled() {
            return text.to_string();
        }
        format!("{}{}{}", self.color(key), text, self.reset_code())
    }

    /// Set one palette entry (the `config color <key> <code>` path).
    pub fn set_palette_entry(&mut self, key: &str, code: &str) {
        let palette = self
            .data
            .entry(KEY_COLORS.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !palette.is_object() {
            *palette = Value::Object(Map::new());
        }
        if let Some(map) = palette.as_object_mut() {
            map.insert(key.to_string(), Value::String(code.to_string()));
        }
    }
}

/// Read and reconcile the config file, healing missing/corrupt state.
fn load_or_heal(path: &Path) -> Map<String, Value> {
    match fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => return reconcile(map),
            Ok(_) => {
                log::warn!("{}: not a JSON object, rebuilding defaults", path.display());
            },
            Err(e) => {
                log::warn!("{}: invalid JSON ({e}), rebuilding defaults", path.display());
            },
        },
        Ok(_) => {
            log::warn!("{}: empty, rebuilding defaults", path.display());
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("{}: not found, creating with defaults", path.display());
        },
        Err(e) => {
            log::warn!("{}: read failed ({e}), using defaults", path.display());
        },
    }

    let map = default_config();
    if let Err(e) = write_map(path, &map) {
        // Non-fatal: the in-memory defaults stay authoritative.
        log::warn!("could not write default config to {}: {e}", path.display());
    }
    map
}

/// Merge `loaded` onto the defaults: insert every absent default key,
/// recursing one level into `colors` so individual missing palette entries
/// are backfilled without discarding user overrides.
fn reconcile(mut loaded: Map<String, Value>) -> Map<String, Value> {
    for (key, default_value) in default_config() {
        if key == KEY_COLORS {
            let default_palette = default_value
                .as_object()
                .cloned()
                .unwrap_or_default();
            let entry = loaded
                .entry(KEY_COLORS.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Some(palette) = entry.as_object_mut() {
                for (ck, cv) in default_palette {
                    palette.entry(ck).or_insert(cv);
                }
            }
        } else {
            loaded.entry(key).or_insert(default_value);
        }
    }
    loaded
}

fn write_map(path: &Path, map: &Map<String, Value>) -> Result<()> {
    let text = serde_json::to_string_pretty(&Value::Object(map.clone()))?;
    fs::write(path, text)?;
    Ok(())
}

//! Configuration store for the strato shell.
//!
//! Settings live in a single `config.json` under the install root. Loading
//! is self-healing: a missing, empty, or corrupt file is replaced with the
//! compiled-in defaults and immediately rewritten, and a loaded file is
//! reconciled against the defaults so every recognized key (including every
//! palette entry) is present after load. Unknown keys round-trip untouched.

mod defaults;
mod names;
mod store;

pub use defaults::{DEFAULT_PROMPT_TEMPLATE, RESET_CODE, default_config, default_palette};
pub use names::{color_name_code, is_format_key, normalize_raw_code, resolve_color_spec, spec_names};
pub use store::{
    ConfigStore, KEY_COLOR, KEY_COLORS, KEY_PROMPT_TEMPLATE, KEY_TIME_FORMAT, KEY_USERNAME,
    KEY_VERSION,
};

//! Placeholder substitution: `{username}`, `{pwd}`, `{battery}` and friends.
//!
//! Every value is computed fresh per call. A failing probe degrades to a
//! sentinel value; nothing here returns an error into the prompt path.

use std::path::Path;

use strato_config::ConfigStore;
use strato_platform::SystemProbe;

/// Sentinel substituted when the working directory cannot be read.
const PWD_ERROR: &str = "[error]";

/// Recognized placeholder names.
const NAMES: &[&str] = &[
    "username",
    "hostname",
    "pwd",
    "short_pwd",
    "time",
    "date",
    "battery",
];

/// Replace every recognized `{name}` token in `input`.
///
/// Unrecognized tokens are left as literal text.
pub fn substitute_placeholders(
    input: &str,
    config: &ConfigStore,
    probe: &dyn SystemProbe,
) -> String {
    let mut out = String::with_capacity(input.len());
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '{'
            && let Some(end) = chars[i + 1..].iter().position(|&c| c == '}')
        {
            let name: String = chars[i + 1..i + 1 + end].iter().collect();
            if NAMES.contains(&name.as_str()) {
                out.push_str(&value_for(&name, config, probe));
                i += end + 2;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Current values for all placeholders, for the `placeholders` command.
pub fn placeholder_values(config: &ConfigStore, probe: &dyn SystemProbe) -> Vec<(String, String)> {
    NAMES
        .iter()
        .map(|name| (format!("{{{name}}}"), value_for(name, config, probe)))
        .collect()
}

fn value_for(name: &str, config: &ConfigStore, probe: &dyn SystemProbe) -> String {
    match name {
        "username" => config.username(),
        "hostname" => short_hostname(probe),
        "pwd" => pwd(probe),
        "short_pwd" => short_pwd(probe),
        "time" => {
            let fmt = if config.time_format() == "12" {
                "%I:%M:%S %p"
            } else {
                "%H:%M:%S"
            };
            probe.now().format(fmt).to_string()
        },
        "date" => probe.now().format("%Y-%m-%d").to_string(),
        "battery" => match probe.battery_percent() {
            Some(percent) => format!("{percent}%"),
            None => "N/A".to_string(),
        },
        _ => String::new(),
    }
}

/// Hostname with any domain suffix stripped.
fn short_hostname(probe: &dyn SystemProbe) -> String {
    let full = match probe.hostname() {
        Ok(name) => name,
        Err(_) => return "localhost".to_string(),
    };
    full.split('.').next().unwrap_or("localhost").to_string()
}

fn pwd(probe: &dyn SystemProbe) -> String {
    match probe.current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(_) => PWD_ERROR.to_string(),
    }
}

/// Last path component of the working directory; `~` at the home
/// directory, `/` at the filesystem root.
fn short_pwd(probe: &dyn SystemProbe) -> String {
    let dir = match probe.current_dir() {
        Ok(dir) => dir,
        Err(_) => return PWD_ERROR.to_string(),
    };
    if let Some(home) = probe.home_dir()
        && dir == home
    {
        return "~".to_string();
    }
    match dir.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => root_label(&dir),
    }
}

fn root_label(dir: &Path) -> String {
    if dir.as_os_str().is_empty() {
        "/".to_string()
    } else {
        dir.display().to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};
    use serde_json::json;
    use std::io;
    use std::path::PathBuf;
    use strato_types::error::Result;
    use tempfile::TempDir;

    /// Probe with canned values for deterministic rendering tests.
    pub(crate) struct FakeProbe {
        pub hostname: Option<String>,
        pub cwd: Option<PathBuf>,
        pub home: Option<PathBuf>,
        pub battery: Option<u8>,
        pub now: DateTime<Local>,
    }

    impl Default for FakeProbe {
        fn default() -> Self {
            Self {
                hostname: Some("box".to_string()),
                cwd: Some(PathBuf::from("/home/nina/projects")),
                home: Some(PathBuf::from("/home/nina")),
                battery: None,
                now: Local.with_ymd_and_hms(2024, 3, 9, 13, 5, 30).unwrap(),
            }
        }
    }

    impl SystemProbe for FakeProbe {
        fn hostname(&self) -> Result<String> {
            self.hostname
                .clone()
                .ok_or_else(|| io::Error::other("no hostname").into())
        }
        fn current_dir(&self) -> Result<PathBuf> {
            self.cwd
                .clone()
                .ok_or_else(|| io::Error::other("denied").into())
        }
        fn home_dir(&self) -> Option<PathBuf> {
            self.home.clone()
        }
        fn battery_percent(&self) -> Option<u8> {
            self.battery
        }
        fn now(&self) -> DateTime<Local> {
            self.now
        }
    }

    fn store() -> (TempDir, ConfigStore) {
        let dir = TempDir::new().unwrap();
        let config = ConfigStore::open(dir.path());
        (dir, config)
    }

    #[test]
    fn username_and_hostname_substitute() {
        let (_dir, mut config) = store();
        config.set("username", json!("nina"));
        let probe = FakeProbe::default();
        let out = substitute_placeholders("{username}@{hostname}", &config, &probe);
        assert_eq!(out, "nina@box");
    }

    #[test]
    fn hostname_domain_suffix_is_stripped() {
        let (_dir, config) = store();
        let probe = FakeProbe {
            hostname: Some("box.lan.example.com".to_string()),
            ..FakeProbe::default()
        };
        assert_eq!(substitute_placeholders("{hostname}", &config, &probe), "box");
    }

    #[test]
    fn pwd_failure_degrades_to_sentinel() {
        let (_dir, config) = store();
        let probe = FakeProbe {
            cwd: None,
            ..FakeProbe::default()
        };
        assert_eq!(
            substitute_placeholders("{pwd} {short_pwd}", &config, &probe),
            "[error] [error]"
        );
    }

    #[test]
    fn short_pwd_is_last_component() {
        let (_dir, config) = store();
        let probe = FakeProbe::default();
        assert_eq!(
            substitute_placeholders("{short_pwd}", &config, &probe),
            "projects"
        );
    }

    #[test]
    fn short_pwd_at_home_is_tilde() {
        let (_dir, config) = store();
        let probe = FakeProbe {
            cwd: Some(PathBuf::from("/home/nina")),
            ..FakeProbe::default()
        };
        assert_eq!(substitute_placeholders("{short_pwd}", &config, &probe), "~");
    }

    #[test]
    fn short_pwd_at_root_is_slash() {
        let (_dir, config) = store();
        let probe = FakeProbe {
            cwd: Some(PathBuf::from("/")),
            ..FakeProbe::default()
        };
        assert_eq!(substitute_placeholders("{short_pwd}", &config, &probe), "/");
    }

    #[test]
    fn time_honors_12_hour_preference() {
        let (_dir, mut config) = store();
        let probe = FakeProbe::default();
        assert_eq!(substitute_placeholders("{time}", &config, &probe), "13:05:30");
        config.set("time_format", json!("12"));
        assert_eq!(
            substitute_placeholders("{time}", &config, &probe),
            "01:05:30 PM"
        );
    }

    #[test]
    fn date_formats() {
        let (_dir, config) = store();
        let probe = FakeProbe::default();
        assert_eq!(
            substitute_placeholders("{date}", &config, &probe),
            "2024-03-09"
        );
    }

    #[test]
    fn battery_sentinel_and_value() {
        let (_dir, config) = store();
        let probe = FakeProbe::default();
        assert_eq!(substitute_placeholders("{battery}", &config, &probe), "N/A");
        let probe = FakeProbe {
            battery: Some(87),
            ..FakeProbe::default()
        };
        assert_eq!(substitute_placeholders("{battery}", &config, &probe), "87%");
    }

    #[test]
    fn unknown_token_is_literal() {
        let (_dir, config) = store();
        let probe = FakeProbe::default();
        assert_eq!(
            substitute_placeholders("{nope} {username}", &config, &probe),
            format!("{{nope}} {}", config.username())
        );
    }

    #[test]
    fn full_render_combines_tags_and_placeholders() {
        let (_dir, mut config) = store();
        config.set("username", json!("nina"));
        let probe = FakeProbe::default();
        let green = config.palette_code("green").unwrap().to_string();
        let reset = config.reset_code().to_string();
        let out = crate::render("<green>{username}</green>@{hostname}", &config, &probe);
        assert_eq!(out, format!("{green}nina{reset}@box"));
    }

    #[test]
    fn full_render_color_disabled_is_plain() {
        let (_dir, mut config) = store();
        config.set("username", json!("nina"));
        config.set("color", json!(false));
        let probe = FakeProbe::default();
        let out = crate::render("<green>{username}</green>@{hostname}", &config, &probe);
        assert_eq!(out, "nina@box");
    }
}

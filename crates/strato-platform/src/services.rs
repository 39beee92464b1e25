//! Platform service traits and the desktop implementation.

use std::path::PathBuf;

use chrono::{DateTime, Local};

use strato_types::error::Result;

// ---------------------------------------------------------------------------
// System probe
// ---------------------------------------------------------------------------

/// Live system values consumed by prompt placeholders and commands.
///
/// Every call returns a fresh reading; nothing is cached across renders.
pub trait SystemProbe {
    /// Local hostname as reported by the OS. May include a domain suffix;
    /// callers that want the short form strip it themselves.
    fn hostname(&self) -> Result<String>;

    /// Current working directory of the process.
    fn current_dir(&self) -> Result<PathBuf>;

    /// Home directory of the current user, if resolvable.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Battery charge percentage (0-100), or `None` when the platform has
    /// no battery or no readable sensor.
    fn battery_percent(&self) -> Option<u8>;

    /// Current wall-clock time.
    fn now(&self) -> DateTime<Local>;
}

// ---------------------------------------------------------------------------
// Remote time lookup
// ---------------------------------------------------------------------------

/// Resolves a place name to a formatted local-time string.
///
/// Backed by an external timezone catalog; the shell treats it as an
/// optional collaborator and reports its absence instead of failing.
pub trait TimeLookup {
    /// Formatted local time at `place`, e.g. `"Time in Europe/Oslo: ..."`.
    fn time_in(&self, place: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Desktop implementation
// ---------------------------------------------------------------------------

/// Probe implementation for ordinary desktop/server hosts.
#[derive(Debug, Default)]
pub struct DesktopProbe;

impl DesktopProbe {
    pub fn new() -> Self {
        Self
    }
}

impl SystemProbe for DesktopProbe {
    fn hostname(&self) -> Result<String> {
        // Kernel-reported name first, /etc/hostname next, env var last.
        for path in ["/proc/sys/kernel/hostname", "/etc/hostname"] {
            if let Ok(name) = std::fs::read_to_string(path) {
                let name = name.trim();
                if !name.is_empty() {
                    return Ok(name.to_string());
                }
            }
        }
        if let Ok(name) = std::env::var("HOSTNAME")
            && !name.is_empty()
        {
            return Ok(name);
        }
        Ok("localhost".to_string())
    }

    fn current_dir(&self) -> Result<PathBuf> {
        Ok(std::env::current_dir()?)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn battery_percent(&self) -> Option<u8> {
        read_battery_percent()
    }

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Scan `/sys/class/power_supply` for a battery capacity reading.
#[cfg(target_os = "linux")]
fn read_battery_percent() -> Option<u8> {
    let entries = std::fs::read_dir("/sys/class/power_supply").ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        let kind = std::fs::read_to_string(path.join("type")).unwrap_or_default();
        if kind.trim() != "Battery" {
            continue;
        }
        if let Ok(raw) = std::fs::read_to_string(path.join("capacity"))
            && let Ok(percent) = raw.trim().parse::<u8>()
        {
            return Some(percent.min(100));
        }
    }
    None
}

#[cfg(not(target_os = "linux"))]
fn read_battery_percent() -> Option<u8> {
    None
}

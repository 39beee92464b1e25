//! Dynamic library plugin loading.
//!
//! A plugin is a dynamic library exporting
//! `strato_plugin_register(&mut CommandRegistry)`. The loader scans a
//! directory, loads each candidate, and calls the entry point inside
//! `catch_unwind` so one faulty plugin cannot take the shell down.
//! Libraries are never unloaded: registered commands hold code from the
//! mapped image, so every handle lives for the rest of the process.

use std::ffi::CStr;
use std::mem::ManuallyDrop;
use std::os::raw::c_char;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use libloading::Library;

use strato_shell::CommandRegistry;
use strato_types::error::{Result, StratoError};

/// Symbol every plugin must export.
const ENTRY_POINT: &[u8] = b"strato_plugin_register";

/// Optional symbol reporting the plugin's own version string.
const VERSION_SYMBOL: &[u8] = b"strato_plugin_version";

type RegisterFn = unsafe extern "C" fn(&mut CommandRegistry);
type VersionFn = unsafe extern "C" fn() -> *const c_char;

/// A successfully loaded plugin.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    /// Path the library was loaded from.
    pub path: PathBuf,
    /// File stem, used as the display name.
    pub name: String,
    /// Version string reported by the plugin, when it exports one.
    pub version: Option<String>,
}

/// Result of a directory load pass.
#[derive(Debug, Default)]
pub struct LoadSummary {
    /// Names of plugins that registered successfully.
    pub loaded: Vec<String>,
    /// Per-file failures. The pass continues past each one.
    pub failed: Vec<(PathBuf, String)>,
}

/// Owns every loaded library handle for the lifetime of the process.
pub struct PluginLoader {
    libraries: Vec<ManuallyDrop<Library>>,
    descriptors: Vec<PluginDescriptor>,
}

impl PluginLoader {
    pub fn new() -> Self {
        Self {
            libraries: Vec::new(),
            descriptors: Vec::new(),
        }
    }

    /// Descriptors of every plugin loaded so far.
    pub fn descriptors(&self) -> &[PluginDescriptor] {
        &self.descriptors
    }

    /// Load every candidate in `dir` into `reg`.
    ///
    /// A missing directory is treated as zero plugins. Each failure is
    /// logged and recorded; the pass always continues to the next file.
    pub fn load_all(&mut self, dir: &Path, reg: &mut CommandRegistry) -> LoadSummary {
        let mut summary = LoadSummary::default();
        for path in scan(dir) {
            match self.load_one(&path, reg) {
                Ok(descriptor) => {
                    log::info!("loaded plugin {} from {}", descriptor.name, path.display());
                    summary.loaded.push(descriptor.name.clone());
                    self.descriptors.push(descriptor);
                },
                Err(e) => {
                    log::warn!("skipping plugin {}: {e}", path.display());
                    summary.failed.push((path, e.to_string()));
                },
            }
        }
        summary
    }

    /// Load a single library and run its registration entry point.
    fn load_one(&mut self, path: &Path, reg: &mut CommandRegistry) -> Result<PluginDescriptor> {
        // SAFETY: loading runs arbitrary library initializers. Plugins are
        // trusted code installed by the user; the panic guard below only
        // contains Rust unwinds, not undefined behavior.
        let library = unsafe { Library::new(path) }
            .map_err(|e| StratoError::Plugin(format!("{}: {e}", path.display())))?;

        let entry = unsafe { library.get::<RegisterFn>(ENTRY_POINT) }.map_err(|e| {
            StratoError::Plugin(format!("{}: missing entry point: {e}", path.display()))
        })?;

        let outcome = catch_unwind(AssertUnwindSafe(|| unsafe { entry(reg) }));

        let version = if outcome.is_ok() {
            read_version(&library)
        } else {
            None
        };
        let descriptor = PluginDescriptor {
            path: path.to_path_buf(),
            name: stem_of(path),
            version,
        };

        // Keep the handle even after a panic: the plugin may have
        // registered commands before unwinding, and those must stay
        // callable.
        self.libraries.push(ManuallyDrop::new(library));

        match outcome {
            Ok(()) => Ok(descriptor),
            Err(_) => Err(StratoError::Plugin(format!(
                "{}: panicked during registration",
                path.display()
            ))),
        }
    }
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_version(library: &Library) -> Option<String> {
    let version_fn = unsafe { library.get::<VersionFn>(VERSION_SYMBOL) }.ok()?;
    let ptr = unsafe { version_fn() };
    if ptr.is_null() {
        return None;
    }
    // SAFETY: the plugin contract requires a NUL-terminated static string.
    let text = unsafe { CStr::from_ptr(ptr) };
    text.to_str().ok().map(str::to_string)
}

/// Candidate plugin files in `dir`: platform dynamic libraries, sorted by
/// name. Files whose stem starts with `_` are skipped (disabled plugins).
pub fn scan(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| is_candidate(path))
        .collect();
    paths.sort();
    paths
}

fn is_candidate(path: &Path) -> bool {
    let has_dll_ext = path
        .extension()
        .is_some_and(|ext| ext == std::env::consts::DLL_EXTENSION);
    has_dll_ext && !stem_of(path).starts_with('_')
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn lib_name(stem: &str) -> String {
        format!("{stem}.{}", std::env::consts::DLL_EXTENSION)
    }

    #[test]
    fn scan_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(scan(&dir.path().join("absent")).is_empty());
    }

    #[test]
    fn scan_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for file in [
            lib_name("zeta"),
            lib_name("alpha"),
            lib_name("_disabled"),
            "notes.txt".to_string(),
        ] {
            fs::write(dir.path().join(file), b"").unwrap();
        }
        let found: Vec<String> = scan(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(found, vec![lib_name("alpha"), lib_name("zeta")]);
    }

    #[test]
    fn garbage_library_fails_but_pass_continues() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(lib_name("broken_a")), b"not a library").unwrap();
        fs::write(dir.path().join(lib_name("broken_b")), b"also not").unwrap();

        let mut loader = PluginLoader::new();
        let mut reg = CommandRegistry::new();
        let summary = loader.load_all(dir.path(), &mut reg);

        assert!(summary.loaded.is_empty());
        assert_eq!(summary.failed.len(), 2);
        assert!(loader.descriptors().is_empty());
    }

    #[test]
    fn empty_directory_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let mut loader = PluginLoader::new();
        let mut reg = CommandRegistry::new();
        let summary = loader.load_all(dir.path(), &mut reg);
        assert!(summary.loaded.is_empty());
        assert!(summary.failed.is_empty());
    }
}

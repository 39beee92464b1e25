//! Plugin catalogs: where installable plugins come from.

use std::path::{Path, PathBuf};

use strato_types::error::{Result, StratoError};

/// A source of installable plugins.
///
/// The shell ships a local directory implementation; remote catalogs plug
/// in behind the same trait.
pub trait PluginCatalog {
    /// Names of plugins available for installation.
    fn available(&self) -> Result<Vec<String>>;

    /// Copy `name` into `dest_dir`, returning the installed path.
    fn fetch(&self, name: &str, dest_dir: &Path) -> Result<PathBuf>;
}

/// A catalog backed by a local directory of plugin libraries.
pub struct DirCatalog {
    root: PathBuf,
}

impl DirCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn library_path(&self, name: &str) -> PathBuf {
        self.root
            .join(format!("{name}.{}", std::env::consts::DLL_EXTENSION))
    }
}

impl PluginCatalog for DirCatalog {
    fn available(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = crate::loader::scan(&self.root)
            .iter()
            .filter_map(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .collect();
        names.sort_unstable();
        Ok(names)
    }

    fn fetch(&self, name: &str, dest_dir: &Path) -> Result<PathBuf> {
        let source = self.library_path(name);
        if !source.is_file() {
            return Err(StratoError::Catalog(format!(
                "no such plugin in catalog: {name}"
            )));
        }
        std::fs::create_dir_all(dest_dir)?;
        let dest = dest_dir.join(source.file_name().unwrap_or_default());
        std::fs::copy(&source, &dest)?;
        Ok(dest)
    }
}

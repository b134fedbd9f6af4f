//! [`InstallTree`] builder for fake toolchain installs.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory holding fake compiler installs.
///
/// Binaries are empty files: probing only checks that they exist, and the
/// version query goes through a [`ScriptedRunner`](crate::ScriptedRunner).
///
/// # Example
///
/// ```rust,no_run
/// use scout_test_utils::InstallTree;
///
/// let tree = InstallTree::new();
/// let icc = tree.versioned("intel", "compilers_and_libraries_2016.1.150", "linux/bin/intel64", "icc");
/// assert!(icc.is_file());
/// ```
pub struct InstallTree {
    temp_dir: TempDir,
}

impl Default for InstallTree {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallTree {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the tree (not created).
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Create `<search_root>/<install>/<bin_dir>/<binary>` and return the
    /// binary path.
    pub fn versioned(&self, search_root: &str, install: &str, bin_dir: &str, binary: &str) -> PathBuf {
        let dir = self.root().join(search_root).join(install).join(bin_dir);
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join(binary);
        fs::write(&file, "").unwrap();
        file
    }

    /// Create `<dir>/<binary>` for flat layouts such as `/usr/bin`.
    pub fn flat(&self, dir: &str, binary: &str) -> PathBuf {
        let dir = self.root().join(dir);
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join(binary);
        fs::write(&file, "").unwrap();
        file
    }

    /// Create an empty directory.
    pub fn dir(&self, relative: &str) -> PathBuf {
        let dir = self.root().join(relative);
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}

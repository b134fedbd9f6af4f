//! Normalized path handling for installation roots

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A path normalized to use forward slashes internally.
///
/// Installation roots are compared, sorted and used as report values, so
/// they need one spelling per location: backslashes become forward
/// slashes and trailing separators are dropped. Conversion to the
/// platform-native form happens only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let mut normalized = path_str.replace('\\', "/");
        while normalized.len() > 1 && normalized.ends_with('/') {
            normalized.pop();
        }
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    ///
    /// An empty segment leaves the path unchanged.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let segment_normalized = segment_normalized.trim_matches('/');
        if segment_normalized.is_empty() {
            return self.clone();
        }
        let joined = if self.inner.ends_with('/') || self.inner.is_empty() {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

impl From<NormalizedPath> for String {
    fn from(p: NormalizedPath) -> Self {
        p.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslashes_normalized() {
        let path = NormalizedPath::new(r"C:\Program Files\Intel");
        assert_eq!(path.as_str(), "C:/Program Files/Intel");
    }

    #[test]
    fn test_trailing_separator_dropped() {
        assert_eq!(NormalizedPath::new("/opt/intel/"), NormalizedPath::new("/opt/intel"));
        assert_eq!(NormalizedPath::new("/").as_str(), "/");
    }

    #[test]
    fn test_join() {
        let root = NormalizedPath::new("/opt/intel");
        assert_eq!(
            root.join("linux").join("bin/intel64").as_str(),
            "/opt/intel/linux/bin/intel64"
        );
        assert_eq!(root.join(""), root);
        assert_eq!(NormalizedPath::new("/").join("usr").as_str(), "/usr");
    }

    #[test]
    fn test_parent_and_file_name() {
        let path = NormalizedPath::new("/opt/intel/compilers_and_libraries_2016.1.150");
        assert_eq!(path.file_name(), Some("compilers_and_libraries_2016.1.150"));
        assert_eq!(path.parent().unwrap().as_str(), "/opt/intel");
        assert_eq!(NormalizedPath::new("/opt").parent().unwrap().as_str(), "/");
        assert!(NormalizedPath::new("/").parent().is_none());
    }

    #[test]
    fn test_extension() {
        assert_eq!(NormalizedPath::new("toolchains.toml").extension(), Some("toml"));
        assert_eq!(NormalizedPath::new(".hidden").extension(), None);
        assert_eq!(NormalizedPath::new("/usr/bin/gcc").extension(), None);
    }

    #[test]
    fn test_ordering_is_lexical() {
        let mut paths = vec![
            NormalizedPath::new("/opt/b"),
            NormalizedPath::new("/opt/a"),
            NormalizedPath::new("/opt/a2"),
        ];
        paths.sort();
        let names: Vec<_> = paths.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["/opt/a", "/opt/a2", "/opt/b"]);
    }
}

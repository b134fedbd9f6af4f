//! GNU compiler collection (`gcc` and its cross variants)

use std::sync::LazyLock;

use regex::Regex;

use super::{CompilerFamily, ToolchainKind};

// `-dumpfullversion -dumpversion` prints the bare version on its own line
static BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)*)$").expect("Invalid gcc version regex"));

#[derive(Debug, Clone, Copy)]
pub struct Gcc;

impl CompilerFamily for Gcc {
    fn kind(&self) -> ToolchainKind {
        ToolchainKind::Gcc
    }

    fn display_name(&self) -> &'static str {
        "GCC"
    }

    fn version_args(&self) -> &'static [&'static str] {
        &["-dumpfullversion", "-dumpversion"]
    }

    fn banner_pattern(&self) -> &Regex {
        &BANNER
    }

    fn default_binary(&self) -> &'static str {
        "gcc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_version::VersionId;

    #[test]
    fn test_extract_dumpfullversion() {
        assert_eq!(Gcc.extract_version("9.4.0\n"), Some(VersionId::new([9, 4, 0])));
    }

    #[test]
    fn test_extract_old_dumpversion() {
        assert_eq!(Gcc.extract_version("4.8\n"), Some(VersionId::new([4, 8])));
    }

    #[test]
    fn test_ignores_noise_lines() {
        let out = "gcc: warning: something odd\n7.5.0\n";
        assert_eq!(Gcc.extract_version(out), Some(VersionId::new([7, 5, 0])));
    }

    #[test]
    fn test_version_banner_not_accepted() {
        assert_eq!(Gcc.extract_version("gcc (Ubuntu 9.4.0-1ubuntu1) 9.4.0"), None);
    }
}

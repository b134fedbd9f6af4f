//! Intel C++ compiler (`icc`)

use std::sync::LazyLock;

use regex::Regex;

use super::{CompilerFamily, ToolchainKind};

static BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"icc\s+version\s+(\d+\.\d+\.\d*|\d+\.\d+)").expect("Invalid icc banner regex")
});

#[derive(Debug, Clone, Copy)]
pub struct IntelC;

impl CompilerFamily for IntelC {
    fn kind(&self) -> ToolchainKind {
        ToolchainKind::IntelC
    }

    fn display_name(&self) -> &'static str {
        "Intel C++"
    }

    fn version_args(&self) -> &'static [&'static str] {
        &["-v"]
    }

    fn banner_pattern(&self) -> &Regex {
        &BANNER
    }

    fn default_binary(&self) -> &'static str {
        "icc"
    }
}

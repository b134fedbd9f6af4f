//! Microsoft Visual C++ (`cl`)

use std::sync::LazyLock;

use regex::Regex;

use super::{CompilerFamily, ToolchainKind};

static BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Compiler\s+Version\s+(\d+(?:\.\d+)+)").expect("Invalid cl banner regex")
});

#[derive(Debug, Clone, Copy)]
pub struct Msvc;

impl CompilerFamily for Msvc {
    fn kind(&self) -> ToolchainKind {
        ToolchainKind::Msvc
    }

    fn display_name(&self) -> &'static str {
        "MSVC"
    }

    // cl prints its banner to stderr when run without arguments
    fn version_args(&self) -> &'static [&'static str] {
        &[]
    }

    fn banner_pattern(&self) -> &Regex {
        &BANNER
    }

    fn default_binary(&self) -> &'static str {
        "cl"
    }
}

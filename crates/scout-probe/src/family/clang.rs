//! LLVM clang

use std::sync::LazyLock;

use regex::Regex;

use super::{CompilerFamily, ToolchainKind};

static BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"clang\s+version\s+(\d+(?:\.\d+)+)").expect("Invalid clang banner regex")
});

#[derive(Debug, Clone, Copy)]
pub struct Clang;

impl CompilerFamily for Clang {
    fn kind(&self) -> ToolchainKind {
        ToolchainKind::Clang
    }

    fn display_name(&self) -> &'static str {
        "Clang"
    }

    fn version_args(&self) -> &'static [&'static str] {
        &["--version"]
    }

    fn banner_pattern(&self) -> &Regex {
        &BANNER
    }

    fn default_binary(&self) -> &'static str {
        "clang"
    }
}

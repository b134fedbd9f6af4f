//! Built-in toolchain definitions
//!
//! Used by [`ToolchainRegistry::with_builtins`](crate::ToolchainRegistry::with_builtins)
//! when no definitions file is given. Written in the same TOML format as a
//! user file so the two cannot drift apart.

use crate::config::{RegistryFile, ToolchainDefinition};
use crate::error::Result;

const BUILTIN_TOML: &str = r#"
# Intel C++ 16 and later, /opt/intel/compilers_and_libraries_<year>.<update>.<build>
[[toolchain]]
name = "intelc-16-ia32"
kind = "intelc"
version_range = "16.*-*"
hosts = ["posix-any", "darwin-any"]
targets = ["posix-x86", "darwin-x86"]
search_roots = ["/opt/intel"]
name_pattern = '^compilers_and_libraries_(\d+)\.(\d+)\.(\d+)$'
arch = "ia32"
platform_subdir = "linux"
env_overrides = ["ICPP_COMPILER16"]

[toolchain.shell_vars]
PATH = "${INTELC.INSTALL_ROOT}/linux/bin/ia32/"
INCLUDE = "${INTELC.INSTALL_ROOT}/linux/compiler/include/"
LIB = "${INTELC.INSTALL_ROOT}/linux/compiler/lib/ia32/"

[[toolchain]]
name = "intelc-16-intel64"
kind = "intelc"
version_range = "16.*-*"
hosts = ["posix-x86_64", "darwin-x86_64"]
targets = ["posix-x86_64", "darwin-x86_64"]
search_roots = ["/opt/intel"]
name_pattern = '^compilers_and_libraries_(\d+)\.(\d+)\.(\d+)$'
arch = "intel64"
platform_subdir = "linux"
env_overrides = ["ICPP_COMPILER16"]

[toolchain.shell_vars]
PATH = "${INTELC.INSTALL_ROOT}/linux/bin/intel64/"
INCLUDE = "${INTELC.INSTALL_ROOT}/linux/compiler/include/"
LIB = "${INTELC.INSTALL_ROOT}/linux/compiler/lib/intel64/"

# GCC cross compilers from the distribution packages
[[toolchain]]
name = "gcc-cross-arm"
kind = "gcc"
hosts = ["posix-x86_64"]
targets = ["posix-arm"]
search_roots = ["/usr/bin"]
layout = "flat"
binary = "arm-linux-gnueabi-gcc"

[toolchain.shell_vars]
PATH = "${GCC.INSTALL_ROOT}"

[[toolchain]]
name = "gcc-cross-arm_hf"
kind = "gcc"
hosts = ["posix-x86_64"]
targets = ["posix-arm_hf"]
search_roots = ["/usr/bin"]
layout = "flat"
binary = "arm-linux-gnueabihf-gcc"

[toolchain.shell_vars]
PATH = "${GCC.INSTALL_ROOT}"

[[toolchain]]
name = "gcc-cross-aarch64"
kind = "gcc"
hosts = ["posix-x86_64"]
targets = ["posix-aarch64"]
search_roots = ["/usr/bin"]
layout = "flat"
binary = "aarch64-linux-gnu-gcc"

[toolchain.shell_vars]
PATH = "${GCC.INSTALL_ROOT}"

# Native compilers
[[toolchain]]
name = "gcc-native-x86_64"
kind = "gcc"
hosts = ["posix-x86_64"]
targets = ["posix-x86_64"]
search_roots = ["/usr/bin", "/usr/local/bin"]
layout = "flat"

[toolchain.shell_vars]
PATH = "${GCC.INSTALL_ROOT}"

[[toolchain]]
name = "gcc-native-aarch64"
kind = "gcc"
hosts = ["posix-aarch64"]
targets = ["posix-aarch64"]
search_roots = ["/usr/bin", "/usr/local/bin"]
layout = "flat"

[toolchain.shell_vars]
PATH = "${GCC.INSTALL_ROOT}"

[[toolchain]]
name = "clang-native"
kind = "clang"
hosts = ["posix-any", "darwin-any"]
targets = ["posix-x86_64", "posix-aarch64", "darwin-x86_64", "darwin-aarch64"]
search_roots = ["/usr/bin", "/usr/local/bin"]
layout = "flat"

[toolchain.shell_vars]
PATH = "${CLANG.INSTALL_ROOT}"
"#;

/// The built-in definitions, in registration order.
pub fn definitions() -> Result<Vec<ToolchainDefinition>> {
    Ok(RegistryFile::from_toml_str(BUILTIN_TOML)?.toolchains)
}

//! End-to-end resolution scenarios
//!
//! Each test exercises the complete flow: definitions -> scan -> match ->
//! environment, with version queries answered by a scripted runner.

use std::collections::HashMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use scout_core::{
    BuildEnvironment, Error, Platform, RegistryFile, ToolchainRegistry, apply_installation,
};
use scout_fs::NormalizedPath;
use scout_test_utils::{InstallTree, ScriptedRunner};
use scout_version::{VersionConstraint, VersionId};

fn definitions(intel_root: &NormalizedPath, bin_dir: &NormalizedPath) -> String {
    format!(
        r#"
[[toolchain]]
name = "intelc-16-intel64"
kind = "intelc"
version_range = "16.*-*"
hosts = ["posix-x86_64"]
targets = ["posix-x86_64"]
search_roots = ["{intel_root}"]
name_pattern = '^compilers_and_libraries_(\d+)\.(\d+)\.(\d+)$'
arch = "intel64"
platform_subdir = "linux"
env_overrides = ["ICPP_COMPILER16"]

[toolchain.shell_vars]
PATH = "${{INTELC.INSTALL_ROOT}}/linux/bin/${{ARCH}}/"
INCLUDE = "${{INTELC.INSTALL_ROOT}}/linux/compiler/include/"
LIB = "${{INTELC.INSTALL_ROOT}}/linux/compiler/lib/${{ARCH}}/"

[toolchain.subst_vars]
ARCH = "intel64"

[[toolchain]]
name = "gcc-native"
kind = "gcc"
version_range = "3-*"
hosts = ["posix-x86_64"]
targets = ["posix-x86_64"]
search_roots = ["{bin_dir}"]
layout = "flat"

[toolchain.shell_vars]
PATH = "${{GCC.INSTALL_ROOT}}"
"#
    )
}

struct Fixture {
    tree: InstallTree,
    intel_root: NormalizedPath,
    bin_dir: NormalizedPath,
}

impl Fixture {
    fn new() -> Self {
        let tree = InstallTree::new();
        let intel_root = NormalizedPath::new(tree.path("opt/intel"));
        let bin_dir = NormalizedPath::new(tree.path("usr/bin"));
        Self {
            tree,
            intel_root,
            bin_dir,
        }
    }

    fn icc(&self, install: &str) -> std::path::PathBuf {
        self.tree
            .versioned("opt/intel", install, "linux/bin/intel64", "icc")
    }

    fn registry(&self, runner: ScriptedRunner, env: HashMap<String, String>) -> ToolchainRegistry {
        let file =
            RegistryFile::from_toml_str(&definitions(&self.intel_root, &self.bin_dir)).unwrap();
        ToolchainRegistry::from_registry_file(file, Arc::new(runner), Arc::new(env)).unwrap()
    }
}

fn host() -> Platform {
    Platform::new("posix", "x86_64")
}

fn c(s: &str) -> VersionConstraint {
    VersionConstraint::parse(s).unwrap()
}

#[test]
fn test_intel_16_resolution_and_environment() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::new()
        .reply(fx.icc("compilers_and_libraries_2016.0.109"), "icc version 16.0.0 (gcc version 4.8.5 compatibility)")
        .reply(fx.icc("compilers_and_libraries_2016.1.150"), "icc version 16.0.1 (gcc version 4.8.5 compatibility)")
        .reply(fx.icc("compilers_and_libraries_2016.2.181"), "icc version 16.0.2 (gcc version 4.8.5 compatibility)");
    let registry = fx.registry(runner, HashMap::new());

    let icc = registry
        .resolve_kind(scout_probe::ToolchainKind::IntelC, &host(), &host(), &c("16.*-*"))
        .unwrap();
    assert_eq!(icc.version, VersionId::new([16, 0, 2]));
    assert_eq!(icc.report(), "Intel C++ 16.0.2");

    let mut env = BuildEnvironment::new();
    env.append("PATH", ["/usr/bin"]);
    apply_installation(&mut env, &icc).unwrap();

    let root = fx.intel_root.join("compilers_and_libraries_2016.2.181");
    assert_eq!(
        env.get("PATH").unwrap(),
        &["/usr/bin".to_string(), format!("{root}/linux/bin/intel64/")]
    );
    assert_eq!(
        env.get("INCLUDE").unwrap(),
        &[format!("{root}/linux/compiler/include/")]
    );
    assert_eq!(env.get("INTELC_VERSION").unwrap(), &["16.0.2".to_string()]);
}

#[test]
fn test_gcc_too_old_reports_found_versions() {
    let fx = Fixture::new();
    let gcc = fx.tree.flat("usr/bin", "gcc");
    let registry = fx.registry(ScriptedRunner::new().reply(gcc, "4.8.5\n"), HashMap::new());

    let err = registry
        .resolve_kind(scout_probe::ToolchainKind::Gcc, &host(), &host(), &c("7-*"))
        .unwrap_err();
    assert!(matches!(err, Error::NoVersionSatisfiesConstraint { .. }));
    assert!(err.to_string().contains("found: 4.8.5"));

    let found = registry
        .find_kind(scout_probe::ToolchainKind::Gcc, &host(), &host(), &c("3-*"))
        .unwrap();
    assert!(found.is_found());
}

#[test]
fn test_missing_roots_are_not_errors() {
    let fx = Fixture::new();
    let registry = fx.registry(ScriptedRunner::new(), HashMap::new());

    let result = registry.find(&host(), &host(), &c("*")).unwrap();
    assert!(!result.is_found());
    assert!(registry.dump_candidates(&host(), &host()).unwrap().is_empty());
}

#[test]
fn test_directory_and_binary_versions_both_recorded() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::new().reply(
        fx.icc("compilers_and_libraries_2016.3.210"),
        "icc version 16.0.3 (gcc version 4.8.5 compatibility)",
    );
    let registry = fx.registry(runner, HashMap::new());

    let reports = registry.dump_candidates(&host(), &host()).unwrap();
    let keys: Vec<String> = reports.iter().map(|r| r.version.to_string()).collect();
    assert_eq!(keys, vec!["16.0.3", "2016.210"]);

    let icc = registry.resolve(&host(), &host(), &c("16.0.3")).unwrap();
    assert_eq!(icc.aliases, vec![VersionId::new([2016, 210])]);
}

#[test]
fn test_environment_override_when_nothing_installed() {
    let fx = Fixture::new();
    let custom = fx
        .tree
        .versioned("custom", "icc-16u4", "linux/bin/intel64", "icc");
    let env = HashMap::from([(
        "ICPP_COMPILER16".to_string(),
        fx.tree.path("custom/icc-16u4").display().to_string(),
    )]);
    let runner = ScriptedRunner::new().reply(custom, "icc version 16.0.4");
    let registry = fx.registry(runner, env);

    let icc = registry.resolve(&host(), &host(), &c("16")).unwrap();
    assert_eq!(icc.version, VersionId::new([16, 0, 4]));
    assert_eq!(
        icc.root_path,
        NormalizedPath::new(fx.tree.path("custom/icc-16u4"))
    );
}

#[test]
fn test_highest_version_across_kinds() {
    let fx = Fixture::new();
    let gcc = fx.tree.flat("usr/bin", "gcc");
    let runner = ScriptedRunner::new()
        .reply(gcc, "11.4.0\n")
        .reply(fx.icc("compilers_and_libraries_2016.1.150"), "icc version 16.0.1");
    let registry = fx.registry(runner, HashMap::new());

    let best = registry.resolve(&host(), &host(), &c("*")).unwrap();
    assert_eq!(best.config, "intelc-16-intel64");
    let parallel = registry.resolve_parallel(&host(), &host(), &c("11")).unwrap();
    assert_eq!(parallel.config, "gcc-native");
}

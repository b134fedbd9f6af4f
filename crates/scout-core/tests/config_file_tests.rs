//! Building registries from definition files.

use std::collections::HashMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use scout_core::{Error, Platform, RegistryFile, ToolchainRegistry, ToolchainScanner};
use scout_fs::NormalizedPath;
use scout_test_utils::{InstallTree, ScriptedRunner};
use scout_version::VersionConstraint;

fn write_definitions(tree: &InstallTree, name: &str, content: &str) -> NormalizedPath {
    let path = tree.path(name);
    std::fs::write(&path, content).unwrap();
    NormalizedPath::new(path)
}

fn gcc_definitions(bin_dir: &NormalizedPath) -> String {
    format!(
        r#"
[settings]
probe_timeout_secs = 4

[[toolchain]]
name = "gcc-native"
kind = "gcc"
version_range = "7-*"
hosts = ["posix-any"]
targets = ["posix-x86_64"]
search_roots = ["{bin_dir}"]
layout = "flat"

[toolchain.shell_vars]
PATH = "${{GCC.INSTALL_ROOT}}"
"#
    )
}

#[test]
fn test_registry_from_toml_file() {
    let tree = InstallTree::new();
    let gcc = tree.flat("usr/bin", "gcc");
    let bin_dir = NormalizedPath::new(tree.path("usr/bin"));
    let path = write_definitions(&tree, "toolchains.toml", &gcc_definitions(&bin_dir));

    let file = RegistryFile::load(&path).unwrap();
    assert_eq!(file.settings.probe_timeout_secs, 4);
    let registry = ToolchainRegistry::from_registry_file(
        file,
        Arc::new(ScriptedRunner::new().reply(&gcc, "9.4.0\n")),
        Arc::new(HashMap::<String, String>::new()),
    )
    .unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.scanner().settings().probe_timeout_secs, 4);

    let host = Platform::new("posix", "x86_64");
    let found = registry
        .resolve(&host, &host, &VersionConstraint::parse("7-*").unwrap())
        .unwrap();
    assert_eq!(found.report(), "GCC 9.4.0");
    assert_eq!(found.root_path, bin_dir);
}

#[test]
fn test_from_file_loads_definitions() {
    let tree = InstallTree::new();
    let bin_dir = NormalizedPath::new(tree.dir("usr/bin"));
    let path = write_definitions(&tree, "toolchains.toml", &gcc_definitions(&bin_dir));

    let registry = ToolchainRegistry::from_file(&path).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.configs().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["gcc-native"]
    );

    // no compiler in the directory yet
    let host = Platform::new("posix", "x86_64");
    let result = registry
        .find(&host, &host, &VersionConstraint::any())
        .unwrap();
    assert!(!result.is_found());
}

#[test]
fn test_from_file_missing() {
    let tree = InstallTree::new();
    let err = ToolchainRegistry::from_file(&NormalizedPath::new(tree.path("absent.toml"))).unwrap_err();
    assert!(matches!(err, Error::Fs(_)));
}

#[test]
fn test_env_overrides_file_timeout() {
    let tree = InstallTree::new();
    let bin_dir = NormalizedPath::new(tree.path("usr/bin"));
    let file = RegistryFile::from_toml_str(&gcc_definitions(&bin_dir)).unwrap();
    let env = HashMap::from([("SCOUT_PROBE_TIMEOUT_SECS".to_string(), "30".to_string())]);

    let registry =
        ToolchainRegistry::from_registry_file(file, Arc::new(ScriptedRunner::new()), Arc::new(env))
            .unwrap();
    assert_eq!(registry.scanner().settings().probe_timeout_secs, 30);
}

#[test]
fn test_yaml_definitions() {
    let tree = InstallTree::new();
    let path = write_definitions(
        &tree,
        "toolchains.yaml",
        r#"
toolchain:
  - name: clang
    kind: clang
    hosts: [posix-any]
    targets: [posix-x86_64]
    search_roots: [/usr/bin]
    layout: flat
"#,
    );

    let file = RegistryFile::load(&path).unwrap();
    assert_eq!(file.toolchains.len(), 1);
    assert_eq!(file.settings.probe_timeout_secs, 10);
}

#[test]
fn test_duplicate_names_in_file_rejected() {
    let tree = InstallTree::new();
    let bin_dir = NormalizedPath::new(tree.path("usr/bin"));
    let single = gcc_definitions(&bin_dir);
    let toolchain = single
        .split_once("[[toolchain]]")
        .map(|(_, rest)| rest)
        .unwrap();
    let doubled = format!("{single}\n[[toolchain]]{toolchain}");
    let file = RegistryFile::from_toml_str(&doubled).unwrap();

    let err = ToolchainRegistry::from_registry_file(
        file,
        Arc::new(ScriptedRunner::new()),
        Arc::new(HashMap::<String, String>::new()),
    )
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateConfig { name } if name == "gcc-native"));
}

#[test]
fn test_invalid_pattern_in_file() {
    let file = RegistryFile::from_toml_str(
        r#"
[[toolchain]]
name = "broken"
kind = "intelc"
hosts = ["posix-any"]
targets = ["posix-x86_64"]
search_roots = ["/opt/intel"]
name_pattern = "compilers_(\\d+"
"#,
    )
    .unwrap();

    let err = ToolchainRegistry::from_registry_file(
        file,
        Arc::new(ScriptedRunner::new()),
        Arc::new(HashMap::<String, String>::new()),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Probe(scout_probe::Error::InvalidPattern { .. })
    ));
}

#[test]
fn test_builtin_registry() {
    let scanner = ToolchainScanner::new(
        Arc::new(ScriptedRunner::new()),
        Arc::new(HashMap::<String, String>::new()),
        Default::default(),
    );
    let registry = ToolchainRegistry::with_builtins(scanner).unwrap();
    assert_eq!(registry.len(), 8);
    assert!(registry.configs().any(|c| c.name == "gcc-cross-aarch64"));
}

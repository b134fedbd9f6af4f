//! Scans that run real processes.
//!
//! Compilers are shell scripts printing a canned banner, so these only run
//! on unix.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use predicates::prelude::*;
use scout_core::{
    Platform, ScannerConfig, Settings, ToolchainRegistry, ToolchainScanner,
};
use scout_fs::NormalizedPath;
use scout_probe::{InstallLayout, ProbeSpec, SystemRunner, ToolchainKind};
use scout_version::{VersionConstraint, VersionId};
use tempfile::TempDir;

fn write_script(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn gcc_config(name: &str, dir: &Path, binary: &str) -> ScannerConfig {
    ScannerConfig::builder(name, ToolchainKind::Gcc)
        .host(Platform::new("posix", "any"))
        .target(Platform::new("posix", "x86_64"))
        .search_root(NormalizedPath::new(dir))
        .probe(
            ProbeSpec::new(ToolchainKind::Gcc)
                .with_layout(InstallLayout::Flat)
                .with_binary(binary),
        )
        .build()
        .unwrap()
}

fn registry(timeout_secs: u64) -> ToolchainRegistry {
    ToolchainRegistry::new(ToolchainScanner::new(
        Arc::new(SystemRunner::new()),
        Arc::new(std::collections::HashMap::<String, String>::new()),
        Settings {
            probe_timeout_secs: timeout_secs,
        },
    ))
}

#[test]
fn test_real_compiler_banner() {
    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    write_script(&bin.join("gcc"), "echo 9.4.0");

    let mut registry = registry(5);
    registry.register(gcc_config("gcc", &bin, "gcc")).unwrap();

    let host = Platform::new("posix", "x86_64");
    let gcc = registry
        .resolve(&host, &host, &VersionConstraint::parse("7-*").unwrap())
        .unwrap();
    assert_eq!(gcc.version, VersionId::new([9, 4, 0]));
    assert!(predicate::str::ends_with("/bin/gcc").eval(gcc.binary.as_str()));
}

#[test]
fn test_hanging_compiler_is_skipped() {
    let temp = TempDir::new().unwrap();
    let slow = temp.path().join("slow");
    let fast = temp.path().join("fast");
    write_script(&slow.join("gcc"), "exec sleep 30");
    write_script(&fast.join("gcc"), "echo 8.5.0");

    let mut registry = registry(1);
    registry.register(gcc_config("gcc-slow", &slow, "gcc")).unwrap();
    registry.register(gcc_config("gcc-fast", &fast, "gcc")).unwrap();

    let host = Platform::new("posix", "x86_64");
    let started = Instant::now();
    let gcc = registry
        .resolve(&host, &host, &VersionConstraint::any())
        .unwrap();
    assert_eq!(gcc.config, "gcc-fast");
    assert!(started.elapsed().as_secs() < 20);
}

#[test]
fn test_working_directory_is_scratch() {
    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    // prints the version only when run outside the install tree
    let marker = temp.path().display().to_string();
    write_script(
        &bin.join("gcc"),
        &format!("case \"$(pwd)\" in {marker}*) exit 1;; *) echo 12.2.0;; esac"),
    );

    let mut registry = registry(5);
    registry.register(gcc_config("gcc", &bin, "gcc")).unwrap();

    let host = Platform::new("posix", "x86_64");
    let gcc = registry
        .resolve(&host, &host, &VersionConstraint::any())
        .unwrap();
    assert_eq!(gcc.version, VersionId::new([12, 2, 0]));
}

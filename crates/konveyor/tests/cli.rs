//! End-to-end tests for the konveyor binary.
//!
//! Every test points the storage directory and `PATH` at fresh temporary
//! directories so nothing from the host leaks in.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Env {
    storage: TempDir,
    bin: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            storage: TempDir::new().unwrap(),
            bin: TempDir::new().unwrap(),
        }
    }

    fn konveyor(&self) -> Command {
        let mut cmd = Command::cargo_bin("konveyor").unwrap();
        cmd.env("KONVEYOR_STORAGE_DIR", self.storage.path())
            .env("PATH", self.bin.path())
            .env_remove("RUST_LOG")
            .env_remove("KONVEYOR_PLUGIN_REPO")
            .env_remove("KONVEYOR_PLUGIN_BRANCH");
        cmd
    }

    fn plugins_dir(&self) -> std::path::PathBuf {
        self.storage.path().join("plugins")
    }

    fn write_registry(&self, entries: &[(&str, &str, &str)]) {
        let mut yaml = String::from(
            "apiVersion: cli.konveyor.io/v1alpha1\nkind: Cache\nmetadata:\n  name: cache\nspec:\n  installed:\n",
        );
        if entries.is_empty() {
            yaml = yaml.replace("  installed:\n", "  installed: []\n");
        }
        for (name, version, bin) in entries {
            yaml.push_str(&format!(
                "  - name: {name}\n    version: {version}\n    platform: linux-amd64\n    bin: {bin}\n"
            ));
        }
        fs::write(self.storage.path().join("cache.yaml"), yaml).unwrap();
    }
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_version() {
    let env = Env::new();
    env.konveyor()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_long_json() {
    let env = Env::new();
    env.konveyor()
        .args(["--json", "version", "--long"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status":"ok""#))
        .stdout(predicate::str::contains(r#""platform":"#));
}

#[test]
fn test_list_empty() {
    let env = Env::new();
    env.konveyor()
        .args(["plugin", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plugins were found."));
}

#[cfg(unix)]
#[test]
fn test_list_name_only_finds_path_plugin() {
    let env = Env::new();
    write_script(&env.bin.path().join("konveyor-hello"), "echo hello");
    fs::write(env.bin.path().join("unrelated"), "x").unwrap();

    env.konveyor()
        .args(["plugin", "list", "--name-only"])
        .assert()
        .success()
        .stdout(predicate::str::diff("konveyor-hello\n"));
}

#[cfg(unix)]
#[test]
fn test_list_full_path() {
    let env = Env::new();
    let plugin = env.bin.path().join("konveyor-hello");
    write_script(&plugin, "echo hello");

    env.konveyor()
        .args(["plugin", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(plugin.display().to_string()));
}

#[test]
fn test_list_installed_before_path() {
    let env = Env::new();
    env.write_registry(&[("move2kube", "v0.3.0", "bin/konveyor-move2kube")]);

    env.konveyor()
        .args(["plugin", "list", "--name-only"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("move2kube"));
}

#[test]
fn test_tidy_removes_ghost_directory() {
    let env = Env::new();
    env.write_registry(&[("kept", "v1.0.0", "bin/konveyor-kept")]);
    fs::create_dir_all(env.plugins_dir().join("kept/v1.0.0")).unwrap();
    fs::create_dir_all(env.plugins_dir().join("ghost/v0.1.0")).unwrap();
    fs::write(env.plugins_dir().join("stray.txt"), "x").unwrap();

    env.konveyor()
        .args(["plugin", "tidy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tidying done!"));

    assert!(env.plugins_dir().join("kept").is_dir());
    assert!(!env.plugins_dir().join("ghost").exists());
    assert!(!env.plugins_dir().join("stray.txt").exists());
}

#[test]
fn test_uninstall_missing_plugin() {
    let env = Env::new();
    env.konveyor()
        .args(["plugin", "uninstall", "nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not installed"));
}

#[test]
fn test_uninstall_removes_entry_and_files() {
    let env = Env::new();
    env.write_registry(&[("hello", "v1.0.0", "bin/konveyor-hello")]);
    fs::create_dir_all(env.plugins_dir().join("hello/v1.0.0")).unwrap();

    env.konveyor()
        .args(["plugin", "uninstall", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The plugin named 'hello' was uninstalled!"));

    assert!(!env.plugins_dir().join("hello").exists());
    let registry = fs::read_to_string(env.storage.path().join("cache.yaml")).unwrap();
    assert!(!registry.contains("hello"));
}

#[test]
fn test_uninstall_json_error_envelope() {
    let env = Env::new();
    env.konveyor()
        .args(["--json", "plugin", "uninstall", "nope"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(r#""status":"error""#))
        .stdout(predicate::str::contains(r#""code":"config""#));
}

#[test]
fn test_unknown_command() {
    let env = Env::new();
    env.konveyor()
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown command"));
}

#[test]
fn test_missing_plugin_name_is_usage_error() {
    let env = Env::new();
    env.konveyor()
        .args(["plugin", "install"])
        .assert()
        .code(2);
}

#[cfg(unix)]
#[test]
fn test_runs_path_plugin_with_arguments() {
    let env = Env::new();
    write_script(
        &env.bin.path().join("konveyor-hello"),
        r#"echo "args: $*"; exit 7"#,
    );

    env.konveyor()
        .args(["hello", "transform", "--qa-skip", "-L", "x"])
        .assert()
        .code(7)
        .stdout(predicate::str::contains("args: transform --qa-skip -L x"));
}

#[cfg(unix)]
#[test]
fn test_installed_plugin_takes_precedence() {
    let env = Env::new();
    env.write_registry(&[("hello", "v1.0.0", "bin/konveyor-hello")]);
    write_script(
        &env.plugins_dir()
            .join("hello/v1.0.0/linux-amd64/bin/konveyor-hello"),
        "echo installed",
    );
    write_script(&env.bin.path().join("konveyor-hello"), "echo from-path");

    env.konveyor()
        .arg("hello")
        .assert()
        .success()
        .stdout(predicate::str::contains("installed"))
        .stdout(predicate::str::contains("from-path").not());
}

#[cfg(unix)]
#[test]
fn test_plugin_sees_environment() {
    let env = Env::new();
    write_script(
        &env.bin.path().join("konveyor-env"),
        r#"echo "value=$KONVEYOR_TEST_VALUE""#,
    );

    env.konveyor()
        .arg("env")
        .env("KONVEYOR_TEST_VALUE", "42")
        .assert()
        .success()
        .stdout(predicate::str::contains("value=42"));
}

#[cfg(unix)]
#[test]
fn test_missing_installed_binary_fails_to_launch() {
    let env = Env::new();
    env.write_registry(&[("ghost", "v1.0.0", "bin/konveyor-ghost")]);
    // A PATH plugin of the same name is ignored once the registry has an entry
    write_script(&env.bin.path().join("konveyor-ghost"), "echo from-path");

    env.konveyor()
        .arg("ghost")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("from-path").not());
}

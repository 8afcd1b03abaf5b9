//! Build script recording git and compiler details for `konveyor version --long`.

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=../../.git/HEAD");
    println!("cargo::rerun-if-changed=../../.git/index");
    println!("cargo::rerun-if-env-changed=KONVEYOR_BUILD_METADATA");

    if let Some(commit) = git(&["rev-parse", "HEAD"]) {
        println!("cargo::rustc-env=KONVEYOR_GIT_COMMIT={commit}");
    }
    if let Some(status) = git(&["status", "--porcelain"]) {
        let state = if status.is_empty() { "clean" } else { "dirty" };
        println!("cargo::rustc-env=KONVEYOR_GIT_TREE_STATE={state}");
    }

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    if let Some(version) = run(&rustc, &["--version"]) {
        println!("cargo::rustc-env=KONVEYOR_RUSTC_VERSION={version}");
    }
}

fn git(args: &[&str]) -> Option<String> {
    run("git", args)
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

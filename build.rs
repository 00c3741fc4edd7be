use std::process::Command;

/// Stamp `APP_VERSION` with the short commit sha when built from git
fn main() {
    let base = env!("CARGO_PKG_VERSION");

    let commit = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|sha| !sha.is_empty());

    let version = match commit {
        Some(sha) => format!("{}+{}", base, sha),
        None => base.to_string(),
    };
    println!("cargo:rustc-env=APP_VERSION={}", version);
    println!("cargo:rerun-if-changed=.git/HEAD");
}

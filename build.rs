use std::process::Command;

/// Runs git with the supplied arguments, returning its trimmed output or `None` on failure
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Picks the value stamped by `dsh-build` from `var`, else falls back to `fallback`
fn stamp(var: &str, fallback: impl FnOnce() -> Option<String>) -> String {
    println!("cargo:rerun-if-env-changed={}", var);

    let value = match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => fallback(),
    };

    match value {
        Some(value) if !value.is_empty() => value,
        _ => "unknown".to_string(),
    }
}

fn main() {
    // `dsh-build --toolchain cargo` passes the values in, plain `cargo build` asks git
    let version = stamp("DSH_VERSION", || {
        git(&["tag"]).map(|o| o.lines().last().unwrap_or_default().trim().to_string())
    });
    let commit = stamp("DSH_COMMIT", || {
        git(&["rev-parse", "HEAD"]).map(|o| o.trim().to_string())
    });

    println!("cargo:rustc-env=DSH_VERSION={}", version);
    println!("cargo:rustc-env=DSH_COMMIT={}", commit);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
}

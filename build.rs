/// Build script for seatsim
/// Captures build environment for reproducibility reports

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=Cargo.lock");

    if let Ok(version) = std::env::var("CARGO_PKG_VERSION") {
        println!("cargo:rustc-env=SEATSIM_VERSION={version}");
    }

    // Git hash is optional: builds from a tarball report "unknown"
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |h| h.trim().to_string());
    println!("cargo:rustc-env=SEATSIM_GIT_HASH={hash}");
}

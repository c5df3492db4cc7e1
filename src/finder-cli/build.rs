use std::process::Command;

fn main() {
    capture_build_info();
}

fn capture_build_info() {
    // Capture git hash
    if let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        if output.status.success() {
            if let Ok(git_hash) = String::from_utf8(output.stdout) {
                println!("cargo:rustc-env=GIT_HASH={}", git_hash.trim());
            }
        }
    }

    // Capture build date
    if let Ok(output) = Command::new("date").args(["+%Y-%m-%d"]).output() {
        if output.status.success() {
            if let Ok(build_date) = String::from_utf8(output.stdout) {
                println!("cargo:rustc-env=BUILD_DATE={}", build_date.trim());
            }
        }
    }

    // Capture rustc version, number only
    if let Ok(output) = Command::new("rustc").args(["--version"]).output() {
        if output.status.success() {
            if let Ok(rustc_version) = String::from_utf8(output.stdout) {
                if let Some(version) = rustc_version.split_whitespace().nth(1) {
                    println!("cargo:rustc-env=RUSTC_VERSION={}", version);
                }
            }
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
}

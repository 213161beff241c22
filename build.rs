fn main() {
    // Expose the package version to the binary's user-agent and banner
    println!(
        "cargo:rustc-env=DANFO_VERSION={}",
        env!("CARGO_PKG_VERSION")
    );

    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=Cargo.toml");
}

// Build script for dgectl - embeds version at compile time

fn main() {
    // Release builds may override the version, otherwise Cargo.toml
    let version =
        std::env::var("DGE_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=DGE_VERSION={}", version);
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=DGE_VERSION");
}

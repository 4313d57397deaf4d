fn main() {
    // SkyLight only exists on macOS; the platform-independent model still builds elsewhere
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("macos") {
        return;
    }

    // Link to private frameworks directory for SkyLight APIs
    println!("cargo:rustc-link-search=framework=/System/Library/PrivateFrameworks");

    // SkyLight framework contains CGSCopyManagedDisplaySpaces/CGSSetDesktopImageURL/CGSMainConnectionID
    println!("cargo:rustc-link-lib=framework=SkyLight");
}

fn main() {
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }

    let mut res = winresource::WindowsResource::new();
    res.set("FileDescription", "LidLock");
    res.set("ProductName", "LidLock");
    res.set("OriginalFilename", "lidlock.exe");
    if let Err(e) = res.compile() {
        println!("cargo:warning=Failed to embed version resource: {e}");
    }
}

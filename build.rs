fn main() {
    #[cfg(target_os = "windows")]
    {
        let icon = "assets/logo.ico";
        println!("cargo:rerun-if-changed={icon}");
        if std::path::Path::new(icon).exists() {
            let mut res = winres::WindowsResource::new();
            res.set_icon(icon);
            res.compile().expect("Failed to compile Windows resources");
        }
    }
}

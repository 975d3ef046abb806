/// Get the version string for drui and libdrui
pub fn get_version_string() -> String {
    format!(
        "drui {}\nlibdrui {}",
        env!("CARGO_PKG_VERSION"),
        libdrui::version()
    )
}

/// Print version information to stdout
pub fn print_version() {
    println!("{}", get_version_string());
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;

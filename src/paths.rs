use std::path::{Path, PathBuf};

/// Normalize path to `.png`
pub fn force_png_path(base: &Path, name: &str) -> PathBuf {
    base.join(format!("{}.png", name))
}

/// True when `name` can be used as a single file name inside a pack directory.
pub fn is_plain_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-'))
}

/// Expand `~` and make the path absolute against the current directory.
pub fn resolve_full_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();

    // Expand ~ on Unix-like systems
    #[cfg(unix)]
    if let Some(path_str) = path.to_str() {
        if path_str == "~" || path_str.starts_with("~/") {
            if let Some(home) = dirs::home_dir() {
                let stripped = path_str.trim_start_matches('~').trim_start_matches('/');
                p = home.join(stripped);
            }
        }
    }

    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

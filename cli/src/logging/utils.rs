//! Cache paths, color stripping and timestamps for the log file.
use std::path::PathBuf;

const APP_DIR: &str = "dotstrap";

/// Remove terminal escape sequences from `s`.
///
/// A CSI sequence (`ESC [` ... final byte in `@..=~`) is dropped whole; a
/// lone `ESC` drops itself and the byte after it.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some((before, after)) = rest.split_once('\x1b') {
        out.push_str(before);
        let mut tail = after.chars();
        if tail.next() == Some('[') {
            // parameters and the final byte
            tail.by_ref()
                .take_while(|c| !('@'..='~').contains(c))
                .for_each(drop);
        }
        rest = tail.as_str();
    }
    out.push_str(rest);
    out
}

/// `$XDG_CACHE_HOME/dotstrap`, else `$HOME/.cache/dotstrap`, else a
/// relative `.cache/dotstrap`.
fn cache_root(xdg_cache_home: Option<String>, home: Option<String>) -> PathBuf {
    let base = match xdg_cache_home.filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => PathBuf::from(home.as_deref().unwrap_or(".")).join(".cache"),
    };
    base.join(APP_DIR)
}

/// Where `<command>.log` goes. Creates the directory; `None` if that fails.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = cache_root(
        std::env::var("XDG_CACHE_HOME").ok(),
        std::env::var("HOME").ok(),
    );
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Current UTC date and time, `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%F %T").to_string()
}

/// Current UTC time of day, `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%T").to_string()
}

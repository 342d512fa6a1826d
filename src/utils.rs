//! Small helpers shared by the fetcher, the sink and the entry point.
//!
//! - String truncation for log previews
//! - Output path preparation

use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to the previous
/// character boundary) with an ellipsis and byte count appended.
///
/// # Examples
///
/// ```
/// use tag_news_archive::utils::truncate_for_log;
///
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Make sure the directory that will hold `path` exists.
///
/// Paths without a parent component (a bare file name) need nothing.
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be created.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            debug!(dir = %parent.display(), "Output directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte_boundary() {
        // Each Cyrillic letter is two bytes; byte 3 is mid-character.
        let result = truncate_for_log("Кризис", 3);
        assert_eq!(result, "К…(+10 bytes)");
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/result.txt");
        ensure_parent_dir(&target).await.unwrap();
        assert!(dir.path().join("a/b").is_dir());
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_bare_file_name() {
        ensure_parent_dir(Path::new("result.txt")).await.unwrap();
    }
}

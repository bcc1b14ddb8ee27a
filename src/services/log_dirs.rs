//! XDG-compliant log directory management
//!
//! Logs are stored in `$XDG_STATE_HOME/select-plus/logs/` (typically
//! `~/.local/state/select-plus/logs/`). Each process writes its own
//! PID-named file so concurrent runs never share a log.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

const APP_DIR: &str = "select-plus";

/// Minimum age for log files to be cleaned up (7 days)
const CLEANUP_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Cached log directory path
static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get the base log directory, creating it if necessary.
///
/// Falls back to `~/.local/state/select-plus/logs/` if XDG_STATE_HOME is not
/// set, and to the system temp directory as a last resort.
pub fn log_dir() -> &'static PathBuf {
    LOG_DIR.get_or_init(|| {
        let fallback = std::env::temp_dir().join("select-plus-logs");
        let dir = get_xdg_log_dir().unwrap_or_else(|| fallback.clone());

        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Failed to create log directory {:?}: {}", dir, e);
            return fallback;
        }

        dir
    })
}

/// Get the XDG state home log directory
fn get_xdg_log_dir() -> Option<PathBuf> {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        let path = PathBuf::from(state_home);
        // XDG ignores relative paths
        if path.is_absolute() {
            return Some(path.join(APP_DIR).join("logs"));
        }
    }

    home_dir().map(|home| home.join(".local").join("state").join(APP_DIR).join("logs"))
}

/// Get the user's home directory
fn home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }

    #[cfg(windows)]
    if let Ok(profile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(profile));
    }

    None
}

/// Get the path for this process's log file.
///
/// Returns `{log_dir}/select-plus-{PID}.log`
pub fn main_log_path() -> PathBuf {
    log_dir().join(log_file_name(std::process::id()))
}

fn log_file_name(pid: u32) -> String {
    format!("{}-{}.log", APP_DIR, pid)
}

/// Remove old log files left behind by earlier runs.
///
/// Only files named like ours and older than a week are touched; the
/// current process's log is never removed.
pub fn cleanup_stale_logs() {
    cleanup_stale_logs_in_dir(log_dir(), std::process::id(), CLEANUP_AGE);
}

fn cleanup_stale_logs_in_dir(dir: &Path, current_pid: u32, age: Duration) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        let Some(pid) = extract_pid_from_filename(&name) else {
            continue;
        };
        if pid == current_pid {
            continue;
        }

        if entry.file_type().map(|t| t.is_file()).unwrap_or(false)
            && is_file_older_than(&entry.path(), age)
        {
            match fs::remove_file(entry.path()) {
                Ok(()) => {
                    tracing::debug!("Cleaned up stale log file: {:?}", entry.path());
                    removed += 1;
                }
                Err(e) => {
                    tracing::debug!("Failed to clean up stale log {:?}: {}", entry.path(), e);
                }
            }
        }
    }
    removed
}

/// Check if a file is older than the specified duration
fn is_file_older_than(path: &Path, age: Duration) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };

    let Ok(modified) = metadata.modified() else {
        return false;
    };

    SystemTime::now()
        .duration_since(modified)
        .map(|elapsed| elapsed >= age)
        .unwrap_or(false)
}

/// Extract the PID from a file name like "select-plus-12345.log"
fn extract_pid_from_filename(name: &str) -> Option<u32> {
    name.strip_suffix(".log")?
        .strip_prefix(APP_DIR)?
        .strip_prefix('-')?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_is_absolute() {
        let dir = log_dir();
        assert!(dir.is_absolute(), "Log directory should be absolute");
    }

    #[test]
    fn test_main_log_path_contains_pid() {
        let path = main_log_path();
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("select-plus-"));
        assert!(name.ends_with(".log"));
        assert!(
            name.contains(&std::process::id().to_string()),
            "Should contain PID"
        );
    }

    #[test]
    fn test_extract_pid_from_filename() {
        assert_eq!(extract_pid_from_filename("select-plus-12345.log"), Some(12345));
        assert_eq!(extract_pid_from_filename("select-plus-1.log"), Some(1));
        assert_eq!(extract_pid_from_filename("fresh-12345.log"), None);
        assert_eq!(extract_pid_from_filename("select-plus-x.log"), None);
        assert_eq!(extract_pid_from_filename("select-plus-12.txt"), None);
    }

    #[test]
    fn test_cleanup_skips_current_pid_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(log_file_name(42)), "old").unwrap();
        fs::write(dir.path().join(log_file_name(7)), "mine").unwrap();
        fs::write(dir.path().join("notes.log"), "other").unwrap();

        let removed = cleanup_stale_logs_in_dir(dir.path(), 7, Duration::ZERO);

        assert_eq!(removed, 1);
        assert!(!dir.path().join(log_file_name(42)).exists());
        assert!(dir.path().join(log_file_name(7)).exists());
        assert!(dir.path().join("notes.log").exists());
    }

    #[test]
    fn test_cleanup_keeps_recent_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(log_file_name(42)), "fresh").unwrap();

        let removed = cleanup_stale_logs_in_dir(dir.path(), 7, CLEANUP_AGE);

        assert_eq!(removed, 0);
        assert!(dir.path().join(log_file_name(42)).exists());
    }
}

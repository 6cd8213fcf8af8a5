//! Centralized directory structure management for the ShiftBuddy client
//!
//! Directory layout:
//! ```text
//! shiftbuddy_data/
//! └── local/           # Client-local state (persisted session, preferences)
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug)]
struct ShiftConfig {
    shift_root: Option<PathBuf>,
}

/// Get the global configuration path
fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shiftbuddy").join("config.json"))
}

/// Load the persistent root from config file
pub fn load_persistent_root() -> Option<PathBuf> {
    let path = get_config_path()?;
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str::<ShiftConfig>(&content) {
            Ok(config) => config.shift_root,
            Err(e) => {
                warn!("Failed to parse config file at {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            warn!("Failed to read config file at {:?}: {}", path, e);
            None
        }
    }
}

/// Save a path as the persistent ShiftBuddy root
pub fn save_persistent_root(root: PathBuf) -> anyhow::Result<()> {
    let path = get_config_path().ok_or_else(|| anyhow::anyhow!("Could not determine config dir"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = ShiftConfig {
        shift_root: Some(root),
    };
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(path, json)?;
    Ok(())
}

/// Get the SHIFT_ROOT directory from environment, persistent config, or default
pub fn shift_root() -> PathBuf {
    // 1. Check environment variable
    if let Ok(val) = std::env::var("SHIFT_ROOT") {
        return PathBuf::from(val);
    }

    // 2. Check persistent config
    if let Some(root) = load_persistent_root() {
        // Set env var so subprocesses see it too
        std::env::set_var("SHIFT_ROOT", &root);
        return root;
    }

    // 3. Default fallback
    PathBuf::from("shiftbuddy_data")
}

/// Set the SHIFT_ROOT directory at runtime
pub fn set_shift_root(path: PathBuf) {
    info!("Setting SHIFT_ROOT to: {:?}", path);
    std::env::set_var("SHIFT_ROOT", path);
}

/// Client-local data directory (persisted session, preferences)
pub fn local_dir() -> PathBuf {
    shift_root().join("local")
}

/// Path of the persisted-session file ("current session" key)
pub fn session_path() -> PathBuf {
    local_dir().join("shiftbuddy_user.json")
}

/// Ensure a single directory exists
pub fn ensure_dir(path: &PathBuf) -> anyhow::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        info!("Created directory: {:?}", path);
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent(path: &PathBuf) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(&parent.to_path_buf())?;
    }
    Ok(())
}

/// Initialize the complete directory structure
/// Call this once at app startup before any other operations
pub fn init_structure() -> anyhow::Result<PathBuf> {
    let root = shift_root();

    // Ensure root exists first
    ensure_dir(&root)?;

    // Create all subdirectories
    ensure_dir(&local_dir())?;

    // Canonicalize for absolute path
    let canonical = std::fs::canonicalize(&root).unwrap_or_else(|_| root.clone());

    info!("ShiftBuddy directory structure initialized at: {:?}", canonical);

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_path_lives_under_local_dir() {
        let path = session_path();
        assert!(path.starts_with(local_dir()));
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("shiftbuddy_user.json")
        );
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("deep");

        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_ensure_parent_creates_missing_parents() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("a").join("b").join("session.json");

        ensure_parent(&file).unwrap();
        assert!(file.parent().unwrap().is_dir());
    }
}

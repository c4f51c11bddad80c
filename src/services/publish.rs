use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::errors::{LeaderboardError, publish_context};

/// Replace `path` with `contents` so readers only ever see the old or the
/// new file. The bytes go to a sibling temp file first, then get renamed.
pub fn publish_atomically(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LeaderboardError::io(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    debug!("Writing {} via {}", path.display(), temp_path.display());

    let outcome = write_temp(&temp_path, contents).and_then(|_| {
        fs::rename(&temp_path, path).map_err(|e| LeaderboardError::io(path, e).into())
    });

    if outcome.is_err() {
        // never leave a half-written sibling behind
        let _ = fs::remove_file(&temp_path);
    }
    outcome.with_context(|| publish_context(path))?;

    info!("Published {}", path.display());
    Ok(())
}

fn write_temp(temp_path: &Path, contents: &str) -> Result<()> {
    let mut file = File::create(temp_path).map_err(|e| LeaderboardError::io(temp_path, e))?;
    file.write_all(contents.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| LeaderboardError::io(temp_path, e))?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("arena_leaderboard_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_publish_replaces_previous_contents() {
        let dir = scratch_dir("publish_replace");
        let target = dir.join("nested").join("leaderboard.json");

        publish_atomically(&target, "{\"v\": 1}").unwrap();
        publish_atomically(&target, "{\"v\": 2}").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "{\"v\": 2}");
        let leftovers: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_publish_keeps_old_file_and_no_temp() {
        let dir = scratch_dir("publish_fail");
        fs::create_dir_all(&dir).unwrap();
        // a directory in the way makes the rename fail
        let target = dir.join("blocked");
        fs::create_dir_all(target.join("child")).unwrap();

        let err = publish_atomically(&target, "new").unwrap_err();
        assert!(format!("{:#}", err).contains("blocked"));
        assert!(!temp_path_for(&target).exists());
        assert!(target.join("child").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}

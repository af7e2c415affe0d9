use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::warn;
use walkdir::WalkDir;

/// File name suffix the launcher uses for per-store library exports.
pub const LIBRARY_FILE_SUFFIX: &str = "_library.json";

/// Return every library export directly inside `root`, sorted by path.
pub fn library_files(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        anyhow::bail!("library directory {} does not exist", root.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {err}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let is_library = entry
            .file_name()
            .to_str()
            .map(|name| name.ends_with(LIBRARY_FILE_SUFFIX))
            .unwrap_or(false);
        if is_library {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finds_only_library_exports() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        fs::write(root.join("legendary_library.json"), "{}")?;
        fs::write(root.join("gog_library.json"), "{}")?;
        fs::write(root.join("installed.json"), "{}")?;
        fs::write(root.join("nile_library.json.bak"), "{}")?;
        fs::create_dir_all(root.join("nested"))?;
        fs::write(root.join("nested/sideload_library.json"), "{}")?;
        fs::create_dir_all(root.join("dir_library.json"))?;

        let files = library_files(root)?;
        let names: Vec<_> = files
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .collect();
        assert_eq!(names, vec!["gog_library.json", "legendary_library.json"]);
        Ok(())
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempdir().expect("tempdir");
        assert!(library_files(temp.path().join("absent")).is_err());
    }
}

use super::{DirEntry, FileSystem, FileType};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).context(format!("Failed to write file {:?}", path))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context(format!("Failed to read file {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).context(format!("Failed to create directory {:?}", path))
    }

    #[cfg(unix)]
    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        std::os::unix::fs::symlink(target, link)
            .context(format!("Failed to link {:?} -> {:?}", link, target))
    }

    #[cfg(windows)]
    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        std::os::windows::fs::symlink_file(target, link)
            .context(format!("Failed to link {:?} -> {:?}", link, target))
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        fs::read_link(path).context(format!("Failed to read link {:?}", path))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        fs::copy(from, to)
            .map(|_| ())
            .context(format!("Failed to copy {:?} to {:?}", from, to))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).context(format!("Failed to remove file {:?}", path))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).context(format!("Failed to remove directory {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let entries = fs::read_dir(path).context(format!("Failed to read directory {:?}", path))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = if self.is_symlink(&path) {
                FileType::Symlink
            } else if path.is_dir() {
                FileType::Directory
            } else {
                FileType::File
            };

            result.push(DirEntry {
                path,
                name,
                file_type,
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let fs = RealFileSystem::new();
        fs.create_dir_all(&dir.path().join("subdir")).unwrap();
        fs.write(&dir.path().join("test.txt"), "hello world").unwrap();
        dir
    }

    #[test]
    fn write_and_read_round_trip() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let content = fs.read_to_string(&temp.path().join("test.txt")).unwrap();
        assert_eq!(content, "hello world");
        assert!(fs.exists(&temp.path().join("test.txt")));
        assert!(fs.is_file(&temp.path().join("test.txt")));
        assert!(fs.is_dir(&temp.path().join("subdir")));
        assert!(!fs.exists(&temp.path().join("nonexistent")));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_round_trip() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();
        let target = temp.path().join("test.txt");
        let link = temp.path().join("test.link");

        fs.symlink(&target, &link).unwrap();
        assert!(fs.is_symlink(&link));
        assert!(!fs.is_symlink(&target));
        assert_eq!(fs.read_link(&link).unwrap(), target);
        assert_eq!(fs.read_to_string(&link).unwrap(), "hello world");
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_detectable() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();
        let link = temp.path().join("dangling.link");

        fs.symlink(Path::new("missing-target"), &link).unwrap();
        assert!(fs.is_symlink(&link));
        assert!(!fs.exists(&link));
    }

    #[test]
    fn copy_and_remove() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();
        let copy_path = temp.path().join("copy.txt");

        fs.copy(&temp.path().join("test.txt"), &copy_path).unwrap();
        assert_eq!(fs.read_to_string(&copy_path).unwrap(), "hello world");

        fs.remove_file(&copy_path).unwrap();
        assert!(!fs.exists(&copy_path));

        fs.remove_dir_all(&temp.path().join("subdir")).unwrap();
        assert!(!fs.exists(&temp.path().join("subdir")));
    }

    #[test]
    fn read_dir_lists_entries() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let entries = fs.read_dir(temp.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.file_name()).collect();
        assert!(names.contains(&"test.txt"));
        assert!(names.contains(&"subdir"));
    }
}

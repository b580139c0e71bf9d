use super::{DirEntry, FileSystem, FileType};
use anyhow::{anyhow, bail, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone)]
struct MockEntry {
    content: Option<String>,
    file_type: FileType,
    target: Option<PathBuf>,
}

/// In-memory file system for tests.
///
/// Behavior toggles simulate the environments the detectors probe for:
/// [`MockFileSystem::case_insensitive`] folds path lookups the way caseless
/// filesystems do, and [`MockFileSystem::without_symlinks`] rejects link
/// creation the way FAT-style filesystems do.
pub struct MockFileSystem {
    files: RwLock<HashMap<PathBuf, MockEntry>>,
    root: PathBuf,
    case_insensitive: bool,
    symlinks_supported: bool,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            root: PathBuf::from("/probe"),
            case_insensitive: false,
            symlinks_supported: true,
        }
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            root,
            ..Self::new()
        }
    }

    /// Simulate a caseless filesystem: lookups ignore path case.
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Simulate a filesystem without symlink support.
    pub fn without_symlinks(mut self) -> Self {
        self.symlinks_supported = false;
        self
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap();

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut files, parent);
        }

        files.insert(
            path,
            MockEntry {
                content: Some(content.to_string()),
                file_type: FileType::File,
                target: None,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap();
        Self::ensure_parents(&mut files, &path);
        files.insert(
            path,
            MockEntry {
                content: None,
                file_type: FileType::Directory,
                target: None,
            },
        );
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parents(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            files.entry(current.clone()).or_insert(MockEntry {
                content: None,
                file_type: FileType::Directory,
                target: None,
            });
        }
    }

    fn find_key(&self, files: &HashMap<PathBuf, MockEntry>, path: &Path) -> Option<PathBuf> {
        if files.contains_key(path) {
            return Some(path.to_path_buf());
        }
        if self.case_insensitive {
            let folded = path.to_string_lossy().to_lowercase();
            return files
                .keys()
                .find(|k| k.to_string_lossy().to_lowercase() == folded)
                .cloned();
        }
        None
    }

    /// Follows symlink chains to the key of the final entry. `None` for
    /// missing paths and dangling links.
    fn resolve_key(&self, files: &HashMap<PathBuf, MockEntry>, path: &Path) -> Option<PathBuf> {
        let mut key = self.find_key(files, &self.normalize_path(path))?;
        for _ in 0..8 {
            let entry = files.get(&key)?;
            match (entry.file_type, entry.target.clone()) {
                (FileType::Symlink, Some(target)) => {
                    key = self.find_key(files, &self.normalize_path(&target))?;
                }
                _ => return Some(key),
            }
        }
        None
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let files = self.files.read().unwrap();
        self.resolve_key(&files, path).is_some()
    }

    fn is_file(&self, path: &Path) -> bool {
        let files = self.files.read().unwrap();
        self.resolve_key(&files, path)
            .and_then(|k| files.get(&k).map(|e| e.file_type == FileType::File))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.read().unwrap();
        self.resolve_key(&files, path)
            .and_then(|k| files.get(&k).map(|e| e.file_type == FileType::Directory))
            .unwrap_or(false)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        let files = self.files.read().unwrap();
        self.find_key(&files, &self.normalize_path(path))
            .and_then(|k| files.get(&k).map(|e| e.file_type == FileType::Symlink))
            .unwrap_or(false)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let path = self.normalize_path(path);
        let mut files = self.files.write().unwrap();

        // On a caseless filesystem a differently-cased spelling addresses
        // the already-existing entry.
        let key = self.find_key(&files, &path).unwrap_or(path);
        if let Some(parent) = key.parent() {
            Self::ensure_parents(&mut files, parent);
        }
        files.insert(
            key,
            MockEntry {
                content: Some(contents.to_string()),
                file_type: FileType::File,
                target: None,
            },
        );
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.files.read().unwrap();
        let key = self
            .resolve_key(&files, path)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))?;
        files
            .get(&key)
            .and_then(|e| e.content.clone())
            .ok_or_else(|| anyhow!("Not a file: {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.add_dir(path);
        Ok(())
    }

    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        if !self.symlinks_supported {
            bail!("Symlinks are not supported on this filesystem");
        }
        let link = self.normalize_path(link);
        let mut files = self.files.write().unwrap();
        if self.find_key(&files, &link).is_some() {
            bail!("Path already exists: {:?}", link);
        }
        if let Some(parent) = link.parent() {
            Self::ensure_parents(&mut files, parent);
        }
        files.insert(
            link,
            MockEntry {
                content: None,
                file_type: FileType::Symlink,
                target: Some(target.to_path_buf()),
            },
        );
        Ok(())
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        let files = self.files.read().unwrap();
        let key = self
            .find_key(&files, &self.normalize_path(path))
            .ok_or_else(|| anyhow!("Path not found: {:?}", path))?;
        files
            .get(&key)
            .and_then(|e| e.target.clone())
            .ok_or_else(|| anyhow!("Not a symlink: {:?}", path))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        let content = self.read_to_string(from)?;
        self.write(to, &content)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let path = self.normalize_path(path);
        let mut files = self.files.write().unwrap();
        let key = self
            .find_key(&files, &path)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))?;
        files.remove(&key);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let path = self.normalize_path(path);
        let mut files = self.files.write().unwrap();
        let key = self
            .find_key(&files, &path)
            .ok_or_else(|| anyhow!("Directory not found: {:?}", path))?;
        files.retain(|k, _| !k.starts_with(&key));
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let files = self.files.read().unwrap();
        let key = self
            .resolve_key(&files, path)
            .ok_or_else(|| anyhow!("Directory not found: {:?}", path))?;

        let mut entries = Vec::new();
        for (file_path, entry) in files.iter() {
            if file_path.parent() == Some(key.as_path()) && file_path != &key {
                let name = file_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("")
                    .to_string();
                entries.push(DirEntry {
                    path: file_path.clone(),
                    name,
                    file_type: entry.file_type,
                });
            }
        }
        Ok(entries)
    }
}

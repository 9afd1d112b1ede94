//! Filesystem collaborators used to list and read the built site.
//!
//! Paths exchanged with a [`Filesystem`] are always `/`-separated and rooted at the site output
//! directory (`/index.html`, `/assets/app.js`), independent of the host platform.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ManifestError, ManifestResult};
use crate::hashing::content_digest;

/// Access to the built site that the manifest describes.
pub trait Filesystem {
    /// List every file below `dir` in a stable, reproducible order.
    fn list(&self, dir: &str) -> ManifestResult<Vec<String>>;

    /// Read the raw bytes of a file returned by [`Filesystem::list`].
    fn read(&self, path: &str) -> ManifestResult<Vec<u8>>;

    /// Content digest of a file, as stored in the manifest hash table.
    fn hash(&self, path: &str) -> ManifestResult<String> {
        Ok(content_digest(&self.read(path)?))
    }

    /// Write a file, creating parent directories as needed.
    fn write(&mut self, path: &str, contents: &[u8]) -> ManifestResult<()>;
}

/// Filesystem rooted at a directory on disk, typically the site build output.
///
/// Symbolic links are followed, so linked build outputs are listed like regular files.
#[derive(Debug, Clone)]
pub struct DiskFilesystem {
    root: PathBuf,
    ignored: BTreeSet<String>,
}

impl DiskFilesystem {
    /// Create a filesystem rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignored: BTreeSet::new(),
        }
    }

    /// Hide a site path (e.g. `/ngsw.json`) from listings. Reads and writes are unaffected.
    pub fn ignore(mut self, path: &str) -> Self {
        self.ignored.insert(format!("/{}", path.trim_start_matches('/')));
        self
    }

    /// Site path of a file on disk, when it lies below the root.
    pub fn site_path_of(&self, path: &Path) -> Option<String> {
        self.site_path(path)
    }

    /// Directory every site path is resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches('/');
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }

    fn site_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(format!("/{}", segments.join("/")))
    }
}

impl Filesystem for DiskFilesystem {
    fn list(&self, dir: &str) -> ManifestResult<Vec<String>> {
        let base = self.resolve(dir);
        if !base.is_dir() {
            return Err(ManifestError::NoSuchBase {
                path: dir.to_string(),
                source: None,
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&base).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|err| ManifestError::NoSuchBase {
                path: dir.to_string(),
                source: Some(err.into()),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            match self.site_path(entry.path()) {
                Some(path) if !self.ignored.contains(&path) => files.push(path),
                _ => {}
            }
        }

        Ok(files)
    }

    fn read(&self, path: &str) -> ManifestResult<Vec<u8>> {
        fs::read(self.resolve(path)).map_err(|err| ManifestError::UnreadableFile {
            path: path.to_string(),
            source: Some(err),
        })
    }

    fn write(&mut self, path: &str, contents: &[u8]) -> ManifestResult<()> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| ManifestError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&target, contents).map_err(|source| ManifestError::Io {
            path: target,
            source,
        })
    }
}

/// In-memory filesystem that lists files in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    files: Vec<(String, Vec<u8>)>,
}

impl MemoryFilesystem {
    /// Create an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file. Replacing keeps the original listing position.
    pub fn insert(&mut self, path: impl Into<String>, contents: impl AsRef<[u8]>) {
        let path = path.into();
        let contents = contents.as_ref().to_vec();
        match self.files.iter_mut().find(|(existing, _)| *existing == path) {
            Some((_, slot)) => *slot = contents,
            None => self.files.push((path, contents)),
        }
    }
}

impl<P, C> FromIterator<(P, C)> for MemoryFilesystem
where
    P: Into<String>,
    C: AsRef<[u8]>,
{
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut filesystem = Self::new();
        for (path, contents) in iter {
            filesystem.insert(path, contents);
        }
        filesystem
    }
}

impl Filesystem for MemoryFilesystem {
    fn list(&self, dir: &str) -> ManifestResult<Vec<String>> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let files: Vec<String> = self
            .files
            .iter()
            .map(|(path, _)| path)
            .filter(|path| path.starts_with(&prefix))
            .cloned()
            .collect();

        if files.is_empty() && prefix != "/" {
            return Err(ManifestError::NoSuchBase {
                path: dir.to_string(),
                source: None,
            });
        }
        Ok(files)
    }

    fn read(&self, path: &str) -> ManifestResult<Vec<u8>> {
        self.files
            .iter()
            .find(|(existing, _)| existing == path)
            .map(|(_, contents)| contents.clone())
            .ok_or_else(|| ManifestError::UnreadableFile {
                path: path.to_string(),
                source: None,
            })
    }

    fn write(&mut self, path: &str, contents: &[u8]) -> ManifestResult<()> {
        self.insert(path, contents);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_file(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn memory_lists_in_insertion_order() {
        let fs = MemoryFilesystem::from_iter([
            ("/index.html", "a"),
            ("/test.txt", "b"),
            ("/foo/test.html", "c"),
        ]);

        assert_eq!(fs.list("/").unwrap(), vec![
            "/index.html".to_string(),
            "/test.txt".to_string(),
            "/foo/test.html".to_string(),
        ]);
        assert_eq!(fs.list("/foo").unwrap(), vec!["/foo/test.html".to_string()]);
    }

    #[test]
    fn memory_replacing_keeps_position() {
        let mut fs = MemoryFilesystem::from_iter([("/a.txt", "1"), ("/b.txt", "2")]);
        fs.insert("/a.txt", "3");

        assert_eq!(fs.list("/").unwrap(), vec!["/a.txt".to_string(), "/b.txt".to_string()]);
        assert_eq!(fs.read("/a.txt").unwrap(), b"3");
    }

    #[test]
    fn memory_reports_missing_base_and_files() {
        let fs = MemoryFilesystem::from_iter([("/index.html", "a")]);

        assert!(matches!(fs.list("/missing"), Err(ManifestError::NoSuchBase { .. })));
        assert!(matches!(fs.read("/nope.txt"), Err(ManifestError::UnreadableFile { .. })));
        assert!(MemoryFilesystem::new().list("/").unwrap().is_empty());
    }

    #[test]
    fn disk_lists_files_depth_first_by_name() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("test.txt"), "Another test");
        write_file(&root.join("index.html"), "This is a test");
        write_file(&root.join("foo/test.html"), "Another test");

        let fs = DiskFilesystem::new(root);
        assert_eq!(fs.list("/").unwrap(), vec![
            "/foo/test.html".to_string(),
            "/index.html".to_string(),
            "/test.txt".to_string(),
        ]);
        assert_eq!(fs.list("/foo").unwrap(), vec!["/foo/test.html".to_string()]);
    }

    #[test]
    fn disk_hides_ignored_paths_from_listing() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("index.html"), "This is a test");
        write_file(&root.join("ngsw.json"), "{}");
        write_file(&root.join("sub/ngsw.json"), "{}");

        let fs = DiskFilesystem::new(root).ignore("ngsw.json");
        assert_eq!(fs.list("/").unwrap(), vec![
            "/index.html".to_string(),
            "/sub/ngsw.json".to_string(),
        ]);
        assert_eq!(fs.read("/ngsw.json").unwrap(), b"{}");
    }

    #[cfg(unix)]
    #[test]
    fn disk_lists_symlinked_files_and_directories() {
        let dir = tempdir().unwrap();
        let outside = dir.path().join("outside");
        write_file(&outside.join("shared/app.js"), "app");
        write_file(&outside.join("logo.svg"), "svg");
        let root = dir.path().join("dist");
        write_file(&root.join("index.html"), "This is a test");
        std::os::unix::fs::symlink(outside.join("logo.svg"), root.join("logo.svg")).unwrap();
        std::os::unix::fs::symlink(outside.join("shared"), root.join("shared")).unwrap();

        let fs = DiskFilesystem::new(&root);
        assert_eq!(fs.list("/").unwrap(), vec![
            "/index.html".to_string(),
            "/logo.svg".to_string(),
            "/shared/app.js".to_string(),
        ]);
        assert_eq!(fs.read("/shared/app.js").unwrap(), b"app");
    }

    #[test]
    fn disk_reports_missing_base() {
        let dir = tempdir().unwrap();
        let fs = DiskFilesystem::new(dir.path().join("dist"));

        let err = fs.list("/").unwrap_err();
        assert!(matches!(err, ManifestError::NoSuchBase { ref path, .. } if path == "/"));
    }

    #[test]
    fn disk_reads_hashes_and_writes() {
        let dir = tempdir().unwrap();
        let mut fs = DiskFilesystem::new(dir.path());

        fs.write("/nested/ngsw.json", b"This is a test").unwrap();
        assert_eq!(fs.read("/nested/ngsw.json").unwrap(), b"This is a test");
        assert_eq!(
            fs.hash("/nested/ngsw.json").unwrap(),
            "a54d88e06612d820bc3be72877c74f257b561b19"
        );
        assert!(matches!(
            fs.read("/missing.txt"),
            Err(ManifestError::UnreadableFile { source: Some(_), .. })
        ));
    }
}

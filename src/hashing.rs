//! Content addressing of matched files.

use std::collections::BTreeMap;

use sha1::{Digest, Sha1};

use crate::error::ManifestResult;
use crate::filesystem::Filesystem;
use crate::paths::join_urls;

/// Mapping from the served URL of a file to its content digest.
///
/// Keys are sorted so the serialized manifest is byte-for-byte reproducible.
pub type HashTable = BTreeMap<String, String>;

/// Lowercase hex SHA-1 digest (40 characters) of the given bytes.
pub fn content_digest(bytes: &[u8]) -> String {
  let mut hasher = Sha1::new();
  hasher.update(bytes);
  hex::encode(hasher.finalize())
}

/// Hash every listed file and record it under its URL below `base_href`.
///
/// Returns the URLs in the order the files were given. The first unreadable file aborts the
/// whole pass.
pub fn hash_files<F: Filesystem + ?Sized>(
  fs: &F,
  files: &[String],
  base_href: &str,
  table: &mut HashTable,
) -> ManifestResult<Vec<String>> {
  let mut urls = Vec::with_capacity(files.len());
  for file in files {
    let url = join_urls(base_href, file);
    let digest = fs.hash(file)?;
    table.insert(url.clone(), digest);
    urls.push(url);
  }
  Ok(urls)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ManifestError;
  use crate::filesystem::MemoryFilesystem;

  #[test]
  fn digests_are_sha1_hex() {
    assert_eq!(
      content_digest(b"This is a test"),
      "a54d88e06612d820bc3be72877c74f257b561b19"
    );
    assert_eq!(
      content_digest(b"Another test"),
      "18f6f8eb7b1c23d2bb61bff028b83d867a9e4643"
    );
    assert_eq!(content_digest(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
  }

  #[test]
  fn records_files_under_base_href() {
    let fs = MemoryFilesystem::from_iter([("/index.html", "This is a test"), ("/a.txt", "x")]);
    let mut table = HashTable::new();

    let urls = hash_files(
      &fs,
      &["/index.html".to_string(), "/a.txt".to_string()],
      "/test",
      &mut table,
    )
    .unwrap();

    assert_eq!(urls, vec!["/test/index.html".to_string(), "/test/a.txt".to_string()]);
    assert_eq!(table.len(), 2);
    assert_eq!(
      table["/test/index.html"],
      "a54d88e06612d820bc3be72877c74f257b561b19"
    );
  }

  #[test]
  fn unreadable_file_aborts() {
    let fs = MemoryFilesystem::new();
    let mut table = HashTable::new();

    let err = hash_files(&fs, &["/gone.js".to_string()], "/", &mut table).unwrap_err();
    assert!(matches!(err, ManifestError::UnreadableFile { ref path, .. } if path == "/gone.js"));
  }
}

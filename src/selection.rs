//! Glob based selection of files from the site listing.

use std::collections::BTreeSet;

use regex::Regex;

use crate::error::{ManifestError, ManifestResult};
use crate::paths::resolve_url;
use crate::pattern::{Anchoring, glob_to_regex};

/// Prefix marking a glob as an exclusion.
pub const NEGATION_PREFIX: char = '!';

/// Include/exclude rules compiled from a list of globs.
///
/// Globs prefixed with `!` are moved into the exclude set. A path is selected when it matches at
/// least one include and no exclude, independent of where the negation appears in the list.
#[derive(Debug, Clone, Default)]
pub struct GlobSelection {
  include: Vec<Regex>,
  exclude: Vec<Regex>,
}

impl GlobSelection {
  /// Compile the provided globs. Relative globs are anchored at the listing root.
  pub fn from_globs<S: AsRef<str>>(globs: &[S]) -> ManifestResult<Self> {
    let mut selection = Self::default();
    for glob in globs {
      let glob = glob.as_ref();
      match glob.strip_prefix(NEGATION_PREFIX) {
        Some(negated) => selection.exclude.push(compile_glob(negated)?),
        None => selection.include.push(compile_glob(glob)?),
      }
    }
    Ok(selection)
  }

  /// Determine whether a listing path is selected.
  pub fn is_included(&self, path: &str) -> bool {
    if self.exclude.iter().any(|regex| regex.is_match(path)) {
      return false;
    }
    self.include.iter().any(|regex| regex.is_match(path))
  }

  /// Returns true when no include glob was given, so nothing can be selected.
  pub fn is_empty(&self) -> bool {
    self.include.is_empty()
  }

  /// Select matching paths from `listing`, preserving its order.
  ///
  /// Paths already present in `seen` are skipped and every selected path is added to it, so a
  /// file claimed by an earlier selection is never listed twice.
  pub fn select(&self, listing: &[String], seen: &mut BTreeSet<String>) -> Vec<String> {
    if self.is_empty() {
      return Vec::new();
    }

    listing
      .iter()
      .filter(|path| self.is_included(path))
      .filter(|path| seen.insert((*path).clone()))
      .cloned()
      .collect()
  }
}

fn compile_glob(glob: &str) -> ManifestResult<Regex> {
  let source = glob_to_regex(&resolve_url(glob, "/"), Anchoring::Anchored);
  Regex::new(&source).map_err(|source| ManifestError::InvalidPattern {
    glob: glob.to_string(),
    source,
  })
}

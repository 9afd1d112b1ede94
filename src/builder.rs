//! Manifest compiler turning an offline caching config into the runtime manifest.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::{AssetGroupConfig, Config, DataGroupConfig};
use crate::duration::parse_duration_ms;
use crate::error::ManifestResult;
use crate::filesystem::Filesystem;
use crate::hashing::{HashTable, hash_files};
use crate::models::{
  AssetGroupManifest, CONFIG_VERSION, DATA_GROUP_VERSION, DataGroupManifest, Manifest,
  NavigationUrl,
};
use crate::paths::join_urls;
use crate::pattern::{Anchoring, url_to_regex};
use crate::selection::{GlobSelection, NEGATION_PREFIX};

/// Navigation rules used when the config does not declare any.
///
/// Everything below the origin is a navigation, except URLs whose last segment has a file
/// extension and URLs with a `__` segment (or anything below one).
pub const DEFAULT_NAVIGATION_URLS: [&str; 4] = ["/**", "!/**/*.*", "!/**/*__*", "!/**/*__*/**"];

/// Compiles configs against a snapshot of the built site.
///
/// Each call to [`ManifestBuilder::process`] works on its own state, so one builder can compile
/// any number of configs. A failure anywhere aborts the call without a partial manifest.
pub struct ManifestBuilder<'a, F: Filesystem + ?Sized> {
  fs: &'a F,
  base_href: String,
}

impl<'a, F: Filesystem + ?Sized> ManifestBuilder<'a, F> {
  /// Create a builder reading the site through `fs` and serving it below `base_href`.
  pub fn new(fs: &'a F, base_href: impl Into<String>) -> Self {
    Self {
      fs,
      base_href: base_href.into(),
    }
  }

  /// Base href every root-relative URL is resolved against.
  pub fn base_href(&self) -> &str {
    &self.base_href
  }

  /// Compile `config` into a manifest.
  pub fn process(&self, config: &Config) -> ManifestResult<Manifest> {
    config.validate()?;

    let mut hash_table = HashTable::new();
    let listing = if config.asset_groups.is_empty() {
      Vec::new()
    } else {
      self.fs.list("/")?
    };
    let mut seen = BTreeSet::new();

    let mut asset_groups = Vec::with_capacity(config.asset_groups.len());
    for group in &config.asset_groups {
      asset_groups.push(self.process_asset_group(group, &listing, &mut seen, &mut hash_table)?);
    }

    let data_groups = config
      .data_groups
      .iter()
      .map(|group| self.process_data_group(group))
      .collect::<ManifestResult<Vec<_>>>()?;

    let navigation_urls = match &config.navigation_urls {
      Some(urls) => self.process_navigation_urls(urls),
      None => self.process_navigation_urls(&DEFAULT_NAVIGATION_URLS),
    };

    info!(
      asset_groups = asset_groups.len(),
      data_groups = data_groups.len(),
      hashed_files = hash_table.len(),
      "compiled service worker manifest"
    );

    Ok(Manifest {
      config_version: CONFIG_VERSION,
      app_data: config.app_data.clone(),
      index: join_urls(&self.base_href, &config.index),
      asset_groups,
      data_groups,
      navigation_urls,
      hash_table,
    })
  }

  fn process_asset_group(
    &self,
    group: &AssetGroupConfig,
    listing: &[String],
    seen: &mut BTreeSet<String>,
    hash_table: &mut HashTable,
  ) -> ManifestResult<AssetGroupManifest> {
    let resources = &group.resources;
    let files = GlobSelection::from_globs(&resources.files)?;
    let versioned_files = GlobSelection::from_globs(&resources.versioned_files)?;

    let mut matched = files.select(listing, seen);
    matched.extend(versioned_files.select(listing, seen));

    let urls = hash_files(self.fs, &matched, &self.base_href, hash_table)?;
    let patterns = self.compile_patterns(&resources.urls);

    debug!(
      group = %group.name,
      files = urls.len(),
      patterns = patterns.len(),
      "compiled asset group"
    );

    Ok(AssetGroupManifest {
      name: group.name.clone(),
      install_mode: group.install_mode.unwrap_or_default(),
      update_mode: group.update_mode.unwrap_or_default(),
      urls,
      patterns,
    })
  }

  fn process_data_group(&self, group: &DataGroupConfig) -> ManifestResult<DataGroupManifest> {
    let cache = &group.cache_config;
    let max_age = parse_duration_ms(&cache.max_age)?;
    let timeout_ms = parse_duration_ms(&cache.timeout)?;

    debug!(group = %group.name, max_age, timeout_ms, "compiled data group");

    Ok(DataGroupManifest {
      name: group.name.clone(),
      patterns: self.compile_patterns(&group.urls),
      strategy: cache.strategy.unwrap_or_default(),
      max_size: cache.max_size,
      max_age,
      timeout_ms,
      version: DATA_GROUP_VERSION,
    })
  }

  fn process_navigation_urls<S: AsRef<str>>(&self, urls: &[S]) -> Vec<NavigationUrl> {
    urls
      .iter()
      .map(|url| {
        let url = url.as_ref();
        let (positive, glob) = match url.strip_prefix(NEGATION_PREFIX) {
          Some(negated) => (false, negated),
          None => (true, url),
        };
        NavigationUrl {
          positive,
          regex: url_to_regex(glob, &self.base_href, Anchoring::Anchored),
        }
      })
      .collect()
  }

  fn compile_patterns(&self, urls: &[String]) -> Vec<String> {
    urls
      .iter()
      .map(|url| url_to_regex(url, &self.base_href, Anchoring::Unanchored))
      .collect()
  }
}

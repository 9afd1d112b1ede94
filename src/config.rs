//! Offline caching config describing what the service worker should cache.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ManifestError, ManifestResult};

/// Config file name conventionally placed next to the application sources.
pub const DEFAULT_CONFIG_FILE: &str = "ngsw-config.json";

/// Declarative description of the offline caching behaviour of a site.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
  /// Arbitrary application data copied verbatim into the manifest.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub app_data: Option<Value>,
  /// Entry document served for navigation requests.
  pub index: String,
  /// Groups of build output files and runtime URLs cached as application assets.
  #[serde(default)]
  pub asset_groups: Vec<AssetGroupConfig>,
  /// Groups of runtime data URLs cached under a size and age policy.
  #[serde(default)]
  pub data_groups: Vec<DataGroupConfig>,
  /// Navigation rules; `None` selects the built-in defaults.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub navigation_urls: Option<Vec<String>>,
}

/// A named set of assets sharing one installation policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGroupConfig {
  /// Group name, used by the runtime as a cache key.
  pub name: String,
  /// How the group is fetched on first installation; defaults to prefetch.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub install_mode: Option<LoadMode>,
  /// How the group is fetched when a new version is found; defaults to prefetch.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub update_mode: Option<LoadMode>,
  /// Files and URL patterns making up the group.
  #[serde(default)]
  pub resources: AssetResources,
}

/// Resources claimed by an asset group.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResources {
  /// Globs resolved against the build output; `!` marks an exclusion.
  #[serde(default)]
  pub files: Vec<String>,
  /// Like `files`, for files whose names already change with their contents.
  #[serde(default)]
  pub versioned_files: Vec<String>,
  /// URL patterns matched at runtime, never resolved against the build output.
  #[serde(default)]
  pub urls: Vec<String>,
}

/// A named set of data URLs cached under one policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGroupConfig {
  /// Group name, used by the runtime as a cache key.
  pub name: String,
  /// URL patterns matched at runtime.
  #[serde(default)]
  pub urls: Vec<String>,
  /// Cache sizing and freshness policy.
  pub cache_config: CacheConfig,
}

/// Caching policy of a data group.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
  /// Maximum number of responses kept.
  pub max_size: u64,
  /// Maximum response age, e.g. `3d`.
  pub max_age: String,
  /// Network timeout before falling back to the cache, e.g. `1m`.
  pub timeout: String,
  /// Caching strategy; defaults to performance.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub strategy: Option<CacheStrategy>,
}

/// When the resources of an asset group are fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
  /// Fetch eagerly.
  #[default]
  Prefetch,
  /// Fetch on first request.
  Lazy,
}

/// Caching strategy of a data group. The compiler copies it through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStrategy {
  /// Serve from cache when possible.
  #[default]
  Performance,
  /// Prefer the network, fall back to cache.
  Freshness,
}

impl Config {
  /// Load and validate a config file. `.yaml`/`.yml` files are read as YAML, anything else as JSON.
  pub fn from_path(path: impl AsRef<Path>) -> ManifestResult<Self> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|err| ManifestError::UnreadableFile {
      path: path.display().to_string(),
      source: Some(err),
    })?;

    let is_yaml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
      Self::from_yaml_str(&contents)
    } else {
      Self::from_json_str(&contents)
    }
  }

  /// Parse and validate a JSON config.
  pub fn from_json_str(contents: &str) -> ManifestResult<Self> {
    let config: Self = serde_json::from_str(contents)
      .map_err(|err| ManifestError::invalid_spec(err.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  /// Parse and validate a YAML config.
  pub fn from_yaml_str(contents: &str) -> ManifestResult<Self> {
    let config: Self = serde_yaml::from_str(contents)
      .map_err(|err| ManifestError::invalid_spec(err.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  /// Check the structural requirements serde cannot express.
  pub fn validate(&self) -> ManifestResult<()> {
    if self.index.trim().is_empty() {
      return Err(ManifestError::invalid_spec("`index` must not be empty"));
    }

    check_group_names("asset", self.asset_groups.iter().map(|group| group.name.as_str()))?;
    check_group_names("data", self.data_groups.iter().map(|group| group.name.as_str()))?;

    if let Some(urls) = &self.navigation_urls {
      if urls.iter().any(|url| url.trim_start_matches('!').is_empty()) {
        return Err(ManifestError::invalid_spec("navigation URLs must not be empty"));
      }
    }

    Ok(())
  }
}

fn check_group_names<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> ManifestResult<()> {
  let mut seen = BTreeSet::new();
  for name in names {
    if name.trim().is_empty() {
      return Err(ManifestError::invalid_spec(format!("{kind} group without a name")));
    }
    if !seen.insert(name) {
      return Err(ManifestError::invalid_spec(format!(
        "duplicate {kind} group name {name:?}"
      )));
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  const MINIMAL: &str = r#"{"index": "/index.html"}"#;

  #[test]
  fn parses_minimal_config_with_defaults() {
    let config = Config::from_json_str(MINIMAL).unwrap();

    assert_eq!(config.index, "/index.html");
    assert!(config.app_data.is_none());
    assert!(config.asset_groups.is_empty());
    assert!(config.data_groups.is_empty());
    assert!(config.navigation_urls.is_none());
  }

  #[test]
  fn distinguishes_empty_navigation_from_absent() {
    let config = Config::from_json_str(r#"{"index": "/i.html", "navigationUrls": []}"#).unwrap();
    assert_eq!(config.navigation_urls, Some(Vec::new()));
  }

  #[test]
  fn parses_groups() {
    let config = Config::from_json_str(
      r#"{
        "index": "/index.html",
        "appData": {"test": true},
        "assetGroups": [{
          "name": "app",
          "installMode": "lazy",
          "resources": {"files": ["/**/*.html"], "versionedFiles": ["/**/*.js"]}
        }],
        "dataGroups": [{
          "name": "api",
          "urls": ["/api/**"],
          "cacheConfig": {"maxSize": 100, "maxAge": "3d", "timeout": "1m", "strategy": "freshness"}
        }]
      }"#,
    )
    .unwrap();

    let asset = &config.asset_groups[0];
    assert_eq!(asset.install_mode, Some(LoadMode::Lazy));
    assert_eq!(asset.update_mode, None);
    assert_eq!(asset.resources.versioned_files, vec!["/**/*.js".to_string()]);
    assert!(asset.resources.urls.is_empty());

    let data = &config.data_groups[0];
    assert_eq!(data.cache_config.max_size, 100);
    assert_eq!(data.cache_config.strategy, Some(CacheStrategy::Freshness));
    assert_eq!(config.app_data, Some(serde_json::json!({"test": true})));
  }

  #[test]
  fn missing_index_is_invalid_spec() {
    let err = Config::from_json_str(r#"{"assetGroups": []}"#).unwrap_err();
    assert!(matches!(err, ManifestError::InvalidSpec { ref message } if message.contains("index")));

    let err = Config::from_json_str(r#"{"index": " "}"#).unwrap_err();
    assert!(matches!(err, ManifestError::InvalidSpec { .. }));
  }

  #[test]
  fn rejects_unknown_modes_and_duplicate_groups() {
    let err = Config::from_json_str(
      r#"{"index": "/i.html", "assetGroups": [{"name": "a", "installMode": "eager"}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ManifestError::InvalidSpec { .. }));

    let err = Config::from_json_str(
      r#"{"index": "/i.html", "assetGroups": [{"name": "a"}, {"name": "a"}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ManifestError::InvalidSpec { ref message } if message.contains("duplicate")));
  }

  #[test]
  fn rejects_empty_navigation_entries() {
    let err = Config::from_json_str(r#"{"index": "/i.html", "navigationUrls": ["!"]}"#).unwrap_err();
    assert!(matches!(err, ManifestError::InvalidSpec { .. }));
  }

  #[test]
  fn loads_json_and_yaml_files() {
    let dir = tempdir().unwrap();
    let json_path = dir.path().join(DEFAULT_CONFIG_FILE);
    fs::write(&json_path, MINIMAL).unwrap();
    let yaml_path = dir.path().join("ngsw-config.yaml");
    fs::write(
      &yaml_path,
      "index: /index.html\nassetGroups:\n  - name: app\n    resources:\n      files: ['/**/*.html']\n",
    )
    .unwrap();

    let json = Config::from_path(&json_path).unwrap();
    let yaml = Config::from_path(&yaml_path).unwrap();

    assert_eq!(json.index, "/index.html");
    assert_eq!(yaml.asset_groups[0].resources.files, vec!["/**/*.html".to_string()]);
  }

  #[test]
  fn missing_file_is_unreadable() {
    let dir = tempdir().unwrap();
    let err = Config::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ManifestError::UnreadableFile { .. }));
  }
}

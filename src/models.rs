//! Data structures of the compiled manifest consumed by the service worker runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{CacheStrategy, LoadMode};
use crate::hashing::HashTable;

/// Schema version of the manifest format.
pub const CONFIG_VERSION: u32 = 1;

/// Version stamped on every data group.
pub const DATA_GROUP_VERSION: u32 = 1;

/// Compiled manifest, serialised as `ngsw.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
  /// Schema version, always [`CONFIG_VERSION`].
  pub config_version: u32,
  /// Application data copied from the config; omitted when not supplied.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub app_data: Option<Value>,
  /// URL of the entry document below the base href.
  pub index: String,
  /// Compiled asset groups in declaration order.
  pub asset_groups: Vec<AssetGroupManifest>,
  /// Compiled data groups in declaration order.
  pub data_groups: Vec<DataGroupManifest>,
  /// Navigation rules in declaration order.
  pub navigation_urls: Vec<NavigationUrl>,
  /// Content digests of every file listed by an asset group.
  pub hash_table: HashTable,
}

/// Asset group with its files resolved and URL patterns compiled.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGroupManifest {
  /// Group name.
  pub name: String,
  /// Effective installation mode.
  pub install_mode: LoadMode,
  /// Effective update mode.
  pub update_mode: LoadMode,
  /// Concrete file URLs, `files` matches before `versionedFiles` matches.
  pub urls: Vec<String>,
  /// Unanchored regex sources for runtime URLs.
  pub patterns: Vec<String>,
}

/// Data group with compiled patterns and durations in milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGroupManifest {
  /// Group name.
  pub name: String,
  /// Unanchored regex sources for runtime URLs.
  pub patterns: Vec<String>,
  /// Effective caching strategy.
  pub strategy: CacheStrategy,
  /// Maximum number of cached responses.
  pub max_size: u64,
  /// Maximum response age in milliseconds.
  pub max_age: u64,
  /// Network timeout in milliseconds.
  pub timeout_ms: u64,
  /// Group version, always [`DATA_GROUP_VERSION`].
  pub version: u32,
}

/// A compiled navigation rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NavigationUrl {
  /// `false` when the rule excludes matching requests.
  pub positive: bool,
  /// Anchored regex source.
  pub regex: String,
}

impl Manifest {
  /// Serialise the manifest as pretty-printed JSON.
  pub fn to_json_pretty(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(self)
  }
}

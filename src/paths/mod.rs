//! Helpers for classifying and resolving URLs against the site's base href.
//!
//! Classification (fully-qualified, site-absolute, root-relative) and joining are split into
//! focused submodules so the pattern compiler, the file matcher and the builder share exactly the
//! same rules.

mod classify;
mod join;

pub use classify::{UrlKind, classify_url, resolve_url};
pub use join::join_urls;

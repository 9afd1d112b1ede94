//! Translation of config globs into regular expression sources understood by the runtime.
//!
//! The output is a regex *source* string, not a compiled matcher: the manifest ships it verbatim
//! and the caching runtime builds its own matcher from it. The same rules serve both anchoring
//! modes so asset, data and navigation patterns can never drift apart.

use crate::paths::resolve_url;

/// Matches a run of characters inside a single path segment.
const WILD_SINGLE: &str = r"[^\/]*";
/// Matches zero or more whole directories, used for a `**` segment followed by more segments.
const WILD_OPEN: &str = r"(?:.+\/)?";
/// Matches everything that follows, used for a trailing `**` segment.
const WILD_TAIL: &str = ".*";
const SEPARATOR: &str = r"\/";

/// Whether the compiled expression must match the whole input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchoring {
  /// Emitted as-is; used for asset and data group URL patterns.
  Unanchored,
  /// Wrapped in `^...$`; used for navigation rules and file matching.
  Anchored,
}

/// Compile a glob into a regular expression source.
///
/// The glob is processed segment by segment (split on `/`):
/// * a segment consisting solely of `**` spans any number of directories,
/// * `*` inside a segment matches anything but the separator; `**` sharing a segment with other
///   characters (`/assets/**.js`) is two such wildcards and never crosses a separator,
/// * regex metacharacters are escaped so they match literally.
pub fn glob_to_regex(glob: &str, anchoring: Anchoring) -> String {
  let segments: Vec<&str> = glob.split('/').collect();
  let last = segments.len() - 1;

  let mut regex = String::with_capacity(glob.len() * 2 + 2);
  if anchoring == Anchoring::Anchored {
    regex.push('^');
  }

  for (index, segment) in segments.iter().enumerate() {
    let is_last = index == last;
    if *segment == "**" {
      regex.push_str(if is_last { WILD_TAIL } else { WILD_OPEN });
      continue;
    }

    push_segment(&mut regex, segment);
    if !is_last {
      regex.push_str(SEPARATOR);
    }
  }

  if anchoring == Anchoring::Anchored {
    regex.push('$');
  }
  regex
}

/// Resolve a config URL against the base href, then compile it.
pub fn url_to_regex(url: &str, base_href: &str, anchoring: Anchoring) -> String {
  glob_to_regex(&resolve_url(url, base_href), anchoring)
}

fn push_segment(regex: &mut String, segment: &str) {
  for ch in segment.chars() {
    match ch {
      '*' => regex.push_str(WILD_SINGLE),
      '.' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\' => {
        regex.push('\\');
        regex.push(ch);
      }
      _ => regex.push(ch),
    }
  }
}

//! Human readable durations (`3d`, `1m`, `1d12h`) parsed into milliseconds.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ManifestError, ManifestResult};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

fn duration_pair() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  // `ms` must precede the single-letter units so `10ms` is not read as minutes.
  PATTERN.get_or_init(|| Regex::new(r"^([0-9]+)(ms|[dhmsu])").expect("invalid duration regex"))
}

fn unit_factor(unit: &str) -> Option<u64> {
  match unit {
    "d" => Some(MS_PER_DAY),
    "h" => Some(MS_PER_HOUR),
    "m" => Some(MS_PER_MINUTE),
    "s" => Some(MS_PER_SECOND),
    "ms" | "u" => Some(1),
    _ => None,
  }
}

/// Parse a duration made of one or more `<integer><unit>` pairs into milliseconds.
///
/// Units are `d`, `h`, `m`, `s` and `ms` (`u` is accepted as a milliseconds alias). Pairs are
/// summed, so `1d12h` is a day and a half.
pub fn parse_duration_ms(value: &str) -> ManifestResult<u64> {
  if value.is_empty() {
    return Err(ManifestError::invalid_duration(value));
  }

  let mut rest = value;
  let mut total: u64 = 0;
  while !rest.is_empty() {
    let captures = duration_pair()
      .captures(rest)
      .ok_or_else(|| ManifestError::invalid_duration(value))?;

    let magnitude: u64 = captures[1]
      .parse()
      .map_err(|_| ManifestError::invalid_duration(value))?;
    let factor = unit_factor(&captures[2]).ok_or_else(|| ManifestError::invalid_duration(value))?;

    total = magnitude
      .checked_mul(factor)
      .and_then(|ms| total.checked_add(ms))
      .ok_or_else(|| ManifestError::invalid_duration(value))?;

    rest = &rest[captures[0].len()..];
  }

  Ok(total)
}

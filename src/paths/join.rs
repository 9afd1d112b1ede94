/// Join two URL fragments with exactly one `/` between them.
///
/// Used to place listing paths and the index document under the base href, where both sides may
/// or may not carry the separator.
pub fn join_urls(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

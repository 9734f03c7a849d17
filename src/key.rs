//! Key header (`[HKEY_...\path]`) recognition.

use crate::hive::Hive;

/// Extracts `(hive, key path)` from a key header line.
///
/// The line must be `[`, a recognized hive name, `\`, a non-empty path and a
/// closing `]` with nothing after it. Anything else returns `None` so the
/// caller can try the line as a value instead.
///
/// # Examples
///
/// ```rust
/// use reg_export::{key::parse_key_header, Hive};
///
/// let (hive, path) = parse_key_header(r"[HKEY_CURRENT_USER\Software\Test]").unwrap();
/// assert_eq!(hive, Hive::CurrentUser);
/// assert_eq!(path, r"Software\Test");
/// ```
pub fn parse_key_header(line: &str) -> Option<(Hive, String)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    let (hive_name, path) = inner.split_once('\\')?;

    if path.is_empty() {
        return None;
    }

    let hive = Hive::from_name(hive_name)?;
    Some((hive, path.to_string()))
}

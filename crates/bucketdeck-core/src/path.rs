//! Storage path helpers.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left as-is inside one path segment.
///
/// Matches the unreserved set of `encodeURIComponent`: alphanumerics and
/// `- _ . ! ~ * ' ( )`.
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a storage path segment by segment, keeping `/` separators.
///
/// `a/b c#d` becomes `a/b%20c%23d`.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT_ENCODE_SET).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// The last non-empty segment of a path (`docs/a.txt` -> `a.txt`, `docs/sub/` -> `sub`).
pub fn file_name(path: &str) -> &str {
    path.split('/').filter(|s| !s.is_empty()).next_back().unwrap_or("")
}

/// Append a name to a folder prefix.
///
/// The prefix is used verbatim; an empty prefix means the bucket root.
pub fn join_prefix(prefix: &str, name: &str) -> String {
    format!("{prefix}{name}")
}

/// Full destination key for copying or moving `source` into `dest_dir`.
pub fn copy_destination(source: &str, dest_dir: &str, is_folder: bool) -> String {
    let mut destination = dest_dir.to_string();
    if !destination.ends_with('/') {
        destination.push('/');
    }
    destination.push_str(file_name(source));
    if is_folder {
        destination.push('/');
    }
    destination
}

/// Browser location of the folder containing `prefix`.
///
/// Folder prefixes carry a trailing slash, so the last two `/`-separated
/// components are dropped: `a/b/` -> `/a`, `a/` -> `/`.
pub fn parent_location(prefix: &str) -> String {
    let parts: Vec<&str> = prefix.split('/').collect();
    let keep = parts.len().saturating_sub(2);
    let parent = parts[..keep].join("/");
    if parent.is_empty() {
        "/".to_string()
    } else {
        format!("/{parent}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path_preserves_separators() {
        assert_eq!(encode_path("a/b c#d"), "a/b%20c%23d");
        assert_eq!(encode_path("what?/x&y.txt"), "what%3F/x%26y.txt");
    }

    #[test]
    fn test_encode_path_keeps_unreserved_marks() {
        assert_eq!(encode_path("it's (1)!~*.txt"), "it's%20(1)!~*.txt");
    }

    #[test]
    fn test_encode_path_utf8() {
        assert_eq!(encode_path("文档/a.txt"), "%E6%96%87%E6%A1%A3/a.txt");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("docs/a.txt"), "a.txt");
        assert_eq!(file_name("docs/sub/"), "sub");
        assert_eq!(file_name(""), "");
    }

    #[test]
    fn test_copy_destination() {
        assert_eq!(copy_destination("docs/a.txt", "backup", false), "backup/a.txt");
        assert_eq!(copy_destination("docs/sub/", "backup/", true), "backup/sub/");
    }

    #[test]
    fn test_parent_location() {
        assert_eq!(parent_location("a/b/"), "/a");
        assert_eq!(parent_location("a/"), "/");
        assert_eq!(parent_location("a/b/c/"), "/a/b");
    }
}

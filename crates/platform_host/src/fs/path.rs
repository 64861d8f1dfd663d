//! Virtual-path helpers used by the file tree and its navigation callers.

/// Normalizes a virtual filesystem path.
///
/// This helper trims whitespace, converts backslashes to `/`, resolves `.`/`..`, ensures a
/// leading slash, and returns `/` for empty or fully-collapsed paths.
pub fn normalize_virtual_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "/".to_string();
    }

    let mut out = String::new();
    for segment in trimmed.replace('\\', "/").split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." {
            if let Some(idx) = out.rfind('/') {
                out.truncate(idx);
            }
            continue;
        }
        out.push('/');
        out.push_str(segment);
    }

    if out.is_empty() {
        "/".to_string()
    } else {
        out
    }
}

/// Splits a path into its normalized, non-empty segments. The root path yields no segments.
pub fn virtual_path_segments(path: &str) -> Vec<String> {
    normalize_virtual_path(path)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Appends `name` to the directory `parent`, normalizing the result.
pub fn join_virtual_path(parent: &str, name: &str) -> String {
    normalize_virtual_path(&format!("{}/{}", normalize_virtual_path(parent), name))
}

/// Returns the parent directory of `path`; the parent of `/` is `/`.
pub fn parent_virtual_path(path: &str) -> String {
    normalize_virtual_path(&format!("{}/..", normalize_virtual_path(path)))
}

/// Case-insensitive comparison used for sibling-name lookup.
pub fn names_match(left: &str, right: &str) -> bool {
    left == right || left.to_lowercase() == right.to_lowercase()
}

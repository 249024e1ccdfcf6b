use std::path::{Component, Path, PathBuf};

/// Resolves a path against a base directory and normalizes it lexically.
///
/// Relative paths are joined onto `base`; `.` segments are dropped and `..`
/// segments are resolved without touching the filesystem, so the target does
/// not have to exist. Trailing separators disappear as a side effect of
/// component iteration.
#[must_use]
pub fn normalize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // Lexical parent: never pop past the root
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push(component.as_os_str());
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Renders a path with forward slashes regardless of platform.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Strips a single leading `./` from a raw path string.
#[must_use]
pub fn trim_dot_slash(raw: &str) -> &str {
    raw.strip_prefix("./").unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_relative() {
        let base = Path::new("/work");
        assert_eq!(
            normalize(base, Path::new("src/a.ts")),
            PathBuf::from("/work/src/a.ts")
        );
        assert_eq!(
            normalize(base, Path::new("./src/a.ts")),
            PathBuf::from("/work/src/a.ts")
        );
    }

    #[test]
    fn test_normalize_absolute_untouched_by_base() {
        let base = Path::new("/work");
        assert_eq!(
            normalize(base, Path::new("/other/file")),
            PathBuf::from("/other/file")
        );
    }

    #[test]
    fn test_normalize_parent_segments() {
        let base = Path::new("/work/sub");
        assert_eq!(
            normalize(base, Path::new("../lib/x.rs")),
            PathBuf::from("/work/lib/x.rs")
        );
        assert_eq!(normalize(base, Path::new("../../..")), PathBuf::from("/"));
    }

    #[test]
    fn test_normalize_strips_trailing_separator() {
        let base = Path::new("/work");
        assert_eq!(normalize(base, Path::new("lib/")), PathBuf::from("/work/lib"));
    }

    #[test]
    fn test_trim_dot_slash() {
        assert_eq!(trim_dot_slash("./src/a.ts"), "src/a.ts");
        assert_eq!(trim_dot_slash("src/a.ts"), "src/a.ts");
    }
}

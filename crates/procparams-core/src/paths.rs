//! Embedded file references relative to a profile's location.

use std::path::{Path, PathBuf};

/// Directory that embedded file references are resolved against.
///
/// Saving with a base directory rewrites absolute paths inside it as
/// relative ones; loading with a base directory turns relative paths back
/// into absolute ones. Without a base directory paths pass through.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathContext<'a> {
    base_dir: Option<&'a Path>,
}

impl<'a> PathContext<'a> {
    /// Leave every path as it is.
    pub fn verbatim() -> Self {
        Self { base_dir: None }
    }

    pub fn with_base(base_dir: &'a Path) -> Self {
        Self {
            base_dir: Some(base_dir),
        }
    }

    /// Context for saving to `dest`: the destination's directory when
    /// relativizing and `dest` is absolute.
    pub fn for_save(dest: &'a Path, relativize: bool) -> Self {
        if !relativize || !dest.is_absolute() {
            return Self::verbatim();
        }
        Self {
            base_dir: dest.parent(),
        }
    }

    /// Context for loading `source`: its directory when `source` is absolute.
    pub fn for_load(source: &'a Path) -> Self {
        if !source.is_absolute() {
            return Self::verbatim();
        }
        Self {
            base_dir: source.parent(),
        }
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir
    }

    /// Rewrite an absolute path inside the base directory as a relative one.
    pub fn relativize(&self, path: &Path) -> PathBuf {
        match self.base_dir {
            Some(base) if path.is_absolute() => match path.strip_prefix(base) {
                Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
                _ => path.to_path_buf(),
            },
            _ => path.to_path_buf(),
        }
    }

    /// Resolve a relative, non-empty path against the base directory.
    pub fn expand(&self, path: &Path) -> PathBuf {
        match self.base_dir {
            Some(base) if path.is_relative() && !path.as_os_str().is_empty() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relativize_inside_base() {
        let ctx = PathContext::with_base(Path::new("/photos/2024"));
        assert_eq!(
            ctx.relativize(Path::new("/photos/2024/darks/iso800.dng")),
            PathBuf::from("darks/iso800.dng")
        );
    }

    #[test]
    fn test_relativize_outside_base_stays_absolute() {
        let ctx = PathContext::with_base(Path::new("/photos/2024"));
        assert_eq!(
            ctx.relativize(Path::new("/photos/2024-old/flat.dng")),
            PathBuf::from("/photos/2024-old/flat.dng")
        );
    }

    #[test]
    fn test_expand_relative_only() {
        let ctx = PathContext::with_base(Path::new("/photos"));
        assert_eq!(
            ctx.expand(Path::new("darks/a.dng")),
            PathBuf::from("/photos/darks/a.dng")
        );
        assert_eq!(ctx.expand(Path::new("/abs/a.dng")), PathBuf::from("/abs/a.dng"));
        assert_eq!(ctx.expand(Path::new("")), PathBuf::new());
    }

    #[test]
    fn test_for_save_requires_absolute_destination() {
        assert!(PathContext::for_save(Path::new("rel.pp3"), true)
            .base_dir()
            .is_none());
        assert!(PathContext::for_save(Path::new("/a/b.pp3"), false)
            .base_dir()
            .is_none());
        assert_eq!(
            PathContext::for_save(Path::new("/a/b.pp3"), true).base_dir(),
            Some(Path::new("/a"))
        );
    }

    #[test]
    fn test_verbatim_passes_through() {
        let ctx = PathContext::verbatim();
        assert_eq!(ctx.expand(Path::new("x")), PathBuf::from("x"));
        assert_eq!(ctx.relativize(Path::new("/x")), PathBuf::from("/x"));
    }
}

use blog_kit_core::ImageAsset;
use image::ImageReader;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("remote images are not supported: '{0}'")]
    Remote(String),

    #[error("'{0}' resolves outside the site directory")]
    OutsideRoot(String),

    #[error("image not found: '{0}'")]
    NotFound(String),

    #[error("unrecognized image format: '{0}'")]
    UnknownFormat(String),

    #[error("could not read image '{path}': {reason}")]
    Unreadable { path: String, reason: String },
}

/// Turns an image reference from front matter into a resolved asset
pub trait ImageResolver {
    fn resolve(&self, src: &str) -> Result<ImageAsset, ImageError>;
}

/// Resolves local image files.
///
/// Relative references are taken from the content file's directory, a
/// leading `/` from the site root. The resolved file must stay inside the
/// site root.
#[derive(Debug, Clone)]
pub struct FsImageResolver {
    site_root: PathBuf,
    base_dir: PathBuf,
}

impl FsImageResolver {
    pub fn new(site_root: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            site_root: site_root.into(),
            base_dir: base_dir.into(),
        }
    }
}

impl ImageResolver for FsImageResolver {
    fn resolve(&self, src: &str) -> Result<ImageAsset, ImageError> {
        let trimmed = src.trim();
        if trimmed.contains("://") || trimmed.starts_with("//") {
            return Err(ImageError::Remote(src.to_string()));
        }

        let candidate = match trimmed.strip_prefix('/') {
            Some(from_root) => self.site_root.join(from_root),
            None => self.base_dir.join(trimmed),
        };

        let root = self
            .site_root
            .canonicalize()
            .map_err(|_| ImageError::NotFound(self.site_root.display().to_string()))?;
        let path = candidate
            .canonicalize()
            .map_err(|_| ImageError::NotFound(src.to_string()))?;

        if !path.starts_with(&root) {
            return Err(ImageError::OutsideRoot(src.to_string()));
        }

        let unreadable = |e: &dyn std::fmt::Display| ImageError::Unreadable {
            path: src.to_string(),
            reason: e.to_string(),
        };

        let reader = ImageReader::open(&path)
            .map_err(|e| unreadable(&e))?
            .with_guessed_format()
            .map_err(|e| unreadable(&e))?;
        let format = reader
            .format()
            .ok_or_else(|| ImageError::UnknownFormat(src.to_string()))?;
        let (width, height) = reader.into_dimensions().map_err(|e| unreadable(&e))?;

        let extension = format
            .extensions_str()
            .first()
            .copied()
            .unwrap_or("bin")
            .to_string();

        Ok(ImageAsset {
            src: site_relative(&path, &root),
            width,
            height,
            format: extension,
        })
    }
}

/// `path` relative to `root`, with `/` separators on every platform
fn site_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Site root with `src/content/blog` and `src/assets/hero.png` (4x3)
    fn create_site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/content/blog")).unwrap();
        fs::create_dir_all(dir.path().join("src/assets")).unwrap();
        image::RgbImage::new(4, 3)
            .save(dir.path().join("src/assets/hero.png"))
            .unwrap();
        dir
    }

    fn resolver(site: &TempDir) -> FsImageResolver {
        FsImageResolver::new(site.path(), site.path().join("src/content/blog"))
    }

    #[test]
    fn test_resolves_relative_to_content_file() {
        let site = create_site();
        let asset = resolver(&site).resolve("../../assets/hero.png").unwrap();

        assert_eq!(asset.src, "src/assets/hero.png");
        assert_eq!(asset.width, 4);
        assert_eq!(asset.height, 3);
        assert_eq!(asset.format, "png");
    }

    #[test]
    fn test_leading_slash_is_site_root() {
        let site = create_site();
        let asset = resolver(&site).resolve("/src/assets/hero.png").unwrap();
        assert_eq!(asset.src, "src/assets/hero.png");
    }

    #[test]
    fn test_rejects_remote_images() {
        let site = create_site();
        let result = resolver(&site).resolve("https://cdn.example.com/hero.png");
        assert!(matches!(result, Err(ImageError::Remote(_))));
    }

    #[test]
    fn test_rejects_paths_outside_site() {
        let outer = TempDir::new().unwrap();
        let site = outer.path().join("site");
        fs::create_dir_all(site.join("src/content/blog")).unwrap();
        image::RgbImage::new(2, 2)
            .save(outer.path().join("secret.png"))
            .unwrap();

        let resolver = FsImageResolver::new(&site, site.join("src/content/blog"));
        let result = resolver.resolve("../../../secret.png");
        assert!(matches!(result, Err(ImageError::OutsideRoot(_))));
    }

    #[test]
    fn test_missing_file() {
        let site = create_site();
        let result = resolver(&site).resolve("./nope.png");
        assert!(matches!(result, Err(ImageError::NotFound(_))));
    }

    #[test]
    fn test_non_image_file() {
        let site = create_site();
        fs::write(site.path().join("src/content/blog/notes.txt"), "just text").unwrap();
        let result = resolver(&site).resolve("./notes.txt");
        assert!(matches!(result, Err(ImageError::UnknownFormat(_))));
    }

    #[test]
    fn test_corrupt_image_file() {
        let site = create_site();
        fs::write(site.path().join("src/content/blog/broken.png"), "not a png").unwrap();
        let result = resolver(&site).resolve("./broken.png");
        assert!(matches!(result, Err(ImageError::Unreadable { .. })));
    }
}

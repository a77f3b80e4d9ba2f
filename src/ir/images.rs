//! Locating image files and reading their dimensions.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::VockitError;

/// Image extensions in lookup priority order.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

const VOC_XML_EXTENSION: &str = "xml";

/// Finds the image whose file stem is `stem`.
///
/// Each lower-case extension in [`IMAGE_EXTENSIONS`] is tried in order and
/// the first existing file wins. If none exists, the directory is scanned
/// for an exact stem match with a case-insensitive extension (`IMG.JPG`);
/// the first match in directory iteration order is returned.
pub fn resolve_image(images_dir: &Path, stem: &str) -> Result<Option<PathBuf>, VockitError> {
    for ext in IMAGE_EXTENSIONS {
        let candidate = images_dir.join(format!("{stem}.{ext}"));
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
    }

    for entry in fs::read_dir(images_dir)? {
        let path = entry?.path();
        if path.is_file()
            && path.file_stem().and_then(|s| s.to_str()) == Some(stem)
            && has_extension(&path, IMAGE_EXTENSIONS)
        {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

/// Reads pixel dimensions from the image header.
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32), VockitError> {
    let size = imagesize::size(path).map_err(|source| VockitError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let width: u32 = size.width.try_into().map_err(|_| {
        VockitError::Io(std::io::Error::other(format!(
            "image width {} of {} does not fit in u32",
            size.width,
            path.display()
        )))
    })?;
    let height: u32 = size.height.try_into().map_err(|_| {
        VockitError::Io(std::io::Error::other(format!(
            "image height {} of {} does not fit in u32",
            size.height,
            path.display()
        )))
    })?;

    Ok((width, height))
}

/// Stems of image files directly inside `dir`.
pub fn list_image_stems(dir: &Path) -> Result<BTreeSet<String>, VockitError> {
    list_stems(dir, IMAGE_EXTENSIONS)
}

/// Stems of `.xml` files directly inside `dir`.
pub fn list_annotation_stems(dir: &Path) -> Result<BTreeSet<String>, VockitError> {
    list_stems(dir, &[VOC_XML_EXTENSION])
}

fn list_stems(dir: &Path, extensions: &[&str]) -> Result<BTreeSet<String>, VockitError> {
    let mut stems = BTreeSet::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !has_extension(&path, extensions) {
            continue;
        }
        if let Some(stem) = path.file_stem() {
            stems.insert(stem.to_string_lossy().into_owned());
        }
    }

    Ok(stems)
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_extension_order() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("img.png"), b"png").expect("write png");
        fs::write(temp.path().join("img.jpg"), b"jpg").expect("write jpg");

        let found = resolve_image(temp.path(), "img").expect("resolve");
        assert_eq!(found, Some(temp.path().join("img.jpg")));
    }

    #[test]
    fn resolve_falls_back_to_case_insensitive_scan() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("IMG_01.JPG"), b"jpg").expect("write jpg");
        fs::write(temp.path().join("IMG_01.txt"), b"txt").expect("write txt");

        let found = resolve_image(temp.path(), "IMG_01").expect("resolve");
        let name = found
            .as_deref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(str::to_ascii_lowercase);
        assert_eq!(name.as_deref(), Some("img_01.jpg"));

        assert_eq!(resolve_image(temp.path(), "img_02").expect("resolve"), None);
    }

    #[test]
    fn stem_lists_filter_by_extension() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("a.jpg"), b"").expect("write");
        fs::write(temp.path().join("b.WEBP"), b"").expect("write");
        fs::write(temp.path().join("c.gif"), b"").expect("write");
        fs::write(temp.path().join("a.xml"), b"").expect("write");
        fs::create_dir(temp.path().join("d.jpg")).expect("create dir");

        let images = list_image_stems(temp.path()).expect("list images");
        assert_eq!(images.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);

        let xml = list_annotation_stems(temp.path()).expect("list xml");
        assert_eq!(xml.into_iter().collect::<Vec<_>>(), vec!["a"]);
    }
}

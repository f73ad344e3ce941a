use crate::error::{SceneError, SceneResult};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Asset types that can be loaded
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    Image(ImageAsset),
    Svg(SvgAsset),
}

/// Raster image asset
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Vector asset; dimensions come from the document's viewBox or size attributes
#[derive(Debug, Clone, PartialEq)]
pub struct SvgAsset {
    pub path: PathBuf,
    pub width: f64,
    pub height: f64,
}

const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Display label encoded in a file name: everything before the first `.`,
/// underscores read as spaces (`Alan_Turing.jpg` -> `Alan Turing`).
pub fn derive_label(file_name: &str) -> String {
    let stem = file_name.split('.').next().unwrap_or_default();
    stem.split('_').collect::<Vec<_>>().join(" ")
}

/// Asset loader that manages loading and caching of assets
pub struct AssetLoader {
    assets: HashMap<PathBuf, Asset>,
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with a base path for resolving relative paths
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            assets: HashMap::new(),
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load every asset in `dir`, keyed by its derived label.
    ///
    /// Fails on the first file that cannot be read. Subdirectories and hidden
    /// files are skipped.
    pub fn scan(&mut self, dir: &Path) -> SceneResult<BTreeMap<String, Asset>> {
        let full_dir = self.resolve_path(dir);
        if !full_dir.is_dir() {
            return Err(SceneError::NotFound(full_dir));
        }

        let mut entries: Vec<PathBuf> = std::fs::read_dir(&full_dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()?;
        entries.sort();

        let mut labelled = BTreeMap::new();
        for path in entries {
            if path.is_dir() {
                continue;
            }
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| SceneError::unreadable(&path, "non UTF-8 file name"))?;
            if name.starts_with('.') {
                continue;
            }
            let label = derive_label(name);
            if labelled.contains_key(&label) {
                return Err(SceneError::DuplicateLabel { label, path });
            }
            let asset = self.load(&path)?;
            labelled.insert(label, asset);
        }

        debug!(dir = %full_dir.display(), count = labelled.len(), "scanned asset directory");
        Ok(labelled)
    }

    /// Load an image or SVG, choosing by extension
    pub fn load(&mut self, path: &Path) -> SceneResult<Asset> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("svg") => self.load_svg(path).map(|s| Asset::Svg(s.clone())),
            Some(e) if RASTER_EXTENSIONS.contains(&e) => {
                self.load_image(path).map(|i| Asset::Image(i.clone()))
            }
            _ => Err(SceneError::UnsupportedAsset(self.resolve_path(path))),
        }
    }

    /// Load a raster image, reading its dimensions from the file header
    pub fn load_image(&mut self, path: &Path) -> SceneResult<&ImageAsset> {
        let full_path = self.resolve_path(path);

        if !self.assets.contains_key(&full_path) {
            if !full_path.exists() {
                return Err(SceneError::NotFound(full_path));
            }

            let (width, height) = image::image_dimensions(&full_path)
                .map_err(|e| SceneError::unreadable(&full_path, e))?;

            let asset = Asset::Image(ImageAsset {
                path: full_path.clone(),
                width,
                height,
            });
            debug!(path = %full_path.display(), width, height, "loaded image");
            self.assets.insert(full_path.clone(), asset);
        }

        match self.assets.get(&full_path) {
            Some(Asset::Image(img)) => Ok(img),
            _ => Err(SceneError::unreadable(&full_path, "asset is not an image")),
        }
    }

    /// Load an SVG document
    pub fn load_svg(&mut self, path: &Path) -> SceneResult<&SvgAsset> {
        let full_path = self.resolve_path(path);

        if !self.assets.contains_key(&full_path) {
            if !full_path.exists() {
                return Err(SceneError::NotFound(full_path));
            }

            let text = std::fs::read_to_string(&full_path)
                .map_err(|e| SceneError::unreadable(&full_path, e))?;
            let (width, height) = svg_dimensions(&text)
                .ok_or_else(|| SceneError::unreadable(&full_path, "no <svg> element"))?;

            let asset = Asset::Svg(SvgAsset {
                path: full_path.clone(),
                width,
                height,
            });
            debug!(path = %full_path.display(), width, height, "loaded svg");
            self.assets.insert(full_path.clone(), asset);
        }

        match self.assets.get(&full_path) {
            Some(Asset::Svg(svg)) => Ok(svg),
            _ => Err(SceneError::unreadable(&full_path, "asset is not an svg")),
        }
    }

    /// Resolve a path relative to the base path
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Get statistics about loaded assets
    pub fn stats(&self) -> AssetStats {
        let mut images = 0;
        let mut svgs = 0;

        for asset in self.assets.values() {
            match asset {
                Asset::Image(_) => images += 1,
                Asset::Svg(_) => svgs += 1,
            }
        }

        AssetStats {
            total: self.assets.len(),
            images,
            svgs,
        }
    }

    /// Clear all loaded assets from memory
    pub fn clear(&mut self) {
        self.assets.clear();
    }
}

fn svg_dimensions(text: &str) -> Option<(f64, f64)> {
    static TAG: OnceLock<Regex> = OnceLock::new();
    static VIEW_BOX: OnceLock<Regex> = OnceLock::new();
    static WIDTH: OnceLock<Regex> = OnceLock::new();
    static HEIGHT: OnceLock<Regex> = OnceLock::new();

    let tag_re = TAG.get_or_init(|| Regex::new(r"(?s)<svg\b[^>]*>").expect("static regex"));
    let tag = tag_re.find(text)?.as_str();

    let view_box = VIEW_BOX.get_or_init(|| {
        Regex::new(r#"viewBox\s*=\s*"\s*[-\d.]+[\s,]+[-\d.]+[\s,]+([\d.]+)[\s,]+([\d.]+)\s*""#)
            .expect("static regex")
    });
    if let Some(caps) = view_box.captures(tag) {
        let w = caps[1].parse().ok()?;
        let h = caps[2].parse().ok()?;
        return Some((w, h));
    }

    let width_re =
        WIDTH.get_or_init(|| Regex::new(r#"\bwidth\s*=\s*"([\d.]+)"#).expect("static regex"));
    let height_re =
        HEIGHT.get_or_init(|| Regex::new(r#"\bheight\s*=\s*"([\d.]+)"#).expect("static regex"));
    let w = width_re
        .captures(tag)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(1.0);
    let h = height_re
        .captures(tag)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(1.0);
    Some((w, h))
}

/// Statistics about loaded assets
#[derive(Debug, Clone)]
pub struct AssetStats {
    pub total: usize,
    pub images: usize,
    pub svgs: usize,
}

impl std::fmt::Display for AssetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total: {}, Images: {}, SVGs: {}",
            self.total, self.images, self.svgs
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    pub(crate) fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn test_derive_label() {
        assert_eq!(derive_label("Alan_Turing.jpg"), "Alan Turing");
        assert_eq!(derive_label("Alonzo_Church.jpg"), "Alonzo Church");
        assert_eq!(derive_label("Kurt_Godel.tar.png"), "Kurt Godel");
        assert_eq!(derive_label("Euclid"), "Euclid");
    }

    #[test]
    fn test_scan_labels_every_file() {
        let temp_dir = TempDir::new().unwrap();
        write_png(&temp_dir.path().join("Alan_Turing.png"), 4, 6);
        write_png(&temp_dir.path().join("Alonzo_Church.png"), 4, 6);

        let mut loader = AssetLoader::new(temp_dir.path());
        let assets = loader.scan(Path::new(".")).unwrap();

        let labels: Vec<_> = assets.keys().cloned().collect();
        assert_eq!(labels, vec!["Alan Turing", "Alonzo Church"]);
        assert!(matches!(
            &assets["Alan Turing"],
            Asset::Image(ImageAsset { width: 4, height: 6, .. })
        ));
    }

    #[test]
    fn test_scan_skips_hidden_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        write_png(&temp_dir.path().join("Emil_Post.png"), 2, 2);
        fs::write(temp_dir.path().join(".DS_Store"), b"junk").unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();

        let mut loader = AssetLoader::new(temp_dir.path());
        let assets = loader.scan(temp_dir.path()).unwrap();
        assert_eq!(assets.len(), 1);
    }

    #[test]
    fn test_scan_rejects_duplicate_labels() {
        let temp_dir = TempDir::new().unwrap();
        write_png(&temp_dir.path().join("Alan_Turing.jpg"), 2, 2);
        write_png(&temp_dir.path().join("Alan_Turing.png"), 2, 2);

        let mut loader = AssetLoader::new(temp_dir.path());
        match loader.scan(temp_dir.path()) {
            Err(SceneError::DuplicateLabel { label, path }) => {
                assert_eq!(label, "Alan Turing");
                assert_eq!(path, temp_dir.path().join("Alan_Turing.png"));
            }
            other => panic!("expected duplicate label, got {:?}", other),
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_scan_rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let name = OsStr::from_bytes(b"Emil_\xffPost.png");
        write_png(&temp_dir.path().join(name), 2, 2);

        let mut loader = AssetLoader::new(temp_dir.path());
        assert!(matches!(
            loader.scan(temp_dir.path()),
            Err(SceneError::UnreadableAsset { .. })
        ));
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = AssetLoader::new(temp_dir.path());
        let result = loader.scan(Path::new("mathematicians"));
        assert!(matches!(result, Err(SceneError::NotFound(_))));
    }

    #[test]
    fn test_scan_fails_fast_on_corrupt_image() {
        let temp_dir = TempDir::new().unwrap();
        write_png(&temp_dir.path().join("Alan_Turing.png"), 2, 2);
        fs::write(temp_dir.path().join("Broken.jpg"), b"not a jpeg").unwrap();

        let mut loader = AssetLoader::new(temp_dir.path());
        let result = loader.scan(temp_dir.path());
        assert!(matches!(result, Err(SceneError::UnreadableAsset { .. })));
    }

    #[test]
    fn test_scan_rejects_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), b"hello").unwrap();

        let mut loader = AssetLoader::new(temp_dir.path());
        assert!(matches!(
            loader.scan(temp_dir.path()),
            Err(SceneError::UnsupportedAsset(_))
        ));
    }

    #[test]
    fn test_load_nonexistent_image() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = AssetLoader::new(temp_dir.path());

        let result = loader.load_image(Path::new("nonexistent.png"));
        assert!(matches!(result, Err(SceneError::NotFound(_))));
    }

    #[test]
    fn test_asset_caching() {
        let temp_dir = TempDir::new().unwrap();
        write_png(&temp_dir.path().join("cached.png"), 3, 3);

        let mut loader = AssetLoader::new(temp_dir.path());

        loader.load_image(Path::new("cached.png")).unwrap();
        let stats1 = loader.stats();

        loader.load_image(Path::new("cached.png")).unwrap();
        let stats2 = loader.stats();

        assert_eq!(stats1.total, stats2.total);
        assert_eq!(stats2.total, 1);

        loader.clear();
        assert_eq!(loader.stats().total, 0);
    }

    #[test]
    fn test_resolve_path() {
        let loader = AssetLoader::new("/base");
        let abs_path = PathBuf::from("/absolute/path.png");
        assert_eq!(loader.resolve_path(&abs_path), abs_path);
        assert_eq!(
            loader.resolve_path(Path::new("relative/path.png")),
            PathBuf::from("/base/relative/path.png")
        );
    }

    #[test]
    fn test_load_svg_view_box() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("CPU.svg"),
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 32"><rect/></svg>"#,
        )
        .unwrap();

        let mut loader = AssetLoader::new(temp_dir.path());
        let svg = loader.load_svg(Path::new("CPU.svg")).unwrap();
        assert_eq!((svg.width, svg.height), (64.0, 32.0));
        assert_eq!(loader.stats().svgs, 1);
    }

    #[test]
    fn test_svg_dimensions_from_attributes() {
        assert_eq!(
            svg_dimensions(r#"<svg width="10" height="20"></svg>"#),
            Some((10.0, 20.0))
        );
        assert_eq!(svg_dimensions("<html></html>"), None);
    }

    #[test]
    fn test_asset_stats_display() {
        let stats = AssetStats {
            total: 10,
            images: 7,
            svgs: 3,
        };
        let display = format!("{}", stats);
        assert!(display.contains("Total: 10"));
        assert!(display.contains("Images: 7"));
        assert!(display.contains("SVGs: 3"));
    }
}

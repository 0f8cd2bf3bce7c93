use cardsmith_core::error::AppError;
use image::imageops::FilterType;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filename suffix appended to every derived image, encoding the transform
/// parameters (e.g. `_resized_400_50`).
pub fn derived_suffix(width: u32, quality: u8) -> String {
    format!("_resized_{}_{}", width, quality)
}

/// Returns true when a path names a transform output (its stem ends with a
/// `_resized_{width}_{quality}` suffix for any width/quality).
///
/// The resize stage uses this to skip its own outputs, so re-running over
/// the same directory does not resize already-derived files.
pub fn is_derived(path: &Path) -> bool {
    let stem = match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => stem,
        None => return false,
    };
    match stem.rsplit_once("_resized_") {
        Some((_, params)) => {
            let mut parts = params.split('_');
            let width_ok = parts.next().is_some_and(|w| w.parse::<u32>().is_ok());
            let quality_ok = parts.next().is_some_and(|q| q.parse::<u8>().is_ok());
            width_ok && quality_ok && parts.next().is_none()
        }
        None => false,
    }
}

/// Rescales card images to a target width and re-encodes them at a target
/// quality.
///
/// The transform preserves aspect ratio exactly as computed from the source
/// dimensions: `height = round(width * source_height / source_width)`.
/// Output goes next to the source with the transform parameters encoded in
/// the name; the source file is never modified or deleted.
pub struct ImageTransformer {
    width: u32,
    quality: u8,
}

impl ImageTransformer {
    /// Creates a transformer for the given target width and encoder quality.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidConfig` when `width` is zero or `quality`
    /// is outside the encoder's accepted 1-100 range.
    pub fn new(width: u32, quality: u8) -> Result<Self, AppError> {
        if width == 0 {
            return Err(AppError::InvalidConfig(
                "target width must be positive".to_string(),
            ));
        }
        if !(1..=100).contains(&quality) {
            return Err(AppError::InvalidConfig(format!(
                "quality must be in 1-100, got {}",
                quality
            )));
        }
        Ok(Self { width, quality })
    }

    /// Output path for a given source: same directory, stem plus the
    /// transform suffix, original extension kept.
    pub fn derived_path(&self, source: &Path) -> PathBuf {
        let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
        let suffix = derived_suffix(self.width, self.quality);
        let name = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}{}.{}", stem, suffix, ext),
            None => format!("{}{}", stem, suffix),
        };
        source.with_file_name(name)
    }

    /// Resizes one image and writes the derived file.
    ///
    /// Decodes the source, resamples with Lanczos3 to the target width at
    /// the aspect-preserving height, writes the result as lossless PNG,
    /// then re-encodes the same pixels as lossy WebP at the requested
    /// quality, overwriting the derived path in place. The extension stays
    /// as the source's, matching the backend's expectations for uploaded
    /// card images.
    ///
    /// Decoding happens entirely before the first write, so a failed
    /// decode leaves no partial output behind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ImageDecode` when the source cannot be decoded,
    /// `AppError::ImageEncode` when the derived file cannot be written.
    pub fn transform(&self, source: &Path) -> Result<PathBuf, AppError> {
        let img = image::ImageReader::open(source)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| AppError::ImageDecode {
                path: source.to_path_buf(),
                source: e,
            })?;

        let (source_width, source_height) = (img.width(), img.height());
        let target_height = ((self.width as f64) * (source_height as f64)
            / (source_width as f64))
            .round()
            .max(1.0) as u32;

        debug!(
            source = %source.display(),
            source_width,
            source_height,
            target_width = self.width,
            target_height,
            "Resampling image"
        );

        let resized = img.resize_exact(self.width, target_height, FilterType::Lanczos3);
        let output = self.derived_path(source);

        resized
            .save_with_format(&output, ImageFormat::Png)
            .map_err(|e| AppError::ImageEncode {
                path: output.clone(),
                source: e,
            })?;

        // Lossy pass: replace the lossless bytes with WebP at the requested
        // quality, keeping the derived path unchanged.
        let rgba = resized.to_rgba8();
        let encoded = webp::Encoder::from_rgba(&rgba, self.width, target_height)
            .encode(self.quality as f32);
        std::fs::write(&output, &*encoded)?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use tempfile::tempdir;

    fn write_test_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(width, height, image::Rgba([120, 40, 40, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_new_rejects_zero_width() {
        assert!(matches!(
            ImageTransformer::new(0, 50),
            Err(AppError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_new_rejects_out_of_range_quality() {
        assert!(ImageTransformer::new(400, 0).is_err());
        assert!(ImageTransformer::new(400, 101).is_err());
        assert!(ImageTransformer::new(400, 100).is_ok());
    }

    #[test]
    fn test_derived_path_encodes_parameters() {
        let transformer = ImageTransformer::new(400, 50).unwrap();
        let derived = transformer.derived_path(Path::new("cards/Wild_unit.png"));
        assert_eq!(derived, Path::new("cards/Wild_unit_resized_400_50.png"));
    }

    #[test]
    fn test_transform_preserves_aspect_ratio() {
        let dir = tempdir().unwrap();
        let source = write_test_image(dir.path(), "Wild_unit.png", 800, 600);

        let transformer = ImageTransformer::new(400, 50).unwrap();
        let derived = transformer.transform(&source).unwrap();

        assert_eq!(
            derived.file_name().unwrap().to_str().unwrap(),
            "Wild_unit_resized_400_50.png"
        );

        // The derived bytes are WebP regardless of extension; decode by
        // content, not by name.
        let img = image::ImageReader::open(&derived)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap();
        assert_eq!((img.width(), img.height()), (400, 300));

        // Source untouched.
        assert!(source.exists());
    }

    #[test]
    fn test_transform_rounds_derived_height() {
        let dir = tempdir().unwrap();
        // 301/997 * 100 = 30.19... -> 30
        let source = write_test_image(dir.path(), "Chaos_card.png", 997, 301);

        let transformer = ImageTransformer::new(100, 80).unwrap();
        let derived = transformer.transform(&source).unwrap();

        let img = image::ImageReader::open(&derived)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap();
        assert_eq!((img.width(), img.height()), (100, 30));
    }

    #[test]
    fn test_transform_is_idempotent_on_dimensions() {
        let dir = tempdir().unwrap();
        let source = write_test_image(dir.path(), "Order_card.png", 640, 480);
        let transformer = ImageTransformer::new(320, 60).unwrap();

        let first = transformer.transform(&source).unwrap();
        let second = transformer.transform(&source).unwrap();
        assert_eq!(first, second);

        let img = image::ImageReader::open(&second)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap();
        assert_eq!((img.width(), img.height()), (320, 240));
    }

    #[test]
    fn test_transform_decode_failure_leaves_no_output() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("broken.png");
        std::fs::write(&source, b"not an image at all").unwrap();

        let transformer = ImageTransformer::new(400, 50).unwrap();
        let err = transformer.transform(&source).unwrap_err();

        assert!(matches!(err, AppError::ImageDecode { .. }));
        assert!(err.to_string().contains("broken.png"));
        assert!(!transformer.derived_path(&source).exists());
    }

    #[test]
    fn test_is_derived_matches_transform_outputs() {
        assert!(is_derived(Path::new("Wild_unit_resized_400_50.png")));
        assert!(is_derived(Path::new("a/b/x_resized_1_100.png")));
        assert!(!is_derived(Path::new("Wild_unit.png")));
        assert!(!is_derived(Path::new("Wild_resized_photo.png")));
        assert!(!is_derived(Path::new("x_resized_400_50_extra.png")));
    }
}

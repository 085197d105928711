//! Flat raster persistence. A saved surface is a single PNG, JPEG or BMP file
//! with no sidecar data; the overlay is flattened into the pixels.

use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};
use log::{debug, info};

use crate::error::{SurfaceError, SurfaceResult};

/// Format implied by the file extension, restricted to PNG/JPEG/BMP
pub fn format_for_path(path: &Path) -> SurfaceResult<ImageFormat> {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ImageFormat::from_extension(&ext) {
        Some(format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp)) => Ok(format),
        _ => Err(SurfaceError::UnsupportedFormat(if ext.is_empty() {
            path.display().to_string()
        } else {
            ext
        })),
    }
}

/// Encode `bitmap` by extension. The bitmap is RGB, so JPEG never sees alpha.
pub fn save_bitmap(bitmap: &RgbImage, path: &Path) -> SurfaceResult<()> {
    let format = format_for_path(path)?;
    DynamicImage::ImageRgb8(bitmap.clone()).save_with_format(path, format)?;
    info!("Saved {}x{} bitmap to {}", bitmap.width(), bitmap.height(), path.display());
    Ok(())
}

/// Decode any supported image file into an RGB bitmap. The format is read
/// from the file content, so the extension does not matter.
pub fn load_bitmap(path: &Path) -> SurfaceResult<RgbImage> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?.to_rgb8();
    debug!("Decoded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::path::PathBuf;

    #[test]
    fn test_format_by_extension() {
        assert_eq!(format_for_path(Path::new("a.PNG")).ok(), Some(ImageFormat::Png));
        assert_eq!(format_for_path(Path::new("a.jpeg")).ok(), Some(ImageFormat::Jpeg));
        assert_eq!(format_for_path(Path::new("a.jpg")).ok(), Some(ImageFormat::Jpeg));
        assert_eq!(format_for_path(Path::new("a.bmp")).ok(), Some(ImageFormat::Bmp));
        assert!(matches!(
            format_for_path(Path::new("a.gif")),
            Err(SurfaceError::UnsupportedFormat(ext)) if ext == "gif"
        ));
        assert!(format_for_path(&PathBuf::from("noext")).is_err());
    }

    #[test]
    fn test_png_and_bmp_are_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let mut bitmap = RgbImage::from_pixel(8, 6, Rgb([255, 255, 255]));
        bitmap.put_pixel(3, 2, Rgb([200, 10, 30]));

        for name in ["out.png", "out.bmp"] {
            let path = dir.path().join(name);
            save_bitmap(&bitmap, &path).unwrap();
            assert_eq!(load_bitmap(&path).unwrap(), bitmap);
        }
    }

    #[test]
    fn test_jpeg_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let bitmap = RgbImage::from_pixel(16, 9, Rgb([0, 0, 255]));
        save_bitmap(&bitmap, &path).unwrap();
        assert_eq!(load_bitmap(&path).unwrap().dimensions(), (16, 9));
    }

    #[test]
    fn test_load_ignores_the_extension() {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join("out.png");
        let bitmap = RgbImage::from_pixel(5, 4, Rgb([9, 99, 199]));
        save_bitmap(&bitmap, &saved).unwrap();

        for name in ["untitled", "photo.jpe"] {
            let renamed = dir.path().join(name);
            std::fs::copy(&saved, &renamed).unwrap();
            assert_eq!(load_bitmap(&renamed).unwrap(), bitmap);
        }
    }

    #[test]
    fn test_unknown_content_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"just some text").unwrap();
        assert!(matches!(load_bitmap(&path), Err(SurfaceError::Image(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_bitmap(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(SurfaceError::Image(_)) | Err(SurfaceError::Io(_))));
    }
}
